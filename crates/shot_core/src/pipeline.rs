//! Single-game pipeline: raw document to feature rows.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{derive_rows, infer_segment_sides, FeatureRow, SideInference};
use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::models::{build_events, build_game, build_players, Game, PlayerIndex, RawGameDocument};

/// Everything derived from one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedGame {
    pub game: Game,
    pub players: PlayerIndex,
    pub sides: SideInference,
    pub rows: Vec<FeatureRow>,
    /// Plays rejected as malformed
    pub dropped_plays: usize,
}

impl DerivedGame {
    pub fn is_resolved(&self) -> bool {
        self.sides.is_resolved()
    }
}

/// Run the entity, side and geometry stages over one game.
///
/// Fails only when the game header itself is unusable.
pub fn derive_game(raw: &RawGameDocument, config: &ExtractionConfig) -> Result<DerivedGame> {
    let game = build_game(raw)?;
    let players = build_players(raw);
    let log = build_events(raw, &game);
    let sides = infer_segment_sides(&game, &log, &config.side_rules);
    let rows = derive_rows(&game, &log, &sides, &config.rink);

    if !log.dropped().is_empty() {
        debug!("{}: dropped {} malformed plays", game, log.dropped().len());
    }
    info!(
        "{}: {} events, {} shot rows, {} periods",
        game,
        log.len(),
        rows.len(),
        sides.records.len()
    );

    Ok(DerivedGame {
        dropped_plays: log.dropped().len(),
        game,
        players,
        sides,
        rows,
    })
}

/// Feature rows of one game with the default configuration.
pub fn derive_game_table(raw: &RawGameDocument) -> Result<Vec<FeatureRow>> {
    derive_game(raw, &ExtractionConfig::default()).map(|derived| derived.rows)
}
