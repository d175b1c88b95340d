//! # Batch Context
//!
//! Registry of the games and rosters seen in the current batch. Create one
//! per batch with [`BatchContext::new`] and [`BatchContext::clear`] it
//! before reusing it for an unrelated batch.
//!
//! Games are derived in parallel; a failure in one game never affects its
//! siblings and is reported in [`BatchOutcome::failures`].

use fxhash::FxHashMap;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::analysis::FeatureRow;
use crate::config::ExtractionConfig;
use crate::error::{ExtractError, Result};
use crate::models::{Game, GameId, PlayerIndex, RawGameDocument};
use crate::pipeline::{derive_game, DerivedGame};
use crate::source::GameSource;

/// A game that produced no rows, and why.
#[derive(Debug)]
pub struct GameFailure {
    pub game_id: Option<GameId>,
    pub error: ExtractError,
}

/// Result of one batch. Row order across games is not significant.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub rows: Vec<FeatureRow>,
    pub failures: Vec<GameFailure>,
    /// Games kept with null geometry because no period resolved
    pub unresolved_games: Vec<GameId>,
    pub games_processed: usize,
    pub dropped_plays: usize,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.unresolved_games.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchContext {
    config: ExtractionConfig,
    games: FxHashMap<GameId, Game>,
    players: FxHashMap<GameId, PlayerIndex>,
}

impl BatchContext {
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            config,
            games: FxHashMap::default(),
            players: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Forget every registered game. The config is kept.
    pub fn clear(&mut self) {
        self.games.clear();
        self.players.clear();
    }

    pub fn game(&self, game_id: GameId) -> Option<&Game> {
        self.games.get(&game_id)
    }

    pub fn players(&self, game_id: GameId) -> Option<&PlayerIndex> {
        self.players.get(&game_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Derive every document in parallel and register the results.
    pub fn derive_batch(&mut self, documents: &[RawGameDocument]) -> BatchOutcome {
        let config = self.config;
        let results: Vec<(Option<GameId>, Result<DerivedGame>)> = documents
            .par_iter()
            .map(|doc| (doc.id, derive_game(doc, &config)))
            .collect();
        self.register(results)
    }

    /// Fetch and derive every id in parallel.
    pub fn fetch_and_derive<S>(&mut self, source: &S, game_ids: &[GameId]) -> BatchOutcome
    where
        S: GameSource + Sync,
    {
        let config = self.config;
        let results: Vec<(Option<GameId>, Result<DerivedGame>)> = game_ids
            .par_iter()
            .map(|&id| {
                let derived = source.fetch(id).and_then(|doc| derive_game(&doc, &config));
                (Some(id), derived)
            })
            .collect();
        self.register(results)
    }

    fn register(&mut self, results: Vec<(Option<GameId>, Result<DerivedGame>)>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (game_id, result) in results {
            let derived = match result {
                Ok(derived) => derived,
                Err(error) => {
                    warn!("Game {:?} failed: {}", game_id, error);
                    outcome.failures.push(GameFailure { game_id, error });
                    continue;
                }
            };

            let id = derived.game.id;
            if self.games.contains_key(&id) {
                warn!("Game {} already in this batch, skipping duplicate", id);
                continue;
            }

            if !derived.is_resolved() {
                outcome.unresolved_games.push(id);
            }
            outcome.games_processed += 1;
            outcome.dropped_plays += derived.dropped_plays;
            outcome.rows.extend(derived.rows);
            self.games.insert(id, derived.game);
            self.players.insert(id, derived.players);
        }

        info!(
            "Batch done: {} games, {} rows, {} failures, {} unresolved",
            outcome.games_processed,
            outcome.rows.len(),
            outcome.failures.len(),
            outcome.unresolved_games.len()
        );
        outcome
    }
}
