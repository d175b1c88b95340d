//! # Segment Side Inference
//!
//! Works out which end of the rink the home team defends in each period.
//! The feed's own side label is unreliable, so the answer is read off the
//! first event that pins a team to an end.
//!
//! ## Algorithm
//! 1. Group the game's events by period (the log is already time ordered)
//! 2. Per period, take the first event with an Offensive/Defensive zone code,
//!    both coordinates and an owner team from this game
//! 3. Map (zone, owner is home, sign of x) to a side through [`SideRuleTable`]
//! 4. Compare with the feed label; disagreements are logged and kept as
//!    [`SideMismatch`] diagnostics, never applied
//! 5. Periods with no evidence take the opposite of the nearest earlier
//!    observed period, else the opposite of the nearest later one

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Event, EventId, EventLog, Game, GameId, RinkSide, Zone};

/// Side defended by the home team when the home team owns an event at
/// x > 0, per zone. The remaining cases follow by symmetry: an away-owned
/// event at x < 0 maps to the same side, every other case to its opposite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SideRuleTable {
    pub offensive: RinkSide,
    pub defensive: RinkSide,
}

impl Default for SideRuleTable {
    fn default() -> Self {
        Self {
            offensive: RinkSide::Left,
            defensive: RinkSide::Right,
        }
    }
}

impl SideRuleTable {
    /// Side defended by the home team, or `None` for a neutral-zone event.
    /// `x == 0` falls into the "otherwise" branch.
    pub fn classify(&self, zone: Zone, owner_is_home: bool, x: f64) -> Option<RinkSide> {
        let base = match zone {
            Zone::Offensive => self.offensive,
            Zone::Defensive => self.defensive,
            Zone::Neutral => return None,
        };

        if (owner_is_home && x > 0.0) || (!owner_is_home && x < 0.0) {
            Some(base)
        } else {
            Some(base.opposite())
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.offensive == self.defensive {
            return Err(format!(
                "side_rules: offensive and defensive zones both map to '{}'",
                self.offensive.as_str()
            ));
        }
        Ok(())
    }
}

/// Inferred defended side of the home team for one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentSideRecord {
    pub game_id: GameId,
    pub period_number: u32,
    /// `None` when the period stayed unresolved
    pub inferred_side: Option<RinkSide>,
    /// True when the side came from a neighbouring period
    pub backfilled: bool,
}

/// Feed label disagreeing with the inferred side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SideMismatch {
    pub period_number: u32,
    pub event_id: EventId,
    pub inferred: RinkSide,
    pub labeled: RinkSide,
}

/// Side inference result for a whole game.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SideInference {
    pub game_id: GameId,
    pub records: Vec<SegmentSideRecord>,
    pub mismatches: Vec<SideMismatch>,
}

impl SideInference {
    pub fn side_for(&self, period_number: u32) -> Option<RinkSide> {
        self.records
            .iter()
            .find(|r| r.period_number == period_number)
            .and_then(|r| r.inferred_side)
    }

    /// At least one period resolved. After back-fill this means all did.
    pub fn is_resolved(&self) -> bool {
        self.records.iter().any(|r| r.inferred_side.is_some())
    }

    pub fn unresolved_periods(&self) -> Vec<u32> {
        self.records
            .iter()
            .filter(|r| r.inferred_side.is_none())
            .map(|r| r.period_number)
            .collect()
    }
}

fn is_classifiable(event: &Event, game: &Game) -> bool {
    matches!(event.zone, Some(Zone::Offensive | Zone::Defensive))
        && event.coordinates.is_some()
        && event
            .owner_team_id
            .map_or(false, |team| game.opponent_of(team).is_some())
}

/// Classify a single period from its first usable event.
fn observe_period<'a>(
    events: impl Iterator<Item = &'a Event>,
    game: &Game,
    rules: &SideRuleTable,
) -> Option<(RinkSide, &'a Event)> {
    events.filter(|e| is_classifiable(e, game)).find_map(|e| {
        let zone = e.zone?;
        let coords = e.coordinates?;
        let owner = e.owner_team_id?;
        rules
            .classify(zone, game.is_home(owner), coords.x)
            .map(|side| (side, e))
    })
}

/// Infer the home team's defended side for every period of a game.
pub fn infer_segment_sides(game: &Game, log: &EventLog, rules: &SideRuleTable) -> SideInference {
    let periods = log.periods();
    let mut observed: Vec<Option<RinkSide>> = Vec::with_capacity(periods.len());
    let mut mismatches = Vec::new();

    for &period in &periods {
        let in_period = log.events().iter().filter(|e| e.period_number == period);

        match observe_period(in_period, game, rules) {
            Some((side, event)) => {
                if let Some(labeled) = event.home_defending_side {
                    if labeled != side {
                        warn!(
                            "Game {} period {}: feed says home defends {}, event {} says {}",
                            game.id,
                            period,
                            labeled.as_str(),
                            event.event_id,
                            side.as_str()
                        );
                        mismatches.push(SideMismatch {
                            period_number: period,
                            event_id: event.event_id,
                            inferred: side,
                            labeled,
                        });
                    }
                }
                observed.push(Some(side));
            }
            None => {
                debug!("Game {} period {}: no classifiable event", game.id, period);
                observed.push(None);
            }
        }
    }

    let records = periods
        .iter()
        .enumerate()
        .map(|(i, &period)| {
            let (inferred_side, backfilled) = match observed[i] {
                Some(side) => (Some(side), false),
                None => {
                    let earlier = observed[..i].iter().rev().find_map(|s| *s);
                    let later = observed[i + 1..].iter().find_map(|s| *s);
                    let filled = earlier.or(later).map(RinkSide::opposite);
                    (filled, filled.is_some())
                }
            };
            SegmentSideRecord {
                game_id: game.id,
                period_number: period,
                inferred_side,
                backfilled,
            }
        })
        .collect::<Vec<_>>();

    if !periods.is_empty() && observed.iter().all(Option::is_none) {
        warn!(
            "Game {}: no period could be resolved, geometry will be null",
            game.id
        );
    }

    SideInference {
        game_id: game.id,
        records,
        mismatches,
    }
}
