use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::raw::{RawGameDocument, RawTeam};
use super::{GameId, TeamId};
use crate::error::{ExtractError, Result};

/// One side of a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamInfo {
    pub id: TeamId,
    pub abbrev: Option<String>,
    pub name: Option<String>,
    pub score: Option<u32>,
}

/// Game header, immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub date: Option<NaiveDate>,
    pub season: Option<u64>,
    pub home_team: TeamInfo,
    pub away_team: TeamInfo,
}

impl Game {
    pub fn home_team_id(&self) -> TeamId {
        self.home_team.id
    }

    pub fn away_team_id(&self) -> TeamId {
        self.away_team.id
    }

    pub fn is_home(&self, team_id: TeamId) -> bool {
        team_id == self.home_team.id
    }

    /// The team on the other bench, if `team_id` plays in this game.
    pub fn opponent_of(&self, team_id: TeamId) -> Option<TeamId> {
        if team_id == self.home_team.id {
            Some(self.away_team.id)
        } else if team_id == self.away_team.id {
            Some(self.home_team.id)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let abbrev = |t: &TeamInfo| t.abbrev.clone().unwrap_or_else(|| t.id.to_string());
        match self.date {
            Some(date) => write!(
                f,
                "Game {} on {} between {} and {}",
                self.id,
                date,
                abbrev(&self.home_team),
                abbrev(&self.away_team)
            ),
            None => write!(
                f,
                "Game {} between {} and {}",
                self.id,
                abbrev(&self.home_team),
                abbrev(&self.away_team)
            ),
        }
    }
}

fn build_team(raw: Option<&RawTeam>, which: &str) -> Result<TeamInfo> {
    let raw = raw.ok_or_else(|| ExtractError::MalformedDocument(format!("missing {which}")))?;
    let id = raw
        .id
        .ok_or_else(|| ExtractError::MalformedDocument(format!("missing {which}.id")))?;

    Ok(TeamInfo {
        id,
        abbrev: raw.abbrev.clone(),
        name: raw.name.as_ref().and_then(|n| n.value.clone()),
        score: raw.score,
    })
}

/// Build the game header from a raw document.
///
/// A missing game id or team id makes the whole document unusable; a bad date
/// only loses the date.
pub fn build_game(raw: &RawGameDocument) -> Result<Game> {
    let id = raw
        .id
        .ok_or_else(|| ExtractError::MalformedDocument("missing id".to_string()))?;
    let home_team = build_team(raw.home_team.as_ref(), "homeTeam")?;
    let away_team = build_team(raw.away_team.as_ref(), "awayTeam")?;

    let date = raw.game_date.as_deref().and_then(|d| {
        NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| warn!("Game {}: unparseable gameDate '{}': {}", id, d, e))
            .ok()
    });

    Ok(Game {
        id,
        date,
        season: raw.season,
        home_team,
        away_team,
    })
}
