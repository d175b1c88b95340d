//! Raw play-by-play document as delivered by the league feed.
//!
//! Every leaf is optional: a missing field is reported by the parsing
//! functions in `game`, `player` and `events`, never by deserialization.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One game's play-by-play record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawGameDocument {
    pub id: Option<u64>,
    pub season: Option<u64>,
    pub game_type: Option<u8>,
    pub game_date: Option<String>,
    pub home_team: Option<RawTeam>,
    pub away_team: Option<RawTeam>,
    #[serde(default)]
    pub roster_spots: Vec<RawRosterSpot>,
    #[serde(default)]
    pub plays: Vec<RawPlay>,
}

impl RawGameDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    pub id: Option<u64>,
    pub abbrev: Option<String>,
    pub score: Option<u32>,
    pub name: Option<LocalizedName>,
}

/// `{"default": "..."}` wrapper used for names in the feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocalizedName {
    #[serde(rename = "default")]
    pub value: Option<String>,
}

impl LocalizedName {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawRosterSpot {
    pub team_id: Option<u64>,
    pub player_id: Option<u64>,
    pub first_name: Option<LocalizedName>,
    pub last_name: Option<LocalizedName>,
    pub position_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawPlay {
    pub event_id: Option<u64>,
    pub period_descriptor: Option<RawPeriodDescriptor>,
    /// `"MM:SS"` elapsed in the period.
    pub time_in_period: Option<String>,
    pub situation_code: Option<RawSituationCode>,
    pub home_team_defending_side: Option<String>,
    pub type_desc_key: Option<String>,
    pub details: Option<RawPlayDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawPeriodDescriptor {
    pub number: Option<i64>,
    pub period_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayDetails {
    pub event_owner_team_id: Option<u64>,
    pub x_coord: Option<f64>,
    pub y_coord: Option<f64>,
    pub zone_code: Option<String>,
    pub shot_type: Option<String>,
    pub shooting_player_id: Option<u64>,
    pub scoring_player_id: Option<u64>,
    pub goalie_in_net_id: Option<u64>,
}

/// The situation code shows up both as `"1551"` and as `1551` (or `551`
/// once leading zeros are lost).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawSituationCode {
    Text(String),
    Number(u64),
}

impl RawSituationCode {
    /// Four characters, left-padded with zeros.
    pub fn normalized(&self) -> String {
        match self {
            RawSituationCode::Text(s) => format!("{:0>4}", s.trim()),
            RawSituationCode::Number(n) => format!("{:04}", n),
        }
    }
}
