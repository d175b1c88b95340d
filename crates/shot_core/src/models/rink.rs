use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// End of the rink, as seen in the feed's coordinate frame (x < 0 is left).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RinkSide {
    Left,
    Right,
}

impl RinkSide {
    pub fn opposite(self) -> Self {
        match self {
            RinkSide::Left => RinkSide::Right,
            RinkSide::Right => RinkSide::Left,
        }
    }

    /// Parse the feed's `homeTeamDefendingSide` label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Some(RinkSide::Left),
            "right" => Some(RinkSide::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RinkSide::Left => "left",
            RinkSide::Right => "right",
        }
    }
}

/// Zone of the event relative to the team that owns it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Offensive,
    Neutral,
    Defensive,
}

impl Zone {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "O" => Some(Zone::Offensive),
            "N" => Some(Zone::Neutral),
            "D" => Some(Zone::Defensive),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Zone::Offensive => "O",
            Zone::Neutral => "N",
            Zone::Defensive => "D",
        }
    }
}

/// Event location in feet, rink centre at the origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both halves or nothing; a lone x or y is treated as missing.
    pub fn from_pair(x: Option<f64>, y: Option<f64>) -> Option<Self> {
        match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Self { x, y }),
            _ => None,
        }
    }

    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        nalgebra::distance(&self.point(), &other.point())
    }
}
