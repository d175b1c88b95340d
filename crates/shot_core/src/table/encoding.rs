//! Categorical encoding tables and per-row encoders.
//!
//! The code tables are embedded at compile time and parsed once.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::analysis::{FeatureRow, RinkGeometry};
use crate::models::RinkSide;

/// Embedded category code tables.
pub const CATEGORIES_YAML: &str = include_str!("../../data/categories.yaml");

static CATEGORY_TABLES: OnceLock<CategoryTables> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCode {
    pub name: String,
    pub code: i64,
}

/// Ordinal codes of one categorical feature, with a fallback bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTable {
    pub other: i64,
    pub codes: Vec<CategoryCode>,
}

impl CategoryTable {
    /// Code of `value`; unknown and null values map to `other`.
    pub fn code_of(&self, value: Option<&str>) -> i64 {
        value
            .and_then(|v| self.codes.iter().find(|c| c.name == v))
            .map_or(self.other, |c| c.code)
    }

    /// One-hot bucket names: every listed category, then `other`.
    pub fn bucket_names(&self) -> Vec<&str> {
        self.codes
            .iter()
            .map(|c| c.name.as_str())
            .chain(std::iter::once("other"))
            .collect()
    }

    /// Bucket of `value` for one-hot expansion; unknown and null values
    /// land in `other`.
    pub fn bucket_of<'a>(&'a self, value: Option<&str>) -> &'a str {
        value
            .and_then(|v| self.codes.iter().find(|c| c.name == v))
            .map_or("other", |c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTables {
    pub shot_type: CategoryTable,
    pub zone_code: CategoryTable,
    pub last_event_type: CategoryTable,
}

/// Category tables, parsed on first use.
///
/// # Panics
///
/// If the embedded YAML is invalid, which a normal build rules out.
pub fn category_tables() -> &'static CategoryTables {
    CATEGORY_TABLES.get_or_init(|| {
        serde_yaml::from_str(CATEGORIES_YAML).expect("Failed to parse categories.yaml")
    })
}

/// `shot_type` + `tip-in` -> `shot_type_tip_in`.
pub fn one_hot_column_name(feature: &str, bucket: &str) -> String {
    format!("{}_{}", feature, bucket.replace('-', "_"))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    #[default]
    Ordinal,
    OneHot,
}

/// How the categorical features are expanded in the assembled table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EncodingConfig {
    pub shot_type: EncodingMode,
    pub zone_code: EncodingMode,
    pub last_event_type: EncodingMode,
    /// Flip coordinates so every shot attacks toward +x
    pub mirror_coordinates: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            shot_type: EncodingMode::OneHot,
            zone_code: EncodingMode::Ordinal,
            last_event_type: EncodingMode::Ordinal,
            mirror_coordinates: true,
        }
    }
}

impl EncodingConfig {
    /// Everything ordinal, one column per feature.
    pub fn ordinal() -> Self {
        Self {
            shot_type: EncodingMode::Ordinal,
            ..Self::default()
        }
    }

    pub fn one_hot() -> Self {
        Self {
            shot_type: EncodingMode::OneHot,
            zone_code: EncodingMode::OneHot,
            last_event_type: EncodingMode::OneHot,
            mirror_coordinates: true,
        }
    }
}

/// Whether the shooter of `row` attacks the +x net. `None` when the period
/// side or the shooter's bench is unknown.
pub fn attacks_positive(row: &FeatureRow) -> Option<bool> {
    let home_defends = row.home_defending_side?;
    let owner = row.owner_team_id?;
    if owner != row.home_team_id && owner != row.away_team_id {
        return None;
    }
    let attacked = RinkGeometry::attacked_side(home_defends, owner == row.home_team_id);
    Some(attacked == RinkSide::Right)
}

/// Current and previous coordinates, negated when the shooter attacks -x.
/// Rows without a known direction keep their raw coordinates.
pub fn canonical_coordinates(row: &FeatureRow) -> [Option<f64>; 4] {
    let raw = [row.x_coord, row.y_coord, row.last_x, row.last_y];
    match attacks_positive(row) {
        Some(false) => raw.map(|v| v.map(|x| -x)),
        _ => raw,
    }
}
