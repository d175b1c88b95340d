//! # Extraction Configuration
//!
//! All tunables of the pipeline in one place: rink geometry, the side rule
//! table and the table encoding.
//!
//! ```yaml
//! rink:
//!   goal_line_x: 89.0
//! side_rules:
//!   offensive: left
//!   defensive: right
//! encoding:
//!   shot_type: one_hot
//!   zone_code: ordinal
//!   last_event_type: ordinal
//!   mirror_coordinates: true
//! ```
//!
//! Any section or field may be omitted and keeps its default.

use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{RinkGeometry, SideRuleTable};
use crate::error::{ExtractError, Result};
use crate::table::EncodingConfig;

/// Environment variable pointing at a YAML config file.
pub const CONFIG_PATH_ENV: &str = "SHOT_CONFIG_PATH";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    pub rink: RinkGeometry,
    pub side_rules: SideRuleTable,
    pub encoding: EncodingConfig,
}

impl ExtractionConfig {
    /// Ordinal codes for every categorical feature.
    pub fn ordinal() -> Self {
        Self {
            encoding: EncodingConfig::ordinal(),
            ..Self::default()
        }
    }

    /// One-hot columns for every categorical feature.
    pub fn one_hot() -> Self {
        Self {
            encoding: EncodingConfig::one_hot(),
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| ExtractError::Config(format!("invalid config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Config from the file named by `SHOT_CONFIG_PATH`, or the default when
    /// the variable is unset or blank.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        info!("Loading extraction config from {}='{}'", CONFIG_PATH_ENV, path);
        Self::from_file(path)
    }

    pub fn validate(&self) -> Result<()> {
        self.rink.validate().map_err(ExtractError::Config)?;
        self.side_rules.validate().map_err(ExtractError::Config)?;
        Ok(())
    }
}
