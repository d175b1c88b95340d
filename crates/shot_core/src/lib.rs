//! # shot_core - Shot Feature Extraction
//!
//! Turns a hockey game's play-by-play log into one feature row per shot on
//! goal or goal, ready for a goal/no-goal classifier.
//!
//! ## Pipeline
//! 1. `models` - typed game, roster and time-ordered events
//! 2. `analysis::side` - which end the home team defends, per period
//! 3. `analysis::geometry` - distance, angle, rebound and speed features
//! 4. `table` - labelled, encoded, projected and null-filled table
//!
//! ```no_run
//! use shot_core::{assemble_table, derive_game_table, model_columns, RawGameDocument};
//!
//! let raw = RawGameDocument::from_json_str(&std::fs::read_to_string("2022020001.json")?)?;
//! let rows = derive_game_table(&raw)?;
//! let table = assemble_table(&rows, model_columns())?;
//! println!("{} rows", table.n_rows());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod config;
pub mod context;
pub mod error;
pub mod game_ids;
pub mod models;
pub mod pipeline;
pub mod predict;
pub mod source;
pub mod table;

pub use analysis::{FeatureRow, RinkGeometry, SegmentSideRecord, SideInference, SideRuleTable};
pub use config::ExtractionConfig;
pub use context::{BatchContext, BatchOutcome, GameFailure};
pub use error::{ExtractError, Result, StoreError, TableError};
pub use game_ids::{playoff_game_ids, regular_season_game_ids};
pub use models::{Event, EventKind, Game, GameId, Player, PlayerIndex, RawGameDocument, RinkSide};
pub use pipeline::{derive_game, derive_game_table, DerivedGame};
pub use predict::{score_table, Prediction, ShotClassifier};
pub use source::{DirectorySource, GameSource, MemorySource, MemoryTableStore, TableStore};
pub use table::{
    assemble_table, fill_missing, model_columns, stratified_split, Column, EncodingConfig,
    EncodingMode, Table, TableAssembler, TrainTestSplit,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
