//! # Analysis Module
//!
//! Derivation stages that run once per game, in order:
//!
//! - `side` - which end the home team defends, per period
//! - `geometry` - distance/angle/rebound/speed relative to the attacked net
//! - `features` - one row per shot-like event

pub mod features;
pub mod geometry;
pub mod side;

pub use features::{derive_row, derive_rows, empty_net_indicator, FeatureRow};
pub use geometry::{
    angle_change, angle_from_net, derive_geometry, distance_from_net, travel_speed, RinkGeometry,
    ShotGeometry, GOAL_LINE_X,
};
pub use side::{
    infer_segment_sides, SegmentSideRecord, SideInference, SideMismatch, SideRuleTable,
};
