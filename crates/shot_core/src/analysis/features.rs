//! # Feature Rows
//!
//! One [`FeatureRow`] per goal or shot on goal, combining the event, its
//! predecessor, the game context and the derived geometry.

use serde::{Deserialize, Serialize};

use super::geometry::{derive_geometry, RinkGeometry};
use super::side::SideInference;
use crate::models::{
    Event, EventId, EventKind, EventLog, Game, GameId, PlayerId, RinkSide, TeamId, Zone,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRow {
    pub game_id: GameId,
    pub season: Option<u64>,
    pub event_id: EventId,
    pub period_number: u32,
    pub time_in_period: u32,
    pub event_kind: EventKind,

    // Context
    pub owner_team_id: Option<TeamId>,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub shooter_id: Option<PlayerId>,
    pub goalie_id: Option<PlayerId>,
    pub shot_type: Option<String>,
    pub zone_code: Option<Zone>,
    pub situation_code: Option<String>,
    pub x_coord: Option<f64>,
    pub y_coord: Option<f64>,

    // Previous event
    pub last_event_type: Option<EventKind>,
    pub last_x: Option<f64>,
    pub last_y: Option<f64>,
    pub time_since_last_event: Option<u32>,
    pub distance_from_last_event: Option<f64>,

    // Geometry
    pub home_defending_side: Option<RinkSide>,
    pub distance_from_net: Option<f64>,
    pub angle_from_net: Option<f64>,
    pub is_rebound: Option<bool>,
    pub angle_change: Option<f64>,
    pub speed: Option<f64>,

    pub empty_net: u8,
    pub label: u8,
    /// Coordinates missing, shooter unknown or side unresolved
    pub flagged: bool,
}

impl FeatureRow {
    pub fn is_goal(&self) -> bool {
        self.label == 1
    }

    pub fn owner_is_home(&self) -> Option<bool> {
        self.owner_team_id.map(|t| t == self.home_team_id)
    }
}

/// 1 when a goal went into a net with no goalie in it.
///
/// Only goals count, and a missing or unparseable situation code yields 0.
pub fn empty_net_indicator(event: &Event, game: &Game) -> u8 {
    if !event.kind.is_goal() {
        return 0;
    }
    let (Some(owner), Some(code)) = (event.owner_team_id, event.situation()) else {
        return 0;
    };
    u8::from(code.opponent_net_empty(game.is_home(owner)))
}

/// Build the feature row of one shot-like event.
pub fn derive_row(
    event: &Event,
    game: &Game,
    home_defends: Option<RinkSide>,
    rink: &RinkGeometry,
) -> FeatureRow {
    let shooter_is_home = event
        .owner_team_id
        .filter(|t| game.opponent_of(*t).is_some())
        .map(|t| game.is_home(t));

    let geometry = derive_geometry(event, home_defends, shooter_is_home, rink);

    let previous = event.previous.as_ref();
    let last_coords = previous.and_then(|p| p.coordinates);

    FeatureRow {
        game_id: game.id,
        season: game.season,
        event_id: event.event_id,
        period_number: event.period_number,
        time_in_period: event.time_in_period,
        event_kind: event.kind,
        owner_team_id: event.owner_team_id,
        home_team_id: game.home_team_id(),
        away_team_id: game.away_team_id(),
        shooter_id: event.player_id,
        goalie_id: event.goalie_id,
        shot_type: event.shot_type.clone(),
        zone_code: event.zone,
        situation_code: event.situation_code.clone(),
        x_coord: event.coordinates.map(|c| c.x),
        y_coord: event.coordinates.map(|c| c.y),
        last_event_type: previous.map(|p| p.kind),
        last_x: last_coords.map(|c| c.x),
        last_y: last_coords.map(|c| c.y),
        time_since_last_event: geometry.time_since_last_event,
        distance_from_last_event: geometry.distance_from_last_event,
        home_defending_side: home_defends,
        distance_from_net: geometry.distance_from_net,
        angle_from_net: geometry.angle_from_net,
        is_rebound: geometry.is_rebound,
        angle_change: geometry.angle_change,
        speed: geometry.speed,
        empty_net: empty_net_indicator(event, game),
        label: u8::from(event.kind.is_goal()),
        flagged: event.coordinates.is_none() || home_defends.is_none() || shooter_is_home.is_none(),
    }
}

/// Feature rows of every shot-like event in the log, in time order.
pub fn derive_rows(
    game: &Game,
    log: &EventLog,
    sides: &SideInference,
    rink: &RinkGeometry,
) -> Vec<FeatureRow> {
    log.shots()
        .map(|event| derive_row(event, game, sides.side_for(event.period_number), rink))
        .collect()
}
