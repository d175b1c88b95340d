use serde::{Deserialize, Serialize};
use tracing::debug;

use super::game::Game;
use super::raw::{RawGameDocument, RawPlay};
use super::rink::{Coordinates, RinkSide, Zone};
use super::{EventId, GameId, PlayerId, TeamId};
use crate::error::{ExtractError, Result};

/// Play type, from the feed's `typeDescKey`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Goal,
    ShotOnGoal,
    MissedShot,
    BlockedShot,
    Faceoff,
    Hit,
    Giveaway,
    Takeaway,
    Stoppage,
    Penalty,
    DelayedPenalty,
    PeriodStart,
    PeriodEnd,
    GameEnd,
    FailedShotAttempt,
    ShootoutComplete,
    /// Any type key not listed above
    Other,
}

impl EventKind {
    pub fn from_type_key(key: &str) -> Self {
        match key.trim() {
            "goal" => EventKind::Goal,
            "shot-on-goal" => EventKind::ShotOnGoal,
            "missed-shot" => EventKind::MissedShot,
            "blocked-shot" => EventKind::BlockedShot,
            "faceoff" => EventKind::Faceoff,
            "hit" => EventKind::Hit,
            "giveaway" => EventKind::Giveaway,
            "takeaway" => EventKind::Takeaway,
            "stoppage" => EventKind::Stoppage,
            "penalty" => EventKind::Penalty,
            "delayed-penalty" => EventKind::DelayedPenalty,
            "period-start" => EventKind::PeriodStart,
            "period-end" => EventKind::PeriodEnd,
            "game-end" => EventKind::GameEnd,
            "failed-shot-attempt" => EventKind::FailedShotAttempt,
            "shootout-complete" => EventKind::ShootoutComplete,
            _ => EventKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Goal => "goal",
            EventKind::ShotOnGoal => "shot-on-goal",
            EventKind::MissedShot => "missed-shot",
            EventKind::BlockedShot => "blocked-shot",
            EventKind::Faceoff => "faceoff",
            EventKind::Hit => "hit",
            EventKind::Giveaway => "giveaway",
            EventKind::Takeaway => "takeaway",
            EventKind::Stoppage => "stoppage",
            EventKind::Penalty => "penalty",
            EventKind::DelayedPenalty => "delayed-penalty",
            EventKind::PeriodStart => "period-start",
            EventKind::PeriodEnd => "period-end",
            EventKind::GameEnd => "game-end",
            EventKind::FailedShotAttempt => "failed-shot-attempt",
            EventKind::ShootoutComplete => "shootout-complete",
            EventKind::Other => "other",
        }
    }

    /// Goals and shots on goal are the rows of the feature table.
    pub fn is_shot_like(self) -> bool {
        matches!(self, EventKind::Goal | EventKind::ShotOnGoal)
    }

    pub fn is_goal(self) -> bool {
        self == EventKind::Goal
    }
}

/// Decoded 4-character situation code:
/// away goalie flag, away skaters, home skaters, home goalie flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SituationCode {
    pub away_goalie_in_net: bool,
    pub away_skaters: u8,
    pub home_skaters: u8,
    pub home_goalie_in_net: bool,
}

impl SituationCode {
    /// Parse a code such as `"1551"`. Short codes are left-padded with zeros.
    pub fn parse(code: &str) -> Option<Self> {
        let code = format!("{:0>4}", code.trim());
        let digits: Vec<u8> = code
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()?;
        if digits.len() != 4 || digits[0] > 1 || digits[3] > 1 {
            return None;
        }

        Some(Self {
            away_goalie_in_net: digits[0] == 1,
            away_skaters: digits[1],
            home_skaters: digits[2],
            home_goalie_in_net: digits[3] == 1,
        })
    }

    /// Whether the net the shooter attacks was empty.
    pub fn opponent_net_empty(&self, shooter_is_home: bool) -> bool {
        if shooter_is_home {
            !self.away_goalie_in_net
        } else {
            !self.home_goalie_in_net
        }
    }
}

/// Compact copy of the event that immediately precedes another one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PreviousEvent {
    pub event_id: EventId,
    pub kind: EventKind,
    pub period_number: u32,
    pub time_in_period: u32,
    pub coordinates: Option<Coordinates>,
}

/// One play of a game, after validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub event_id: EventId,
    pub period_number: u32,
    /// Seconds since the start of the period
    pub time_in_period: u32,
    pub kind: EventKind,
    pub owner_team_id: Option<TeamId>,
    pub coordinates: Option<Coordinates>,
    pub zone: Option<Zone>,
    pub shot_type: Option<String>,
    pub goalie_id: Option<PlayerId>,
    /// Shooter for shots, scorer for goals
    pub player_id: Option<PlayerId>,
    pub situation_code: Option<String>,
    /// Side label published by the feed, used only as a cross-check
    pub home_defending_side: Option<RinkSide>,
    /// Event right before this one in the sorted game sequence
    pub previous: Option<PreviousEvent>,
}

impl Event {
    pub fn is_shot_like(&self) -> bool {
        self.kind.is_shot_like()
    }

    pub fn situation(&self) -> Option<SituationCode> {
        self.situation_code.as_deref().and_then(SituationCode::parse)
    }

    pub fn summary(&self) -> PreviousEvent {
        PreviousEvent {
            event_id: self.event_id,
            kind: self.kind,
            period_number: self.period_number,
            time_in_period: self.time_in_period,
            coordinates: self.coordinates,
        }
    }

    /// Seconds since the previous event; undefined across a period boundary.
    pub fn seconds_since_previous(&self) -> Option<u32> {
        let prev = self.previous.as_ref()?;
        if prev.period_number != self.period_number {
            return None;
        }
        self.time_in_period.checked_sub(prev.time_in_period)
    }

    pub fn follows_shot_on_goal(&self) -> bool {
        matches!(self.previous, Some(ref p) if p.kind == EventKind::ShotOnGoal)
    }
}

/// Convert `"MM:SS"` to seconds.
pub fn parse_time_in_period(time: &str) -> Option<u32> {
    let (minutes, seconds) = time.trim().split_once(':')?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: u32 = seconds.trim().parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Validate a single raw play. The predecessor link is set later.
pub fn parse_play(play: &RawPlay) -> Result<Event> {
    let event_id = play
        .event_id
        .ok_or_else(|| ExtractError::malformed_event(None, "missing eventId"))?;

    let period = play
        .period_descriptor
        .as_ref()
        .and_then(|p| p.number)
        .ok_or_else(|| ExtractError::malformed_event(Some(event_id), "missing period number"))?;
    let period_number = u32::try_from(period)
        .ok()
        .filter(|p| *p >= 1)
        .ok_or_else(|| {
            ExtractError::malformed_event(Some(event_id), format!("invalid period number {period}"))
        })?;

    let time_raw = play
        .time_in_period
        .as_deref()
        .ok_or_else(|| ExtractError::malformed_event(Some(event_id), "missing timeInPeriod"))?;
    let time_in_period = parse_time_in_period(time_raw).ok_or_else(|| {
        ExtractError::malformed_event(Some(event_id), format!("unparseable timeInPeriod '{time_raw}'"))
    })?;

    let kind = play
        .type_desc_key
        .as_deref()
        .map(EventKind::from_type_key)
        .ok_or_else(|| ExtractError::malformed_event(Some(event_id), "missing typeDescKey"))?;

    let details = play.details.clone().unwrap_or_default();
    let player_id = if kind.is_goal() {
        details.scoring_player_id.or(details.shooting_player_id)
    } else {
        details.shooting_player_id
    };

    Ok(Event {
        event_id,
        period_number,
        time_in_period,
        kind,
        owner_team_id: details.event_owner_team_id,
        coordinates: Coordinates::from_pair(details.x_coord, details.y_coord),
        zone: details.zone_code.as_deref().and_then(Zone::from_code),
        shot_type: details.shot_type,
        goalie_id: details.goalie_in_net_id,
        player_id,
        situation_code: play.situation_code.as_ref().map(|c| c.normalized()),
        home_defending_side: play
            .home_team_defending_side
            .as_deref()
            .and_then(RinkSide::from_label),
        previous: None,
    })
}

/// A game's validated plays in time order.
#[derive(Debug, Default)]
pub struct EventLog {
    pub game_id: GameId,
    events: Vec<Event>,
    dropped: Vec<ExtractError>,
}

impl EventLog {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Goals and shots on goal, in time order.
    pub fn shots(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_shot_like())
    }

    /// Plays rejected while building the log.
    pub fn dropped(&self) -> &[ExtractError] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct period numbers, ascending.
    pub fn periods(&self) -> Vec<u32> {
        let mut periods: Vec<u32> = self.events.iter().map(|e| e.period_number).collect();
        periods.dedup();
        periods
    }
}

/// Build the sorted, linked event sequence of a game.
///
/// Malformed plays are dropped individually. Sorting is stable, so plays
/// sharing a timestamp keep the feed's order.
pub fn build_events(raw: &RawGameDocument, game: &Game) -> EventLog {
    let mut events = Vec::with_capacity(raw.plays.len());
    let mut dropped = Vec::new();

    for play in &raw.plays {
        match parse_play(play) {
            Ok(event) => events.push(event),
            Err(e) => {
                debug!("Game {}: dropping play: {}", game.id, e);
                dropped.push(e);
            }
        }
    }

    events.sort_by_key(|e| (e.period_number, e.time_in_period));

    let mut previous: Option<PreviousEvent> = None;
    for event in events.iter_mut() {
        event.previous = previous;
        previous = Some(event.summary());
    }

    EventLog {
        game_id: game.id,
        events,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::build_game;
    use serde_json::json;

    fn play(id: u64, period: i64, time: &str, kind: &str) -> serde_json::Value {
        json!({
            "eventId": id,
            "periodDescriptor": {"number": period},
            "timeInPeriod": time,
            "typeDescKey": kind,
            "details": {"eventOwnerTeamId": 18, "xCoord": 10, "yCoord": 5, "zoneCode": "O"}
        })
    }

    fn document(plays: Vec<serde_json::Value>) -> RawGameDocument {
        RawGameDocument::from_json_value(json!({
            "id": 2022020001,
            "homeTeam": {"id": 18},
            "awayTeam": {"id": 28},
            "plays": plays
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_time_in_period() {
        assert_eq!(parse_time_in_period("00:00"), Some(0));
        assert_eq!(parse_time_in_period("01:23"), Some(83));
        assert_eq!(parse_time_in_period("19:59"), Some(1199));
        assert_eq!(parse_time_in_period("1:75"), None);
        assert_eq!(parse_time_in_period("abc"), None);
        assert_eq!(parse_time_in_period("-1:00"), None);
        assert_eq!(parse_time_in_period("99999999:00"), None);
        assert_eq!(parse_time_in_period("71582788:15"), Some(4294967295));
    }

    #[test]
    fn test_event_kind_round_trip_names() {
        assert_eq!(EventKind::from_type_key("shot-on-goal"), EventKind::ShotOnGoal);
        assert_eq!(EventKind::ShotOnGoal.as_str(), "shot-on-goal");
        assert_eq!(EventKind::from_type_key("something-new"), EventKind::Other);
        assert!(EventKind::Goal.is_shot_like());
        assert!(!EventKind::MissedShot.is_shot_like());
    }

    #[test]
    fn test_situation_code_parse() {
        let code = SituationCode::parse("1451").unwrap();
        assert!(code.away_goalie_in_net);
        assert_eq!(code.away_skaters, 4);
        assert_eq!(code.home_skaters, 5);
        assert!(code.home_goalie_in_net);

        let code = SituationCode::parse("651").unwrap();
        assert!(!code.away_goalie_in_net);
        assert_eq!(code.away_skaters, 6);
        assert!(code.opponent_net_empty(true));
        assert!(!code.opponent_net_empty(false));

        assert!(SituationCode::parse("2551").is_none());
        assert!(SituationCode::parse("15a1").is_none());
        assert!(SituationCode::parse("15515").is_none());
    }

    #[test]
    fn test_build_events_sorts_and_links() {
        let doc = document(vec![
            play(3, 2, "00:10", "shot-on-goal"),
            play(1, 1, "05:00", "faceoff"),
            play(2, 1, "05:00", "shot-on-goal"),
            play(4, 1, "07:30", "goal"),
        ]);
        let game = build_game(&doc).unwrap();
        let log = build_events(&doc, &game);

        let ids: Vec<u64> = log.events().iter().map(|e| e.event_id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
        assert_eq!(log.periods(), vec![1, 2]);

        let events = log.events();
        assert!(events[0].previous.is_none());
        assert_eq!(events[1].previous.unwrap().event_id, 1);
        assert_eq!(events[2].previous.unwrap().kind, EventKind::ShotOnGoal);
        assert!(events[2].follows_shot_on_goal());
        assert_eq!(events[2].seconds_since_previous(), Some(150));
        // previous event sits in another period
        assert_eq!(events[3].previous.unwrap().event_id, 4);
        assert_eq!(events[3].seconds_since_previous(), None);

        assert_eq!(log.shots().count(), 3);
    }

    #[test]
    fn test_malformed_plays_are_dropped() {
        let doc = document(vec![
            play(1, 1, "00:00", "faceoff"),
            json!({"periodDescriptor": {"number": 1}, "timeInPeriod": "00:05", "typeDescKey": "hit"}),
            play(3, 0, "00:05", "hit"),
            play(4, -1, "00:05", "hit"),
            play(5, 1, "xx", "hit"),
            json!({"eventId": 6, "periodDescriptor": {"number": 1}, "timeInPeriod": "00:06"}),
            play(7, 1, "00:07", "shot-on-goal"),
            play(8, 1, "99999999:00", "hit"),
        ]);
        let game = build_game(&doc).unwrap();
        let log = build_events(&doc, &game);

        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped().len(), 6);
        assert!(log.dropped().iter().all(|e| e.is_recoverable()));
        // the surviving shot links to the surviving faceoff
        assert_eq!(log.events()[1].previous.unwrap().event_id, 1);
    }

    #[test]
    fn test_goal_uses_scorer_and_lone_coordinate_is_missing() {
        let doc = document(vec![json!({
            "eventId": 9,
            "periodDescriptor": {"number": 3},
            "timeInPeriod": "12:00",
            "typeDescKey": "goal",
            "situationCode": "1551",
            "homeTeamDefendingSide": "right",
            "details": {"eventOwnerTeamId": 28, "xCoord": -70, "scoringPlayerId": 77,
                        "shootingPlayerId": 78, "shotType": "snap"}
        })]);
        let game = build_game(&doc).unwrap();
        let log = build_events(&doc, &game);
        let goal = &log.events()[0];

        assert_eq!(goal.player_id, Some(77));
        assert!(goal.coordinates.is_none());
        assert_eq!(goal.home_defending_side, Some(RinkSide::Right));
        assert_eq!(goal.situation().unwrap().away_skaters, 5);
    }
}
