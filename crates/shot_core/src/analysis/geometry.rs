//! # Shot Geometry
//!
//! Distance and angle of a shot relative to the net it attacks, plus the
//! rebound/speed features that depend on the previous event.
//!
//! Nets sit on the goal lines at `(±goal_line_x, 0)`. The home team attacks
//! the net at the end it does not defend; the away team attacks the net at
//! the end the home team defends.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, Event, RinkSide};

/// Default distance from centre ice to each goal line, in feet.
pub const GOAL_LINE_X: f64 = 89.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RinkGeometry {
    pub goal_line_x: f64,
}

impl Default for RinkGeometry {
    fn default() -> Self {
        Self {
            goal_line_x: GOAL_LINE_X,
        }
    }
}

impl RinkGeometry {
    /// Net located at the given end.
    pub fn net(&self, side: RinkSide) -> Coordinates {
        match side {
            RinkSide::Left => Coordinates::new(-self.goal_line_x, 0.0),
            RinkSide::Right => Coordinates::new(self.goal_line_x, 0.0),
        }
    }

    /// End attacked by the shooting team.
    pub fn attacked_side(home_defends: RinkSide, shooter_is_home: bool) -> RinkSide {
        if shooter_is_home {
            home_defends.opposite()
        } else {
            home_defends
        }
    }

    pub fn target_net(&self, home_defends: RinkSide, shooter_is_home: bool) -> Coordinates {
        self.net(Self::attacked_side(home_defends, shooter_is_home))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.goal_line_x.is_finite() || self.goal_line_x <= 0.0 {
            return Err(format!(
                "rink.goal_line_x must be a positive number, got {}",
                self.goal_line_x
            ));
        }
        Ok(())
    }
}

pub fn distance_from_net(shot: &Coordinates, net: &Coordinates) -> f64 {
    shot.distance_to(net)
}

/// Angle off the goal line axis in degrees, always within `[0, 90]`.
pub fn angle_from_net(shot: &Coordinates, net: &Coordinates) -> f64 {
    let dx = (net.x - shot.x).abs();
    let dy = (net.y - shot.y).abs();
    dy.atan2(dx).to_degrees()
}

/// Angle in degrees between (net -> previous) and (net -> current).
///
/// `None` when either vector has zero length.
pub fn angle_change(net: &Coordinates, previous: &Coordinates, current: &Coordinates) -> Option<f64> {
    let a: Vector2<f64> = previous.point() - net.point();
    let b: Vector2<f64> = current.point() - net.point();
    let norms = a.norm() * b.norm();
    if norms == 0.0 || !norms.is_finite() {
        return None;
    }

    let cos = (a.dot(&b) / norms).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Feet per second between two events; `None` if no time elapsed.
pub fn travel_speed(distance: Option<f64>, elapsed_seconds: Option<u32>) -> Option<f64> {
    match (distance, elapsed_seconds) {
        (Some(d), Some(t)) if t > 0 => Some(d / f64::from(t)),
        _ => None,
    }
}

/// Geometry-dependent features of one shot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ShotGeometry {
    pub distance_from_net: Option<f64>,
    pub angle_from_net: Option<f64>,
    pub is_rebound: Option<bool>,
    pub angle_change: Option<f64>,
    pub distance_from_last_event: Option<f64>,
    pub time_since_last_event: Option<u32>,
    pub speed: Option<f64>,
}

impl ShotGeometry {
    /// All fields null, used when the period's side is unknown.
    pub fn unresolved() -> Self {
        Self::default()
    }
}

/// Derive the geometry of `event` given the home team's defended side in its
/// period and whether the shooter is the home team.
///
/// Missing inputs produce null fields, never an error.
pub fn derive_geometry(
    event: &Event,
    home_defends: Option<RinkSide>,
    shooter_is_home: Option<bool>,
    rink: &RinkGeometry,
) -> ShotGeometry {
    let Some(home_defends) = home_defends else {
        return ShotGeometry::unresolved();
    };

    let net = shooter_is_home.map(|is_home| rink.target_net(home_defends, is_home));
    let current = event.coordinates;
    let previous = event.previous.as_ref().and_then(|p| p.coordinates);

    let distance_from_net = current.zip(net).map(|(c, n)| distance_from_net(&c, &n));
    let angle_from_net = current.zip(net).map(|(c, n)| angle_from_net(&c, &n));

    let is_rebound = event.follows_shot_on_goal();
    let angle_change = match (is_rebound, net, previous, current) {
        (true, Some(n), Some(p), Some(c)) => angle_change(&n, &p, &c),
        _ => None,
    };

    let distance_from_last_event = current.zip(previous).map(|(c, p)| c.distance_to(&p));
    let time_since_last_event = event.seconds_since_previous();
    let speed = travel_speed(distance_from_last_event, time_since_last_event);

    ShotGeometry {
        distance_from_net,
        angle_from_net,
        is_rebound: Some(is_rebound),
        angle_change,
        distance_from_last_event,
        time_since_last_event,
        speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventKind, PreviousEvent};

    fn shot(x: f64, y: f64, previous: Option<PreviousEvent>) -> Event {
        Event {
            event_id: 10,
            period_number: 1,
            time_in_period: 100,
            kind: EventKind::ShotOnGoal,
            owner_team_id: Some(18),
            coordinates: Some(Coordinates::new(x, y)),
            zone: None,
            shot_type: None,
            goalie_id: None,
            player_id: None,
            situation_code: None,
            home_defending_side: None,
            previous,
        }
    }

    fn prev(kind: EventKind, period: u32, time: u32, coords: Option<(f64, f64)>) -> PreviousEvent {
        PreviousEvent {
            event_id: 9,
            kind,
            period_number: period,
            time_in_period: time,
            coordinates: coords.map(|(x, y)| Coordinates::new(x, y)),
        }
    }

    #[test]
    fn test_target_net_follows_defended_side() {
        let rink = RinkGeometry::default();
        assert_eq!(rink.target_net(RinkSide::Left, true), Coordinates::new(89.0, 0.0));
        assert_eq!(rink.target_net(RinkSide::Left, false), Coordinates::new(-89.0, 0.0));
        assert_eq!(rink.target_net(RinkSide::Right, true), Coordinates::new(-89.0, 0.0));
    }

    #[test]
    fn test_home_shot_distance_and_angle() {
        // home defends left, so attacks (89, 0)
        let g = derive_geometry(
            &shot(60.0, 10.0, None),
            Some(RinkSide::Left),
            Some(true),
            &RinkGeometry::default(),
        );
        let expected = (29.0f64.powi(2) + 100.0).sqrt();
        assert!((g.distance_from_net.unwrap() - expected).abs() < 1e-9);
        let expected_angle = 10.0f64.atan2(29.0).to_degrees();
        assert!((g.angle_from_net.unwrap() - expected_angle).abs() < 1e-9);
        assert_eq!(g.is_rebound, Some(false));
        assert!(g.angle_change.is_none());
    }

    #[test]
    fn test_shot_from_goal_line_is_ninety_degrees() {
        let net = Coordinates::new(89.0, 0.0);
        let angle = angle_from_net(&Coordinates::new(89.0, -5.0), &net);
        assert!((angle - 90.0).abs() < 1e-9);
        assert_eq!(angle_from_net(&net, &net), 0.0);
    }

    #[test]
    fn test_rebound_angle_change_and_speed() {
        let previous = prev(EventKind::ShotOnGoal, 1, 98, Some((70.0, 0.0)));
        let g = derive_geometry(
            &shot(79.0, 10.0, Some(previous)),
            Some(RinkSide::Left),
            Some(true),
            &RinkGeometry::default(),
        );
        assert_eq!(g.is_rebound, Some(true));
        // (-19, 0) against (-10, 10)
        assert!((g.angle_change.unwrap() - 45.0).abs() < 1e-9);
        assert_eq!(g.time_since_last_event, Some(2));
        let d = (81.0f64 + 100.0).sqrt();
        assert!((g.speed.unwrap() - d / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rebound_from_net_position_has_no_angle_change() {
        let previous = prev(EventKind::ShotOnGoal, 1, 98, Some((89.0, 0.0)));
        let g = derive_geometry(
            &shot(79.0, 10.0, Some(previous)),
            Some(RinkSide::Left),
            Some(true),
            &RinkGeometry::default(),
        );
        assert_eq!(g.is_rebound, Some(true));
        assert!(g.angle_change.is_none());
    }

    #[test]
    fn test_speed_null_on_zero_elapsed_or_other_period() {
        let same_time = prev(EventKind::Faceoff, 1, 100, Some((0.0, 0.0)));
        let g = derive_geometry(
            &shot(60.0, 0.0, Some(same_time)),
            Some(RinkSide::Left),
            Some(true),
            &RinkGeometry::default(),
        );
        assert_eq!(g.time_since_last_event, Some(0));
        assert!(g.speed.is_none());
        assert_eq!(g.distance_from_last_event, Some(60.0));

        let other_period = prev(EventKind::Faceoff, 0, 10, Some((0.0, 0.0)));
        let g = derive_geometry(
            &shot(60.0, 0.0, Some(other_period)),
            Some(RinkSide::Left),
            Some(true),
            &RinkGeometry::default(),
        );
        assert!(g.time_since_last_event.is_none());
        assert!(g.speed.is_none());
    }

    #[test]
    fn test_unresolved_side_nulls_everything() {
        let previous = prev(EventKind::ShotOnGoal, 1, 98, Some((70.0, 0.0)));
        let g = derive_geometry(
            &shot(79.0, 10.0, Some(previous)),
            None,
            Some(true),
            &RinkGeometry::default(),
        );
        assert_eq!(g, ShotGeometry::unresolved());
    }

    #[test]
    fn test_missing_coordinates_keep_rebound_flag() {
        let previous = prev(EventKind::ShotOnGoal, 1, 98, Some((70.0, 0.0)));
        let mut event = shot(0.0, 0.0, Some(previous));
        event.coordinates = None;
        let g = derive_geometry(&event, Some(RinkSide::Right), Some(false), &RinkGeometry::default());
        assert!(g.distance_from_net.is_none());
        assert!(g.angle_from_net.is_none());
        assert_eq!(g.is_rebound, Some(true));
        assert!(g.angle_change.is_none());
        assert!(g.speed.is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn side_strategy() -> impl Strategy<Value = RinkSide> {
            prop_oneof![Just(RinkSide::Left), Just(RinkSide::Right)]
        }

        proptest! {
            #[test]
            fn prop_distance_non_negative_and_angle_bounded(
                x in -100.0f64..100.0,
                y in -42.5f64..42.5,
                side in side_strategy(),
                is_home in any::<bool>(),
            ) {
                let g = derive_geometry(&shot(x, y, None), Some(side), Some(is_home), &RinkGeometry::default());
                let d = g.distance_from_net.unwrap();
                let a = g.angle_from_net.unwrap();
                prop_assert!(d >= 0.0);
                prop_assert!((0.0..=90.0).contains(&a));
            }

            #[test]
            fn prop_rebound_angle_change_never_nan(
                x in -100.0f64..100.0,
                y in -42.5f64..42.5,
                px in -100.0f64..100.0,
                py in -42.5f64..42.5,
                side in side_strategy(),
            ) {
                let previous = prev(EventKind::ShotOnGoal, 1, 90, Some((px, py)));
                let g = derive_geometry(&shot(x, y, Some(previous)), Some(side), Some(true), &RinkGeometry::default());
                if let Some(change) = g.angle_change {
                    prop_assert!(!change.is_nan());
                    prop_assert!((0.0..=180.0).contains(&change));
                }
            }

            #[test]
            fn prop_collinear_points_never_leave_acos_domain(
                t in 0.01f64..3.0,
                dx in -50.0f64..50.0,
                dy in -40.0f64..40.0,
            ) {
                prop_assume!(dx.abs() > 1e-3 || dy.abs() > 1e-3);
                let net = Coordinates::new(89.0, 0.0);
                let a = Coordinates::new(89.0 + dx, dy);
                let b = Coordinates::new(89.0 + dx * t, dy * t);
                let change = angle_change(&net, &a, &b).unwrap();
                prop_assert!(!change.is_nan());
                prop_assert!(change.abs() < 1e-3);
            }
        }
    }
}
