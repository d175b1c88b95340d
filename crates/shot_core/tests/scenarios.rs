//! End-to-end checks on small hand-built games.

use serde_json::{json, Value};
use shot_core::{
    assemble_table, derive_game, derive_game_table, model_columns, BatchContext, Column,
    DirectorySource, EventKind, ExtractionConfig, RawGameDocument, RinkSide,
};

const HOME: u64 = 18;
const AWAY: u64 = 28;

fn document(id: u64, plays: Vec<Value>) -> RawGameDocument {
    RawGameDocument::from_json_value(json!({
        "id": id,
        "season": 20222023,
        "gameType": 2,
        "gameDate": "2022-10-07",
        "homeTeam": {"id": HOME, "abbrev": "NSH", "score": 2},
        "awayTeam": {"id": AWAY, "abbrev": "SJS", "score": 1},
        "rosterSpots": [
            {"teamId": HOME, "playerId": 8474600, "firstName": {"default": "Roman"},
             "lastName": {"default": "Josi"}, "positionCode": "D"},
            {"teamId": AWAY, "playerId": 8477424, "lastName": {"default": "Reimer"},
             "positionCode": "G"}
        ],
        "plays": plays
    }))
    .unwrap()
}

fn play(id: u64, period: i64, time: &str, kind: &str, details: Value) -> Value {
    json!({
        "eventId": id,
        "periodDescriptor": {"number": period},
        "timeInPeriod": time,
        "situationCode": "1551",
        "typeDescKey": kind,
        "details": details
    })
}

#[test]
fn home_offensive_event_at_positive_x_defends_left() {
    let doc = document(
        2022020001,
        vec![play(
            1,
            1,
            "03:00",
            "shot-on-goal",
            json!({"eventOwnerTeamId": HOME, "xCoord": 50, "yCoord": 3, "zoneCode": "O"}),
        )],
    );
    let derived = derive_game(&doc, &ExtractionConfig::default()).unwrap();

    assert_eq!(derived.sides.side_for(1), Some(RinkSide::Left));
    let row = &derived.rows[0];
    assert_eq!(row.home_defending_side, Some(RinkSide::Left));
    let expected = (39.0f64.powi(2) + 9.0).sqrt();
    assert!((row.distance_from_net.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn rebound_goal_measures_against_left_net() {
    let doc = document(
        2022020002,
        vec![
            // home defends right: home-owned defensive-zone event at x > 0
            play(1, 1, "10:00", "hit",
                 json!({"eventOwnerTeamId": HOME, "xCoord": 80, "yCoord": 20, "zoneCode": "D"})),
            play(2, 1, "10:05", "shot-on-goal",
                 json!({"eventOwnerTeamId": HOME, "xCoord": 70, "yCoord": 10, "zoneCode": "D",
                        "shotType": "wrist", "shootingPlayerId": 8474600})),
            play(3, 1, "10:07", "goal",
                 json!({"eventOwnerTeamId": HOME, "xCoord": 65, "yCoord": -5, "zoneCode": "D",
                        "shotType": "tip-in", "scoringPlayerId": 8474600})),
        ],
    );
    let rows = derive_game_table(&doc).unwrap();
    assert_eq!(rows.len(), 2);

    let goal = &rows[1];
    assert_eq!(goal.event_kind, EventKind::Goal);
    assert_eq!(goal.home_defending_side, Some(RinkSide::Right));
    assert_eq!(goal.is_rebound, Some(true));
    assert_eq!(goal.label, 1);

    // target net is (-89, 0)
    let prev = (70.0f64 + 89.0, 10.0f64);
    let cur = (65.0f64 + 89.0, -5.0f64);
    let dot = prev.0 * cur.0 + prev.1 * cur.1;
    let norms = (prev.0.powi(2) + prev.1.powi(2)).sqrt() * (cur.0.powi(2) + cur.1.powi(2)).sqrt();
    let expected_change = (dot / norms).clamp(-1.0, 1.0).acos().to_degrees();
    assert!((goal.angle_change.unwrap() - expected_change).abs() < 1e-9);

    let expected_distance = (cur.0.powi(2) + cur.1.powi(2)).sqrt();
    assert!((goal.distance_from_net.unwrap() - expected_distance).abs() < 1e-9);

    let expected_speed = (25.0f64 + 225.0).sqrt() / 2.0;
    assert!((goal.speed.unwrap() - expected_speed).abs() < 1e-9);

    assert_eq!(rows[0].is_rebound, Some(false));
}

#[test]
fn away_goal_with_home_goalie_pulled_is_empty_net() {
    let mut goal = play(
        1,
        3,
        "19:30",
        "goal",
        json!({"eventOwnerTeamId": AWAY, "xCoord": -80, "yCoord": 2, "zoneCode": "O"}),
    );
    goal["situationCode"] = json!("1110");
    let rows = derive_game_table(&document(2022020003, vec![goal])).unwrap();

    assert_eq!(rows[0].empty_net, 1);
}

#[test]
fn unresolved_game_keeps_rows_with_null_geometry() {
    let unresolved = document(
        2022020004,
        vec![
            play(1, 1, "01:00", "shot-on-goal",
                 json!({"eventOwnerTeamId": HOME, "xCoord": 10, "yCoord": 0, "zoneCode": "N"})),
            play(2, 2, "01:00", "goal",
                 json!({"eventOwnerTeamId": AWAY, "zoneCode": "O"})),
        ],
    );
    let normal = document(
        2022020005,
        vec![play(1, 1, "01:00", "shot-on-goal",
                  json!({"eventOwnerTeamId": HOME, "xCoord": 60, "yCoord": 0, "zoneCode": "O"}))],
    );

    let mut ctx = BatchContext::new(ExtractionConfig::default());
    let outcome = ctx.derive_batch(&[unresolved, normal]);

    assert_eq!(outcome.games_processed, 2);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.unresolved_games, vec![2022020004]);

    let (broken, fine): (Vec<_>, Vec<_>) =
        outcome.rows.iter().partition(|r| r.game_id == 2022020004);
    assert_eq!(broken.len(), 2);
    for row in broken {
        assert!(row.flagged);
        assert!(row.distance_from_net.is_none());
        assert!(row.angle_from_net.is_none());
        assert!(row.is_rebound.is_none());
        assert!(row.speed.is_none());
    }
    assert_eq!(fine.len(), 1);
    assert!((fine[0].distance_from_net.unwrap() - 29.0).abs() < 1e-9);
}

#[test]
fn directory_batch_to_model_table() {
    let dir = tempfile::tempdir().unwrap();
    for (id, x) in [(2022020010u64, 60), (2022020011, -40)] {
        let doc = json!({
            "id": id,
            "homeTeam": {"id": HOME},
            "awayTeam": {"id": AWAY},
            "plays": [
                {"eventId": 1, "periodDescriptor": {"number": 1}, "timeInPeriod": "00:30",
                 "typeDescKey": "shot-on-goal", "situationCode": "1551",
                 "details": {"eventOwnerTeamId": HOME, "xCoord": x, "yCoord": 5, "zoneCode": "O"}},
                {"eventId": 2, "periodDescriptor": {"number": 1}, "timeInPeriod": "00:40",
                 "typeDescKey": "goal", "situationCode": "1551",
                 "details": {"eventOwnerTeamId": HOME, "xCoord": x, "yCoord": -5, "zoneCode": "O"}}
            ]
        });
        std::fs::write(dir.path().join(format!("{id}.json")), doc.to_string()).unwrap();
    }

    let source = DirectorySource::new(dir.path());
    let ids = source.game_ids().unwrap();
    let mut ctx = BatchContext::default();
    let outcome = ctx.fetch_and_derive(&source, &ids);
    assert_eq!(outcome.rows.len(), 4);

    let mut rows = outcome.rows;
    rows.sort_by_key(|r| (r.game_id, r.event_id));
    let table = assemble_table(&rows, model_columns()).unwrap();

    assert_eq!(table.n_rows(), 4);
    assert_eq!(
        table.column("label"),
        Some(&Column::Categorical(vec![Some(0), Some(1), Some(0), Some(1)]))
    );
    // both games put the shooter 29 or 49 feet out regardless of the end
    let matrix = table.to_matrix().unwrap();
    assert!((matrix[0][2] - (29.0f64.powi(2) + 25.0).sqrt()).abs() < 1e-9);
    assert!((matrix[2][2] - (49.0f64.powi(2) + 25.0).sqrt()).abs() < 1e-9);
}
