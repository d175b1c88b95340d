use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::raw::RawGameDocument;
use super::{PlayerId, TeamId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position_code: Option<String>,
}

impl Player {
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (None, Some(last)) => last.clone(),
            (Some(first), None) => first.clone(),
            (None, None) => format!("#{}", self.player_id),
        }
    }

    pub fn is_goalie(&self) -> bool {
        self.position_code.as_deref() == Some("G")
    }
}

/// Per-game roster lookup keyed by player id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerIndex {
    players: FxHashMap<PlayerId, Player>,
}

impl PlayerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: Player) {
        self.players.insert(player.player_id, player);
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(&player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }
}

/// Build the roster table of a game. Entries without a player or team id are
/// skipped.
pub fn build_players(raw: &RawGameDocument) -> PlayerIndex {
    let mut index = PlayerIndex::new();

    for (i, spot) in raw.roster_spots.iter().enumerate() {
        let (Some(player_id), Some(team_id)) = (spot.player_id, spot.team_id) else {
            warn!("Game {:?}: roster entry {} missing playerId/teamId", raw.id, i);
            continue;
        };

        index.insert(Player {
            player_id,
            team_id,
            first_name: spot.first_name.as_ref().and_then(|n| n.value.clone()),
            last_name: spot.last_name.as_ref().and_then(|n| n.value.clone()),
            position_code: spot.position_code.clone(),
        });
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_players() {
        let doc = RawGameDocument::from_json_value(json!({
            "rosterSpots": [
                {"teamId": 18, "playerId": 8474600, "firstName": {"default": "Roman"},
                 "lastName": {"default": "Josi"}, "positionCode": "D"},
                {"teamId": 28, "playerId": 8477424, "lastName": {"default": "Reimer"},
                 "positionCode": "G"},
                {"teamId": 28, "firstName": {"default": "Nobody"}}
            ]
        }))
        .unwrap();

        let players = build_players(&doc);
        assert_eq!(players.len(), 2);

        let josi = players.get(8474600).unwrap();
        assert_eq!(josi.full_name(), "Roman Josi");
        assert!(!josi.is_goalie());

        let goalie = players.get(8477424).unwrap();
        assert!(goalie.is_goalie());
        assert_eq!(goalie.full_name(), "Reimer");
    }
}
