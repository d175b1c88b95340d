//! Game identifiers of the league feed.
//!
//! A game id is `SSSSTTNNNN`: the season's starting year, the game type
//! (`02` regular season, `03` playoffs) and a four digit game number. For
//! playoff games the number reads `0RMG`: round, matchup within the round,
//! game within the best-of-seven.

use crate::error::{ExtractError, Result};
use crate::models::GameId;

pub const REGULAR_SEASON: u64 = 2;
pub const PLAYOFFS: u64 = 3;

/// Matchups per playoff round, rounds 1 to 4.
const PLAYOFF_MATCHUPS: [u64; 4] = [8, 4, 2, 1];
const GAMES_PER_SERIES: u64 = 7;

/// Regular-season games played in a season, where known.
pub fn regular_season_game_count(season: u32) -> Option<u32> {
    match season {
        2017 | 2018 => Some(1271),
        2019 => Some(1082),
        2020 => Some(868),
        2021..=2023 => Some(1312),
        _ => None,
    }
}

fn game_id(season: u32, game_type: u64, number: u64) -> GameId {
    u64::from(season) * 1_000_000 + game_type * 10_000 + number
}

/// Every regular-season game id of `season`, in order.
pub fn regular_season_game_ids(season: u32) -> Result<Vec<GameId>> {
    let count = regular_season_game_count(season).ok_or(ExtractError::UnknownSeason(season))?;
    Ok((1..=u64::from(count))
        .map(|n| game_id(season, REGULAR_SEASON, n))
        .collect())
}

/// Every possible playoff game id of `season`.
///
/// Series that end early leave some of these ids without a game.
pub fn playoff_game_ids(season: u32) -> Vec<GameId> {
    let mut ids = Vec::new();
    for (round, &matchups) in (1u64..).zip(PLAYOFF_MATCHUPS.iter()) {
        for matchup in 1..=matchups {
            for game in 1..=GAMES_PER_SERIES {
                ids.push(game_id(season, PLAYOFFS, round * 100 + matchup * 10 + game));
            }
        }
    }
    ids
}

/// Season start year encoded in a game id.
pub fn season_of(game_id: GameId) -> u32 {
    (game_id / 1_000_000) as u32
}

/// Game type encoded in a game id.
pub fn game_type_of(game_id: GameId) -> u64 {
    (game_id / 10_000) % 100
}
