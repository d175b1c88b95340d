pub mod events;
pub mod game;
pub mod player;
pub mod raw;
pub mod rink;

pub type GameId = u64;
pub type TeamId = u64;
pub type PlayerId = u64;
pub type EventId = u64;

pub use events::{
    build_events, parse_play, parse_time_in_period, Event, EventKind, EventLog, PreviousEvent,
    SituationCode,
};
pub use game::{build_game, Game, TeamInfo};
pub use player::{build_players, Player, PlayerIndex};
pub use raw::{
    LocalizedName, RawGameDocument, RawPeriodDescriptor, RawPlay, RawPlayDetails, RawRosterSpot,
    RawSituationCode, RawTeam,
};
pub use rink::{Coordinates, RinkSide, Zone};
