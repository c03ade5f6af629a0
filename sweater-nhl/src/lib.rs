mod api;
mod error;
mod roster;
mod types;

pub use api::{NHL_BASE_URL, NhlClient};
pub use error::{NhlError, Result};
pub use roster::{Player, Position, RosterCache};
pub use types::{GoalieStats, RosterPlayer, SkaterStats, SubSeasonStats};
