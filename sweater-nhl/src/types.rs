//! Response shapes for the two NHL endpoints the bot reads.
//!
//! The feed is lenient about what it includes: position groups disappear
//! entirely for teams mid-rebuild, and players without recorded stats get
//! their `subSeason` object dropped rather than zeroed. Every level here
//! deserializes to a default instead of failing, so callers always get a
//! fully-populated struct back.

use serde::{Deserialize, Deserializer};

/// Missing and explicit-null both mean "no recorded value" in the feed.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Roster response from `GET /roster/{team}/current`.
///
/// The middle group has shipped under both `defense` and `defensemen`.
#[derive(Debug, Default, Deserialize)]
pub struct RosterResponse {
    #[serde(default)]
    pub forwards: Vec<RosterPlayer>,
    #[serde(default, alias = "defensemen")]
    pub defense: Vec<RosterPlayer>,
    #[serde(default)]
    pub goalies: Vec<RosterPlayer>,
}

impl RosterResponse {
    /// All players across the three position groups, in feed order.
    pub fn into_players(self) -> Vec<RosterPlayer> {
        let mut players = self.forwards;
        players.extend(self.defense);
        players.extend(self.goalies);
        players
    }
}

/// One roster entry as the feed reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterPlayer {
    pub id: i64,
    /// Jersey number. Call-ups and camp invites can carry none.
    #[serde(rename = "sweaterNumber", default)]
    pub sweater_number: Option<u32>,
    #[serde(rename = "firstName", default, deserialize_with = "null_as_default")]
    pub first_name: LocalizedName,
    #[serde(rename = "lastName", default, deserialize_with = "null_as_default")]
    pub last_name: LocalizedName,
    /// One-letter code: C/L/R for forwards, D, or G.
    #[serde(rename = "positionCode", default, deserialize_with = "null_as_default")]
    pub position_code: String,
}

impl RosterPlayer {
    /// Display name, e.g. "Sidney Crosby".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.default, self.last_name.default)
            .trim()
            .to_string()
    }
}

/// Name fields come wrapped in a localization object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalizedName {
    #[serde(default, deserialize_with = "null_as_default")]
    pub default: String,
}

/// Landing response from `GET /player/{id}/landing`, reduced to the slice
/// the bot uses.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerLanding {
    #[serde(
        rename = "featuredStats",
        default,
        deserialize_with = "null_as_default"
    )]
    pub featured_stats: FeaturedStats,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeaturedStats {
    #[serde(
        rename = "regularSeason",
        default,
        deserialize_with = "null_as_default"
    )]
    pub regular_season: RegularSeason,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegularSeason {
    #[serde(rename = "subSeason", default, deserialize_with = "null_as_default")]
    pub sub_season: SubSeasonStats,
}

/// Current-season totals for one player.
///
/// Skater and goalie columns share the object; whichever set does not apply
/// to the player is simply absent and reads as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SubSeasonStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assists: u32,
    #[serde(rename = "plusMinus", default, deserialize_with = "null_as_default")]
    pub plus_minus: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wins: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub losses: u32,
    #[serde(rename = "savePctg", default, deserialize_with = "null_as_default")]
    pub save_pctg: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gaa: f64,
}

impl SubSeasonStats {
    pub fn skater(&self) -> SkaterStats {
        SkaterStats {
            goals: self.goals,
            assists: self.assists,
            plus_minus: self.plus_minus,
        }
    }

    pub fn goalie(&self) -> GoalieStats {
        GoalieStats {
            wins: self.wins,
            losses: self.losses,
            save_pctg: self.save_pctg,
            gaa: self.gaa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkaterStats {
    pub goals: u32,
    pub assists: u32,
    pub plus_minus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalieStats {
    pub wins: u32,
    pub losses: u32,
    pub save_pctg: f64,
    /// Goals-against average. The feed currently reports 0 here, so replies
    /// leave it out.
    pub gaa: f64,
}
