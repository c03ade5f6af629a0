//! The jersey-number query path.
//!
//! Messages whose whole body is a number get answered with live stats for
//! the player wearing it; everything else produces no reply here and falls
//! through to the command framework.

use sweater_nhl::{GoalieStats, NhlClient, Player, Position, RosterCache, SkaterStats};
use tracing::warn;

pub const NOT_FOUND_REPLY: &str = "Player not found. Check the jersey number.";
pub const FETCH_FAILED_REPLY: &str = "Couldn't fetch stats right now. Try again in a bit.";

/// A message is a jersey query when its trimmed body is nothing but digits.
pub fn jersey_query(content: &str) -> Option<&str> {
    let body = content.trim();
    if !body.is_empty() && body.chars().all(|c| c.is_ascii_digit()) {
        Some(body)
    } else {
        None
    }
}

/// Reply text for an inbound message, if it asks about a jersey number.
pub async fn jersey_reply(
    roster: &RosterCache,
    stats: &NhlClient,
    content: &str,
) -> Option<String> {
    let jersey = jersey_query(content)?;
    let Some(player) = roster.lookup(jersey).await else {
        return Some(NOT_FOUND_REPLY.to_string());
    };
    match stats.fetch_player_stats(player.id).await {
        Ok(totals) => Some(match player.position {
            Position::Goalie => format_goalie(&player, &totals.goalie()),
            _ => format_skater(&player, &totals.skater()),
        }),
        Err(err) => {
            warn!(jersey, player_id = player.id, error = %err, "stats fetch failed");
            Some(FETCH_FAILED_REPLY.to_string())
        }
    }
}

fn format_skater(player: &Player, stats: &SkaterStats) -> String {
    format!(
        "{}\nGoals: {}\nAssists: {}\n+/-: {}",
        player.name, stats.goals, stats.assists, stats.plus_minus
    )
}

/// Goals-against average stays out of the reply while the upstream feed
/// reports 0 for it.
fn format_goalie(player: &Player, stats: &GoalieStats) -> String {
    format!(
        "{}\nWins: {}\nLosses: {}\nSave %: {}",
        player.name, stats.wins, stats.losses, stats.save_pctg
    )
}
