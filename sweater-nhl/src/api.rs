use std::time::Duration;

use crate::error::Result;
use crate::types::{PlayerLanding, RosterPlayer, RosterResponse, SubSeasonStats};

/// Base path for the public NHL web API.
pub const NHL_BASE_URL: &str = "https://api-web.nhle.com/v1";

/// Thin client over the two read endpoints the bot uses.
///
/// Cheap to clone; the inner reqwest client is reference-counted.
#[derive(Debug, Clone)]
pub struct NhlClient {
    http: reqwest::Client,
    base_url: String,
}

impl NhlClient {
    /// Client against the production API. `timeout` bounds every request,
    /// connect through body.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(NHL_BASE_URL, timeout)
    }

    /// Client against an arbitrary base URL. Tests point this at a mock
    /// server.
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the current roster for a team, concatenated across the three
    /// position groups.
    pub async fn fetch_roster(&self, team: &str) -> Result<Vec<RosterPlayer>> {
        let url = format!("{}/roster/{}/current", self.base_url, team);
        let response: RosterResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.into_players())
    }

    /// Fetch a player's current-season totals. A player with no recorded
    /// sub-season comes back zero-filled, not as an error.
    pub async fn fetch_player_stats(&self, player_id: i64) -> Result<SubSeasonStats> {
        let url = format!("{}/player/{}/landing", self.base_url, player_id);
        let landing: PlayerLanding = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(landing.featured_stats.regular_season.sub_season)
    }
}
