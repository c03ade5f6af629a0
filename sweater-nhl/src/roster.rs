use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::api::NhlClient;
use crate::error::Result;
use crate::types::RosterPlayer;

/// Skater/goalie split as the roster feed reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Forward,
    Defense,
    Goalie,
}

impl Position {
    /// Map the feed's one-letter position code. Centers and both wings all
    /// count as forwards.
    pub fn from_code(code: &str) -> Self {
        match code {
            "G" => Position::Goalie,
            "D" => Position::Defense,
            _ => Position::Forward,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Position::Forward => "F",
            Position::Defense => "D",
            Position::Goalie => "G",
        })
    }
}

/// A rostered player as the cache stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub position: Position,
}

/// Jersey-number index over the current roster.
///
/// `refresh` builds the next snapshot off-lock and swaps it in whole, so a
/// lookup racing a refresh sees either the previous snapshot or the new one,
/// never a half-cleared map. A failed refresh leaves the previous snapshot
/// serving.
pub struct RosterCache {
    client: NhlClient,
    team: String,
    players: RwLock<HashMap<String, Player>>,
}

impl RosterCache {
    pub fn new(client: NhlClient, team: impl Into<String>) -> Self {
        Self {
            client,
            team: team.into(),
            players: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch the current roster and replace the snapshot. Returns the number
    /// of indexed players.
    pub async fn refresh(&self) -> Result<usize> {
        let roster = self.client.fetch_roster(&self.team).await?;
        let next = index_by_jersey(roster);
        let count = next.len();
        *self.players.write().await = next;
        debug!(team = %self.team, players = count, "roster snapshot replaced");
        Ok(count)
    }

    pub async fn lookup(&self, jersey: &str) -> Option<Player> {
        self.players.read().await.get(jersey).cloned()
    }

    /// Snapshot sorted by jersey number, for roster listings.
    pub async fn entries(&self) -> Vec<(u32, Player)> {
        let mut entries: Vec<(u32, Player)> = self
            .players
            .read()
            .await
            .iter()
            .filter_map(|(jersey, player)| jersey.parse().ok().map(|n| (n, player.clone())))
            .collect();
        entries.sort_by_key(|(number, _)| *number);
        entries
    }

    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }
}

/// Build the jersey-number index. Players without a sweater number (fresh
/// call-ups, camp invites) are skipped rather than indexed under a bogus
/// key.
fn index_by_jersey(players: Vec<RosterPlayer>) -> HashMap<String, Player> {
    let mut index = HashMap::with_capacity(players.len());
    for player in players {
        let Some(number) = player.sweater_number else {
            continue;
        };
        index.insert(
            number.to_string(),
            Player {
                id: player.id,
                name: player.full_name(),
                position: Position::from_code(&player.position_code),
            },
        );
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RosterResponse;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_players() -> Vec<RosterPlayer> {
        let response: RosterResponse = serde_json::from_value(json!({
            "forwards": [
                {"id": 1, "sweaterNumber": 87, "firstName": {"default": "Sidney"}, "lastName": {"default": "Crosby"}, "positionCode": "C"},
                {"id": 2, "sweaterNumber": null, "firstName": {"default": "Tryout"}, "lastName": {"default": "Guy"}, "positionCode": "L"}
            ],
            "defense": [
                {"id": 3, "sweaterNumber": 58, "firstName": {"default": "Kris"}, "lastName": {"default": "Letang"}, "positionCode": "D"}
            ],
            "goalies": [
                {"id": 4, "sweaterNumber": 35, "firstName": {"default": "Tristan"}, "lastName": {"default": "Jarry"}, "positionCode": "G"}
            ]
        }))
        .unwrap();
        response.into_players()
    }

    #[test]
    fn players_without_a_jersey_number_are_skipped() {
        let index = index_by_jersey(sample_players());
        assert_eq!(index.len(), 3);
        assert!(!index.values().any(|p| p.name == "Tryout Guy"));
    }

    #[test]
    fn indexing_is_deterministic_for_the_same_input() {
        let first = index_by_jersey(sample_players());
        let second = index_by_jersey(sample_players());
        assert_eq!(first, second);
    }

    #[test]
    fn position_codes_map_to_the_three_buckets() {
        assert_eq!(Position::from_code("C"), Position::Forward);
        assert_eq!(Position::from_code("L"), Position::Forward);
        assert_eq!(Position::from_code("R"), Position::Forward);
        assert_eq!(Position::from_code("D"), Position::Defense);
        assert_eq!(Position::from_code("G"), Position::Goalie);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forwards": [
                    {"id": 1, "sweaterNumber": 87, "firstName": {"default": "Sidney"}, "lastName": {"default": "Crosby"}, "positionCode": "C"}
                ]
            })))
            .mount(&server)
            .await;

        let client = NhlClient::with_base_url(server.uri(), Duration::from_secs(10)).unwrap();
        let cache = RosterCache::new(client, "PIT");
        assert_eq!(cache.refresh().await.unwrap(), 1);

        // Upstream starts failing; the cache should keep serving stale data.
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(cache.refresh().await.is_err());
        let player = cache.lookup("87").await.expect("stale snapshot still serves");
        assert_eq!(player.name, "Sidney Crosby");
    }

    #[tokio::test]
    async fn refresh_replaces_rather_than_merges() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forwards": [
                    {"id": 1, "sweaterNumber": 87, "firstName": {"default": "Sidney"}, "lastName": {"default": "Crosby"}, "positionCode": "C"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NhlClient::with_base_url(server.uri(), Duration::from_secs(10)).unwrap();
        let cache = RosterCache::new(client, "PIT");
        cache.refresh().await.unwrap();

        // A traded player disappears from the feed and must disappear from
        // the index too.
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forwards": [
                    {"id": 5, "sweaterNumber": 17, "firstName": {"default": "Bryan"}, "lastName": {"default": "Rust"}, "positionCode": "R"}
                ]
            })))
            .mount(&server)
            .await;

        cache.refresh().await.unwrap();
        assert!(cache.lookup("87").await.is_none());
        assert!(cache.lookup("17").await.is_some());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn refreshing_twice_against_the_same_feed_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forwards": [
                    {"id": 1, "sweaterNumber": 87, "firstName": {"default": "Sidney"}, "lastName": {"default": "Crosby"}, "positionCode": "C"}
                ],
                "goalies": [
                    {"id": 4, "sweaterNumber": 35, "firstName": {"default": "Tristan"}, "lastName": {"default": "Jarry"}, "positionCode": "G"}
                ]
            })))
            .mount(&server)
            .await;

        let client = NhlClient::with_base_url(server.uri(), Duration::from_secs(10)).unwrap();
        let cache = RosterCache::new(client, "PIT");
        cache.refresh().await.unwrap();
        let first = cache.entries().await;
        cache.refresh().await.unwrap();
        assert_eq!(cache.entries().await, first);
    }

    #[tokio::test]
    async fn lookups_during_refresh_see_a_full_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forwards": [
                    {"id": 1, "sweaterNumber": 87, "firstName": {"default": "Sidney"}, "lastName": {"default": "Crosby"}, "positionCode": "C"}
                ]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        // The second fetch is slow, leaving a window where lookups overlap
        // an in-flight refresh.
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(200))
                    .set_body_json(json!({
                        "forwards": [
                            {"id": 5, "sweaterNumber": 17, "firstName": {"default": "Bryan"}, "lastName": {"default": "Rust"}, "positionCode": "R"}
                        ]
                    })),
            )
            .mount(&server)
            .await;

        let client = NhlClient::with_base_url(server.uri(), Duration::from_secs(10)).unwrap();
        let cache = std::sync::Arc::new(RosterCache::new(client, "PIT"));
        cache.refresh().await.unwrap();

        let refreshing = tokio::spawn({
            let cache = std::sync::Arc::clone(&cache);
            async move { cache.refresh().await }
        });

        // Every observation while the refresh is in flight must be one
        // complete snapshot or the other, never an empty in-between.
        loop {
            let old = cache.lookup("87").await.is_some();
            let new = cache.lookup("17").await.is_some();
            assert!(old || new, "observed a half-replaced snapshot");
            if new {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        refreshing.await.unwrap().unwrap();
        assert!(cache.lookup("87").await.is_none());
    }

    #[tokio::test]
    async fn empty_upstream_roster_clears_without_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roster/PIT/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = NhlClient::with_base_url(server.uri(), Duration::from_secs(10)).unwrap();
        let cache = RosterCache::new(client, "PIT");
        assert_eq!(cache.refresh().await.unwrap(), 0);
        assert!(cache.is_empty().await);
    }
}
