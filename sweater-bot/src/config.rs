use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;

/// Bot configuration with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    /// Env: DISCORD_TOKEN (required at startup, never logged)
    pub discord_token: Option<String>,

    /// Team whose roster the bot serves
    /// Env: TEAM_CODE (default: "PIT")
    pub team: String,

    /// How often the roster cache re-fetches
    /// Env: ROSTER_REFRESH_SECS (default: 3600)
    pub refresh_interval: Duration,

    /// Quiet period before a channel gets purged
    /// Env: IDLE_TIMEOUT_SECS (default: 60)
    pub idle_timeout: Duration,

    /// How many recent messages an inactivity purge removes
    /// Env: IDLE_PURGE_LIMIT (default: 100, the Discord bulk-delete cap)
    pub purge_limit: u8,

    /// Timeout for every NHL API request
    /// Env: NHL_HTTP_TIMEOUT_SECS (default: 10)
    pub http_timeout: Duration,

    /// Prefix for text commands
    /// Env: COMMAND_PREFIX (default: "!")
    pub command_prefix: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let _ = dotenv(); //for debugging mostly
        Self {
            discord_token: var("DISCORD_TOKEN")
                .expect("DISCORD_TOKEN environment variable is required")
                .into(),
            team: env_or_default_string("TEAM_CODE", "PIT"),
            refresh_interval: Duration::from_secs(env_or_default("ROSTER_REFRESH_SECS", 3600)),
            idle_timeout: Duration::from_secs(env_or_default("IDLE_TIMEOUT_SECS", 60)),
            purge_limit: env_or_default("IDLE_PURGE_LIMIT", 100),
            http_timeout: Duration::from_secs(env_or_default("NHL_HTTP_TIMEOUT_SECS", 10)),
            command_prefix: env_or_default_string("COMMAND_PREFIX", "!"),
        }
    }

    /// Create configuration with all default values
    pub fn default() -> Self {
        Self {
            discord_token: None,
            team: "PIT".to_string(),
            refresh_interval: Duration::from_secs(3600),
            idle_timeout: Duration::from_secs(60),
            purge_limit: 100,
            http_timeout: Duration::from_secs(10),
            command_prefix: "!".to_string(),
        }
    }
}

/// Parse environment variable or return default value
fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

/// Parse environment variable string or return default value
fn env_or_default_string(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|_| default.to_string())
}
