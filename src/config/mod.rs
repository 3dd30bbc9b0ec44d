//! Configuration management for the herald agent
//!
//! Two loading paths exist, mirroring how the agent is deployed:
//! tunables come from `HERALD_*` environment variables or a TOML file,
//! while platform credentials are environment-only and validated up
//! front. A missing required credential aborts startup before any job is
//! scheduled; the optional flavor-text token merely disables that
//! feature when absent.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scheduler::TriggerPolicy;

/// Environment variables that must be present for the agent to start.
const REQUIRED_CREDENTIALS: [&str; 5] = [
    "CONSUMER_KEY",
    "CONSUMER_SECRET",
    "ACCESS_TOKEN",
    "ACCESS_SECRET",
    "BEARER_TOKEN",
];

/// Main configuration structure (tunables, no secrets)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bot persona: name, promoted link, search query, message limits
    pub persona: PersonaConfig,

    /// Job cadence configuration
    pub timing: TimingConfig,

    /// Durable storage paths
    pub storage: StorageConfig,

    /// Webhook server configuration
    pub server: ServerConfig,

    /// Flavor-text generation configuration
    pub flavor: FlavorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Bot persona configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Display name used in message headers
    pub bot_name: String,

    /// Promoted link appended to every outbound message
    pub link: String,

    /// Search query for the amplify hunt
    pub search_query: String,

    /// Platform character limit per post
    pub char_limit: usize,

    /// Maximum mentions fetched per respond cycle
    pub mention_batch: usize,

    /// Probability of attaching media to a broadcast
    pub media_probability: f64,

    /// Per-item probability of amplifying a search hit
    pub amplify_probability: f64,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            bot_name: String::from("9DTTT BOT"),
            link: String::from("https://www.9dttt.com"),
            search_query: String::from(
                "(tic-tac-toe OR tictactoe OR \"strategy games\" OR \"puzzle games\" OR \
                 \"board games\") filter:media min_faves:5 -is:retweet",
            ),
            char_limit: 280,
            mention_batch: 50,
            media_probability: 0.6,
            amplify_probability: 0.25,
        }
    }
}

/// Job cadence configuration (minutes unless stated otherwise)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Lower bound for the jittered broadcast interval
    pub broadcast_min_minutes: u64,

    /// Upper bound for the jittered broadcast interval
    pub broadcast_max_minutes: u64,

    /// Lower bound for the jittered mention-check interval
    pub mention_min_minutes: u64,

    /// Upper bound for the jittered mention-check interval
    pub mention_max_minutes: u64,

    /// Fixed interval for the amplify hunt
    pub amplify_interval_minutes: u64,

    /// Local hour (0-23) for the daily diagnostic post
    pub diagnostic_hour: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            broadcast_min_minutes: 120,
            broadcast_max_minutes: 240,
            mention_min_minutes: 15,
            mention_max_minutes: 30,
            amplify_interval_minutes: 60,
            diagnostic_hour: 8,
        }
    }
}

impl TimingConfig {
    /// Trigger policy for the broadcast job
    #[must_use]
    pub fn broadcast_policy(&self) -> TriggerPolicy {
        TriggerPolicy::JitteredIntervalOnce {
            min: Duration::from_secs(self.broadcast_min_minutes * 60),
            max: Duration::from_secs(self.broadcast_max_minutes * 60),
        }
    }

    /// Trigger policy for the mention-respond job
    #[must_use]
    pub fn respond_policy(&self) -> TriggerPolicy {
        TriggerPolicy::JitteredIntervalOnce {
            min: Duration::from_secs(self.mention_min_minutes * 60),
            max: Duration::from_secs(self.mention_max_minutes * 60),
        }
    }

    /// Trigger policy for the amplify hunt job
    #[must_use]
    pub fn amplify_policy(&self) -> TriggerPolicy {
        TriggerPolicy::FixedInterval(Duration::from_secs(self.amplify_interval_minutes * 60))
    }

    /// Trigger policy for the daily diagnostic job
    #[must_use]
    pub fn diagnostic_policy(&self) -> TriggerPolicy {
        TriggerPolicy::DailyAt {
            hour: self.diagnostic_hour,
        }
    }
}

/// Durable storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the processed-mentions ledger file
    pub ledger_path: PathBuf,

    /// Directory holding attachable media files
    pub media_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("herald_processed_mentions.json"),
            media_dir: PathBuf::from("media"),
        }
    }
}

/// Webhook server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the webhook listens on
    pub bind_address: SocketAddr,

    /// Enable permissive CORS headers
    pub enable_cors: bool,

    /// Enable per-request tracing
    pub enable_request_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

/// Flavor-text (LLM) configuration; the token itself stays in the
/// environment and is read by [`Credentials::from_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorConfig {
    /// Text-generation endpoint URL
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://api-inference.huggingface.co/models/gpt2"),
            timeout_secs: 10,
            max_tokens: 100,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(name) = std::env::var("HERALD_BOT_NAME").ok().filter(|s| !s.is_empty()) {
            config.persona.bot_name = name;
        }
        if let Some(link) = std::env::var("HERALD_LINK").ok().filter(|s| !s.is_empty()) {
            config.persona.link = link;
        }
        if let Some(query) = std::env::var("HERALD_SEARCH_QUERY").ok().filter(|s| !s.is_empty()) {
            config.persona.search_query = query;
        }
        if let Some(limit) = env_parse::<usize>("HERALD_CHAR_LIMIT") {
            config.persona.char_limit = limit;
        }

        if let Some(v) = env_parse::<u64>("HERALD_BROADCAST_MIN_MINUTES") {
            config.timing.broadcast_min_minutes = v;
        }
        if let Some(v) = env_parse::<u64>("HERALD_BROADCAST_MAX_MINUTES") {
            config.timing.broadcast_max_minutes = v;
        }
        if let Some(v) = env_parse::<u64>("HERALD_MENTION_MIN_MINUTES") {
            config.timing.mention_min_minutes = v;
        }
        if let Some(v) = env_parse::<u64>("HERALD_MENTION_MAX_MINUTES") {
            config.timing.mention_max_minutes = v;
        }
        if let Some(v) = env_parse::<u32>("HERALD_DIAGNOSTIC_HOUR") {
            config.timing.diagnostic_hour = v;
        }

        if let Ok(path) = std::env::var("HERALD_LEDGER_PATH") {
            config.storage.ledger_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("HERALD_MEDIA_DIR") {
            config.storage.media_dir = PathBuf::from(dir);
        }
        if let Some(addr) = env_parse::<SocketAddr>("HERALD_BIND_ADDRESS") {
            config.server.bind_address = addr;
        }

        if let Ok(level) = std::env::var("HERALD_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("HERALD_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.persona.char_limit == 0 {
            anyhow::bail!("char_limit must be greater than 0");
        }

        // The link plus its decoration must always fit; otherwise the
        // composer cannot honor the never-truncate-the-link invariant.
        if self.persona.link.chars().count() + 16 > self.persona.char_limit {
            anyhow::bail!("char_limit too small to carry the promoted link");
        }

        if self.persona.mention_batch == 0 {
            anyhow::bail!("mention_batch must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.persona.media_probability) {
            anyhow::bail!("media_probability must be within [0, 1]");
        }

        if !(0.0..=1.0).contains(&self.persona.amplify_probability) {
            anyhow::bail!("amplify_probability must be within [0, 1]");
        }

        if self.timing.broadcast_min_minutes == 0
            || self.timing.broadcast_min_minutes > self.timing.broadcast_max_minutes
        {
            anyhow::bail!("broadcast interval bounds must satisfy 0 < min <= max");
        }

        if self.timing.mention_min_minutes == 0
            || self.timing.mention_min_minutes > self.timing.mention_max_minutes
        {
            anyhow::bail!("mention interval bounds must satisfy 0 < min <= max");
        }

        if self.timing.amplify_interval_minutes == 0 {
            anyhow::bail!("amplify_interval_minutes must be greater than 0");
        }

        if self.timing.diagnostic_hour > 23 {
            anyhow::bail!("diagnostic_hour must be within 0..=23");
        }

        Ok(())
    }

    /// Get the flavor-call timeout as Duration
    #[must_use]
    pub fn flavor_timeout(&self) -> Duration {
        Duration::from_secs(self.flavor.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            persona: PersonaConfig::default(),
            timing: TimingConfig::default(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
            flavor: FlavorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

// ============================================================================
// Credentials
// ============================================================================

/// Platform credentials, environment-only.
///
/// Absence of any required token is a fatal startup error; the scheduler
/// must never run half-authenticated. The flavor-text token is optional
/// and its absence silently disables that feature.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
    pub bearer_token: String,
    pub flavor_token: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment, failing fast when
    /// any required token is missing.
    pub fn from_env() -> crate::error::Result<Self> {
        let missing: Vec<&str> = REQUIRED_CREDENTIALS
            .iter()
            .filter(|key| std::env::var(key).map(|v| v.is_empty()).unwrap_or(true))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(crate::error::Error::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            consumer_key: std::env::var("CONSUMER_KEY").unwrap_or_default(),
            consumer_secret: std::env::var("CONSUMER_SECRET").unwrap_or_default(),
            access_token: std::env::var("ACCESS_TOKEN").unwrap_or_default(),
            access_secret: std::env::var("ACCESS_SECRET").unwrap_or_default(),
            bearer_token: std::env::var("BEARER_TOKEN").unwrap_or_default(),
            flavor_token: std::env::var("HUGGING_FACE_TOKEN").ok().filter(|v| !v.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_char_limit() {
        let mut config = Config::default();
        config.persona.char_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_char_limit_must_fit_link() {
        let mut config = Config::default();
        config.persona.char_limit = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_interval_bounds() {
        let mut config = Config::default();
        config.timing.broadcast_min_minutes = 300;
        config.timing.broadcast_max_minutes = 120;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_diagnostic_hour() {
        let mut config = Config::default();
        config.timing.diagnostic_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probability_bounds() {
        let mut config = Config::default();
        config.persona.media_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policies_from_timing() {
        let timing = TimingConfig::default();

        match timing.broadcast_policy() {
            TriggerPolicy::JitteredIntervalOnce { min, max } => {
                assert_eq!(min, Duration::from_secs(120 * 60));
                assert_eq!(max, Duration::from_secs(240 * 60));
            }
            other => panic!("unexpected policy: {other:?}"),
        }

        match timing.diagnostic_policy() {
            TriggerPolicy::DailyAt { hour } => assert_eq!(hour, 8),
            other => panic!("unexpected policy: {other:?}"),
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.persona.char_limit, config.persona.char_limit);
        assert_eq!(parsed.timing.diagnostic_hour, config.timing.diagnostic_hour);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: Config = toml::from_str("[persona]\nbot_name = \"TEST BOT\"\n").unwrap();
        assert_eq!(parsed.persona.bot_name, "TEST BOT");
        assert_eq!(parsed.persona.char_limit, 280);
        assert_eq!(parsed.timing.broadcast_min_minutes, 120);
    }
}
