//! Configuration Loader
//!
//! Loads and validates configuration from TOML files. Every section is optional
//! and falls back to defaults.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::adapters::pump_portal::{
    ReconnectPolicy, StreamConfig, DEFAULT_WS_URL, MAX_RECONNECT_DELAY_MS, RECONNECT_BASE_DELAY_MS,
};
use crate::domain::{TokenFilter, DEFAULT_FEED_CAPACITY};

/// Default Solana RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stream: StreamSection,
    pub feed: FeedSection,
    pub filter: TokenFilter,
    pub solana: SolanaSection,
    pub logging: LoggingSection,
}

/// PumpPortal connection and subscription section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamSection {
    /// WebSocket endpoint
    pub ws_url: String,
    /// First reconnect delay; doubles per attempt
    pub reconnect_base_delay_ms: u64,
    /// Reconnect delay ceiling
    pub reconnect_max_delay_ms: u64,
    /// Consecutive reconnect attempts before giving up (0 = never give up)
    pub max_reconnect_attempts: u32,
    pub enable_keepalive: bool,
    pub ping_interval_secs: u64,
    /// Reconnect when nothing arrives for this long (0 = disabled)
    pub idle_timeout_secs: u64,
    pub max_message_size: usize,
    pub connect_timeout_secs: u64,
    /// Subscribe to every new launch
    pub subscribe_new_tokens: bool,
    pub subscribe_migrations: bool,
    /// Mints whose trades are always watched
    pub watch_mints: Vec<String>,
    /// Wallets whose trades are always watched
    pub watch_accounts: Vec<String>,
}

impl Default for StreamSection {
    fn default() -> Self {
        let stream = StreamConfig::default();
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            reconnect_base_delay_ms: RECONNECT_BASE_DELAY_MS,
            reconnect_max_delay_ms: MAX_RECONNECT_DELAY_MS,
            max_reconnect_attempts: 0,
            enable_keepalive: stream.enable_keepalive,
            ping_interval_secs: stream.ping_interval_secs,
            idle_timeout_secs: stream.idle_timeout_secs,
            max_message_size: stream.max_message_size,
            connect_timeout_secs: 10,
            subscribe_new_tokens: true,
            subscribe_migrations: true,
            watch_mints: Vec::new(),
            watch_accounts: Vec::new(),
        }
    }
}

impl StreamSection {
    /// Get WebSocket URL with environment variable override
    /// Checks PUMP_STREAM_WS_URL env var first, falls back to config value
    pub fn get_ws_url(&self) -> String {
        std::env::var("PUMP_STREAM_WS_URL").unwrap_or_else(|_| self.ws_url.clone())
    }

    pub fn to_stream_config(&self) -> StreamConfig {
        StreamConfig {
            ws_url: self.get_ws_url(),
            reconnect: ReconnectPolicy {
                base_delay_ms: self.reconnect_base_delay_ms,
                max_delay_ms: self.reconnect_max_delay_ms,
                max_attempts: self.max_reconnect_attempts,
            },
            enable_keepalive: self.enable_keepalive,
            ping_interval_secs: self.ping_interval_secs,
            idle_timeout_secs: self.idle_timeout_secs,
            max_message_size: self.max_message_size,
        }
    }
}

/// Token feed section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    /// Tokens kept in the feed
    pub capacity: usize,
    /// Fetch off-chain metadata (image, socials) for accepted tokens
    pub resolve_metadata: bool,
    pub ipfs_gateway: String,
    pub metadata_timeout_secs: u64,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_FEED_CAPACITY,
            resolve_metadata: false,
            ipfs_gateway: crate::adapters::metadata::DEFAULT_IPFS_GATEWAY.to_string(),
            metadata_timeout_secs: 10,
        }
    }
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolanaSection {
    /// RPC endpoint (use private RPC for production)
    pub rpc_url: String,
    /// Slippage tolerance for quotes in basis points (1% = 100 bps)
    pub slippage_bps: u16,
}

impl Default for SolanaSection {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            slippage_bps: crate::application::DEFAULT_SLIPPAGE_BPS,
        }
    }
}

impl SolanaSection {
    /// Get RPC URL with environment variable override
    /// Checks SOLANA_RPC_URL env var first, falls back to config value
    pub fn get_rpc_url(&self) -> String {
        std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| self.rpc_url.clone())
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level or filter directive: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate stream section
        let ws_url = self.stream.get_ws_url();
        if !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://")) {
            return Err(ConfigError::ValidationError(format!(
                "ws_url must be a ws:// or wss:// URL, got '{}'",
                ws_url
            )));
        }

        if self.stream.reconnect_base_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "reconnect_base_delay_ms must be > 0".to_string(),
            ));
        }

        if self.stream.reconnect_max_delay_ms < self.stream.reconnect_base_delay_ms {
            return Err(ConfigError::ValidationError(format!(
                "reconnect_max_delay_ms ({}) must be >= reconnect_base_delay_ms ({})",
                self.stream.reconnect_max_delay_ms, self.stream.reconnect_base_delay_ms
            )));
        }

        if self.stream.enable_keepalive && self.stream.ping_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "ping_interval_secs must be > 0 when keepalive is enabled".to_string(),
            ));
        }

        if self.stream.max_message_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_message_size must be > 0".to_string(),
            ));
        }

        for key in self.stream.watch_mints.iter().chain(&self.stream.watch_accounts) {
            if !crate::domain::is_valid_mint(key) {
                return Err(ConfigError::ValidationError(format!(
                    "'{}' is not a valid Solana address",
                    key
                )));
            }
        }

        // Validate feed
        if self.feed.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "feed capacity must be > 0".to_string(),
            ));
        }

        // Validate filter
        let filter = &self.filter;
        if let (Some(min), Some(max)) = (filter.min_market_cap, filter.max_market_cap) {
            if min > max {
                return Err(ConfigError::ValidationError(format!(
                    "min_market_cap ({}) exceeds max_market_cap ({})",
                    min, max
                )));
            }
        }

        for (name, value) in [
            ("min_bonding_curve", filter.min_bonding_curve),
            ("max_bonding_curve", filter.max_bonding_curve),
        ] {
            if let Some(pct) = value {
                if !(0.0..=100.0).contains(&pct) {
                    return Err(ConfigError::ValidationError(format!(
                        "{} must be 0-100, got {}",
                        name, pct
                    )));
                }
            }
        }

        // Validate Solana
        if self.solana.get_rpc_url().is_empty() {
            return Err(ConfigError::ValidationError(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        if self.solana.slippage_bps > 10_000 {
            return Err(ConfigError::ValidationError(format!(
                "slippage_bps must be 0-10000, got {}",
                self.solana.slippage_bps
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PoolFilter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> String {
        r#"
[stream]
ws_url = "wss://pumpportal.fun/api/data"
reconnect_base_delay_ms = 500
reconnect_max_delay_ms = 20000
max_reconnect_attempts = 10
idle_timeout_secs = 90
watch_mints = ["So11111111111111111111111111111111111111112"]

[feed]
capacity = 100
resolve_metadata = true

[filter]
min_market_cap = 30.0
max_market_cap = 80.0
pool = "pump"

[solana]
rpc_url = "https://api.mainnet-beta.solana.com"
slippage_bps = 250

[logging]
level = "debug"
"#
        .to_string()
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(&create_valid_config());
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.stream.reconnect_base_delay_ms, 500);
        assert_eq!(config.stream.max_reconnect_attempts, 10);
        assert_eq!(config.stream.watch_mints.len(), 1);
        assert!(config.stream.subscribe_new_tokens);
        assert_eq!(config.feed.capacity, 100);
        assert!(config.feed.resolve_metadata);
        assert_eq!(config.filter.min_market_cap, Some(30.0));
        assert_eq!(config.filter.pool, PoolFilter::Pump);
        assert_eq!(config.solana.slippage_bps, 250);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.stream.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.stream.max_reconnect_attempts, 0);
        assert_eq!(config.feed.capacity, 60);
        assert!(config.filter.is_empty());
        assert_eq!(config.solana.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_stream_config_conversion() {
        let file = write_config(&create_valid_config());
        let config = load_config(file.path()).unwrap();
        let stream = config.stream.to_stream_config();

        assert_eq!(stream.reconnect.base_delay_ms, 500);
        assert_eq!(stream.reconnect.max_delay_ms, 20000);
        assert_eq!(stream.reconnect.max_attempts, 10);
        assert_eq!(stream.idle_timeout_secs, 90);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.toml");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config("[stream\nws_url = ");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ParseError(_)
        ));
    }

    #[test]
    fn test_invalid_ws_url() {
        let file = write_config("[stream]\nws_url = \"https://pumpportal.fun/api/data\"\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_invalid_reconnect_delays() {
        let file = write_config(
            "[stream]\nreconnect_base_delay_ms = 5000\nreconnect_max_delay_ms = 1000\n",
        );
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_invalid_watch_mint() {
        let file = write_config("[stream]\nwatch_mints = [\"not-a-mint\"]\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_inverted_market_cap_bounds() {
        let file = write_config("[filter]\nmin_market_cap = 50.0\nmax_market_cap = 10.0\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_bonding_curve_out_of_range() {
        let file = write_config("[filter]\nmax_bonding_curve = 150.0\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_zero_capacity() {
        let file = write_config("[feed]\ncapacity = 0\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }
}
