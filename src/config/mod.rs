//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, FeedSection, LoggingSection, SolanaSection, StreamSection, load_config,
    DEFAULT_RPC_URL,
};
