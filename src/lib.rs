//! Canary: a frontier-driven business record miner
//!
//! This crate claims target identifiers from a shared frontier, fetches each
//! target's page document and auxiliary payload, assembles one structured
//! record per target, validates it against a declared shape, and hands it to
//! a persistence sink. Identifiers discovered inside the fetched payloads are
//! fed back into the frontier.

pub mod config;
pub mod crawler;
pub mod discovery;
pub mod extract;
pub mod fetcher;
pub mod frontier;
pub mod output;
pub mod schema;
pub mod sink;
pub mod target;

use thiserror::Error;

/// Main error type for Canary operations
///
/// Only frontier failures are allowed to escape the crawl loop; everything
/// raised while extracting a single target is converted to a retry.
#[derive(Debug, Error)]
pub enum CanaryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] frontier::FrontierError),

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Target identifier and URL errors
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Empty target identifier")]
    Empty,

    #[error("Invalid target identifier '{0}'")]
    Invalid(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("No target path in URL: {0}")]
    NoTargetPath(String),
}

/// Result type alias for Canary operations
pub type Result<T> = std::result::Result<T, CanaryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for target operations
pub type TargetResult<T> = std::result::Result<T, TargetError>;

// Re-export commonly used types
pub use config::Config;
pub use frontier::{FrontierStore, Membership};
pub use schema::ValidatedRecord;
pub use target::{Site, TargetId};
