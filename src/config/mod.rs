//! Configuration module for Canary
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use canary::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("canary.toml")).unwrap();
//! println!("Crawling {}", config.site.origin);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, FrontierConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
