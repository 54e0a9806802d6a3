use serde::Deserialize;

/// Main configuration structure for Canary
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub frontier: FrontierConfig,
    pub output: OutputConfig,
}

/// Source site description
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin that relative links and all endpoints are resolved against
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Declared `@type` of the embedded structured-data block to select
    #[serde(rename = "entity-type", default = "default_entity_type")]
    pub entity_type: String,

    /// Payload key whose string values carry links to other targets
    #[serde(rename = "link-key", default = "default_link_key")]
    pub link_key: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            entity_type: default_entity_type(),
            link_key: default_link_key(),
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Frontier store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FrontierConfig {
    /// Path to the shared SQLite frontier database
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite record database
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Directory receiving one audit JSON file per validated record
    #[serde(rename = "audit-dir")]
    pub audit_dir: String,
}

fn default_origin() -> String {
    "https://www.yelp.com".to_string()
}

fn default_entity_type() -> String {
    "Restaurant".to_string()
}

fn default_link_key() -> String {
    "businessUrl".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
