use crate::config::types::{Config, FetcherConfig, FrontierConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_frontier_config(&config.frontier)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.origin)
        .map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e))
        })?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must use http or https",
            config.origin
        )));
    }

    if origin.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' has no host",
            config.origin
        )));
    }

    if config.entity_type.trim().is_empty() {
        return Err(ConfigError::Validation(
            "entity-type cannot be empty".to_string(),
        ));
    }

    if config.link_key.trim().is_empty() {
        return Err(ConfigError::Validation("link-key cannot be empty".to_string()));
    }

    Ok(())
}

/// Validates fetcher timeouts
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_frontier_config(config: &FrontierConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "frontier database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records-path cannot be empty".to_string(),
        ));
    }

    if config.audit_dir.is_empty() {
        return Err(ConfigError::Validation("audit-dir cannot be empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(origin: &str) -> SiteConfig {
        SiteConfig {
            origin: origin.to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_validate_origin() {
        assert!(validate_site_config(&site("https://www.yelp.com")).is_ok());
        assert!(validate_site_config(&site("http://127.0.0.1:8080")).is_ok());

        assert!(validate_site_config(&site("")).is_err());
        assert!(validate_site_config(&site("ftp://example.com")).is_err());
        assert!(validate_site_config(&site("not a url")).is_err());
    }

    #[test]
    fn test_validate_empty_entity_type() {
        let mut config = SiteConfig::default();
        config.entity_type = "  ".to_string();
        assert!(matches!(
            validate_site_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_timeouts() {
        let ok = FetcherConfig {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        };
        assert!(validate_fetcher_config(&ok).is_ok());

        let zero = FetcherConfig {
            timeout_secs: 0,
            connect_timeout_secs: 0,
        };
        assert!(validate_fetcher_config(&zero).is_err());

        let inverted = FetcherConfig {
            timeout_secs: 5,
            connect_timeout_secs: 10,
        };
        assert!(validate_fetcher_config(&inverted).is_err());
    }

    #[test]
    fn test_validate_output_paths() {
        let missing_dir = OutputConfig {
            records_path: "./merchants.db".to_string(),
            audit_dir: String::new(),
        };
        assert!(validate_output_config(&missing_dir).is_err());
    }
}
