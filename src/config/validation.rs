use crate::config::types::{AnalyzerConfig, Config, StorageConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_analyzer_config(&config.analyzer)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

fn validate_analyzer_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if !(1..=600).contains(&config.fetch_timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_secs must be between 1 and 600, got {}",
            config.fetch_timeout_secs
        )));
    }

    if !(1..=120).contains(&config.probe_timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_secs must be between 1 and 120, got {}",
            config.probe_timeout_secs
        )));
    }

    if !(1..=256).contains(&config.max_concurrent_probes) {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_probes must be between 1 and 256, got {}",
            config.max_concurrent_probes
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
