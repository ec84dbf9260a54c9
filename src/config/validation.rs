use crate::config::types::{Config, ExtractConfig, FetchConfig};
use crate::extract::RecordPattern;
use crate::target::RequestTarget;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_root_url(&config.root_url)?;
    validate_paths(config)?;
    validate_fetch_config(&config.fetch)?;
    validate_extract_config(&config.extract)?;
    Ok(())
}

/// The root URL must be fetchable: absolute, http or https
fn validate_root_url(root_url: &str) -> Result<(), ConfigError> {
    RequestTarget::parse(root_url)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root-url: {}", e)))
}

fn validate_paths(config: &Config) -> Result<(), ConfigError> {
    if config.cache_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "cache-path cannot be empty".to_string(),
        ));
    }

    if config.output.trim().is_empty() {
        return Err(ConfigError::Validation("output cannot be empty".to_string()));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.min_delay_secs > config.max_delay_secs {
        return Err(ConfigError::Validation(format!(
            "min-delay-secs ({}) must not exceed max-delay-secs ({})",
            config.min_delay_secs, config.max_delay_secs
        )));
    }

    if config.attempt_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "attempt-timeout-secs must be >= 1, got {}",
            config.attempt_timeout_secs
        )));
    }

    Ok(())
}

fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    RecordPattern::compile(&config.pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidPattern(e.to_string()))
}
