use crate::config::types::ScraperConfig;
use crate::ConfigError;

/// Upper bound on per-batch concurrency
const MAX_CONCURRENCY: usize = 50;

/// Upper bound on redirect hops
const MAX_REDIRECTS: usize = 20;

/// Validates the entire configuration
///
/// Custom filter patterns are not validated here: an invalid regex is logged and
/// ignored when the filter is built, never fatal.
pub fn validate(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_limits(config)?;
    validate_user_agent(&config.user_agent)?;
    Ok(())
}

/// Validates numeric limits
fn validate_limits(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1, got 0".to_string(),
        ));
    }

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "timeout_ms must be >= 100ms, got {}ms",
            config.timeout_ms
        )));
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    if config.browser_memory_limit_mb < 64 {
        return Err(ConfigError::Validation(format!(
            "browser_memory_limit_mb must be >= 64, got {}",
            config.browser_memory_limit_mb
        )));
    }

    Ok(())
}

/// Validates the user agent string
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent must not contain control characters, got '{}'",
            user_agent.escape_debug()
        )));
    }

    Ok(())
}
