use crate::config::types::{CacheConfig, Config, HttpConfig, LimiterConfig, RetryConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_cache_config(&config.cache)?;
    validate_limiter_config(&config.limiter)?;
    validate_retry_config(&config.retry)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.capacity < 1 || config.capacity > 100_000 {
        return Err(ConfigError::Validation(format!(
            "cache capacity must be between 1 and 100000, got {}",
            config.capacity
        )));
    }

    Ok(())
}

/// Validates limiter configuration
fn validate_limiter_config(config: &LimiterConfig) -> Result<(), ConfigError> {
    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    if config.min_time_ms < 1 || config.min_time_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "min_time_ms must be between 1 and 60000, got {}",
            config.min_time_ms
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    // With unlimited set the attempt count is ignored entirely
    if !config.unlimited && config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}
