use crate::config::types::{Config, PolitenessConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_politeness_config(&config.politeness)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates the target site description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_host(&config.host)?;

    if config.machine_path.is_empty() {
        return Err(ConfigError::Validation(
            "machine-path cannot be empty".to_string(),
        ));
    }

    if !config
        .machine_path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "machine-path must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.machine_path
        )));
    }

    if config.uploads_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "uploads-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a bare host, optionally followed by `:port`
fn validate_host(host: &str) -> Result<(), ConfigError> {
    let (name, port) = match host.rsplit_once(':') {
        Some((name, port)) => (name, Some(port)),
        None => (host, None),
    };

    if name.is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "host '{}' must be a bare host name without scheme or path",
            host
        )));
    }

    if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return Err(ConfigError::Validation(format!(
            "host '{}' has misplaced dots",
            host
        )));
    }

    if let Some(port) = port {
        if port.parse::<u16>().is_err() {
            return Err(ConfigError::Validation(format!(
                "host '{}' has an invalid port",
                host
            )));
        }
    }

    Ok(())
}

/// Validates retry and pacing settings
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    // Zero delays are allowed; tests rely on them

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.request_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be >= 1, got {}",
            config.request_timeout_ms
        )));
    }

    Ok(())
}

/// Validates the request identity
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
