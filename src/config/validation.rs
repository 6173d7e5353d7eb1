use crate::config::types::{AuditConfig, Config, CrawlerConfig, SearchConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_audit_config(&config.audit)?;
    validate_search_config(&config.search)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.program.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler.program cannot be empty".to_string(),
        ));
    }

    if config.max_depth < 1 || config.max_depth > 20 {
        return Err(ConfigError::Validation(format!(
            "crawler.max-depth must be between 1 and 20, got {}",
            config.max_depth
        )));
    }

    if config.line_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "crawler.line-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler.user-agent cannot be empty".to_string(),
        ));
    }

    for ext in &config.reject {
        validate_extension(ext)?;
    }

    Ok(())
}

/// Validates audit configuration
fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    if config.size_budget_bytes < 1 {
        return Err(ConfigError::Validation(
            "audit.size-budget-bytes must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.max_results < 1 {
        return Err(ConfigError::Validation(
            "search.max-results must be >= 1".to_string(),
        ));
    }

    if config.max_excerpts < 1 {
        return Err(ConfigError::Validation(
            "search.max-excerpts must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates a rejected file extension (no dot, alphanumeric only)
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "crawler.reject entries must be alphanumeric extensions without a dot, got '{}'",
            ext
        )));
    }
    Ok(())
}
