use crate::config::types::{AuditConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;

/// Upper bound on concurrently running batches
const MAX_WORKERS_LIMIT: usize = 100;

/// Upper bound on the BFS depth
const MAX_DEPTH_LIMIT: u32 = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_audit_config(&config.audit)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > MAX_WORKERS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-workers must be between 1 and {}, got {}",
            MAX_WORKERS_LIMIT, config.max_workers
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.batch_timeout_secs < config.request_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "batch-timeout-secs ({}) must not be shorter than request-timeout-secs ({})",
            config.batch_timeout_secs, config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates audit configuration
fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    if let Some(blank) = config
        .exclude_keywords
        .iter()
        .position(|k| k.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "exclude-keywords entry {} is blank",
            blank + 1
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.summary_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    for (name, path) in [("json-path", &config.json_path), ("urls-path", &config.urls_path)] {
        if matches!(path, Some(p) if p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}
