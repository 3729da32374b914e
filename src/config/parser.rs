use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use coverage_gap::config::load_config;
///
/// let config = load_config(Path::new("audit.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is printed in reports so two audit runs can be compared.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ScopeMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 3
max-pages = 200
max-workers = 10
request-timeout-secs = 5
request-delay-ms = 0
batch-timeout-secs = 60

[audit]
mode = "pdf"
reference-path = "refs.json"
exclude-keywords = ["webcast", "email-alerts"]

[output]
summary-path = "./summary.md"
json-path = "./missing.json"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_pages, 200);
        assert_eq!(config.crawler.max_workers, 10);
        assert_eq!(config.crawler.request_delay_ms, 0);
        assert_eq!(config.audit.mode, ScopeMode::Pdf);
        assert_eq!(config.audit.exclude_keywords.len(), 2);
        assert_eq!(
            config.audit.reference_path.as_deref(),
            Some(Path::new("refs.json"))
        );
        assert_eq!(config.output.json_path.as_deref(), Some("./missing.json"));
        assert_eq!(config.output.urls_path, None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.crawler.max_depth, 10);
        assert_eq!(config.crawler.max_pages, 1000);
        assert_eq!(config.crawler.max_workers, 50);
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.crawler.request_delay_ms, 100);
        assert_eq!(config.crawler.batch_timeout_secs, 120);
        assert_eq!(config.audit.mode, ScopeMode::Both);
        assert_eq!(config.output.summary_path, "missing-urls.md");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[crawler]\nmax-pages = 5\n").unwrap();
        assert_eq!(config.crawler.max_pages, 5);
        assert_eq!(config.crawler.max_depth, 10);
    }

    #[test]
    fn test_invalid_mode() {
        let result = parse_config("[audit]\nmode = \"video\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = parse_config("[crawler\nmax-depth = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_applied() {
        let result = parse_config("[crawler]\nmax-workers = 500\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/nonexistent/audit.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_hash() {
        let file = create_temp_config("[crawler]\nmax-depth = 2\n");
        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);

        let other = create_temp_config("[crawler]\nmax-depth = 3\n");
        assert_ne!(hash1, compute_config_hash(other.path()).unwrap());
    }

    #[test]
    fn test_load_with_hash() {
        let file = create_temp_config("[output]\nsummary-path = \"out.md\"\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.output.summary_path, "out.md");
        assert_eq!(hash.len(), 64);
    }
}
