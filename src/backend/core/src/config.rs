//! Configuration management.
//!
//! Values come from an optional file (TOML, YAML or JSON, picked by
//! extension) overlaid with `ORGGUARD__*` environment variables, e.g.
//! `ORGGUARD__AUTHORIZATION__MEMOIZE_RULE_TABLES=false`.

use serde::Deserialize;

use crate::telemetry::LoggingConfig;

const ENV_PREFIX: &str = "ORGGUARD";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Authorization engine configuration
    #[serde(default)]
    pub authorization: AuthorizationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorizationConfig {
    /// Share one rule table per role across all permission sets
    #[serde(default = "default_memoize_rule_tables")]
    pub memoize_rule_tables: bool,

    /// Emit a debug event for every engine decision
    #[serde(default = "default_log_decisions")]
    pub log_decisions: bool,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            memoize_rule_tables: default_memoize_rule_tables(),
            log_decisions: default_log_decisions(),
        }
    }
}

// Default value functions
fn default_memoize_rule_tables() -> bool { true }
fn default_log_decisions() -> bool { true }

impl Config {
    /// Load configuration from the environment only.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a specific file path, with environment overrides.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let cfg: Config = config.try_deserialize()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.authorization.memoize_rule_tables);
        assert!(config.authorization.log_decisions);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[authorization]
memoize_rule_tables = false

[logging]
level = "debug"
format = "json"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert!(!config.authorization.memoize_rule_tables);
        assert!(config.authorization.log_decisions);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_from_missing_file() {
        assert!(Config::from_file("/nonexistent/orgguard.toml").is_err());
    }
}
