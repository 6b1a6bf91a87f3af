//! Configuration management for ledgerlens
//!
//! This module handles loading, validation, and management of
//! ledgerlens configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Header carrying the authenticated owner id, set by the identity layer
    #[serde(default = "default_owner_header")]
    pub owner_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            owner_header: default_owner_header(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_owner_header() -> String {
    "x-user-id".to_string()
}

/// Transaction store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON snapshot loaded into the store at startup (optional)
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
    /// Per-query timeout in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

/// What to report when a budget has a zero total amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroBudgetPolicy {
    /// Report 0% utilization and log a warning
    Zero,
    /// Fail the report with a division-by-zero error
    Error,
}

impl Default for ZeroBudgetPolicy {
    fn default() -> Self {
        ZeroBudgetPolicy::Zero
    }
}

impl std::str::FromStr for ZeroBudgetPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(ZeroBudgetPolicy::Zero),
            "error" => Ok(ZeroBudgetPolicy::Error),
            _ => Err(format!("Invalid zero budget policy: {}", s)),
        }
    }
}

impl std::fmt::Display for ZeroBudgetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZeroBudgetPolicy::Zero => write!(f, "zero"),
            ZeroBudgetPolicy::Error => write!(f, "error"),
        }
    }
}

/// Report generation settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportsConfig {
    /// Behaviour of budget utilization for zero-amount budgets
    #[serde(default)]
    pub zero_budget_policy: ZeroBudgetPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Store settings
    #[serde(default)]
    pub data: DataConfig,
    /// Report settings
    #[serde(default)]
    pub reports: ReportsConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.server.owner_header.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "server.owner_header".to_string(),
            });
        }

        if self.data.query_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "data.query_timeout_ms".to_string(),
                reason: "Query timeout must be greater than 0".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Render the default configuration as YAML
    pub fn generate_default() -> ConfigResult<String> {
        serde_yaml::to_string(&Config::default()).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })
    }

    /// Store query timeout as a duration
    pub fn query_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.data.query_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.owner_header, "x-user-id");
        assert_eq!(config.reports.zero_budget_policy, ZeroBudgetPolicy::Zero);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("server:\n  port: 8080\nreports:\n  zero_budget_policy: error\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.data.query_timeout_ms, 5_000);
        assert_eq!(config.reports.zero_budget_policy, ZeroBudgetPolicy::Error);
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = Config::from_yaml("data:\n  query_timeout_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "data.query_timeout_ms"));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = Config::from_yaml("logging:\n  level: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  query_timeout_ms: 250").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.query_timeout(), std::time::Duration::from_millis(250));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_generate_default_round_trips() {
        let yaml = Config::generate_default().unwrap();
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.server.port, Config::default().server.port);
    }

    #[test]
    fn test_zero_budget_policy_from_str() {
        assert_eq!("zero".parse::<ZeroBudgetPolicy>().unwrap(), ZeroBudgetPolicy::Zero);
        assert_eq!("ERROR".parse::<ZeroBudgetPolicy>().unwrap(), ZeroBudgetPolicy::Error);
        assert!("maybe".parse::<ZeroBudgetPolicy>().is_err());
    }
}
