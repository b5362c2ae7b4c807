//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Durable storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("inventomatic").to_string_lossy().to_string())
        .unwrap_or_else(|| "./inventomatic_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Memory sampler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_monitor_enabled")]
    pub enabled: bool,

    #[serde(default = "default_monitor_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_warn_ratio")]
    pub warn_ratio: f64,
}

fn default_monitor_enabled() -> bool {
    true
}

fn default_monitor_interval() -> u64 {
    crate::monitor::DEFAULT_INTERVAL_SECS
}

fn default_warn_ratio() -> f64 {
    crate::monitor::DEFAULT_WARN_RATIO
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_monitor_enabled(),
            interval_secs: default_monitor_interval(),
            warn_ratio: default_warn_ratio(),
        }
    }
}

impl MonitorConfig {
    /// Sampling period, or `None` when the sampler is disabled
    ///
    /// `override_secs` replaces the configured interval. Periods are at least one second.
    pub fn sample_interval(&self, override_secs: Option<u64>) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let secs = override_secs.unwrap_or(self.interval_secs).max(1);
        Some(Duration::from_secs(secs))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("inventomatic").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = var("INVENTOMATIC_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(interval) = var("INVENTOMATIC_MONITOR_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.monitor.interval_secs = secs;
            }
        }

        if let Some(level) = var("INVENTOMATIC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("INVENTOMATIC_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Inventomatic Configuration
#
# Environment variables override these settings:
# - INVENTOMATIC_DATA_DIR
# - INVENTOMATIC_MONITOR_INTERVAL
# - INVENTOMATIC_LOG_LEVEL
# - INVENTOMATIC_LOG_FORMAT

[storage]
# Directory holding the preference and chat history blobs
data_dir = "~/.local/share/inventomatic"

[monitor]
# Periodically sample memory usage and warn when it runs high
enabled = true

# Seconds between samples
interval_secs = 30

# Usage fraction above which a warning is logged
warn_ratio = 0.9

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.storage.data_dir, "~/.local/share/inventomatic");
        assert_eq!(config.monitor.interval_secs, 30);
        assert_eq!(config.monitor.warn_ratio, 0.9);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.monitor.enabled);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("INVENTOMATIC_DATA_DIR", "/tmp/inv"),
            ("INVENTOMATIC_MONITOR_INTERVAL", "not-a-number"),
            ("INVENTOMATIC_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/tmp/inv");
        assert_eq!(config.monitor.interval_secs, 30);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_disabled_monitor_has_no_interval() {
        let config = Config::parse("[monitor]\nenabled = false\ninterval_secs = 5\n").unwrap();
        assert_eq!(config.monitor.sample_interval(None), None);
        assert_eq!(config.monitor.sample_interval(Some(10)), None);

        let config = Config::parse("[monitor]\ninterval_secs = 5\n").unwrap();
        assert_eq!(config.monitor.sample_interval(None), Some(Duration::from_secs(5)));
        assert_eq!(config.monitor.sample_interval(Some(0)), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/inventomatic.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
