//! Global configuration for cdd
//!
//! Located at `~/.config/cdd/config.toml`. Every key is optional; a missing
//! file yields the defaults.

use crate::{ConfigError, LogLevel, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global cdd configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub refresh: RefreshConfig,
    pub messages: MessageConfig,
    pub timeouts: TimeoutConfig,
    pub ui: UiConfig,
    pub logs: LogsConfig,
    pub docker: DockerConfig,
    pub wizard: WizardConfig,
    pub logging: LoggingConfig,
}

/// Polling intervals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// How often the container list is fetched
    pub container_list_ms: u64,
    /// How often stats are sampled for the selected running container
    pub container_stats_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            container_list_ms: 3000,
            container_stats_ms: 1500,
        }
    }
}

impl RefreshConfig {
    pub fn container_list(&self) -> Duration {
        Duration::from_millis(self.container_list_ms)
    }

    pub fn container_stats(&self) -> Duration {
        Duration::from_millis(self.container_stats_ms)
    }
}

/// Lifetimes of feedback messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Used for rejections (precondition, busy)
    pub short_ms: u64,
    /// Used for action results
    pub default_ms: u64,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            short_ms: 2000,
            default_ms: 3000,
        }
    }
}

impl MessageConfig {
    pub fn short(&self) -> Duration {
        Duration::from_millis(self.short_ms)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }
}

/// Timeouts for runtime operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// start / stop / restart / remove / create
    pub container_op_secs: u64,
    /// Image pulls during container creation
    pub image_pull_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            container_op_secs: 30,
            image_pull_secs: 300,
        }
    }
}

impl TimeoutConfig {
    pub fn container_op(&self) -> Duration {
        Duration::from_secs(self.container_op_secs)
    }

    pub fn image_pull(&self) -> Duration {
        Duration::from_secs(self.image_pull_secs)
    }
}

/// Terminal front-end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Delay between the exit message and process termination
    pub exit_delay_ms: u64,
    /// Event loop tick rate
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            exit_delay_ms: 500,
            tick_rate_ms: 250,
        }
    }
}

impl UiConfig {
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Log viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    /// Backlog requested when a stream opens
    pub tail: u64,
    /// Number of most recent lines shown
    pub window: usize,
    /// Maximum number of lines retained in memory
    pub capacity: usize,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            tail: 100,
            window: 15,
            capacity: 1000,
        }
    }
}

/// Docker connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Docker socket path or URL
    pub socket: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: default_docker_socket(),
        }
    }
}

#[cfg(windows)]
fn default_docker_socket() -> String {
    "//./pipe/docker_engine".to_string()
}

#[cfg(not(windows))]
fn default_docker_socket() -> String {
    "/var/run/docker.sock".to_string()
}

/// Container creation wizard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Image name fragments that usually need environment variables
    pub database_images: Vec<String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            database_images: ["mysql", "mariadb", "postgres", "mongo", "mssql", "redis"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Verbosity when neither CDD_LOG_LEVEL nor LOG_LEVEL is set
    pub level: Option<LogLevel>,
}

impl GlobalConfig {
    /// Load global configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load global configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values that would stall the polling loops
    fn validate(&self) -> Result<()> {
        if self.refresh.container_list_ms == 0 || self.refresh.container_stats_ms == 0 {
            return Err(ConfigError::Invalid(
                "refresh intervals must be greater than zero".to_string(),
            ));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "ui.tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "cdd").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path (log file lives here)
    pub fn data_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "cdd").ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Effective log level: environment first, then this file, then info
    pub fn log_level(&self) -> LogLevel {
        LogLevel::resolve(
            std::env::var("CDD_LOG_LEVEL").ok().as_deref(),
            std::env::var("LOG_LEVEL").ok().as_deref(),
            self.logging.level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert_eq!(config.refresh.container_list(), Duration::from_millis(3000));
        assert_eq!(config.refresh.container_stats(), Duration::from_millis(1500));
        assert_eq!(config.messages.short(), Duration::from_millis(2000));
        assert_eq!(config.messages.default_timeout(), Duration::from_millis(3000));
        assert_eq!(config.timeouts.container_op(), Duration::from_secs(30));
        assert_eq!(config.timeouts.image_pull(), Duration::from_secs(300));
        assert_eq!(config.logs.window, 15);
        assert_eq!(config.logs.tail, 100);
        assert!(config.wizard.database_images.contains(&"postgres".to_string()));
        assert_eq!(config.logging.level, None);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[refresh]
container_list_ms = 5000

[docker]
socket = "/run/user/1000/docker.sock"

[wizard]
database_images = ["cockroach"]

[logging]
level = "debug"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.refresh.container_list_ms, 5000);
        // Unspecified keys in a present section keep their defaults
        assert_eq!(config.refresh.container_stats_ms, 1500);
        assert_eq!(config.docker.socket, "/run/user/1000/docker.sock");
        assert_eq!(config.wizard.database_images, vec!["cockroach".to_string()]);
        assert_eq!(config.logging.level, Some(LogLevel::Debug));
        assert_eq!(config.messages, MessageConfig::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GlobalConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_load_partial_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timeouts]\ncontainer_op_secs = 12\n").unwrap();

        let loaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(loaded.timeouts.container_op_secs, 12);
        assert_eq!(loaded.timeouts.image_pull_secs, 300);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh\ncontainer_list_ms = ").unwrap();

        let err = GlobalConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError { .. }));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[refresh]\ncontainer_list_ms = 0\n").unwrap();

        let err = GlobalConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
