//! Log verbosity

use serde::{Deserialize, Serialize};

/// Supported log levels, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Pick the effective level.
    ///
    /// `CDD_LOG_LEVEL` wins over `LOG_LEVEL`, which wins over the configured
    /// value. Unparseable values are skipped rather than treated as errors.
    pub fn resolve(
        cdd_log_level: Option<&str>,
        log_level: Option<&str>,
        configured: Option<LogLevel>,
    ) -> LogLevel {
        cdd_log_level
            .and_then(|v| v.parse().ok())
            .or_else(|| log_level.and_then(|v| v.parse().ok()))
            .or(configured)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}
