//! Tracing setup
//!
//! The dashboard owns the terminal, so while it runs logs go to a file.
//! One-shot commands log to stderr unless a file is requested.

use anyhow::{Context, Result};
use cdd_config::{GlobalConfig, LogLevel};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// `--verbose` forces debug; otherwise environment, then config, then info
pub fn effective_level(config: &GlobalConfig, verbose: bool) -> LogLevel {
    if verbose {
        LogLevel::Debug
    } else {
        config.log_level()
    }
}

/// `cdd.log` in the platform data directory
pub fn default_log_file() -> Result<PathBuf> {
    Ok(GlobalConfig::data_dir()?.join("cdd.log"))
}

/// Filter that applies `level` to cdd's own crates and keeps dependencies at warn
pub fn filter_directive(level: LogLevel) -> String {
    let level = level.as_filter();
    ["cdd", "cdd_cli", "cdd_config", "cdd_core", "cdd_provider", "cdd_tui"]
        .iter()
        .fold("warn".to_string(), |mut directive, krate| {
            directive.push_str(&format!(",{}={}", krate, level));
            directive
        })
}

/// Install the global subscriber
pub fn init(level: LogLevel, target: &LogTarget) -> Result<()> {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter_directive(level)));

    match target {
        LogTarget::Stderr => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?
        }
    }

    Ok(())
}
