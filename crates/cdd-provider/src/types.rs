//! Common types for container runtimes

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::pin::Pin;
use tokio::io::AsyncRead;

/// Container ID wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        if self.0.len() > 12 {
            &self.0[..12]
        } else {
            &self.0
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Container lifecycle state as reported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl ContainerState {
    /// Exited (or dead) containers count as stopped
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Exited | Self::Dead)
    }
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Restarting => write!(f, "restarting"),
            Self::Removing => write!(f, "removing"),
            Self::Exited => write!(f, "exited"),
            Self::Dead => write!(f, "dead"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for ContainerState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            // Some runtimes report "stopped" instead of "exited"
            "exited" | "stopped" => Self::Exited,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }
}

/// One row of the container list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: ContainerId,
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    /// Human readable status, e.g. "Up 5 minutes"
    pub status: String,
    /// `public:private` bindings, or `:private` when nothing is published
    pub ports: Vec<String>,
}

impl ContainerSummary {
    pub fn is_running(&self) -> bool {
        self.state == ContainerState::Running
    }
}

/// A port as listed by the runtime, before formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListedPort {
    pub private_port: u16,
    pub public_port: Option<u16>,
}

/// Normalize a raw container name: strip the leading slash, fall back to "Unknown"
pub fn normalize_name(raw: Option<&str>) -> String {
    match raw.map(|n| n.strip_prefix('/').unwrap_or(n)) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// Format listed ports for display.
///
/// Published ports render as `public:private`. When nothing is published the
/// exposed private ports render as `:private`. Duplicates (the same binding on
/// IPv4 and IPv6) are removed, keeping first-seen order.
pub fn format_ports(ports: &[ListedPort]) -> Vec<String> {
    let published: Vec<String> = ports
        .iter()
        .filter_map(|p| p.public_port.map(|public| format!("{}:{}", public, p.private_port)))
        .collect();

    let formatted = if published.is_empty() {
        ports
            .iter()
            .map(|p| format!(":{}", p.private_port))
            .collect()
    } else {
        published
    };

    let mut seen = Vec::with_capacity(formatted.len());
    for port in formatted {
        if !seen.contains(&port) {
            seen.push(port);
        }
    }
    seen
}

/// A host-to-container port binding for container creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortBinding {
    pub host_port: u16,
    pub container_port: u16,
}

/// Options for creating a container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    /// Container name (runtime picks one when None)
    pub name: Option<String>,
    /// `NAME=value` entries
    pub env: Vec<String>,
    /// Port bindings (tcp)
    pub ports: Vec<PortBinding>,
    /// Allocate a TTY
    pub tty: bool,
}

/// Raw counters for one stats sample.
///
/// The runtime reports the current reading and the previous one; the CPU
/// percentage is derived from the difference between the two.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStats {
    pub cpu_total_usage: u64,
    pub precpu_total_usage: u64,
    pub system_cpu_usage: Option<u64>,
    pub presystem_cpu_usage: Option<u64>,
    pub online_cpus: Option<u64>,
    /// Length of the per-CPU usage vector, used when online_cpus is absent
    pub percpu_count: Option<u64>,
    pub memory_usage: Option<u64>,
    pub memory_limit: Option<u64>,
    pub networks: HashMap<String, NetworkCounters>,
}

/// Per-interface network counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Log configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Follow log output
    pub follow: bool,
    /// Show stdout
    pub stdout: bool,
    /// Show stderr
    pub stderr: bool,
    /// Number of lines from end to show
    pub tail: Option<u64>,
}

impl LogConfig {
    /// Combined stdout+stderr in follow mode with a bounded backlog
    pub fn follow_tail(tail: u64) -> Self {
        Self {
            follow: true,
            stdout: true,
            stderr: true,
            tail: Some(tail),
        }
    }
}

/// Hook invoked to tear down a log subscription
pub type CancelHook = Box<dyn FnOnce() -> Result<()> + Send>;

/// Log stream
pub struct LogStream {
    pub stream: Pin<Box<dyn AsyncRead + Send>>,
    /// Explicit cancellation, for runtimes where dropping the reader is not enough
    pub cancel: Option<CancelHook>,
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStream")
            .field("cancel", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some("/web")), "web");
        assert_eq!(normalize_name(Some("db")), "db");
        assert_eq!(normalize_name(Some("/")), "Unknown");
        assert_eq!(normalize_name(None), "Unknown");
    }

    #[test]
    fn test_format_ports_published_deduplicated() {
        let ports = [
            ListedPort { private_port: 80, public_port: Some(8080) },
            ListedPort { private_port: 80, public_port: Some(8080) },
            ListedPort { private_port: 443, public_port: Some(8443) },
            ListedPort { private_port: 9000, public_port: None },
        ];
        assert_eq!(format_ports(&ports), vec!["8080:80", "8443:443"]);
    }

    #[test]
    fn test_format_ports_falls_back_to_private() {
        let ports = [
            ListedPort { private_port: 6379, public_port: None },
            ListedPort { private_port: 6379, public_port: None },
        ];
        assert_eq!(format_ports(&ports), vec![":6379"]);
        assert!(format_ports(&[]).is_empty());
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!(ContainerState::from("running"), ContainerState::Running);
        assert_eq!(ContainerState::from("Exited"), ContainerState::Exited);
        assert_eq!(ContainerState::from("stopped"), ContainerState::Exited);
        assert_eq!(ContainerState::from("weird"), ContainerState::Unknown);
        assert!(ContainerState::Dead.is_stopped());
        assert!(!ContainerState::Created.is_stopped());
    }

    #[test]
    fn test_short_id() {
        let id = ContainerId::new("0123456789abcdef");
        assert_eq!(id.short(), "0123456789ab");
        assert_eq!(ContainerId::new("abc").short(), "abc");
    }
}
