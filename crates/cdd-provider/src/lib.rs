//! Container runtime trait and implementations for cdd
//!
//! This crate provides an abstraction over the container runtime (Docker, or
//! anything speaking the Docker Engine API) with the small set of operations
//! the dashboard needs.

mod docker;
mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
mod types;

pub use docker::DockerRuntime;
pub use error::*;
pub use types::*;

use async_trait::async_trait;

/// Trait for container runtimes
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List containers (stopped ones included when `all` is set)
    async fn list(&self, all: bool) -> Result<Vec<ContainerSummary>>;

    /// Start a container
    async fn start(&self, id: &ContainerId) -> Result<()>;

    /// Stop a container
    async fn stop(&self, id: &ContainerId) -> Result<()>;

    /// Restart a container
    async fn restart(&self, id: &ContainerId) -> Result<()>;

    /// Remove a container
    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()>;

    /// Create a container from an image. The container is not started.
    async fn create(&self, image: &str, options: &CreateOptions) -> Result<ContainerId>;

    /// Take one stats sample
    async fn stats(&self, id: &ContainerId) -> Result<RawStats>;

    /// Whether the image is present locally, matched by tag or digest
    async fn image_exists(&self, image: &str) -> Result<bool>;

    /// Pull an image from a registry
    async fn pull_image(&self, image: &str) -> Result<()>;

    /// Open a log stream
    async fn logs(&self, id: &ContainerId, config: &LogConfig) -> Result<LogStream>;

    /// Check if the runtime is reachable
    async fn ping(&self) -> Result<()>;
}

/// Connect to the runtime configured in the global config.
///
/// `socket_override` (from the command line) wins over `docker.socket`.
pub async fn connect(
    config: &cdd_config::GlobalConfig,
    socket_override: Option<&str>,
) -> Result<Box<dyn ContainerRuntime>> {
    let socket = socket_override.unwrap_or(&config.docker.socket);
    tracing::debug!("Connecting to container runtime at {}", socket);

    match DockerRuntime::new(socket).await {
        Ok(runtime) => Ok(Box::new(runtime)),
        Err(e) => Err(ProviderError::ConnectionError(format_connection_error(
            socket, &e,
        ))),
    }
}

fn format_connection_error(socket: &str, error: &ProviderError) -> String {
    let detail = match error {
        ProviderError::ConnectionError(msg) => msg.clone(),
        other => other.to_string(),
    };
    format!(
        "{}\n\nCould not reach the Docker daemon at {}.\nIs Docker running? Use --socket or docker.socket in the config to point elsewhere.",
        detail, socket
    )
}
