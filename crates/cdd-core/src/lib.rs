//! State and control coordination core for the cdd container dashboard
//!
//! This crate provides:
//! - Periodic container list refresh and per-container stats sampling
//! - Lifecycle actions with precondition checks and expiring feedback
//! - The step-by-step container creation wizard
//! - A cancellable live log stream with a bounded line buffer
//! - The dashboard that routes logical keys by mode and applies results
//!
//! Nothing here draws to a terminal or talks to Docker directly; the runtime
//! is injected as an `Arc<dyn ContainerRuntime>`.

mod actions;
mod dashboard;
mod error;
mod input;
mod logs;
mod message;
mod poller;
mod selection;
mod stats;
mod timeout;
pub mod update;
pub mod validation;
mod wizard;

pub use actions::*;
pub use dashboard::*;
pub use error::*;
pub use input::*;
pub use logs::*;
pub use message::*;
pub use poller::*;
pub use selection::*;
pub use stats::*;
pub use timeout::*;
pub use update::{Update, UpdateReceiver, UpdateSender};
pub use validation::ValidationError;
pub use wizard::*;

/// Connect to the configured runtime and build a dashboard around it
pub async fn connect(
    config: &cdd_config::GlobalConfig,
    socket_override: Option<&str>,
) -> Result<(Dashboard, UpdateReceiver)> {
    let runtime = cdd_provider::connect(config, socket_override).await?;
    Ok(Dashboard::new(
        std::sync::Arc::from(runtime),
        DashboardSettings::from(config),
    ))
}
