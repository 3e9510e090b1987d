//! Results sent from background tasks to the dashboard owner

use crate::{Action, LogEvent, StatsSnapshot};
use cdd_provider::{ContainerId, ContainerSummary, ProviderError};
use tokio::sync::mpsc;

/// A state change produced off the owner task.
///
/// Sources that can be cancelled tag their updates with the generation that
/// produced them; the owner drops updates from a generation that is no longer
/// current.
#[derive(Debug)]
pub enum Update {
    Containers {
        generation: u64,
        result: Result<Vec<ContainerSummary>, ProviderError>,
    },
    Stats {
        generation: u64,
        id: ContainerId,
        result: Result<StatsSnapshot, ProviderError>,
    },
    ActionFinished {
        id: ContainerId,
        name: String,
        action: Action,
        result: Result<(), ProviderError>,
    },
    Created {
        image: String,
        result: Result<ContainerId, ProviderError>,
    },
    Log {
        generation: u64,
        event: LogEvent,
    },
}

pub type UpdateSender = mpsc::UnboundedSender<Update>;
pub type UpdateReceiver = mpsc::UnboundedReceiver<Update>;

pub fn channel() -> (UpdateSender, UpdateReceiver) {
    mpsc::unbounded_channel()
}
