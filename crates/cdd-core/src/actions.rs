//! Lifecycle actions against the selected container
//!
//! The dispatcher owns the normal-mode feedback slot. An action runs on a
//! spawned task and reports back through the update channel; at most one
//! action may be outstanding per container id.

use crate::validation::create_options;
use crate::{with_timeout, CreationRequest, EphemeralMessage, Severity, Update, UpdateSender};
use cdd_provider::{
    ContainerId, ContainerRuntime, ContainerState, ContainerSummary, CreateOptions, ProviderError,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// A lifecycle command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Remove,
}

impl Action {
    /// Progressive form used while the action runs
    pub fn label(&self) -> &'static str {
        match self {
            Action::Start => "Starting",
            Action::Stop => "Stopping",
            Action::Restart => "Restarting",
            Action::Remove => "Removing",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Remove => "remove",
        }
    }

    pub fn past(&self) -> &'static str {
        match self {
            Action::Start => "started",
            Action::Stop => "stopped",
            Action::Restart => "restarted",
            Action::Remove => "removed",
        }
    }

    /// The check applied before dispatching this action from the keyboard
    pub fn default_precondition(&self) -> Option<Precondition> {
        match self {
            Action::Start => Some(reject_running),
            Action::Stop => Some(reject_stopped),
            Action::Restart | Action::Remove => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Returns a rejection reason when the action must not run
pub type Precondition = fn(&ContainerSummary) -> Option<String>;

fn reject_running(c: &ContainerSummary) -> Option<String> {
    (c.state == ContainerState::Running).then(|| "Container is already running.".to_string())
}

fn reject_stopped(c: &ContainerSummary) -> Option<String> {
    c.state
        .is_stopped()
        .then(|| "Container is already stopped.".to_string())
}

/// Result of a dispatch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Precondition failed; the runtime was not called
    Rejected,
    /// Another action is outstanding for this container
    Busy,
    /// The runtime call is running in the background
    Started,
}

/// Two-state gate in front of remove
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EraseGate {
    #[default]
    Idle,
    AwaitingConfirmation { id: ContainerId, name: String },
}

/// Durations used by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTimings {
    /// Lifetime of rejection messages
    pub short: Duration,
    /// Lifetime of result messages
    pub default: Duration,
    /// Deadline for start / stop / restart / remove / create
    pub container_op: Duration,
    /// Deadline for image pulls
    pub image_pull: Duration,
}

impl Default for ActionTimings {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(2000),
            default: Duration::from_millis(3000),
            container_op: Duration::from_secs(30),
            image_pull: Duration::from_secs(300),
        }
    }
}

impl From<&cdd_config::GlobalConfig> for ActionTimings {
    fn from(config: &cdd_config::GlobalConfig) -> Self {
        Self {
            short: config.messages.short(),
            default: config.messages.default_timeout(),
            container_op: config.timeouts.container_op(),
            image_pull: config.timeouts.image_pull(),
        }
    }
}

/// Runs lifecycle actions and reports on them through one message slot
pub struct ActionDispatcher {
    runtime: Arc<dyn ContainerRuntime>,
    tx: UpdateSender,
    timings: ActionTimings,
    pending: HashSet<ContainerId>,
    creating: usize,
    message: EphemeralMessage,
    erase: EraseGate,
}

impl ActionDispatcher {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, tx: UpdateSender, timings: ActionTimings) -> Self {
        Self {
            runtime,
            tx,
            timings,
            pending: HashSet::new(),
            creating: 0,
            message: EphemeralMessage::new(),
            erase: EraseGate::Idle,
        }
    }

    /// Dispatch `action` against `container`
    pub fn dispatch(
        &mut self,
        container: &ContainerSummary,
        action: Action,
        precondition: Option<Precondition>,
    ) -> DispatchOutcome {
        let now = Instant::now();

        if let Some(reason) = precondition.and_then(|check| check(container)) {
            tracing::debug!("{} {} rejected: {}", action, container.id.short(), reason);
            self.message
                .set(reason, Severity::Warning, Some(self.timings.short), now);
            return DispatchOutcome::Rejected;
        }

        if self.pending.contains(&container.id) {
            self.message.set(
                format!("An action is already in progress for {}.", container.name),
                Severity::Warning,
                Some(self.timings.short),
                now,
            );
            return DispatchOutcome::Busy;
        }

        self.pending.insert(container.id.clone());
        self.message.set(
            format!("{} container {}...", action.label(), container.name),
            Severity::Info,
            None,
            now,
        );
        tracing::info!("{} container {}", action.label(), container.id.short());

        let runtime = self.runtime.clone();
        let tx = self.tx.clone();
        let limit = self.timings.container_op;
        let id = container.id.clone();
        let name = container.name.clone();
        tokio::spawn(async move {
            let result = with_timeout(limit, run_action(runtime.as_ref(), action, &id)).await;
            let _ = tx.send(Update::ActionFinished {
                id,
                name,
                action,
                result,
            });
        });

        DispatchOutcome::Started
    }

    /// Record the outcome of a dispatched action. Returns true on success.
    pub fn complete(
        &mut self,
        id: &ContainerId,
        name: &str,
        action: Action,
        result: Result<(), ProviderError>,
    ) -> bool {
        let now = Instant::now();
        self.pending.remove(id);

        match result {
            Ok(()) => {
                tracing::info!("Container {} {}", id.short(), action.past());
                self.message.set(
                    format!("Container {} {}.", name, action.past()),
                    Severity::Success,
                    Some(self.timings.default),
                    now,
                );
                true
            }
            Err(e) => {
                tracing::error!("Failed to {} container {}: {}", action, id.short(), e);
                self.message.set(
                    format!("Failed to {} container {}: {}", action, name, e),
                    Severity::Error,
                    Some(self.timings.default),
                    now,
                );
                false
            }
        }
    }

    /// Create a container from the wizard's raw fields.
    ///
    /// Pulls the image first when it is not present locally.
    pub fn create(&mut self, request: &CreationRequest) -> DispatchOutcome {
        let now = Instant::now();
        let (image, options) = match create_options(request) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.message.set(
                    format!("Failed to create container: {}", e),
                    Severity::Error,
                    Some(self.timings.default),
                    now,
                );
                return DispatchOutcome::Rejected;
            }
        };

        self.creating += 1;
        self.message.set(
            format!("Creating container from {}...", image),
            Severity::Info,
            None,
            now,
        );
        tracing::info!("Creating container from {}", image);

        let runtime = self.runtime.clone();
        let tx = self.tx.clone();
        let timings = self.timings;
        tokio::spawn(async move {
            let result = create_container(runtime.as_ref(), &image, &options, timings).await;
            let _ = tx.send(Update::Created { image, result });
        });

        DispatchOutcome::Started
    }

    /// Record the outcome of a creation. Returns true on success.
    pub fn complete_create(&mut self, image: &str, result: Result<ContainerId, ProviderError>) -> bool {
        let now = Instant::now();
        self.creating = self.creating.saturating_sub(1);

        match result {
            Ok(id) => {
                tracing::info!("Created container {} from {}", id.short(), image);
                self.message.set(
                    format!("Container {} created from {}.", id.short(), image),
                    Severity::Success,
                    Some(self.timings.default),
                    now,
                );
                true
            }
            Err(e) => {
                tracing::error!("Failed to create container from {}: {}", image, e);
                self.message.set(
                    format!("Failed to create container: {}", e),
                    Severity::Error,
                    Some(self.timings.default),
                    now,
                );
                false
            }
        }
    }

    /// Arm the erase gate for `container`
    pub fn request_erase(&mut self, container: &ContainerSummary) {
        self.erase = EraseGate::AwaitingConfirmation {
            id: container.id.clone(),
            name: container.name.clone(),
        };
    }

    /// Confirm a pending erase, dispatching a forced remove
    pub fn confirm_erase(&mut self, containers: &[ContainerSummary]) -> Option<DispatchOutcome> {
        let EraseGate::AwaitingConfirmation { id, name } = std::mem::take(&mut self.erase) else {
            return None;
        };

        match containers.iter().find(|c| c.id == id) {
            Some(target) => Some(self.dispatch(target, Action::Remove, None)),
            None => {
                self.warn_gone(&name);
                None
            }
        }
    }

    /// Back out of a pending erase without touching the runtime
    pub fn cancel_erase(&mut self) {
        self.erase = EraseGate::Idle;
    }

    /// Drop a pending erase whose target vanished from the latest list
    pub fn revalidate_erase(&mut self, containers: &[ContainerSummary]) {
        if let EraseGate::AwaitingConfirmation { id, name } = &self.erase {
            if !containers.iter().any(|c| &c.id == id) {
                let name = name.clone();
                self.erase = EraseGate::Idle;
                self.warn_gone(&name);
            }
        }
    }

    fn warn_gone(&mut self, name: &str) {
        self.message.set(
            format!("Container {} no longer exists.", name),
            Severity::Warning,
            Some(self.timings.short),
            Instant::now(),
        );
    }

    /// Post a message to the feedback slot
    pub fn notify(&mut self, text: impl Into<String>, severity: Severity, ttl: Option<Duration>) {
        self.message.set(text, severity, ttl, Instant::now());
    }

    /// Expire the feedback message
    pub fn tick(&mut self, now: Instant) {
        self.message.tick(now);
    }

    pub fn message(&self) -> &EphemeralMessage {
        &self.message
    }

    pub fn erase_gate(&self) -> &EraseGate {
        &self.erase
    }

    pub fn is_pending(&self, id: &ContainerId) -> bool {
        self.pending.contains(id)
    }

    pub fn is_creating(&self) -> bool {
        self.creating > 0
    }
}

async fn run_action(
    runtime: &dyn ContainerRuntime,
    action: Action,
    id: &ContainerId,
) -> cdd_provider::Result<()> {
    match action {
        Action::Start => runtime.start(id).await,
        Action::Stop => runtime.stop(id).await,
        Action::Restart => runtime.restart(id).await,
        Action::Remove => runtime.remove(id, true).await,
    }
}

async fn create_container(
    runtime: &dyn ContainerRuntime,
    image: &str,
    options: &CreateOptions,
    timings: ActionTimings,
) -> cdd_provider::Result<ContainerId> {
    let exists = with_timeout(timings.container_op, runtime.image_exists(image)).await?;
    if !exists {
        tracing::info!("Image {} not found locally, pulling", image);
        with_timeout(timings.image_pull, runtime.pull_image(image)).await?;
    }
    with_timeout(timings.container_op, runtime.create(image, options)).await
}
