//! Live log stream for one container
//!
//! The subscription is opened on a spawned task so a slow daemon never stalls
//! the dashboard owner. The task hands the stream's cancel hook to a shared
//! slot; whoever finishes second (the task registering, or `close`) runs it.

use crate::{with_timeout, Update, UpdateSender};
use cdd_provider::{CancelHook, ContainerId, ContainerRuntime, LogConfig};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;

const READ_BUFFER: usize = 8 * 1024;

/// Longest unterminated fragment carried between chunks
const MAX_PARTIAL: usize = 16 * 1024;

/// Something that happened on the log stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Chunk(Vec<u8>),
    End,
    Error(String),
}

/// Sizes and deadline for the log stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLimits {
    /// Backlog requested from the runtime on open
    pub tail: u64,
    /// Lines returned by `window`
    pub window: usize,
    /// Lines retained; older ones are dropped
    pub capacity: usize,
    /// Deadline for the runtime to accept the subscription
    pub open_timeout: Duration,
}

impl Default for LogLimits {
    fn default() -> Self {
        Self::from(&cdd_config::GlobalConfig::default())
    }
}

impl From<&cdd_config::GlobalConfig> for LogLimits {
    fn from(config: &cdd_config::GlobalConfig) -> Self {
        Self {
            tail: config.logs.tail,
            window: config.logs.window,
            capacity: config.logs.capacity.max(1),
            open_timeout: config.timeouts.container_op(),
        }
    }
}

enum SubscriptionState {
    Connecting,
    Open(Option<CancelHook>),
    Closed,
}

/// Cancel hook slot shared between the manager and its pump task
struct Subscription(Mutex<SubscriptionState>);

impl Subscription {
    fn new() -> Self {
        Self(Mutex::new(SubscriptionState::Connecting))
    }

    fn state(&self) -> MutexGuard<'_, SubscriptionState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the hook of a freshly opened stream. If the manager closed the
    /// subscription meanwhile, the hook runs here and false is returned.
    fn register(&self, id: &ContainerId, cancel: Option<CancelHook>) -> bool {
        let mut state = self.state();
        if matches!(*state, SubscriptionState::Closed) {
            drop(state);
            run_cancel(id, cancel);
            return false;
        }
        *state = SubscriptionState::Open(cancel);
        true
    }

    /// Mark closed and hand back the hook, if the stream got that far
    fn close(&self) -> Option<CancelHook> {
        match std::mem::replace(&mut *self.state(), SubscriptionState::Closed) {
            SubscriptionState::Open(cancel) => cancel,
            _ => None,
        }
    }
}

fn run_cancel(id: &ContainerId, cancel: Option<CancelHook>) {
    if let Some(cancel) = cancel {
        if let Err(e) = cancel() {
            tracing::warn!("Failed to cancel log stream for {}: {}", id.short(), e);
        }
    }
}

struct ActiveStream {
    id: ContainerId,
    subscription: Arc<Subscription>,
    pump: JoinHandle<()>,
}

/// At most one follow-mode log subscription plus its line buffer
pub struct LogStreamManager {
    runtime: Arc<dyn ContainerRuntime>,
    tx: UpdateSender,
    limits: LogLimits,
    generation: u64,
    active: Option<ActiveStream>,
    /// Container the buffered lines belong to; outlives the stream
    source: Option<ContainerId>,
    lines: VecDeque<String>,
    /// Bytes after the last line break, waiting for the rest of their line
    partial: Vec<u8>,
}

impl LogStreamManager {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, tx: UpdateSender, limits: LogLimits) -> Self {
        Self {
            runtime,
            tx,
            limits,
            generation: 0,
            active: None,
            source: None,
            lines: VecDeque::new(),
            partial: Vec::new(),
        }
    }

    /// Subscribe to `id`, closing any open stream and clearing the buffer.
    ///
    /// Returns immediately. Failure to open arrives later as an error line.
    pub fn open(&mut self, id: &ContainerId) {
        self.close();
        self.lines.clear();
        self.partial.clear();
        self.source = Some(id.clone());

        let subscription = Arc::new(Subscription::new());
        let pump = tokio::spawn(pump_logs(
            self.runtime.clone(),
            id.clone(),
            self.limits,
            self.generation,
            subscription.clone(),
            self.tx.clone(),
        ));

        self.active = Some(ActiveStream {
            id: id.clone(),
            subscription,
            pump,
        });
    }

    /// Tear down the open stream, if any. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.generation += 1;
        let Some(active) = self.active.take() else {
            return;
        };

        active.pump.abort();
        run_cancel(&active.id, active.subscription.close());
        tracing::debug!("Closed log stream for {}", active.id.short());
    }

    /// Apply a stream event. Returns false if it belongs to a closed stream.
    ///
    /// End and error both leave the stream closed with the buffer intact.
    pub fn apply(&mut self, generation: u64, event: LogEvent) -> bool {
        if generation != self.generation || self.active.is_none() {
            return false;
        }
        match event {
            LogEvent::Chunk(bytes) => self.ingest(&bytes),
            LogEvent::End => {
                self.flush_partial();
                self.close();
            }
            LogEvent::Error(message) => {
                self.flush_partial();
                tracing::warn!("Log stream error: {}", message);
                self.push_line(format!("Error: {}", message));
                self.close();
            }
        }
        true
    }

    /// Split on `\n` and `\r`. A fragment after the last break waits for the
    /// next chunk, unless this chunk had no break at all or it grew too long.
    fn ingest(&mut self, bytes: &[u8]) {
        let has_break = bytes.iter().any(|b| is_line_break(*b));
        self.partial.extend_from_slice(bytes);
        while let Some(pos) = self.partial.iter().position(|b| is_line_break(*b)) {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            self.push_raw(&line[..line.len() - 1]);
        }
        if !has_break || self.partial.len() > MAX_PARTIAL {
            self.flush_partial();
        }
    }

    fn flush_partial(&mut self) {
        let rest = std::mem::take(&mut self.partial);
        self.push_raw(&rest);
    }

    fn push_raw(&mut self, raw: &[u8]) {
        if !raw.is_empty() {
            self.push_line(String::from_utf8_lossy(raw).into_owned());
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.limits.capacity {
            self.lines.pop_front();
        }
    }

    /// The most recent lines, oldest first
    pub fn window(&self) -> Vec<&str> {
        let skip = self.lines.len().saturating_sub(self.limits.window);
        self.lines.iter().skip(skip).map(String::as_str).collect()
    }

    pub fn lines(&self) -> &VecDeque<String> {
        &self.lines
    }

    /// A subscription is live (connecting or streaming)
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Container of the live subscription
    pub fn container(&self) -> Option<&ContainerId> {
        self.active.as_ref().map(|a| &a.id)
    }

    /// Container whose lines are buffered, even after its stream ended
    pub fn source(&self) -> Option<&ContainerId> {
        self.source.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for LogStreamManager {
    fn drop(&mut self) {
        self.close();
    }
}

fn is_line_break(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

async fn pump_logs(
    runtime: Arc<dyn ContainerRuntime>,
    id: ContainerId,
    limits: LogLimits,
    generation: u64,
    subscription: Arc<Subscription>,
    tx: UpdateSender,
) {
    let config = LogConfig::follow_tail(limits.tail);
    let logs = match with_timeout(limits.open_timeout, runtime.logs(&id, &config)).await {
        Ok(logs) => logs,
        Err(e) => {
            tracing::warn!("Failed to open logs for {}: {}", id.short(), e);
            let event = LogEvent::Error(e.to_string());
            let _ = tx.send(Update::Log { generation, event });
            return;
        }
    };

    if !subscription.register(&id, logs.cancel) {
        return;
    }
    tracing::debug!("Opened log stream for {}", id.short());

    let mut stream = logs.stream;
    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        let event = match stream.read(&mut buf).await {
            Ok(0) => LogEvent::End,
            Ok(n) => LogEvent::Chunk(buf[..n].to_vec()),
            Err(e) => LogEvent::Error(e.to_string()),
        };
        let done = !matches!(event, LogEvent::Chunk(_));
        if tx.send(Update::Log { generation, event }).is_err() || done {
            break;
        }
    }
}
