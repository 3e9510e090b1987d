//! Test support utilities for cdd-provider consumers
//!
//! Provides MockRuntime and helpers for unit testing the dashboard core
//! without requiring a real Docker daemon.

use crate::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::DuplexStream;

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List { all: bool },
    Start { id: String },
    Stop { id: String },
    Restart { id: String },
    Remove { id: String, force: bool },
    Create { image: String, options: CreateOptions },
    Stats { id: String },
    ImageExists { image: String },
    PullImage { image: String },
    Logs { id: String, tail: Option<u64> },
    Ping,
}

/// Configurable mock container runtime for testing
pub struct MockRuntime {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Result for list calls
    pub list_result: Arc<Mutex<Result<Vec<ContainerSummary>>>>,
    /// Result for start calls
    pub start_result: Arc<Mutex<Result<()>>>,
    /// Result for stop calls
    pub stop_result: Arc<Mutex<Result<()>>>,
    /// Result for restart calls
    pub restart_result: Arc<Mutex<Result<()>>>,
    /// Result for remove calls
    pub remove_result: Arc<Mutex<Result<()>>>,
    /// Result for create calls
    pub create_result: Arc<Mutex<Result<ContainerId>>>,
    /// Queued stats results, consumed front first
    pub stats_queue: Arc<Mutex<VecDeque<Result<RawStats>>>>,
    /// Stats result once the queue is empty
    pub stats_result: Arc<Mutex<Result<RawStats>>>,
    /// Result for image_exists calls
    pub image_exists_result: Arc<Mutex<Result<bool>>>,
    /// Result for pull_image calls
    pub pull_result: Arc<Mutex<Result<()>>>,
    /// Error for logs calls (if Some, logs returns this error)
    pub logs_error: Arc<Mutex<Option<ProviderError>>>,
    /// Error returned by the log stream cancel hook
    pub cancel_error: Arc<Mutex<Option<ProviderError>>>,
    /// Write ends of opened log streams, in open order
    pub log_writers: Arc<Mutex<Vec<DuplexStream>>>,
    /// Number of times a log cancel hook ran
    pub cancel_count: Arc<AtomicUsize>,
    /// Artificial latency for container operations (start..create, pull)
    pub op_delay: Arc<Mutex<Option<Duration>>>,
    /// Artificial latency for stats calls
    pub stats_delay: Arc<Mutex<Option<Duration>>>,
    /// Artificial latency before a log stream opens
    pub logs_delay: Arc<Mutex<Option<Duration>>>,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRuntime {
    /// Create a new mock runtime with default success results
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            list_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            start_result: Arc::new(Mutex::new(Ok(()))),
            stop_result: Arc::new(Mutex::new(Ok(()))),
            restart_result: Arc::new(Mutex::new(Ok(()))),
            remove_result: Arc::new(Mutex::new(Ok(()))),
            create_result: Arc::new(Mutex::new(Ok(ContainerId::new("mock_container_id")))),
            stats_queue: Arc::new(Mutex::new(VecDeque::new())),
            stats_result: Arc::new(Mutex::new(Ok(RawStats::default()))),
            image_exists_result: Arc::new(Mutex::new(Ok(true))),
            pull_result: Arc::new(Mutex::new(Ok(()))),
            logs_error: Arc::new(Mutex::new(None)),
            cancel_error: Arc::new(Mutex::new(None)),
            log_writers: Arc::new(Mutex::new(Vec::new())),
            cancel_count: Arc::new(AtomicUsize::new(0)),
            op_delay: Arc::new(Mutex::new(None)),
            stats_delay: Arc::new(Mutex::new(None)),
            logs_delay: Arc::new(Mutex::new(None)),
        }
    }

    /// Mock whose list call returns the given containers
    pub fn with_containers(containers: Vec<ContainerSummary>) -> Self {
        let mock = Self::new();
        *mock.list_result.lock().unwrap() = Ok(containers);
        mock
    }

    /// Record a call
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    /// Count calls matching a predicate
    pub fn count_calls(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// Take the write end of the most recently opened log stream
    pub fn take_log_writer(&self) -> Option<DuplexStream> {
        self.log_writers.lock().unwrap().pop()
    }

    /// Number of cancel hooks that ran
    pub fn cancels(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }

    async fn delay(slot: &Arc<Mutex<Option<Duration>>>) {
        let delay = *slot.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }
}

/// Helper to clone a Result<T> from an Arc<Mutex<Result<T>>>
fn clone_result<T: Clone>(r: &Arc<Mutex<Result<T>>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_provider_error(e)),
    }
}

/// Clone a ProviderError (thiserror types don't implement Clone)
pub fn clone_provider_error(e: &ProviderError) -> ProviderError {
    match e {
        ProviderError::ConnectionError(s) => ProviderError::ConnectionError(s.clone()),
        ProviderError::ContainerNotFound(s) => ProviderError::ContainerNotFound(s.clone()),
        ProviderError::PullError(s) => ProviderError::PullError(s.clone()),
        ProviderError::RuntimeError(s) => ProviderError::RuntimeError(s.clone()),
        ProviderError::Timeout => ProviderError::Timeout,
        ProviderError::IoError(_) => ProviderError::RuntimeError("IO error (cloned)".into()),
    }
}

/// Build a container summary for tests
pub fn mock_container(id: &str, name: &str, state: ContainerState) -> ContainerSummary {
    ContainerSummary {
        id: ContainerId::new(id),
        name: name.to_string(),
        image: "alpine:latest".to_string(),
        state,
        status: match state {
            ContainerState::Running => "Up 5 minutes".to_string(),
            ContainerState::Exited => "Exited (0) 2 minutes ago".to_string(),
            other => other.to_string(),
        },
        ports: Vec::new(),
    }
}

/// Stats sample with the given deltas (previous reading is zero)
pub fn mock_raw_stats(cpu_delta: u64, system_delta: u64, cpus: u64) -> RawStats {
    RawStats {
        cpu_total_usage: cpu_delta,
        precpu_total_usage: 0,
        system_cpu_usage: Some(system_delta),
        presystem_cpu_usage: Some(0),
        online_cpus: Some(cpus),
        percpu_count: None,
        memory_usage: Some(64 * 1024 * 1024),
        memory_limit: Some(1024 * 1024 * 1024),
        networks: Default::default(),
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn list(&self, all: bool) -> Result<Vec<ContainerSummary>> {
        self.record(MockCall::List { all });
        clone_result(&self.list_result)
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.record(MockCall::Start { id: id.0.clone() });
        Self::delay(&self.op_delay).await;
        clone_result(&self.start_result)
    }

    async fn stop(&self, id: &ContainerId) -> Result<()> {
        self.record(MockCall::Stop { id: id.0.clone() });
        Self::delay(&self.op_delay).await;
        clone_result(&self.stop_result)
    }

    async fn restart(&self, id: &ContainerId) -> Result<()> {
        self.record(MockCall::Restart { id: id.0.clone() });
        Self::delay(&self.op_delay).await;
        clone_result(&self.restart_result)
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        self.record(MockCall::Remove {
            id: id.0.clone(),
            force,
        });
        Self::delay(&self.op_delay).await;
        clone_result(&self.remove_result)
    }

    async fn create(&self, image: &str, options: &CreateOptions) -> Result<ContainerId> {
        self.record(MockCall::Create {
            image: image.to_string(),
            options: options.clone(),
        });
        Self::delay(&self.op_delay).await;
        clone_result(&self.create_result)
    }

    async fn stats(&self, id: &ContainerId) -> Result<RawStats> {
        self.record(MockCall::Stats { id: id.0.clone() });
        let queued = self.stats_queue.lock().unwrap().pop_front();
        Self::delay(&self.stats_delay).await;
        match queued {
            Some(result) => result,
            None => clone_result(&self.stats_result),
        }
    }

    async fn image_exists(&self, image: &str) -> Result<bool> {
        self.record(MockCall::ImageExists {
            image: image.to_string(),
        });
        clone_result(&self.image_exists_result)
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        self.record(MockCall::PullImage {
            image: image.to_string(),
        });
        Self::delay(&self.op_delay).await;
        clone_result(&self.pull_result)
    }

    async fn logs(&self, id: &ContainerId, config: &LogConfig) -> Result<LogStream> {
        self.record(MockCall::Logs {
            id: id.0.clone(),
            tail: config.tail,
        });
        Self::delay(&self.logs_delay).await;
        if let Some(e) = &*self.logs_error.lock().unwrap() {
            return Err(clone_provider_error(e));
        }

        let (writer, reader) = tokio::io::duplex(64 * 1024);
        self.log_writers.lock().unwrap().push(writer);

        let count = self.cancel_count.clone();
        let cancel_error = self.cancel_error.clone();
        Ok(LogStream {
            stream: Box::pin(reader),
            cancel: Some(Box::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
                match &*cancel_error.lock().unwrap() {
                    Some(e) => Err(clone_provider_error(e)),
                    None => Ok(()),
                }
            })),
        })
    }

    async fn ping(&self) -> Result<()> {
        self.record(MockCall::Ping);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mock = MockRuntime::new();
        let id = ContainerId::new("abc");
        mock.start(&id).await.unwrap();
        mock.remove(&id, true).await.unwrap();

        assert!(mock.was_called(&MockCall::Start { id: "abc".into() }));
        assert!(mock.was_called(&MockCall::Remove {
            id: "abc".into(),
            force: true
        }));
    }

    #[tokio::test]
    async fn test_mock_stats_queue_then_fallback() {
        let mock = MockRuntime::new();
        mock.stats_queue
            .lock()
            .unwrap()
            .push_back(Err(ProviderError::Timeout));
        let id = ContainerId::new("abc");

        assert!(matches!(mock.stats(&id).await, Err(ProviderError::Timeout)));
        assert!(mock.stats(&id).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_log_stream_and_cancel() {
        let mock = MockRuntime::new();
        let mut logs = mock
            .logs(&ContainerId::new("abc"), &LogConfig::follow_tail(100))
            .await
            .unwrap();

        let mut writer = mock.take_log_writer().unwrap();
        writer.write_all(b"hello\n").await.unwrap();
        drop(writer);

        let mut out = String::new();
        logs.stream.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "hello\n");

        (logs.cancel.take().unwrap())().unwrap();
        assert_eq!(mock.cancels(), 1);
    }
}
