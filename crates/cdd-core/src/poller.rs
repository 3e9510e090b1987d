//! Periodic container list refresh

use crate::{Update, UpdateSender};
use cdd_provider::ContainerRuntime;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Fetches the full container list on a fixed interval
pub struct PollingRefresher {
    runtime: Arc<dyn ContainerRuntime>,
    tx: UpdateSender,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl PollingRefresher {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, tx: UpdateSender) -> Self {
        Self {
            runtime,
            tx,
            generation: 0,
            task: None,
        }
    }

    /// Fetch now and then every `interval`, replacing any running loop
    pub fn start(&mut self, interval: Duration) {
        self.stop();
        let generation = self.generation;
        let runtime = self.runtime.clone();
        let tx = self.tx.clone();

        tracing::debug!("Starting container list refresh every {:?}", interval);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !fetch(runtime.as_ref(), &tx, generation).await {
                    break;
                }
            }
        }));
    }

    /// Cancel the loop; results already in flight are discarded
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
    }

    /// One out-of-band fetch tagged with the current generation
    pub fn refresh_now(&self) {
        let generation = self.generation;
        let runtime = self.runtime.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            fetch(runtime.as_ref(), &tx, generation).await;
        });
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a result tagged `generation` may be applied
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

impl Drop for PollingRefresher {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Returns false once the receiving side is gone
async fn fetch(runtime: &dyn ContainerRuntime, tx: &UpdateSender, generation: u64) -> bool {
    let result = runtime.list(true).await;
    if let Err(e) = &result {
        tracing::warn!("Failed to list containers: {}", e);
    }
    tx.send(Update::Containers { generation, result }).is_ok()
}
