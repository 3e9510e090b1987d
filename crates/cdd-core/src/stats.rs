//! Resource usage sampling for the selected container

use crate::{Update, UpdateSender};
use cdd_provider::{ContainerId, ContainerRuntime, ProviderError, RawStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Network byte counters summed over all interfaces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetIo {
    pub rx: u64,
    pub tx: u64,
}

/// Derived usage figures for one sample
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Normalized against online CPUs, so 100 means one full core per CPU
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub mem_usage: u64,
    pub mem_limit: u64,
    pub net_io: NetIo,
}

/// Compute a snapshot from raw runtime counters
pub fn compute_stats(raw: &RawStats) -> StatsSnapshot {
    let cpu_delta = raw.cpu_total_usage.saturating_sub(raw.precpu_total_usage) as f64;
    let system_delta = raw.system_cpu_usage.unwrap_or(0) as f64
        - raw.presystem_cpu_usage.unwrap_or(0) as f64;
    let online_cpus = raw
        .online_cpus
        .filter(|n| *n > 0)
        .or(raw.percpu_count.filter(|n| *n > 0))
        .unwrap_or(1) as f64;

    let cpu_percent = if system_delta <= 0.0 {
        0.0
    } else {
        (cpu_delta / system_delta) * online_cpus * 100.0
    };

    let mem_usage = raw.memory_usage.unwrap_or(0);
    let mem_limit = raw.memory_limit.filter(|l| *l > 0).unwrap_or(1);
    let mem_percent = mem_usage as f64 / mem_limit as f64 * 100.0;

    let net_io = raw.networks.values().fold(NetIo::default(), |acc, n| NetIo {
        rx: acc.rx + n.rx_bytes,
        tx: acc.tx + n.tx_bytes,
    });

    StatsSnapshot {
        cpu_percent,
        mem_percent,
        mem_usage,
        mem_limit: raw.memory_limit.unwrap_or(0),
        net_io,
    }
}

/// What the stats bar shows: the last good sample and the last error, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsView {
    pub snapshot: Option<StatsSnapshot>,
    pub error: Option<String>,
}

/// Samples one running container at a fixed interval
pub struct StatsSampler {
    runtime: Arc<dyn ContainerRuntime>,
    tx: UpdateSender,
    generation: u64,
    target: Option<ContainerId>,
    task: Option<JoinHandle<()>>,
    view: StatsView,
}

impl StatsSampler {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, tx: UpdateSender) -> Self {
        Self {
            runtime,
            tx,
            generation: 0,
            target: None,
            task: None,
            view: StatsView::default(),
        }
    }

    /// Sample `id` now and then every `interval`, replacing any previous target
    pub fn start(&mut self, id: ContainerId, interval: Duration) {
        self.stop();
        let generation = self.generation;
        let runtime = self.runtime.clone();
        let tx = self.tx.clone();
        let sample_id = id.clone();

        tracing::debug!("Sampling stats for {} every {:?}", id.short(), interval);
        self.target = Some(id);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let result = runtime.stats(&sample_id).await.map(|raw| compute_stats(&raw));
                let update = Update::Stats {
                    generation,
                    id: sample_id.clone(),
                    result,
                };
                if tx.send(update).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop sampling and forget the current view
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation += 1;
        self.target = None;
        self.view = StatsView::default();
    }

    /// Apply a sample. Returns false if it came from a stopped or replaced sampler.
    pub fn apply(
        &mut self,
        generation: u64,
        id: &ContainerId,
        result: Result<StatsSnapshot, ProviderError>,
    ) -> bool {
        if generation != self.generation || self.target.as_ref() != Some(id) {
            tracing::trace!("Discarding stale stats sample for {}", id.short());
            return false;
        }
        match result {
            Ok(snapshot) => {
                self.view.snapshot = Some(snapshot);
                self.view.error = None;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch stats for {}: {}", id.short(), e);
                self.view.error = Some(e.to_string());
            }
        }
        true
    }

    pub fn target(&self) -> Option<&ContainerId> {
        self.target.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &StatsView {
        &self.view
    }
}

impl Drop for StatsSampler {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
