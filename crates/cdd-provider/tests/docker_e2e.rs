//! End-to-end tests against a real Docker daemon.
//!
//! Run with `cargo test -p cdd-provider -- --ignored`. Each test skips
//! gracefully when no daemon answers on the configured socket.

use cdd_config::GlobalConfig;
use cdd_provider::{
    ContainerId, ContainerRuntime, ContainerState, CreateOptions, LogConfig,
};
use std::time::Duration;
use tokio::io::AsyncReadExt;

// Long-running image that writes to stdout on startup
const TEST_IMAGE: &str = "nginx:alpine";

/// Connect using `CDD_DOCKER_SOCKET` if set, otherwise the default socket
async fn get_test_runtime() -> Option<Box<dyn ContainerRuntime>> {
    let socket = std::env::var("CDD_DOCKER_SOCKET").ok();
    match cdd_provider::connect(&GlobalConfig::default(), socket.as_deref()).await {
        Ok(runtime) => Some(runtime),
        Err(e) => {
            eprintln!("Skipping: no Docker daemon available ({})", e);
            None
        }
    }
}

fn unique_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("cdd-e2e-{}-{}-{}", prefix, std::process::id(), nanos)
}

async fn ensure_image(runtime: &dyn ContainerRuntime) {
    if !runtime.image_exists(TEST_IMAGE).await.unwrap() {
        runtime.pull_image(TEST_IMAGE).await.unwrap();
    }
}

async fn state_of(runtime: &dyn ContainerRuntime, id: &ContainerId) -> Option<ContainerState> {
    runtime
        .list(true)
        .await
        .unwrap()
        .into_iter()
        .find(|c| id.0.starts_with(&c.id.0) || c.id.0.starts_with(&id.0))
        .map(|c| c.state)
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_ping_and_list() {
    let Some(runtime) = get_test_runtime().await else {
        return;
    };
    runtime.ping().await.unwrap();
    // Listing must succeed whatever is on the host
    runtime.list(true).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_container_lifecycle() {
    let Some(runtime) = get_test_runtime().await else {
        return;
    };
    let runtime = &*runtime;
    ensure_image(runtime).await;

    let name = unique_name("lifecycle");
    let options = CreateOptions {
        name: Some(name),
        ..Default::default()
    };
    let id = runtime.create(TEST_IMAGE, &options).await.unwrap();
    assert_eq!(state_of(runtime, &id).await, Some(ContainerState::Created));

    runtime.start(&id).await.unwrap();
    assert_eq!(state_of(runtime, &id).await, Some(ContainerState::Running));

    let stats = runtime.stats(&id).await.unwrap();
    assert!(stats.memory_limit.unwrap_or_default() > 0);

    let mut logs = runtime.logs(&id, &LogConfig::follow_tail(100)).await.unwrap();
    let mut buf = vec![0u8; 256];
    let read = tokio::time::timeout(Duration::from_secs(10), logs.stream.read(&mut buf))
        .await
        .unwrap()
        .unwrap();
    assert!(read > 0);
    if let Some(cancel) = logs.cancel.take() {
        cancel().unwrap();
    }
    drop(logs);

    runtime.stop(&id).await.unwrap();
    assert_eq!(state_of(runtime, &id).await, Some(ContainerState::Exited));

    runtime.remove(&id, true).await.unwrap();
    assert_eq!(state_of(runtime, &id).await, None);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_start_unknown_container_fails() {
    let Some(runtime) = get_test_runtime().await else {
        return;
    };
    let missing = ContainerId::new("cdd-e2e-does-not-exist");
    assert!(runtime.start(&missing).await.is_err());
}
