//! Rendering tests for the dashboard screens

mod helpers;

use cdd_config::GlobalConfig;
use cdd_provider::test_support::{mock_raw_stats, MockRuntime};
use cdd_provider::ProviderError;
use cdd_tui::App;
use crossterm::event::{KeyCode, KeyModifiers};
use helpers::{mock_with_three, render_app, settle, started_app};
use std::sync::Arc;

/// The list shows one row per container with its state
#[tokio::test(start_paused = true)]
async fn test_renders_container_rows() {
    let mock = mock_with_three();
    let app = started_app(&mock).await;

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("cdd - Container Dashboard"));
    assert!(screen.contains("3 containers found"));
    assert!(screen.contains("web"));
    assert!(screen.contains("db"));
    assert!(screen.contains("cache"));
    assert!(screen.contains("RUNNING"));
    assert!(screen.contains("EXITED"));
    assert!(screen.contains("alpine:latest"));
}

/// An empty runtime renders the placeholder
#[tokio::test(start_paused = true)]
async fn test_renders_empty_list() {
    let mock = Arc::new(MockRuntime::new());
    let app = started_app(&mock).await;

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("No containers found"));
    assert!(screen.contains("0 containers found"));
}

/// Before the first poll lands nothing is selected and nothing panics
#[test]
fn test_renders_before_start() {
    let mock = Arc::new(MockRuntime::new());
    let app = App::with_runtime(mock, &GlobalConfig::default());

    let screen = render_app(&app, 80, 20);
    assert!(screen.contains("No containers found"));
    assert!(screen.contains("No stats: container not running"));
}

/// A failed refresh is reported while the previous rows stay visible
#[tokio::test(start_paused = true)]
async fn test_renders_refresh_error() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    *mock.list_result.lock().unwrap() = Err(ProviderError::ConnectionError("daemon gone".into()));
    tokio::time::advance(std::time::Duration::from_millis(3000)).await;
    settle(&mut app).await;

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Refresh failed"));
    assert!(screen.contains("daemon gone"));
    assert!(screen.contains("web"));
}

/// The stats bar shows the selected container's usage
#[tokio::test(start_paused = true)]
async fn test_renders_stats_bar() {
    let mock = mock_with_three();
    mock.stats_queue
        .lock()
        .unwrap()
        .push_back(Ok(mock_raw_stats(50, 100, 1)));
    let mut app = started_app(&mock).await;
    settle(&mut app).await;

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("CPU: ▓▓▓▓▓░░░░░ 50.00%"));
    assert!(screen.contains("(64.0 MiB / 1.0 GiB)"));
}

/// Exited containers are not sampled
#[tokio::test(start_paused = true)]
async fn test_stats_bar_for_exited_container() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('j'), KeyModifiers::NONE);
    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("No stats: container not running"));
}

/// Rejected actions show a warning in the feedback line
#[tokio::test(start_paused = true)]
async fn test_renders_feedback_message() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('i'), KeyModifiers::NONE);
    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Container is already running."));
}

/// The usage menu follows the mode
#[tokio::test(start_paused = true)]
async fn test_usage_menu_per_mode() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("i: Start"));
    assert!(screen.contains("q: Quit"));

    app.send_key(KeyCode::Char('c'), KeyModifiers::NONE);
    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Enter: Continue  Esc: Cancel"));
}

/// The creation prompt shows the step, label and typed value
#[tokio::test(start_paused = true)]
async fn test_renders_creation_prompt() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('c'), KeyModifiers::NONE);
    for c in "redis".chars() {
        app.send_key(KeyCode::Char(c), KeyModifiers::NONE);
    }

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Create Container"));
    assert!(screen.contains("Step 1/4: Image"));
    assert!(screen.contains("Name of the image to create"));
    assert!(screen.contains("redis_"));
    assert!(screen.contains("Press Enter to continue, Escape to cancel"));
}

/// Database images get a reminder about required environment variables
#[tokio::test(start_paused = true)]
async fn test_renders_database_env_warning() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('c'), KeyModifiers::NONE);
    for c in "postgres:16".chars() {
        app.send_key(KeyCode::Char(c), KeyModifiers::NONE);
    }
    for _ in 0..3 {
        app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    }

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("Step 4/4: Env"));
    assert!(screen.contains("Warning: This image usually requires"));
}
