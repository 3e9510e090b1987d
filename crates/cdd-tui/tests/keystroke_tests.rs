//! Integration tests that exercise App key handling via send_key()

mod helpers;

use cdd_core::{Mode, WizardStep};
use cdd_provider::test_support::MockCall;
use cdd_provider::PortBinding;
use crossterm::event::{KeyCode, KeyModifiers};
use helpers::{mock_with_three, render_app, settle, started_app};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;

fn type_text(app: &mut cdd_tui::App, text: &str) {
    for c in text.chars() {
        app.send_key(KeyCode::Char(c), KeyModifiers::NONE);
    }
}

// ---------------------------------------------------------------------------
// Navigation tests
// ---------------------------------------------------------------------------

/// Pressing 'j' twice moves the selection down by two
#[tokio::test(start_paused = true)]
async fn test_j_moves_selection_down() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;
    assert_eq!(app.dashboard.selected_index(), Some(0));

    app.send_key(KeyCode::Char('j'), KeyModifiers::NONE);
    assert_eq!(app.dashboard.selected_index(), Some(1));

    app.send_key(KeyCode::Down, KeyModifiers::NONE);
    assert_eq!(app.dashboard.selected_index(), Some(2));
}

/// Pressing 'k' at the top wraps selection to the last item
#[tokio::test(start_paused = true)]
async fn test_k_wraps_selection_up() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('k'), KeyModifiers::NONE);
    assert_eq!(
        app.dashboard.selected_index(),
        Some(2),
        "k at position 0 should wrap to last item"
    );
}

// ---------------------------------------------------------------------------
// Quit tests
// ---------------------------------------------------------------------------

/// 'q' shows the exit message and only quits after the exit delay
#[tokio::test(start_paused = true)]
async fn test_q_quits_after_delay() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('q'), KeyModifiers::NONE);
    assert!(!app.should_quit());
    assert!(render_app(&app, 120, 30).contains("Exiting..."));

    tokio::time::advance(Duration::from_millis(500)).await;
    app.dashboard.tick(Instant::now());
    assert!(app.should_quit());
}

/// Ctrl+C quits without waiting
#[tokio::test(start_paused = true)]
async fn test_ctrl_c_quits_immediately() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(app.should_quit());
    // Not treated as the create binding
    assert_eq!(app.dashboard.mode(), Mode::Normal);
}

// ---------------------------------------------------------------------------
// Action tests
// ---------------------------------------------------------------------------

/// 'p' on a running container stops it and reports success
#[tokio::test(start_paused = true)]
async fn test_p_stops_selected_container() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('p'), KeyModifiers::NONE);
    assert!(render_app(&app, 120, 30).contains("Stopping container web..."));

    settle(&mut app).await;
    assert!(mock.was_called(&MockCall::Stop {
        id: "a1b2c3d4e5f6".into()
    }));
    assert!(render_app(&app, 120, 30).contains("Container web stopped."));
}

/// 'p' on an exited container is rejected without touching the runtime
#[tokio::test(start_paused = true)]
async fn test_p_on_exited_container_is_rejected() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('j'), KeyModifiers::NONE);
    app.send_key(KeyCode::Char('p'), KeyModifiers::NONE);
    settle(&mut app).await;

    assert_eq!(mock.count_calls(|c| matches!(c, MockCall::Stop { .. })), 0);
}

/// 'e' opens the confirmation and 'y' removes the container
#[tokio::test(start_paused = true)]
async fn test_erase_confirm_flow() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('j'), KeyModifiers::NONE);
    app.send_key(KeyCode::Char('e'), KeyModifiers::NONE);
    assert_eq!(app.dashboard.mode(), Mode::ConfirmingErase);
    assert!(render_app(&app, 120, 30).contains("Remove container 'db'?"));

    app.send_key(KeyCode::Char('y'), KeyModifiers::NONE);
    settle(&mut app).await;

    assert!(mock.was_called(&MockCall::Remove {
        id: "b1b2c3d4e5f6".into(),
        force: true
    }));
    assert_eq!(app.dashboard.mode(), Mode::Normal);
}

/// Esc backs out of the confirmation without removing anything
#[tokio::test(start_paused = true)]
async fn test_erase_escape_cancels() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('e'), KeyModifiers::NONE);
    app.send_key(KeyCode::Esc, KeyModifiers::NONE);
    settle(&mut app).await;

    assert_eq!(app.dashboard.mode(), Mode::Normal);
    assert_eq!(mock.count_calls(|c| matches!(c, MockCall::Remove { .. })), 0);
}

// ---------------------------------------------------------------------------
// Creation wizard tests
// ---------------------------------------------------------------------------

/// Walking every step creates the container exactly once
#[tokio::test(start_paused = true)]
async fn test_wizard_creates_container() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('c'), KeyModifiers::NONE);
    type_text(&mut app, "nginx");
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    type_text(&mut app, "edge");
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    type_text(&mut app, "8080:80");
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    settle(&mut app).await;

    let creates: Vec<MockCall> = mock
        .get_calls()
        .into_iter()
        .filter(|c| matches!(c, MockCall::Create { .. }))
        .collect();
    assert_eq!(creates.len(), 1);
    let MockCall::Create { image, options } = &creates[0] else {
        unreachable!()
    };
    assert_eq!(image, "nginx");
    assert_eq!(options.name.as_deref(), Some("edge"));
    assert_eq!(
        options.ports,
        vec![PortBinding {
            host_port: 8080,
            container_port: 80
        }]
    );
    assert!(options.env.is_empty());
    assert_eq!(app.dashboard.mode(), Mode::Normal);
}

/// Invalid ports keep the wizard on the ports step with an error
#[tokio::test(start_paused = true)]
async fn test_wizard_rejects_bad_ports() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('c'), KeyModifiers::NONE);
    type_text(&mut app, "nginx");
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    type_text(&mut app, "80");
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);

    assert_eq!(app.dashboard.wizard().step(), WizardStep::Ports);
    assert!(render_app(&app, 120, 30).contains("Port format must be host:container"));

    // Fix the input in place
    app.send_key(KeyCode::Backspace, KeyModifiers::NONE);
    app.send_key(KeyCode::Backspace, KeyModifiers::NONE);
    type_text(&mut app, "8080:80");
    app.send_key(KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(app.dashboard.wizard().step(), WizardStep::Env);
}

// ---------------------------------------------------------------------------
// Logs tests
// ---------------------------------------------------------------------------

/// 'l' opens the log panel, streamed lines render, Esc closes the stream
#[tokio::test(start_paused = true)]
async fn test_logs_panel_streams_lines() {
    let mock = mock_with_three();
    let mut app = started_app(&mock).await;

    app.send_key(KeyCode::Char('l'), KeyModifiers::NONE);
    assert_eq!(app.dashboard.mode(), Mode::ViewingLogs);
    assert!(render_app(&app, 120, 30).contains("No logs..."));

    settle(&mut app).await;
    let mut writer = mock.take_log_writer().unwrap();
    writer
        .write_all(b"listening on :80\n\x1b[31mwarn\x1b[0m slow request\n")
        .await
        .unwrap();
    settle(&mut app).await;

    let screen = render_app(&app, 120, 30);
    assert!(screen.contains("web logs, press Esc to exit"));
    assert!(screen.contains("listening on :80"));
    // Escape sequences are interpreted, not printed
    assert!(screen.contains("warn slow request"));
    assert!(!screen.contains("[31m"));

    app.send_key(KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(app.dashboard.mode(), Mode::Normal);
    assert_eq!(mock.cancels(), 1);
}
