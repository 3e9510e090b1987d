//! UI rendering for the TUI application

mod containers;
mod dialogs;
mod header_footer;
mod logs;
mod stats;

use crate::app::App;
use crate::widgets::{input_line, DialogBuilder};
use cdd_core::{Mode, Severity};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use containers::*;
use dialogs::*;
use header_footer::*;
use logs::*;
pub use stats::{format_bytes, usage_bar};
use stats::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();

    // Header, content, stats bar, feedback line, usage menu
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    let mode = app.dashboard.mode();
    match mode {
        Mode::ViewingLogs => draw_logs(frame, app, chunks[1]),
        _ => draw_containers(frame, app, chunks[1]),
    }

    draw_stats_bar(frame, app, chunks[2]);
    draw_message(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    match mode {
        Mode::Creating => draw_creation_prompt(frame, app, area),
        Mode::ConfirmingErase => draw_confirm_dialog(frame, app, area),
        Mode::Normal | Mode::ViewingLogs => {}
    }
}

/// Foreground color for a message of the given severity
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}
