//! Terminal front end for cdd
//!
//! A thin ratatui shell around [`cdd_core::Dashboard`]: crossterm keys are
//! mapped to logical keys, background updates are applied as they arrive and
//! the whole dashboard is redrawn after every event.

pub mod app;
mod event;
pub mod ui;
pub mod widgets;

pub use app::{map_key, App, AppError, AppResult};
pub use event::{Event, EventHandler};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;

/// Run the dashboard until the user quits
pub async fn run(mut app: App) -> AppResult<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
