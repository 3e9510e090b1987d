//! Main TUI application state and logic

use crate::event::{Event, EventHandler};
use crate::ui;
use cdd_config::GlobalConfig;
use cdd_core::{Dashboard, DashboardSettings, Key, UpdateReceiver};
use cdd_provider::ContainerRuntime;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] cdd_core::CoreError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Application state
pub struct App {
    /// Everything the user sees and controls
    pub dashboard: Dashboard,
    /// Results from the dashboard's background tasks
    updates: UpdateReceiver,
    tick_rate: Duration,
    /// Set by Ctrl+C, which skips the exit delay
    interrupted: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, updates: UpdateReceiver, tick_rate: Duration) -> Self {
        Self {
            dashboard,
            updates,
            tick_rate,
            interrupted: false,
        }
    }

    /// Build a dashboard around `runtime` using the configured tunables
    pub fn with_runtime(runtime: Arc<dyn ContainerRuntime>, config: &GlobalConfig) -> Self {
        let (dashboard, updates) = Dashboard::new(runtime, DashboardSettings::from(config));
        Self::new(dashboard, updates, config.ui.tick_rate())
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let mut events = EventHandler::new(self.tick_rate);
        self.dashboard.start();

        while !self.should_quit() {
            terminal.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                event = events.next() => match event {
                    Some(e) => self.handle_event(e),
                    None => break,
                },
                Some(update) = self.updates.recv() => {
                    self.dashboard.apply(update);
                    self.drain_updates();
                }
            }

            self.dashboard.tick(Instant::now());
        }

        self.dashboard.shutdown();
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.send_key(key.code, key.modifiers),
            // Timers are driven after every event
            Event::Tick | Event::Resize(_, _) => {}
        }
    }

    /// Feed one key press to the dashboard
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            tracing::info!("Interrupted");
            self.interrupted = true;
            return;
        }
        if let Some(key) = map_key(code, modifiers) {
            self.dashboard.handle_key(key);
        }
    }

    /// Apply every update that is already queued. Returns how many were applied.
    pub fn drain_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates.try_recv() {
            self.dashboard.apply(update);
            applied += 1;
        }
        applied
    }

    pub fn should_quit(&self) -> bool {
        self.interrupted || self.dashboard.should_quit()
    }
}

/// Translate a crossterm key into a dashboard key.
///
/// Chords with Ctrl or Alt have no binding.
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let key = match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_plain_keys() {
        assert_eq!(map_key(KeyCode::Up, KeyModifiers::NONE), Some(Key::Up));
        assert_eq!(map_key(KeyCode::Esc, KeyModifiers::NONE), Some(Key::Esc));
        assert_eq!(
            map_key(KeyCode::Char('Y'), KeyModifiers::SHIFT),
            Some(Key::Char('Y'))
        );
    }

    #[test]
    fn test_map_ignores_chords_and_unbound_keys() {
        assert_eq!(map_key(KeyCode::Char('r'), KeyModifiers::CONTROL), None);
        assert_eq!(map_key(KeyCode::Char('x'), KeyModifiers::ALT), None);
        assert_eq!(map_key(KeyCode::Tab, KeyModifiers::NONE), None);
        assert_eq!(map_key(KeyCode::F(1), KeyModifiers::NONE), None);
    }
}
