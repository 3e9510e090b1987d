//! The dashboard owner: key routing by mode, update application and timers
//!
//! All state lives here and is only mutated from the task that owns the
//! `Dashboard`. Background work reports through the update channel returned by
//! [`Dashboard::new`], and the owner feeds each update back in with
//! [`Dashboard::apply`].

use crate::{
    update, Action, ActionDispatcher, ActionTimings, CreationWizard, EraseGate, LogLimits,
    LogStreamManager, PollingRefresher, SelectionController, Severity, StatsSampler, StatsView,
    StepOutcome, Update, UpdateReceiver,
};
use cdd_config::GlobalConfig;
use cdd_provider::{ContainerRuntime, ContainerSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Renderer-independent key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    Char(char),
}

/// Which component receives input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Creating,
    ViewingLogs,
    ConfirmingErase,
}

/// Tunables, usually taken from the global config
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub list_interval: Duration,
    pub stats_interval: Duration,
    pub exit_delay: Duration,
    pub timings: ActionTimings,
    pub logs: LogLimits,
    pub database_images: Vec<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from(&GlobalConfig::default())
    }
}

impl From<&GlobalConfig> for DashboardSettings {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            list_interval: config.refresh.container_list(),
            stats_interval: config.refresh.container_stats(),
            exit_delay: config.ui.exit_delay(),
            timings: ActionTimings::from(config),
            logs: LogLimits::from(config),
            database_images: config.wizard.database_images.clone(),
        }
    }
}

pub struct Dashboard {
    settings: DashboardSettings,
    containers: Vec<ContainerSummary>,
    list_error: Option<String>,
    selection: SelectionController,
    refresher: PollingRefresher,
    sampler: StatsSampler,
    actions: ActionDispatcher,
    wizard: CreationWizard,
    logs: LogStreamManager,
    viewing_logs: bool,
    exit_at: Option<Instant>,
    should_quit: bool,
}

impl Dashboard {
    /// Build a dashboard around `runtime`. Nothing runs until [`Dashboard::start`].
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        settings: DashboardSettings,
    ) -> (Self, UpdateReceiver) {
        let (tx, rx) = update::channel();
        let dashboard = Self {
            containers: Vec::new(),
            list_error: None,
            selection: SelectionController::new(),
            refresher: PollingRefresher::new(runtime.clone(), tx.clone()),
            sampler: StatsSampler::new(runtime.clone(), tx.clone()),
            actions: ActionDispatcher::new(runtime.clone(), tx.clone(), settings.timings),
            wizard: CreationWizard::new(settings.database_images.clone()),
            logs: LogStreamManager::new(runtime, tx, settings.logs),
            viewing_logs: false,
            exit_at: None,
            should_quit: false,
            settings,
        };
        (dashboard, rx)
    }

    /// Begin polling the container list
    pub fn start(&mut self) {
        self.refresher.start(self.settings.list_interval);
    }

    /// Stop every background source
    pub fn shutdown(&mut self) {
        self.refresher.stop();
        self.sampler.stop();
        self.logs.close();
    }

    pub fn mode(&self) -> Mode {
        if self.wizard.is_active() {
            Mode::Creating
        } else if matches!(self.actions.erase_gate(), EraseGate::AwaitingConfirmation { .. }) {
            Mode::ConfirmingErase
        } else if self.viewing_logs {
            Mode::ViewingLogs
        } else {
            Mode::Normal
        }
    }

    /// Route one key according to the current mode
    pub fn handle_key(&mut self, key: Key) {
        if self.exit_at.is_some() {
            return;
        }

        match self.mode() {
            Mode::Creating => self.handle_creating_key(key),
            Mode::ConfirmingErase => self.handle_confirm_key(key),
            Mode::ViewingLogs => self.handle_logs_key(key),
            Mode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: Key) {
        match key {
            Key::Up | Key::Char('k') => {
                self.selection.up();
                self.sync_stats();
            }
            Key::Down | Key::Char('j') => {
                self.selection.down();
                self.sync_stats();
            }
            Key::Char('i') => self.dispatch_selected(Action::Start),
            Key::Char('p') => self.dispatch_selected(Action::Stop),
            Key::Char('r') => self.dispatch_selected(Action::Restart),
            Key::Char('e') => {
                if let Some(container) = self.selected_container().cloned() {
                    self.actions.request_erase(&container);
                } else {
                    self.warn_no_selection();
                }
            }
            Key::Char('l') => {
                if let Some(id) = self.selected_container().map(|c| c.id.clone()) {
                    self.logs.open(&id);
                    self.viewing_logs = true;
                } else {
                    self.warn_no_selection();
                }
            }
            Key::Char('c') => self.wizard.open(),
            Key::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn handle_creating_key(&mut self, key: Key) {
        match key {
            Key::Esc => self.wizard.cancel(),
            Key::Enter => {
                if let StepOutcome::Submitted(request) = self.wizard.next_step() {
                    self.actions.create(&request);
                }
            }
            Key::Backspace => self.wizard.current_field_mut().backspace(),
            Key::Left => self.wizard.current_field_mut().move_left(),
            Key::Right => self.wizard.current_field_mut().move_right(),
            Key::Char(c) => self.wizard.current_field_mut().insert(c),
            Key::Up | Key::Down => {}
        }
    }

    fn handle_confirm_key(&mut self, key: Key) {
        match key {
            Key::Char('y') | Key::Char('Y') => {
                self.actions.confirm_erase(&self.containers);
            }
            Key::Char('n') | Key::Char('N') | Key::Esc => self.actions.cancel_erase(),
            _ => {}
        }
    }

    fn handle_logs_key(&mut self, key: Key) {
        if matches!(key, Key::Esc | Key::Char('q')) {
            self.logs.close();
            self.viewing_logs = false;
        }
    }

    fn dispatch_selected(&mut self, action: Action) {
        match self.selected_container().cloned() {
            Some(container) => {
                self.actions
                    .dispatch(&container, action, action.default_precondition());
            }
            None => self.warn_no_selection(),
        }
    }

    fn warn_no_selection(&mut self) {
        let short = self.settings.timings.short;
        self.actions
            .notify("No container selected.", Severity::Warning, Some(short));
    }

    fn quit(&mut self) {
        tracing::info!("Quit requested");
        self.actions.notify("Exiting...", Severity::Info, None);
        self.exit_at = Some(Instant::now() + self.settings.exit_delay);
    }

    /// Apply one background result
    pub fn apply(&mut self, update: Update) {
        match update {
            Update::Containers { generation, result } => {
                if !self.refresher.accepts(generation) {
                    return;
                }
                match result {
                    Ok(containers) => {
                        self.containers = containers;
                        self.list_error = None;
                        self.selection.on_list_replaced(self.containers.len());
                        self.actions.revalidate_erase(&self.containers);
                        self.sync_stats();
                    }
                    Err(e) => self.list_error = Some(e.to_string()),
                }
            }
            Update::Stats {
                generation,
                id,
                result,
            } => {
                self.sampler.apply(generation, &id, result);
            }
            Update::ActionFinished {
                id,
                name,
                action,
                result,
            } => {
                if self.actions.complete(&id, &name, action, result) {
                    self.refresher.refresh_now();
                }
            }
            Update::Created { image, result } => {
                if self.actions.complete_create(&image, result) {
                    self.refresher.refresh_now();
                }
            }
            Update::Log { generation, event } => {
                self.logs.apply(generation, event);
            }
        }
    }

    /// Sample stats only for the selected container, and only while it runs
    fn sync_stats(&mut self) {
        let wanted = self
            .selected_container()
            .filter(|c| c.is_running())
            .map(|c| c.id.clone());

        match wanted {
            Some(id) if self.sampler.target() != Some(&id) => {
                self.sampler.start(id, self.settings.stats_interval);
            }
            Some(_) => {}
            None if self.sampler.target().is_some() => self.sampler.stop(),
            None => {}
        }
    }

    /// Expire messages and finish a pending quit
    pub fn tick(&mut self, now: Instant) {
        self.actions.tick(now);
        if matches!(self.exit_at, Some(at) if now >= at) {
            self.should_quit = true;
        }
    }

    pub fn containers(&self) -> &[ContainerSummary] {
        &self.containers
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selected_container(&self) -> Option<&ContainerSummary> {
        self.selection.selected().and_then(|i| self.containers.get(i))
    }

    pub fn list_error(&self) -> Option<&str> {
        self.list_error.as_deref()
    }

    pub fn stats(&self) -> &StatsView {
        self.sampler.view()
    }

    pub fn stats_target(&self) -> Option<&cdd_provider::ContainerId> {
        self.sampler.target()
    }

    pub fn actions(&self) -> &ActionDispatcher {
        &self.actions
    }

    pub fn wizard(&self) -> &CreationWizard {
        &self.wizard
    }

    pub fn logs(&self) -> &LogStreamManager {
        &self.logs
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_exiting(&self) -> bool {
        self.exit_at.is_some()
    }
}
