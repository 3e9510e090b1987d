use cdd_config::GlobalConfig;
use cdd_provider::test_support::{mock_container, MockRuntime};
use cdd_provider::ContainerState;
use cdd_tui::App;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use std::time::Duration;

/// Mock runtime listing three containers: web (running), db (exited), cache (running)
#[allow(dead_code)]
pub fn mock_with_three() -> Arc<MockRuntime> {
    Arc::new(MockRuntime::with_containers(vec![
        mock_container("a1b2c3d4e5f6", "web", ContainerState::Running),
        mock_container("b1b2c3d4e5f6", "db", ContainerState::Exited),
        mock_container("c1b2c3d4e5f6", "cache", ContainerState::Running),
    ]))
}

/// App over `mock` with polling started and the first snapshot applied
#[allow(dead_code)]
pub async fn started_app(mock: &Arc<MockRuntime>) -> App {
    let mut app = App::with_runtime(mock.clone(), &GlobalConfig::default());
    app.dashboard.start();
    settle(&mut app).await;
    app
}

/// Let background tasks run, then apply whatever they produced
#[allow(dead_code)]
pub async fn settle(app: &mut App) -> usize {
    tokio::time::sleep(Duration::from_millis(10)).await;
    app.drain_updates()
}

/// Render the app to a TestBackend and capture output as a string
#[allow(dead_code)]
pub fn render_app(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| cdd_tui::ui::draw(frame, app))
        .unwrap();
    let buffer = terminal.backend().buffer().clone();
    buffer_to_string(&buffer)
}

/// Convert a ratatui buffer to a string representation
#[allow(dead_code)]
pub fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut output = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            let cell = buffer.get(x, y);
            output.push_str(cell.symbol());
        }
        output.push('\n');
    }
    output
}
