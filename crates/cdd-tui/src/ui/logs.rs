use super::*;
use ansi_to_tui::IntoText;

pub(super) fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let logs = dashboard.logs();

    let name = logs
        .source()
        .map(|id| {
            dashboard
                .containers()
                .iter()
                .find(|c| &c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.short().to_string())
        })
        .unwrap_or_else(|| "Container".to_string());

    let window = logs.window();
    let text: Vec<Line> = if window.is_empty() {
        vec![Line::from(Span::styled(
            "No logs...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        window.into_iter().map(log_line).collect()
    };

    let panel = Paragraph::new(text).block(
        Block::default()
            .title(format!(" {} logs, press Esc to exit ", name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    frame.render_widget(panel, area);
}

/// Keep the colors a container writes, falling back to the raw text
fn log_line(raw: &str) -> Line<'static> {
    match raw.into_text() {
        Ok(text) => text
            .lines
            .into_iter()
            .next()
            .unwrap_or_else(|| Line::from("")),
        Err(_) => Line::from(raw.to_string()),
    }
}
