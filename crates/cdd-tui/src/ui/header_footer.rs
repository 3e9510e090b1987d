use super::*;

/// Title plus the container count, and the refresh error if the last poll failed
pub(super) fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let count = dashboard.containers().len();

    let mut spans = Vec::new();
    if let Some(e) = dashboard.list_error() {
        spans.push(Span::styled(
            format!("Refresh failed: {}  ", e),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::styled(
        format!(
            "{} container{} found ",
            count,
            if count == 1 { "" } else { "s" }
        ),
        Style::default().fg(Color::DarkGray),
    ));

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .title(Span::styled(
                    " cdd - Container Dashboard ",
                    Style::default().fg(Color::Cyan).bold(),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

/// The single feedback line
pub(super) fn draw_message(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.dashboard.actions().message().current() else {
        return;
    };

    let line = Paragraph::new(format!(" {}", message.text))
        .style(Style::default().fg(severity_color(message.severity)));
    frame.render_widget(line, area);
}

/// Key bindings for the current mode
pub(super) fn usage_text(mode: Mode) -> &'static str {
    match mode {
        Mode::Normal => {
            "↑/↓ j/k: Navigate  i: Start  p: Stop  r: Restart  c: Create  l: Logs  e: Remove  q: Quit"
        }
        Mode::Creating => "Enter: Continue  Esc: Cancel  Type to edit",
        Mode::ViewingLogs => "Esc/q: Back",
        Mode::ConfirmingErase => "y: Yes  n/Esc: No",
    }
}

pub(super) fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = Paragraph::new(usage_text(app.dashboard.mode()))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
