use super::*;
use cdd_provider::ContainerState;

pub(super) fn draw_containers(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;

    if dashboard.containers().is_empty() {
        let empty = Paragraph::new("No containers found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(" Containers ").borders(Borders::ALL));

        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Image"),
        Cell::from("State"),
        Cell::from("Status"),
        Cell::from("Ports"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = dashboard
        .containers()
        .iter()
        .map(|container| {
            let color = state_color(container.state);
            let pending = if dashboard.actions().is_pending(&container.id) {
                " ..."
            } else {
                ""
            };

            Row::new(vec![
                Cell::from(format!("{}{}", container.name, pending))
                    .style(Style::default().fg(Color::Cyan)),
                Cell::from(container.image.as_str()),
                Cell::from(container.state.to_string().to_uppercase())
                    .style(Style::default().fg(color)),
                Cell::from(container.status.as_str()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(container.ports.join(", "))
                    .style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(25), // Name
        Constraint::Length(25), // Image
        Constraint::Length(11), // State
        Constraint::Length(22), // Status
        Constraint::Min(10),    // Ports
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Containers ").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(dashboard.selected_index());
    frame.render_stateful_widget(table, area, &mut state);
}

fn state_color(state: ContainerState) -> Color {
    match state {
        ContainerState::Running => Color::Green,
        ContainerState::Exited | ContainerState::Dead => Color::Red,
        ContainerState::Paused | ContainerState::Restarting => Color::Yellow,
        _ => Color::DarkGray,
    }
}
