use super::*;
use cdd_core::{EraseGate, WizardStep};

pub(super) fn draw_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let EraseGate::AwaitingConfirmation { name, .. } = app.dashboard.actions().erase_gate() else {
        return;
    };

    let message = format!("Remove container '{}'? This cannot be undone.", name);
    // +4 for border (2) + padding (2); minimum 50
    let width = (message.len() as u16 + 4).max(50);
    DialogBuilder::new("Confirm")
        .width(width)
        .border_color(Color::Red)
        .empty_line()
        .message(&message)
        .empty_line()
        .help("y: Yes  n/Esc: No")
        .render(frame, area);
}

fn step_label(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Image => "Name of the image to create (e.g., nginx:latest):",
        WizardStep::Name => "Name of the container (optional):",
        WizardStep::Ports => "Ports (optional, format 8080:80,443:443):",
        WizardStep::Env => "Environment variables (optional, format VAR1=val1,VAR2=val2):",
    }
}

pub(super) fn draw_creation_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let wizard = app.dashboard.wizard();
    let step = wizard.step();
    let field = wizard.field(step);

    // The image is the only required field
    let input_style = if step == WizardStep::Image && field.value().trim().is_empty() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let progress = format!(
        "Step {}/{}: {}",
        step.index() + 1,
        WizardStep::all().len(),
        step.label()
    );

    let mut dialog = DialogBuilder::new("Create Container")
        .width(area.width.saturating_sub(8).clamp(40, 90))
        .alignment(Alignment::Left)
        .styled_message(Line::from(Span::styled(
            progress,
            Style::default().fg(Color::DarkGray),
        )))
        .empty_line()
        .message(step_label(step))
        .styled_message(input_line(field, input_style));

    if let Some(message) = wizard.message() {
        dialog = dialog.empty_line().styled_message(Line::from(Span::styled(
            message.text.as_str(),
            Style::default().fg(severity_color(message.severity)),
        )));
    }

    dialog
        .empty_line()
        .help("Press Enter to continue, Escape to cancel")
        .render(frame, area);
}
