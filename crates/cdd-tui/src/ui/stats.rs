use super::*;

const BAR_CELLS: usize = 10;

pub(super) fn draw_stats_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let view = dashboard.stats();
    let dim = Style::default().fg(Color::DarkGray);

    let line = match (dashboard.stats_target(), &view.snapshot) {
        (None, _) => Line::from(Span::styled(" No stats: container not running", dim)),
        (Some(_), None) => match &view.error {
            Some(e) => Line::from(Span::styled(
                format!(" Stats unavailable: {}", e),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled(" Sampling...", dim)),
        },
        (Some(_), Some(s)) => {
            let mut spans = vec![Span::raw(" CPU: ")];
            spans.extend(usage_spans(s.cpu_percent));
            spans.push(Span::raw("   MEM: "));
            spans.extend(usage_spans(s.mem_percent));
            spans.push(Span::styled(
                format!(
                    " ({} / {})",
                    format_bytes(s.mem_usage),
                    format_bytes(s.mem_limit)
                ),
                dim,
            ));
            spans.push(Span::raw(format!(
                "   NET: rx {} tx {}",
                format_bytes(s.net_io.rx),
                format_bytes(s.net_io.tx)
            )));
            if view.error.is_some() {
                spans.push(Span::styled(
                    "  (last sample failed)",
                    Style::default().fg(Color::Red),
                ));
            }
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn usage_spans(percent: f64) -> [Span<'static>; 2] {
    let style = Style::default().fg(usage_color(percent));
    [
        Span::styled(usage_bar(percent), style),
        Span::styled(format!(" {:.2}%", percent), style),
    ]
}

fn usage_color(percent: f64) -> Color {
    if percent < 50.0 {
        Color::Green
    } else if percent < 80.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Ten-cell bar, one filled cell per 10%
pub fn usage_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 10.0).round() as usize).min(BAR_CELLS);
    format!("{}{}", "▓".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

/// Human readable binary size, e.g. `64.0 MiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_bar() {
        assert_eq!(usage_bar(0.0), "░░░░░░░░░░");
        assert_eq!(usage_bar(34.0), "▓▓▓░░░░░░░");
        assert_eq!(usage_bar(35.0), "▓▓▓▓░░░░░░");
        // Multi-core containers can exceed 100%
        assert_eq!(usage_bar(250.0), "▓▓▓▓▓▓▓▓▓▓");
        assert_eq!(usage_bar(-5.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(64 * 1024 * 1024), "64.0 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.0 GiB");
    }

    #[test]
    fn test_usage_color_thresholds() {
        assert_eq!(usage_color(49.9), Color::Green);
        assert_eq!(usage_color(50.0), Color::Yellow);
        assert_eq!(usage_color(80.0), Color::Red);
    }
}
