//! Reusable dialog builder widget
//!
//! Provides a builder pattern for creating modal dialogs with consistent styling.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Builder for creating modal dialogs
pub struct DialogBuilder<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    width: u16,
    border_color: Color,
    alignment: Alignment,
}

impl<'a> DialogBuilder<'a> {
    /// Create a new dialog builder with a title
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            width: 50,
            border_color: Color::Yellow,
            alignment: Alignment::Center,
        }
    }

    /// Set the dialog width
    pub fn width(mut self, w: u16) -> Self {
        self.width = w;
        self
    }

    /// Set the border color
    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Add a message line
    pub fn message(mut self, text: &'a str) -> Self {
        self.lines.push(Line::from(text));
        self
    }

    /// Add a styled message line
    pub fn styled_message(mut self, line: Line<'a>) -> Self {
        self.lines.push(line);
        self
    }

    /// Add an empty line for spacing
    pub fn empty_line(mut self) -> Self {
        self.lines.push(Line::from(""));
        self
    }

    /// Add help text at the bottom
    pub fn help(mut self, text: &'a str) -> Self {
        self.lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
        self
    }

    /// Rows needed once long lines wrap inside the borders
    fn height_for(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2).max(1) as usize;
        let rows: usize = self
            .lines
            .iter()
            .map(|line| line.width().max(1).div_ceil(inner))
            .sum();
        rows as u16 + 2
    }

    /// Render the dialog centered in the given area
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let width = self.width.min(area.width);
        let dialog_area = centered_rect(width, self.height_for(width), area);

        frame.render_widget(Clear, dialog_area);

        let dialog = Paragraph::new(self.lines)
            .alignment(self.alignment)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.border_color)),
            );

        frame.render_widget(dialog, dialog_area);
    }
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
