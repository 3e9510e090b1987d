//! Rendering for single-line text inputs

use cdd_core::InputField;
use ratatui::prelude::*;

/// Render `field` as one line with a visible block cursor.
///
/// The character under the cursor is shown reversed; at the end of the text
/// the cursor is drawn as `_`.
pub fn input_line(field: &InputField, style: Style) -> Line<'_> {
    let after = field.after_cursor();
    let mut chars = after.chars();

    let (under, rest) = match chars.next() {
        Some(c) => (c.to_string(), chars.as_str()),
        None => ("_".to_string(), ""),
    };

    Line::from(vec![
        Span::styled(field.before_cursor(), style),
        Span::styled(under, style.add_modifier(Modifier::REVERSED)),
        Span::styled(rest, style),
    ])
}
