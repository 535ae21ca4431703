use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::tui::widgets::InputWidget;

pub struct LayoutAreas {
    pub header: Rect,
    pub chat: Rect,
    pub input: Rect,
    pub status: Rect,
}

/// Splits the screen; the input box grows with its content up to
/// [`InputWidget::MAX_VISIBLE_LINES`], plus one row for its separator.
#[must_use]
pub fn calculate_layout(area: Rect, input_lines: usize) -> LayoutAreas {
    let input_height = input_lines.clamp(1, InputWidget::MAX_VISIBLE_LINES) as u16 + 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(area);

    LayoutAreas {
        header: chunks[0],
        chat: chunks[1],
        input: chunks[2],
        status: chunks[3],
    }
}
