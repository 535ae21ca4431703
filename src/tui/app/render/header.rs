use crate::ui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render_header(frame: &mut Frame, area: Rect, endpoint: &str) {
    let title = format!("Tutor v{}", env!("CARGO_PKG_VERSION"));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Theme::border())
        .border_set(ratatui::symbols::border::ROUNDED);

    let lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(title, Theme::primary_bold()),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("Endpoint: {endpoint}"), Theme::muted()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
