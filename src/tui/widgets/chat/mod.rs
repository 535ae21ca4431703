mod follow;
mod render;

pub use follow::FollowScroll;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::core::Conversation;
use crate::ui::theme::Theme;

use render::{render_message, render_pending};

pub struct ChatWidget<'a> {
    conversation: &'a Conversation,
    in_flight: bool,
    scroll: &'a mut FollowScroll,
}

impl<'a> ChatWidget<'a> {
    #[must_use]
    pub const fn new(
        conversation: &'a Conversation,
        in_flight: bool,
        scroll: &'a mut FollowScroll,
    ) -> Self {
        Self {
            conversation,
            in_flight,
            scroll,
        }
    }

    pub fn render(self, area: Rect, buf: &mut Buffer) {
        if self.conversation.is_empty() {
            Self::render_empty_state(area, buf);
            return;
        }

        let content_width = area.width.saturating_sub(4);
        let lines = self.collect_lines(content_width);

        let visible = self.scroll.window(lines.len(), area.height as usize);
        for (row, line) in lines[visible].iter().enumerate() {
            buf.set_line(area.x + 2, area.y + row as u16, line, content_width);
        }

        if self.scroll.has_more_below() {
            Self::render_scroll_indicator(area, buf);
        }
    }

    fn collect_lines(&self, width: u16) -> Vec<Line<'static>> {
        let messages = self.conversation.messages();
        let last_index = messages.len().saturating_sub(1);
        let mut lines = Vec::new();

        for (idx, message) in messages.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::default());
            }
            let streaming = self.in_flight && idx == last_index && message.is_assistant();
            lines.extend(render_message(message, width, streaming));
        }

        if self.in_flight && messages.last().is_some_and(|m| m.is_user()) {
            lines.push(Line::default());
            lines.extend(render_pending());
        }

        lines
    }

    fn render_empty_state(area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("Start the conversation...", Theme::primary_bold()))
                .alignment(Alignment::Center),
            Line::from(""),
            Line::from(Span::styled(
                "Type a question below and press Enter. /help lists commands.",
                Theme::muted(),
            ))
            .alignment(Alignment::Center),
        ];

        Paragraph::new(lines).render(area, buf);
    }

    fn render_scroll_indicator(area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height == 0 {
            return;
        }

        let indicator_area = Rect {
            x: area.x + area.width - 10,
            y: area.y + area.height - 1,
            width: 10,
            height: 1,
        };

        Paragraph::new(Line::from(Span::styled("↓ More", Theme::warning())))
            .render(indicator_area, buf);
    }
}
