use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use super::InputWidget;
use crate::ui::theme::{Glyphs, Theme};

const HINT_TEXT: &str = "↵ send";
const HINT_WIDTH: u16 = 8;

impl InputWidget<'_> {
    pub fn render(&mut self, area: Rect, frame: &mut Frame) {
        if area.height == 0 {
            return;
        }

        Self::render_separator(area, frame.buffer_mut());

        let input_area = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        };
        if input_area.height == 0 {
            return;
        }

        Paragraph::new(Line::from(Span::styled(Glyphs::USER_PREFIX, Theme::user()))).render(
            Rect {
                width: input_area.width.min(2),
                height: 1,
                ..input_area
            },
            frame.buffer_mut(),
        );

        if !self.is_empty() && input_area.width > HINT_WIDTH + 4 {
            Paragraph::new(Line::from(Span::styled(HINT_TEXT, Theme::muted()))).render(
                Rect {
                    x: input_area.x + input_area.width - HINT_WIDTH,
                    width: HINT_WIDTH,
                    height: 1,
                    ..input_area
                },
                frame.buffer_mut(),
            );
        }

        frame.render_widget(&self.textarea, Self::textarea_area(input_area));
    }

    fn render_separator(area: Rect, buf: &mut Buffer) {
        let line = Line::from(Span::styled(
            Glyphs::RULE.repeat(area.width as usize),
            Theme::border(),
        ));
        Paragraph::new(line).render(Rect { height: 1, ..area }, buf);
    }

    fn textarea_area(input_area: Rect) -> Rect {
        Rect {
            x: input_area.x + 2,
            width: input_area.width.saturating_sub(2 + HINT_WIDTH),
            ..input_area
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textarea_area_leaves_room_for_prefix_and_hint() {
        let input_area = Rect::new(0, 1, 80, 3);
        let textarea = InputWidget::textarea_area(input_area);

        assert_eq!(textarea.x, 2);
        assert_eq!(textarea.width, 80 - 2 - HINT_WIDTH);
        assert_eq!(textarea.height, 3);
    }
}
