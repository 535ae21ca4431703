mod action;
mod key_handler;
mod render;

pub use action::InputAction;

use crate::ui::theme::Theme;
use ratatui::style::Style;
use tui_textarea::TextArea;

/// Multi-line editor backing the pending input.
pub struct InputWidget<'a> {
    textarea: TextArea<'a>,
}

impl InputWidget<'_> {
    pub const MAX_VISIBLE_LINES: usize = 6;

    #[must_use]
    pub fn new() -> Self {
        Self {
            textarea: Self::create_textarea(),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn clear(&mut self) {
        self.textarea = Self::create_textarea();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(String::is_empty)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.textarea.lines().len()
    }

    fn create_textarea() -> TextArea<'static> {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text("Ask a question");
        textarea.set_placeholder_style(Theme::muted());
        textarea.set_cursor_line_style(Style::default());
        textarea.set_cursor_style(Theme::user().add_modifier(ratatui::style::Modifier::REVERSED));
        textarea.set_style(Theme::user());
        textarea
    }
}

impl Default for InputWidget<'_> {
    fn default() -> Self {
        Self::new()
    }
}
