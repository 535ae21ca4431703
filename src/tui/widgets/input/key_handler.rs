use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{InputAction, InputWidget};

impl InputWidget<'_> {
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, m) if m.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
                self.textarea.insert_newline();
                InputAction::Continue
            }
            (KeyCode::Enter, _) => {
                if self.text().trim().is_empty() {
                    InputAction::Continue
                } else {
                    InputAction::Submit(self.text())
                }
            }

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear();
                InputAction::Clear
            }

            _ => {
                self.textarea.input(key);
                InputAction::Continue
            }
        }
    }

    pub fn handle_paste(&mut self, text: &str) -> InputAction {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        for (i, line) in normalized.split('\n').enumerate() {
            if i > 0 {
                self.textarea.insert_newline();
            }
            for ch in line.chars() {
                self.textarea.insert_char(ch);
            }
        }

        InputAction::Continue
    }
}
