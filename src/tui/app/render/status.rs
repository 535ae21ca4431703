use crate::core::CoordinatorStatus;
use crate::tui::state::{AppState, NoticeLevel};
use crate::ui::theme::{Spinners, Theme};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::time::Duration;

const HINTS: &str = "/help commands | Shift+Enter newline | PgUp/PgDn scroll";

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs > 0 {
        format!("{secs}s")
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}

fn activity_label(status: CoordinatorStatus) -> &'static str {
    match status {
        CoordinatorStatus::Submitting => "Thinking",
        CoordinatorStatus::Streaming => "Answering",
        CoordinatorStatus::Idle => "",
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let left_line = Line::from(vec![Span::raw(" "), Span::styled(HINTS, Theme::muted())]);
    let left_width = left_line.width() as u16;
    frame
        .buffer_mut()
        .set_line(area.x, area.y, &left_line, left_width.min(area.width));

    let right = if let Some(notice) = &state.notice {
        let style = match notice.level {
            NoticeLevel::Info => Theme::primary(),
            NoticeLevel::Warning => Theme::warning(),
        };
        Some((notice.text.clone(), style))
    } else if state.is_in_flight() {
        let frames = Spinners::BRAILLE;
        let spinner = frames[state.spinner_frame % frames.len()];
        let elapsed = state
            .elapsed()
            .map(|d| format!(" {}", format_elapsed(d)))
            .unwrap_or_default();
        Some((
            format!("{spinner} {}{elapsed}", activity_label(state.status)),
            Theme::warning(),
        ))
    } else {
        None
    };

    if let Some((text, style)) = right {
        render_right(frame, area, text, style);
    }
}

fn render_right(frame: &mut Frame, area: Rect, text: String, style: Style) {
    let line = Line::from(vec![Span::styled(text, style), Span::raw(" ")]);
    let width = (line.width() as u16).min(area.width);
    let x = area.x + area.width.saturating_sub(width);
    frame.buffer_mut().set_line(x, area.y, &line, width);
}
