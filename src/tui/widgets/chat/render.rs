use ratatui::text::{Line, Span};

use crate::core::{Message, Role};
use crate::ui::markdown::MarkdownView;
use crate::ui::theme::{Glyphs, Theme};

pub fn render_message(message: &Message, width: u16, streaming: bool) -> Vec<Line<'static>> {
    match message.role {
        Role::User => render_user(&message.content, width),
        Role::Assistant => render_assistant(&message.content, width, streaming),
    }
}

/// Placeholder shown while the first chunk of a reply is awaited.
pub fn render_pending() -> Vec<Line<'static>> {
    vec![Line::from(vec![
        Span::styled(Glyphs::ASSISTANT_PREFIX, Theme::assistant()),
        Span::styled(Glyphs::CURSOR, Theme::primary()),
    ])]
}

fn render_user(text: &str, width: u16) -> Vec<Line<'static>> {
    let available_width = (width as usize).saturating_sub(Glyphs::USER_PREFIX.len() + 1);

    text.lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, available_width.max(1))
                    .into_iter()
                    .map(|w| w.into_owned())
                    .collect()
            }
        })
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 {
                Glyphs::USER_PREFIX
            } else {
                Glyphs::CONTINUATION
            };
            Line::from(vec![
                Span::styled(prefix, Theme::user()),
                Span::styled(line, Theme::user()),
            ])
        })
        .collect()
}

fn render_assistant(text: &str, width: u16, streaming: bool) -> Vec<Line<'static>> {
    let body_width = (width as usize).saturating_sub(Glyphs::ASSISTANT_PREFIX.chars().count());

    let body = MarkdownView::new(text)
        .width(body_width)
        .render_to_lines()
        .unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Falling back to plain text");
            render_plaintext(text, body_width)
        });

    let mut lines = add_prefix(body);

    if streaming {
        append_cursor(&mut lines);
    }

    lines
}

fn render_plaintext(text: &str, width: usize) -> Vec<Line<'static>> {
    textwrap::wrap(text, width.max(1))
        .into_iter()
        .map(|line| Line::from(line.into_owned()))
        .collect()
}

fn add_prefix(lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 {
                Glyphs::ASSISTANT_PREFIX
            } else {
                Glyphs::CONTINUATION
            };
            let mut spans = vec![Span::styled(prefix, Theme::assistant())];
            spans.extend(
                line.spans
                    .into_iter()
                    .map(|span| {
                        let style = Theme::assistant().patch(span.style);
                        span.style(style)
                    }),
            );
            Line::from(spans)
        })
        .collect()
}

fn append_cursor(lines: &mut Vec<Line<'static>>) {
    let cursor = Span::styled(Glyphs::CURSOR, Theme::primary());

    match lines.last_mut() {
        Some(last) => last.spans.push(cursor),
        None => lines.extend(render_pending()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn user_message_has_prefix() {
        let lines = render_message(&Message::user("Hello"), 80, false);
        assert_eq!(lines.len(), 1);
        assert_eq!(text_of(&lines[0]), "> Hello");
    }

    #[test]
    fn multiline_user_message_keeps_blank_lines() {
        let lines = render_message(&Message::user("a\n\nb"), 80, false);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, ["> a", "  ", "  b"]);
    }

    #[test]
    fn assistant_message_has_bullet_prefix() {
        let lines = render_message(&Message::assistant("Hi **there**"), 80, false);
        assert_eq!(text_of(&lines[0]), "● Hi there");
    }

    #[test]
    fn streaming_reply_shows_cursor() {
        let lines = render_message(&Message::assistant("Partial"), 80, true);
        let last = lines.last().expect("lines");
        assert!(last.spans.iter().any(|s| s.content == Glyphs::CURSOR));
    }

    #[test]
    fn empty_streaming_reply_shows_cursor() {
        let lines = render_message(&Message::assistant(""), 80, true);
        assert_eq!(text_of(&lines[0]), format!("● {}", Glyphs::CURSOR));
    }

    #[test]
    fn settled_reply_has_no_cursor() {
        let lines = render_message(&Message::assistant("Done"), 80, false);
        assert!(
            lines
                .iter()
                .all(|l| l.spans.iter().all(|s| s.content != Glyphs::CURSOR))
        );
    }

    #[test]
    fn error_notice_after_partial_text_is_rendered() {
        let msg = Message::assistant("Recursion is\n\nError: Stream error: reset");
        let lines = render_message(&msg, 80, false);
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts.first().map(String::as_str), Some("● Recursion is"));
        assert!(texts.last().is_some_and(|t| t.contains("Error: Stream error: reset")));
    }
}
