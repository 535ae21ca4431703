use markdown::mdast::Node;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use textwrap::core::{Fragment, display_width};
use textwrap::wrap_algorithms::wrap_first_fit;

use crate::ui::theme::Theme;

/// Flattens inline nodes into styled spans. Hard breaks start a new segment.
pub fn collect_segments(nodes: &[Node], base: Style) -> Vec<Vec<Span<'static>>> {
    let mut segments = vec![Vec::new()];
    push_inline(nodes, base, &mut segments);
    segments
}

fn push_inline(nodes: &[Node], style: Style, segments: &mut Vec<Vec<Span<'static>>>) {
    for node in nodes {
        match node {
            Node::Text(text) => push_span(segments, text.value.clone(), style),
            Node::InlineCode(code) => push_span(segments, code.value.clone(), style.patch(Theme::code())),
            Node::Strong(strong) => {
                push_inline(&strong.children, style.add_modifier(Modifier::BOLD), segments);
            }
            Node::Emphasis(em) => {
                push_inline(&em.children, style.add_modifier(Modifier::ITALIC), segments);
            }
            Node::Delete(del) => {
                push_inline(&del.children, style.add_modifier(Modifier::CROSSED_OUT), segments);
            }
            Node::Link(link) => {
                push_inline(&link.children, style.add_modifier(Modifier::UNDERLINED), segments);
            }
            Node::Image(image) => push_span(segments, format!("[{}]", image.alt), Theme::muted()),
            Node::Html(html) => push_span(segments, html.value.clone(), Theme::muted()),
            Node::Break(_) => segments.push(Vec::new()),
            _ => {}
        }
    }
}

fn push_span(segments: &mut [Vec<Span<'static>>], text: String, style: Style) {
    if let Some(current) = segments.last_mut() {
        current.push(Span::styled(text, style));
    }
}

#[derive(Debug)]
struct Word {
    text: String,
    style: Style,
    space_after: bool,
}

impl Fragment for Word {
    fn width(&self) -> f64 {
        display_width(&self.text) as f64
    }

    fn whitespace_width(&self) -> f64 {
        if self.space_after { 1.0 } else { 0.0 }
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

fn split_words(spans: &[Span<'static>]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();

    for span in spans {
        let mut rest = span.content.as_ref();
        loop {
            let trimmed = rest.trim_start();
            if trimmed.len() != rest.len()
                && let Some(previous) = words.last_mut()
            {
                previous.space_after = true;
            }
            if trimmed.is_empty() {
                break;
            }

            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            words.push(Word {
                text: trimmed[..end].to_string(),
                style: span.style,
                space_after: false,
            });
            rest = &trimmed[end..];
        }
    }

    words
}

/// Greedy word wrap that keeps each word's style. Soft line breaks inside
/// the spans count as ordinary whitespace.
pub fn wrap_spans(spans: &[Span<'static>], width: usize) -> Vec<Line<'static>> {
    let words = split_words(spans);
    if words.is_empty() {
        return Vec::new();
    }

    wrap_first_fit(&words, &[width.max(1) as f64])
        .into_iter()
        .map(|line_words| {
            let mut out = Vec::with_capacity(line_words.len() * 2);
            for (i, word) in line_words.iter().enumerate() {
                out.push(Span::styled(word.text.clone(), word.style));
                if word.space_after && i + 1 < line_words.len() {
                    out.push(Span::raw(" "));
                }
            }
            Line::from(out)
        })
        .collect()
}
