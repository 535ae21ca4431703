use markdown::mdast::{Blockquote, Code, Heading, List, Node};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use textwrap::core::display_width;

use crate::ui::theme::{Glyphs, Theme};

use super::context::RenderContext;
use super::inline::{collect_segments, wrap_spans};

const MAX_RULE_WIDTH: usize = 40;

/// Renders sibling blocks, separated by a blank line unless `ctx` is tight.
pub fn render_blocks(nodes: &[Node], ctx: RenderContext) -> Vec<Line<'static>> {
    let mut out = Vec::new();

    for node in nodes {
        let lines = render_block(node, ctx);
        if lines.is_empty() {
            continue;
        }
        if !out.is_empty() && !ctx.tight {
            out.push(Line::default());
        }
        out.extend(lines);
    }

    out
}

fn render_block(node: &Node, ctx: RenderContext) -> Vec<Line<'static>> {
    match node {
        Node::Root(root) => render_blocks(&root.children, ctx),
        Node::Heading(heading) => render_heading(heading, ctx),
        Node::Paragraph(para) => render_inline_block(&para.children, Style::default(), ctx),
        Node::List(list) => render_list(list, ctx),
        Node::Code(code) => render_code(code),
        Node::Blockquote(quote) => render_quote(quote, ctx),
        Node::ThematicBreak(_) => vec![Line::from(Span::styled(
            Glyphs::RULE.repeat(ctx.width.min(MAX_RULE_WIDTH)),
            Theme::border(),
        ))],
        Node::Html(html) => html
            .value
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Theme::muted())))
            .collect(),
        _ => Vec::new(),
    }
}

fn render_heading(heading: &Heading, ctx: RenderContext) -> Vec<Line<'static>> {
    let style = match heading.depth {
        1 | 2 => Theme::primary_bold(),
        _ => Style::new().add_modifier(Modifier::BOLD),
    };
    render_inline_block(&heading.children, style, ctx)
}

fn render_inline_block(children: &[Node], base: Style, ctx: RenderContext) -> Vec<Line<'static>> {
    collect_segments(children, base)
        .iter()
        .flat_map(|segment| wrap_spans(segment, ctx.width))
        .collect()
}

fn render_list(list: &List, ctx: RenderContext) -> Vec<Line<'static>> {
    let start = list.start.unwrap_or(1) as usize;
    let markers: Vec<String> = (0..list.children.len())
        .map(|i| {
            if list.ordered {
                format!("{}. ", start + i)
            } else {
                format!("{} ", Glyphs::BULLET)
            }
        })
        .collect();
    let marker_width = markers.iter().map(|m| display_width(m)).max().unwrap_or(0);
    let item_ctx = ctx.narrowed(marker_width).with_tight(!list.spread);

    let mut out = Vec::new();
    for (child, marker) in list.children.iter().zip(&markers) {
        let Node::ListItem(item) = child else {
            continue;
        };

        if !out.is_empty() && list.spread {
            out.push(Line::default());
        }

        let padding = marker_width.saturating_sub(display_width(marker));
        let body = render_blocks(&item.children, item_ctx);
        out.extend(prefix_lines(
            body,
            &Span::styled(format!("{marker}{}", " ".repeat(padding)), Theme::primary()),
            &Span::raw(" ".repeat(marker_width)),
        ));
    }

    out
}

fn render_code(code: &Code) -> Vec<Line<'static>> {
    let header = match code.lang.as_deref() {
        Some(lang) if !lang.is_empty() => format!("{} {lang}", Glyphs::CODE_OPEN),
        _ => Glyphs::CODE_OPEN.to_string(),
    };

    let mut lines = Vec::with_capacity(code.value.lines().count() + 2);
    lines.push(Line::from(Span::styled(header, Theme::border())));
    lines.extend(code.value.lines().map(|line| {
        Line::from(vec![
            Span::styled(format!("{} ", Glyphs::CODE_LINE), Theme::border()),
            Span::styled(line.to_string(), Theme::code()),
        ])
    }));
    lines.push(Line::from(Span::styled(Glyphs::CODE_CLOSE, Theme::border())));
    lines
}

fn render_quote(quote: &Blockquote, ctx: RenderContext) -> Vec<Line<'static>> {
    let bar_width = display_width(Glyphs::QUOTE_BAR);
    let body = render_blocks(&quote.children, ctx.narrowed(bar_width))
        .into_iter()
        .map(|line| {
            Line::from(
                line.spans
                    .into_iter()
                    .map(|span| {
                        let style = Theme::quote().patch(span.style);
                        span.style(style)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let bar = Span::styled(Glyphs::QUOTE_BAR, Theme::border());
    prefix_lines(body, &bar, &bar)
}

/// Prepends `first` to the first line and `rest` to every other line. An
/// empty body still yields the `first` prefix so list markers stay visible
/// while an item is being typed out.
fn prefix_lines(
    lines: Vec<Line<'static>>,
    first: &Span<'static>,
    rest: &Span<'static>,
) -> Vec<Line<'static>> {
    if lines.is_empty() {
        return vec![Line::from(first.clone())];
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 { first.clone() } else { rest.clone() };
            let mut spans = Vec::with_capacity(line.spans.len() + 1);
            spans.push(prefix);
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}
