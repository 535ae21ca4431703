mod block;
mod context;
mod inline;

use markdown::{ParseOptions, to_mdast};
use ratatui::text::Line;
use thiserror::Error;

use block::render_blocks;
use context::RenderContext;

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("failed to parse markdown: {0}")]
    Parse(String),
}

/// Renders CommonMark into styled terminal lines of at most `width` columns.
#[derive(Debug, Clone)]
pub struct MarkdownView<'a> {
    source: &'a str,
    width: usize,
}

impl<'a> MarkdownView<'a> {
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self { source, width: 80 }
    }

    #[must_use]
    pub const fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn render_to_lines(&self) -> Result<Vec<Line<'static>>, MarkdownError> {
        let ast = to_mdast(self.source, &ParseOptions::default())
            .map_err(|e| MarkdownError::Parse(e.to_string()))?;

        let mut lines = render_blocks(std::slice::from_ref(&ast), RenderContext::new(self.width));
        while lines.last().is_some_and(|l| l.width() == 0) {
            lines.pop();
        }
        Ok(lines)
    }
}
