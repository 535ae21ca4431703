/// Width budget for a block and whether sibling blocks are packed together.
///
/// Nested blocks never indent themselves; the parent narrows the context
/// and prefixes the child's lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub width: usize,
    pub tight: bool,
}

impl RenderContext {
    const MIN_WIDTH: usize = 8;

    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(Self::MIN_WIDTH),
            tight: false,
        }
    }

    pub fn narrowed(self, by: usize) -> Self {
        Self {
            width: self.width.saturating_sub(by).max(Self::MIN_WIDTH),
            ..self
        }
    }

    pub const fn with_tight(self, tight: bool) -> Self {
        Self { tight, ..self }
    }
}
