use std::ops::Range;

/// Vertical scroll that sticks to the newest line until the user scrolls
/// away, and resumes following once they scroll back to the end.
#[derive(Debug, Clone, Default)]
pub struct FollowScroll {
    pinned_top: Option<usize>,
    max_top: usize,
}

impl FollowScroll {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pinned_top: None,
            max_top: 0,
        }
    }

    #[must_use]
    pub const fn is_following(&self) -> bool {
        self.pinned_top.is_none()
    }

    const fn top(&self) -> usize {
        match self.pinned_top {
            Some(top) if top < self.max_top => top,
            _ => self.max_top,
        }
    }

    pub const fn scroll_up(&mut self, lines: usize) {
        self.pinned_top = Some(self.top().saturating_sub(lines));
    }

    pub const fn scroll_down(&mut self, lines: usize) {
        let top = self.top().saturating_add(lines);
        self.pinned_top = if top >= self.max_top { None } else { Some(top) };
    }

    pub const fn follow(&mut self) {
        self.pinned_top = None;
    }

    /// Lines of a `total`-line transcript visible in a `viewport`-line area.
    pub fn window(&mut self, total: usize, viewport: usize) -> Range<usize> {
        self.max_top = total.saturating_sub(viewport);
        if self.pinned_top.is_some_and(|top| top >= self.max_top) {
            self.pinned_top = None;
        }

        let start = self.top();
        start..(start + viewport).min(total)
    }

    /// True when lines exist below the visible window.
    #[must_use]
    pub const fn has_more_below(&self) -> bool {
        self.top() < self.max_top
    }
}
