//! Scroll position of the host surface, reduced to what pagination needs.

/// Units are whatever the host measures in (pixels, rows...) as long as all
/// three fields agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub scroll_top: u32,
    pub viewport_height: u32,
    pub content_height: u32,
}

impl Viewport {
    pub fn new(scroll_top: u32, viewport_height: u32, content_height: u32) -> Self {
        Self {
            scroll_top,
            viewport_height,
            content_height,
        }
    }

    /// True once the visible window touches the end of the content.
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_top.saturating_add(self.viewport_height) >= self.content_height
    }

    /// Largest valid `scroll_top` for the current content.
    pub fn max_scroll_top(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Scroll by `delta`, clamped to the content.
    pub fn scrolled_by(self, delta: i64) -> Self {
        let target = i64::from(self.scroll_top).saturating_add(delta);
        let clamped = target.clamp(0, i64::from(self.max_scroll_top()));
        Self {
            scroll_top: u32::try_from(clamped).unwrap_or(0),
            ..self
        }
    }

    pub fn scrolled_to_bottom(self) -> Self {
        Self {
            scroll_top: self.max_scroll_top(),
            ..self
        }
    }

    /// Same position over content of a new height, re-clamped.
    pub fn with_content_height(self, content_height: u32) -> Self {
        let resized = Self {
            content_height,
            ..self
        };
        Self {
            scroll_top: resized.scroll_top.min(resized.max_scroll_top()),
            ..resized
        }
    }

    /// Index range of rows currently visible.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = self.scroll_top as usize;
        let end = self
            .scroll_top
            .saturating_add(self.viewport_height)
            .min(self.content_height) as usize;
        start..end.max(start)
    }
}
