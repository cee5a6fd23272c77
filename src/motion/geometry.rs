//! Float geometry shared across the engine.
//!
//! Element rects live in *document space*: `top` is the distance from the
//! top of the page, not from the top of the screen.  The viewport is the
//! window the scroll offset slides over that page.  Units are whatever the
//! embedding app measures in — pixels in a browser-like host, cell rows in
//! the TUI demo.

/// Axis-aligned element bounds in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElemRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl ElemRect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Whether a document-space point lies inside the rect.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left
            && x < self.left + self.width
            && y >= self.top
            && y < self.bottom()
    }

    /// Whether the rect, grown by `margin` on the vertical axis (negative
    /// shrinks), overlaps the scrolled viewport.
    pub fn intersects_viewport(&self, scroll: f64, viewport: Viewport, margin: f64) -> bool {
        let view_top = scroll - margin;
        let view_bottom = scroll + viewport.height + margin;
        self.top < view_bottom && self.bottom() > view_top
    }
}

/// The visible window over the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_respects_margin() {
        let vp = Viewport::new(80.0, 100.0);
        let rect = ElemRect::new(150.0, 0.0, 80.0, 40.0);

        // Viewport covers [0, 100): not visible.
        assert!(!rect.intersects_viewport(0.0, vp, 0.0));
        // A 60px pre-trigger margin reaches it.
        assert!(rect.intersects_viewport(0.0, vp, 60.0));
        // A negative margin demands the rect be well inside.
        assert!(!rect.intersects_viewport(60.0, vp, -15.0));
        assert!(rect.intersects_viewport(80.0, vp, -15.0));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = ElemRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(10.0, 10.0));
        assert!(!rect.contains(30.0, 10.0));
        assert!(!rect.contains(10.0, 30.0));
    }
}
