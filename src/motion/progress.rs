//! Scroll progress sampling.
//!
//! A progress track maps the scroll offset onto a normalized `[0, 1]` value
//! over the interval where a configured pair of anchors crosses: progress is
//! 0 when the `begin` anchor aligns, 1 when the `end` anchor aligns, and
//! clamps outside.  Anchors name an element edge and a viewport edge, so
//! "element start meets viewport end" is the moment a section first pokes in
//! from the bottom of the window.

use super::geometry::{ElemRect, Viewport};

/// An edge along the vertical axis, as a fraction of the extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Start,
    End,
}

impl Edge {
    fn fraction(self) -> f64 {
        match self {
            Edge::Start => 0.0,
            Edge::End => 1.0,
        }
    }
}

/// One alignment moment: an element edge meeting a viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub element: Edge,
    pub viewport: Edge,
}

impl Anchor {
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this anchor aligns for `rect`.
    fn raw_offset(self, rect: ElemRect, viewport: Viewport) -> f64 {
        rect.top + self.element.fraction() * rect.height
            - self.viewport.fraction() * viewport.height
    }
}

/// The anchor pair defining a track's progress interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPolicy {
    pub begin: Anchor,
    pub end: Anchor,
}

impl OffsetPolicy {
    /// Element travels the whole viewport: enters at the bottom edge,
    /// progress completes as it leaves past the top.  The stock policy for
    /// parallax sections.
    pub const fn through_viewport() -> Self {
        Self {
            begin: Anchor::new(Edge::Start, Edge::End),
            end: Anchor::new(Edge::End, Edge::Start),
        }
    }

    /// Element starts aligned with the viewport top (a pinned hero) and
    /// progress completes as its bottom scrolls past the top.
    pub const fn from_top() -> Self {
        Self {
            begin: Anchor::new(Edge::Start, Edge::Start),
            end: Anchor::new(Edge::End, Edge::Start),
        }
    }
}

impl Default for OffsetPolicy {
    fn default() -> Self {
        Self::through_viewport()
    }
}

/// Last sampled progress for one tracked element.
#[derive(Debug, Clone, Copy)]
pub struct ProgressState {
    pub raw_start: f64,
    pub raw_end: f64,
    pub progress: f64,
}

impl ProgressState {
    pub fn new() -> Self {
        Self { raw_start: 0.0, raw_end: 0.0, progress: 0.0 }
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample progress for `rect` at `scroll`.  Pure; the caller stores the
/// result.  A degenerate interval (zero-height element with identical
/// anchors) becomes a step at `raw_start`.
pub fn sample(
    policy: OffsetPolicy,
    rect: ElemRect,
    viewport: Viewport,
    scroll: f64,
) -> ProgressState {
    let raw_start = policy.begin.raw_offset(rect, viewport);
    let raw_end = policy.end.raw_offset(rect, viewport);

    let progress = if raw_end <= raw_start {
        if scroll >= raw_start { 1.0 } else { 0.0 }
    } else {
        ((scroll - raw_start) / (raw_end - raw_start)).clamp(0.0, 1.0)
    };

    ProgressState { raw_start, raw_end, progress }
}
