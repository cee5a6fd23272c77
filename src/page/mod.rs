//! Demo page content and document layout.
//!
//! This is the engine's collaborator side: plain data describing a vertical
//! run of sections, plus the row math that places each section in document
//! space.  Nothing here reads engine state — the page hands its geometry to
//! the engine and the widgets read snapshots back at paint time.

use scroll_stage::motion::{ElemRect, Viewport};

/// Section flavors, which decide both layout and which motion tracks the
/// app registers for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Full-viewport opener: staggered headline, pointer-chasing card,
    /// scale/fade driven by pinned scroll progress.
    Hero,
    /// Scrolling content block: one-shot entrance plus parallax dim.
    Feature,
    /// Closing block, same tracks as a feature.
    Contact,
}

/// One vertical block of the demo page.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub headline: String,
    pub body: Vec<String>,
}

impl Section {
    fn new(kind: SectionKind, headline: &str, body: &[&str]) -> Self {
        Self {
            kind,
            headline: headline.to_owned(),
            body: body.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Rows of vertical padding above and below the content.
    fn padding(&self) -> f64 {
        match self.kind {
            SectionKind::Hero => 0.0,
            SectionKind::Feature => 6.0,
            SectionKind::Contact => 8.0,
        }
    }

    /// Section height in document rows for the given viewport.
    pub fn height(&self, viewport: Viewport) -> f64 {
        match self.kind {
            // The hero pins to a full screen.
            SectionKind::Hero => viewport.height.max(8.0),
            _ => {
                let content = 2.0 + self.body.len() as f64; // headline + gap + body
                content + 2.0 * self.padding()
            }
        }
    }
}

/// Computed placement for every section.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub rects: Vec<ElemRect>,
    pub total_height: f64,
}

impl PageLayout {
    /// Scrollable extent: document height minus one viewport.
    pub fn max_scroll(&self, viewport: Viewport) -> f64 {
        (self.total_height - viewport.height).max(0.0)
    }
}

/// The whole demo page.
#[derive(Debug, Clone)]
pub struct PageModel {
    pub sections: Vec<Section>,
}

impl PageModel {
    /// Stack the sections top to bottom at the viewport's width.
    pub fn layout(&self, viewport: Viewport) -> PageLayout {
        let mut rects = Vec::with_capacity(self.sections.len());
        let mut top = 0.0;
        for section in &self.sections {
            let height = section.height(viewport);
            rects.push(ElemRect::new(top, 0.0, viewport.width, height));
            top += height;
        }
        PageLayout { rects, total_height: top }
    }

    /// The built-in showcase content.
    pub fn demo() -> Self {
        Self {
            sections: vec![
                Section::new(
                    SectionKind::Hero,
                    "Motion that follows the page",
                    &[
                        "Scroll with the mouse wheel and watch the glide.",
                        "Move the pointer over this screen to nudge the card.",
                    ],
                ),
                Section::new(
                    SectionKind::Feature,
                    "Smooth scrolling",
                    &[
                        "Wheel deltas never jump the page. They accumulate into",
                        "a target and an exponential ease replays the motion,",
                        "one sample per frame. Press 's' to compare with native.",
                    ],
                ),
                Section::new(
                    SectionKind::Feature,
                    "Staggered reveals",
                    &[
                        "Each headline fires once, the first time it scrolls",
                        "into view. Words enter one by one on a fixed stagger",
                        "and never replay, even if you scroll away and back.",
                    ],
                ),
                Section::new(
                    SectionKind::Feature,
                    "Scroll progress",
                    &[
                        "Every section knows how far it has traveled through",
                        "the viewport as a clamped 0..1 value, mapped through",
                        "piecewise-linear curves into brightness and offset.",
                    ],
                ),
                Section::new(
                    SectionKind::Feature,
                    "Elastic pointer offsets",
                    &[
                        "Interactive blocks chase the pointer with a damped",
                        "spring and ease back to rest when it leaves, instead",
                        "of snapping.",
                    ],
                ),
                Section::new(
                    SectionKind::Contact,
                    "Press ? for settings",
                    &[
                        "Tune ease duration, spring stiffness and damping,",
                        "and trigger margins while the page is running.",
                    ],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scroll_stage::motion::Viewport;

    #[test]
    fn sections_stack_without_gaps() {
        let page = PageModel::demo();
        let vp = Viewport::new(80.0, 30.0);
        let layout = page.layout(vp);

        assert_eq!(layout.rects.len(), page.sections.len());
        let mut expected_top = 0.0;
        for rect in &layout.rects {
            assert_eq!(rect.top, expected_top);
            expected_top = rect.bottom();
        }
        assert_eq!(layout.total_height, expected_top);
    }

    #[test]
    fn hero_fills_the_viewport() {
        let page = PageModel::demo();
        let vp = Viewport::new(80.0, 42.0);
        let layout = page.layout(vp);
        assert_eq!(layout.rects[0].height, 42.0);
    }

    #[test]
    fn max_scroll_never_negative() {
        let page = PageModel::demo();
        let vp = Viewport::new(80.0, 10_000.0);
        assert_eq!(page.layout(vp).max_scroll(vp), 0.0);
    }
}
