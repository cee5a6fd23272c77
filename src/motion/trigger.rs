//! One-shot visibility triggers.
//!
//! A trigger fires the first time its element's bounds, grown by a margin,
//! intersect the viewport — and then stays fired for the rest of the
//! element's lifetime.  Fired triggers skip the intersection test entirely,
//! so a page full of already-revealed sections costs nothing per frame.

use super::geometry::{ElemRect, Viewport};

/// Pixels of pre-trigger slack around the viewport.  Negative values delay
/// firing until the element is that far inside.
pub const DEFAULT_MARGIN: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStatus {
    Pending,
    Fired,
}

/// Per-element trigger state.  One-way: `Pending` → `Fired`, never back.
#[derive(Debug, Clone, Copy)]
pub struct TriggerState {
    pub status: TriggerStatus,
    pub margin: f64,
}

impl TriggerState {
    pub fn new(margin: f64) -> Self {
        Self { status: TriggerStatus::Pending, margin }
    }

    /// A trigger born fired — the degraded mode when the platform offers no
    /// intersection primitive.
    pub fn fired(margin: f64) -> Self {
        Self { status: TriggerStatus::Fired, margin }
    }

    pub fn is_fired(&self) -> bool {
        self.status == TriggerStatus::Fired
    }

    /// Evaluate the intersection once per tick.  Returns `true` on the tick
    /// the trigger transitions.  Already-fired triggers return `false`
    /// without touching geometry.
    pub fn evaluate(&mut self, rect: ElemRect, viewport: Viewport, scroll: f64) -> bool {
        if self.is_fired() {
            return false;
        }
        if rect.intersects_viewport(scroll, viewport, self.margin) {
            self.status = TriggerStatus::Fired;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_once() {
        let vp = Viewport::new(80.0, 100.0);
        let rect = ElemRect::new(400.0, 0.0, 80.0, 50.0);
        let mut trig = TriggerState::new(0.0);

        // Enter, leave, re-enter: exactly one transition.
        assert!(!trig.evaluate(rect, vp, 0.0));
        assert!(trig.evaluate(rect, vp, 380.0));
        assert!(trig.is_fired());
        assert!(!trig.evaluate(rect, vp, 0.0));
        assert!(!trig.evaluate(rect, vp, 380.0));
        assert!(trig.is_fired());
    }

    #[test]
    fn negative_margin_delays_firing() {
        let vp = Viewport::new(80.0, 300.0);
        let rect = ElemRect::new(400.0, 0.0, 80.0, 50.0);
        let mut trig = TriggerState::new(-100.0);

        // Top edge barely on screen is not enough at -100px.
        assert!(!trig.evaluate(rect, vp, 160.0));
        assert!(trig.evaluate(rect, vp, 310.0));
    }

    #[test]
    fn degraded_mode_is_born_fired() {
        let trig = TriggerState::fired(DEFAULT_MARGIN);
        assert!(trig.is_fired());
    }
}
