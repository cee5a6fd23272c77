//! Smooth scroll emulation.
//!
//! Raw wheel/touch deltas never move the page directly.  They accumulate
//! into a target offset and a tween replays the motion as a continuous
//! exponential ease toward it, one sample per frame — visible deceleration
//! instead of discrete jumps.  A new delta retargets the tween from the
//! current sampled position, so interrupting a glide feels seamless.
//!
//! One emulator exists per page session.  When it is `Stopped` (or the
//! platform has no frame clock) deltas apply directly, which is exactly
//! native scrolling.

use super::curve::ease_out_expo;

/// Default glide duration, in time-units.
pub const DEFAULT_DURATION: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    Stopped,
    Running,
}

/// An in-flight glide from `from` to `to` starting at `start`.
#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f64,
    to: f64,
    start: f64,
}

/// The per-session scroll emulator.
#[derive(Debug)]
pub struct SmoothScroll {
    mode: ScrollMode,
    /// The page's effective scroll offset — what every sampler reads.
    position: f64,
    /// Accumulated wheel target, clamped to `[0, max_offset]`.
    target: f64,
    max_offset: f64,
    duration: f64,
    tween: Option<Tween>,
}

impl SmoothScroll {
    pub fn new(duration: f64) -> Self {
        Self {
            mode: ScrollMode::Stopped,
            position: 0.0,
            target: 0.0,
            max_offset: 0.0,
            duration: duration.max(0.05),
            tween: None,
        }
    }

    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == ScrollMode::Running
    }

    /// Current effective scroll offset.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.05);
    }

    /// Scrollable extent (content height minus viewport height).  Shrinking
    /// content pulls both target and position back in range.
    pub fn set_max_offset(&mut self, max: f64) {
        self.max_offset = max.max(0.0);
        self.target = self.target.clamp(0.0, self.max_offset);
        self.position = self.position.clamp(0.0, self.max_offset);
    }

    /// Begin intercepting deltas.  No-op when already running.  When the
    /// platform offers no frame clock the emulator stays stopped and
    /// scrolling silently remains native.
    pub fn start(&mut self, has_frame_clock: bool) {
        if self.mode == ScrollMode::Running {
            return;
        }
        if !has_frame_clock {
            tracing::warn!("no frame clock; smooth scrolling stays native");
            return;
        }
        self.mode = ScrollMode::Running;
        self.target = self.position;
        self.tween = None;
    }

    /// Release control back to native behavior.  No-op when stopped.
    pub fn stop(&mut self) {
        if self.mode == ScrollMode::Stopped {
            return;
        }
        self.mode = ScrollMode::Stopped;
        self.target = self.position;
        self.tween = None;
    }

    /// Accumulate a raw input delta.  Running: retarget the glide at the
    /// next tick.  Stopped: native, the position moves immediately.
    /// Non-finite payloads are ignored.
    pub fn add_delta(&mut self, delta: f64, now: f64) {
        if !delta.is_finite() {
            return;
        }
        self.target = (self.target + delta).clamp(0.0, self.max_offset);
        match self.mode {
            ScrollMode::Running => {
                // Restart the ease from wherever the glide currently is.
                self.tween = Some(Tween { from: self.position, to: self.target, start: now });
            }
            ScrollMode::Stopped => {
                self.position = self.target;
            }
        }
    }

    /// Jump without animation (keyboard Home/End, initial placement).
    pub fn jump_to(&mut self, offset: f64) {
        self.target = offset.clamp(0.0, self.max_offset);
        self.position = self.target;
        self.tween = None;
    }

    /// Advance the glide.  Must run before any consumer reads
    /// [`Self::position`] this frame so the whole tick sees one coherent
    /// scroll offset.
    pub fn tick(&mut self, now: f64) {
        if self.mode != ScrollMode::Running {
            return;
        }
        let Some(tween) = self.tween else {
            return;
        };
        let t = ((now - tween.start) / self.duration).max(0.0);
        let eased = ease_out_expo(t);
        self.position = tween.from + (tween.to - tween.from) * eased;
        if eased >= 1.0 {
            self.position = tween.to;
            self.tween = None;
        }
    }
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}
