//! The engine surface: registration, per-frame orchestration, snapshots.
//!
//! `MotionEngine` is the one object the embedding app talks to.  Content
//! code registers elements with [`MotionEngine::track`], pushes geometry
//! when layout changes, and reads an [`ElementSnapshot`] per element each
//! frame to paint however it likes — the engine never paints.
//!
//! All input (wheel deltas, pointer moves, resizes) lands in pending-intake
//! fields and is consumed at the start of the next tick, never mid-tick
//! from a nested event handler.  Within one tick the order is fixed:
//! scroll emulator first, then progress, triggers, reveals, springs — so
//! every consumer sees the same scroll offset for the whole frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::geometry::{ElemRect, Viewport};
use super::progress::{sample, OffsetPolicy, ProgressState};
use super::reveal::{RevealSequence, TokenRenderState};
use super::scheduler::{Directive, FrameScheduler, FrameTick, SubscriptionToken};
use super::scroll::SmoothScroll;
use super::spring::{Spring2d, SpringParams};
use super::trigger::{TriggerState, DEFAULT_MARGIN};

/// What the hosting platform can actually do.  Tests and degraded
/// environments construct engines with pieces switched off.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// A per-frame callback exists; without it the scroll emulator never
    /// starts.
    pub frame_clock: bool,
    /// Viewport intersection can be observed; without it triggers fire at
    /// registration.
    pub intersection: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { frame_clock: true, intersection: true }
    }
}

/// Stable identity of one tracked element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackHandle(u64);

/// What an element opts into when it registers.
#[derive(Debug, Clone)]
pub enum TrackConfig {
    /// Scroll progress over the policy's anchor interval.
    Progress { policy: OffsetPolicy },
    /// One-shot visibility with a pre-trigger margin.
    Visibility { margin: f64 },
    /// Staggered token reveal gated on visibility.
    Reveal {
        text: String,
        margin: f64,
        base_delay: f64,
        per_token_delay: f64,
    },
    /// Pointer-chasing spring offset.
    Spring { params: SpringParams },
}

/// Per-tick output for one element.  Fields are `None` for concerns the
/// element didn't register for.
#[derive(Debug, Clone, Default)]
pub struct ElementSnapshot {
    pub progress: Option<f64>,
    pub triggered: Option<bool>,
    pub tokens: Option<Vec<TokenRenderState>>,
    pub offset: Option<(f64, f64)>,
}

enum TrackKind {
    Progress { policy: OffsetPolicy, state: ProgressState },
    Visibility { trigger: TriggerState },
    Reveal { trigger: TriggerState, sequence: RevealSequence },
    Spring { params: SpringParams, spring: Spring2d, tracking: bool },
}

struct Tracked {
    kind: TrackKind,
    /// Document-space bounds, pushed by the collaborator.  `None` means
    /// "no geometry yet" — the element is skipped this tick.
    rect: Option<ElemRect>,
}

/// Engine internals behind the `Rc<RefCell<…>>` shared with the frame
/// subscription.  Everything runs on the one cooperative loop, so `Rc` is
/// deliberate, not a missing `Arc`.
struct EngineCore {
    capabilities: Capabilities,
    viewport: Viewport,
    scroll: SmoothScroll,
    tracked: HashMap<TrackHandle, Tracked>,
    /// Registration order, so per-tick iteration is deterministic.
    order: Vec<TrackHandle>,
    snapshots: HashMap<TrackHandle, ElementSnapshot>,
    next_handle: u64,
    // Pending input intake, coalesced last-writer-wins, consumed at tick
    // start.
    pending_scroll_delta: f64,
    pending_pointer: Option<(f64, f64)>,
    pending_release: bool,
    pending_viewport: Option<Viewport>,
}

impl EngineCore {
    fn tick(&mut self, frame: FrameTick) {
        if let Some(vp) = self.pending_viewport.take() {
            self.viewport = vp;
        }

        // 1. Scroll first: one coherent offset for the whole tick.
        if self.pending_scroll_delta != 0.0 {
            let delta = std::mem::take(&mut self.pending_scroll_delta);
            self.scroll.add_delta(delta, frame.now);
        }
        self.scroll.tick(frame.now);
        let scroll = self.scroll.position();

        let pointer = self.pending_pointer.take();
        let released = std::mem::take(&mut self.pending_release);

        // 2..5. Component updates in dependency order.
        for &handle in &self.order {
            let Some(tracked) = self.tracked.get_mut(&handle) else {
                continue;
            };
            let snapshot = self
                .snapshots
                .entry(handle)
                .or_default();

            match &mut tracked.kind {
                TrackKind::Progress { policy, state } => {
                    // Missing geometry: keep last progress, skip the update.
                    if let Some(rect) = tracked.rect {
                        *state = sample(*policy, rect, self.viewport, scroll);
                    }
                    snapshot.progress = Some(state.progress);
                }
                TrackKind::Visibility { trigger } => {
                    if let Some(rect) = tracked.rect {
                        trigger.evaluate(rect, self.viewport, scroll);
                    }
                    snapshot.triggered = Some(trigger.is_fired());
                }
                TrackKind::Reveal { trigger, sequence } => {
                    if let Some(rect) = tracked.rect {
                        trigger.evaluate(rect, self.viewport, scroll);
                    }
                    if trigger.is_fired() {
                        sequence.start(frame.now);
                    }
                    snapshot.triggered = Some(trigger.is_fired());
                    snapshot.tokens = Some(sequence.advance(frame.now));
                }
                TrackKind::Spring { params, spring, tracking } => {
                    if released && *tracking {
                        *tracking = false;
                        spring.release();
                    }
                    if let (Some(rect), Some((px, py))) = (tracked.rect, pointer) {
                        // Pointer coordinates arrive in viewport space;
                        // lift them into document space for the hit test.
                        let doc_y = py + scroll;
                        if rect.contains(px, doc_y) {
                            *tracking = true;
                            let (cx, cy) = rect.center();
                            spring.set_target(
                                (px - cx) * params.strength,
                                (doc_y - cy) * params.strength,
                            );
                        } else if *tracking {
                            *tracking = false;
                            spring.release();
                        }
                    }
                    // Settled springs cost nothing, like fired triggers.
                    if !spring.is_settled(1e-4) {
                        spring.integrate(*params, frame.dt);
                    }
                    snapshot.offset = Some(spring.current);
                }
            }
        }
    }

    fn pointer_left(&mut self) {
        // Consumed on the next tick, like every other input event.
        self.pending_pointer = None;
        self.pending_release = true;
    }
}

/// Public handle to the per-session engine.
pub struct MotionEngine {
    core: Rc<RefCell<EngineCore>>,
    subscription: Option<SubscriptionToken>,
}

impl MotionEngine {
    pub fn new(viewport: Viewport, capabilities: Capabilities) -> Self {
        let core = EngineCore {
            capabilities,
            viewport,
            scroll: SmoothScroll::default(),
            tracked: HashMap::new(),
            order: Vec::new(),
            snapshots: HashMap::new(),
            next_handle: 0,
            pending_scroll_delta: 0.0,
            pending_pointer: None,
            pending_release: false,
            pending_viewport: None,
        };
        Self {
            core: Rc::new(RefCell::new(core)),
            subscription: None,
        }
    }

    // ── lifecycle ───────────────────────────────────────────────

    /// Subscribe the engine tick to the session's frame loop.  No-op when
    /// already attached.
    pub fn attach(&mut self, scheduler: &mut FrameScheduler) {
        if self.subscription.is_some() {
            return;
        }
        let core = Rc::clone(&self.core);
        let token = scheduler.subscribe(Box::new(move |frame| {
            core.borrow_mut().tick(frame);
            Directive::Continue
        }));
        self.subscription = Some(token);
    }

    /// Tear the session down: unsubscribe, stop the emulator, drop every
    /// tracked element.  Safe to call more than once.
    pub fn shutdown(&mut self, scheduler: &mut FrameScheduler) {
        if let Some(token) = self.subscription.take() {
            scheduler.unsubscribe(token);
        }
        let mut core = self.core.borrow_mut();
        core.scroll.stop();
        let dropped = core.tracked.len();
        core.tracked.clear();
        core.order.clear();
        core.snapshots.clear();
        if dropped > 0 {
            tracing::debug!("engine shutdown dropped {dropped} tracked elements");
        }
    }

    // ── registration ────────────────────────────────────────────

    pub fn track(&mut self, config: TrackConfig) -> TrackHandle {
        let mut core = self.core.borrow_mut();
        let handle = TrackHandle(core.next_handle);
        core.next_handle += 1;

        let intersection = core.capabilities.intersection;
        let make_trigger = |margin: f64| {
            let margin = if margin.is_finite() { margin } else { DEFAULT_MARGIN };
            if intersection {
                TriggerState::new(margin)
            } else {
                // Degraded platform: born fired, reveals play immediately.
                TriggerState::fired(margin)
            }
        };

        let kind = match config {
            TrackConfig::Progress { policy } => TrackKind::Progress {
                policy,
                state: ProgressState::new(),
            },
            TrackConfig::Visibility { margin } => TrackKind::Visibility {
                trigger: make_trigger(margin),
            },
            TrackConfig::Reveal { text, margin, base_delay, per_token_delay } => {
                TrackKind::Reveal {
                    trigger: make_trigger(margin),
                    sequence: RevealSequence::new(&text)
                        .with_delays(base_delay, per_token_delay),
                }
            }
            TrackConfig::Spring { params } => TrackKind::Spring {
                params,
                spring: Spring2d::new(),
                tracking: false,
            },
        };

        core.tracked.insert(handle, Tracked { kind, rect: None });
        core.order.push(handle);
        handle
    }

    /// Deregister.  Idempotent; the handle never yields a snapshot again.
    pub fn untrack(&mut self, handle: TrackHandle) {
        let mut core = self.core.borrow_mut();
        core.tracked.remove(&handle);
        core.snapshots.remove(&handle);
        core.order.retain(|h| *h != handle);
    }

    /// Push fresh document-space bounds for an element.
    pub fn update_geometry(&mut self, handle: TrackHandle, rect: ElemRect) {
        if let Some(tracked) = self.core.borrow_mut().tracked.get_mut(&handle) {
            tracked.rect = Some(rect);
        }
    }

    /// Retune a spring track in place; current position and velocity are
    /// kept so the retune doesn't visibly jump.  Ignored for other kinds.
    pub fn set_spring_params(&mut self, handle: TrackHandle, new: SpringParams) {
        if let Some(tracked) = self.core.borrow_mut().tracked.get_mut(&handle) {
            if let TrackKind::Spring { params, .. } = &mut tracked.kind {
                *params = new;
            }
        }
    }

    // ── input intake (coalesced, applied next tick) ─────────────

    pub fn queue_scroll_delta(&mut self, delta: f64) {
        if delta.is_finite() {
            self.core.borrow_mut().pending_scroll_delta += delta;
        }
    }

    /// Latest pointer position in viewport space; last writer wins.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.core.borrow_mut().pending_pointer = Some((x, y));
        }
    }

    pub fn pointer_left(&mut self) {
        self.core.borrow_mut().pointer_left();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.core.borrow_mut().pending_viewport = Some(viewport);
    }

    // ── scroll emulator controls ────────────────────────────────

    pub fn start_smooth_scroll(&mut self) {
        let mut core = self.core.borrow_mut();
        let clock = core.capabilities.frame_clock;
        core.scroll.start(clock);
    }

    pub fn stop_smooth_scroll(&mut self) {
        self.core.borrow_mut().scroll.stop();
    }

    pub fn smooth_scroll_running(&self) -> bool {
        self.core.borrow().scroll.is_running()
    }

    pub fn set_scroll_bounds(&mut self, max_offset: f64) {
        self.core.borrow_mut().scroll.set_max_offset(max_offset);
    }

    pub fn set_ease_duration(&mut self, duration: f64) {
        self.core.borrow_mut().scroll.set_duration(duration);
    }

    pub fn jump_to(&mut self, offset: f64) {
        self.core.borrow_mut().scroll.jump_to(offset);
    }

    /// The one coherent scroll offset of the current frame.
    pub fn scroll_position(&self) -> f64 {
        self.core.borrow().scroll.position()
    }

    // ── output ──────────────────────────────────────────────────

    /// Latest computed snapshot for an element, if it is still tracked and
    /// at least one tick has run since registration.
    pub fn snapshot(&self, handle: TrackHandle) -> Option<ElementSnapshot> {
        self.core.borrow().snapshots.get(&handle).cloned()
    }

    /// Drive one tick directly, without a scheduler.  Test and headless
    /// entry point; the demo app goes through [`Self::attach`].
    pub fn run_tick(&mut self, frame: FrameTick) {
        self.core.borrow_mut().tick(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn engine() -> MotionEngine {
        MotionEngine::new(Viewport::new(80.0, 100.0), Capabilities::default())
    }

    fn frame(now: f64) -> FrameTick {
        FrameTick { now, dt: 1.0 / 60.0 }
    }

    #[test]
    fn track_untrack_before_any_tick_yields_nothing() {
        let mut eng = engine();
        let h = eng.track(TrackConfig::Visibility { margin: DEFAULT_MARGIN });
        eng.untrack(h);
        eng.run_tick(frame(0.0));
        assert!(eng.snapshot(h).is_none());
    }

    #[test]
    fn untrack_is_idempotent_and_final() {
        let mut eng = engine();
        let h = eng.track(TrackConfig::Progress { policy: OffsetPolicy::default() });
        eng.update_geometry(h, ElemRect::new(50.0, 0.0, 80.0, 40.0));
        eng.run_tick(frame(0.0));
        assert!(eng.snapshot(h).is_some());

        eng.untrack(h);
        eng.untrack(h);
        eng.run_tick(frame(0.016));
        assert!(eng.snapshot(h).is_none());
    }

    #[test]
    fn scroll_updates_before_progress_reads() {
        let mut eng = engine();
        eng.set_scroll_bounds(1_000.0);
        let h = eng.track(TrackConfig::Progress { policy: OffsetPolicy::from_top() });
        eng.update_geometry(h, ElemRect::new(0.0, 0.0, 80.0, 200.0));

        // Native mode applies the delta inside the same tick that samples
        // progress: the sampler must see the post-update offset.
        eng.queue_scroll_delta(100.0);
        eng.run_tick(frame(0.0));
        let snap = eng.snapshot(h).unwrap();
        assert_eq!(snap.progress, Some(0.5));
    }

    #[test]
    fn missing_geometry_keeps_last_progress() {
        let mut eng = engine();
        eng.set_scroll_bounds(1_000.0);
        let h = eng.track(TrackConfig::Progress { policy: OffsetPolicy::from_top() });
        eng.update_geometry(h, ElemRect::new(0.0, 0.0, 80.0, 200.0));
        eng.queue_scroll_delta(100.0);
        eng.run_tick(frame(0.0));
        assert_eq!(eng.snapshot(h).unwrap().progress, Some(0.5));

        // No geometry refresh and more scrolling: value is retained, the
        // loop keeps running.
        let h2 = eng.track(TrackConfig::Progress { policy: OffsetPolicy::from_top() });
        eng.queue_scroll_delta(100.0);
        eng.run_tick(frame(0.016));
        assert_eq!(eng.snapshot(h).unwrap().progress, Some(1.0));
        assert_eq!(eng.snapshot(h2).unwrap().progress, Some(0.0));
    }

    #[test]
    fn reveal_latches_on_first_visibility() {
        let mut eng = engine();
        eng.set_scroll_bounds(10_000.0);
        let h = eng.track(TrackConfig::Reveal {
            text: "Building trust.".into(),
            margin: 0.0,
            base_delay: 0.3,
            per_token_delay: 0.08,
        });
        eng.update_geometry(h, ElemRect::new(400.0, 0.0, 80.0, 50.0));

        // Off-screen: hidden tokens.
        eng.run_tick(frame(0.0));
        let snap = eng.snapshot(h).unwrap();
        assert_eq!(snap.triggered, Some(false));
        assert!(snap.tokens.unwrap().iter().all(|t| t.opacity == 0.0));

        // Scroll it into view at t=1.0; token 0 starts at 1.3, token 1 at
        // 1.38 regardless of how often the trigger is re-evaluated.
        eng.jump_to(380.0);
        eng.run_tick(frame(1.0));
        assert_eq!(eng.snapshot(h).unwrap().triggered, Some(true));

        eng.jump_to(0.0); // leave again
        eng.run_tick(frame(1.31));
        let tokens = eng.snapshot(h).unwrap().tokens.unwrap();
        assert!(tokens[0].opacity > 0.0);
        assert_eq!(tokens[1].opacity, 0.0);

        eng.run_tick(frame(1.39));
        let tokens = eng.snapshot(h).unwrap().tokens.unwrap();
        assert!(tokens[1].opacity > 0.0);
    }

    #[test]
    fn pointer_updates_are_coalesced_to_last_writer() {
        let mut eng = engine();
        let h = eng.track(TrackConfig::Spring {
            params: SpringParams::new(150.0, 15.0, 1.0),
        });
        eng.update_geometry(h, ElemRect::new(0.0, 0.0, 80.0, 100.0));

        // Several moves within one frame: only the last one shapes the
        // target consumed by the tick.
        eng.pointer_moved(10.0, 10.0);
        eng.pointer_moved(60.0, 80.0);
        eng.run_tick(frame(0.016));
        let (ox, oy) = eng.snapshot(h).unwrap().offset.unwrap();
        // Center is (40, 50): the target is (+20, +30) scaled by dt steps.
        assert!(ox > 0.0 && oy > 0.0);
        assert!(oy > ox);
    }

    #[test]
    fn pointer_leave_decays_offset_to_origin() {
        let mut eng = engine();
        let h = eng.track(TrackConfig::Spring {
            params: SpringParams::new(150.0, 15.0, 1.0),
        });
        eng.update_geometry(h, ElemRect::new(0.0, 0.0, 80.0, 100.0));

        eng.pointer_moved(70.0, 50.0);
        let mut now = 0.0;
        for _ in 0..120 {
            now += 1.0 / 60.0;
            eng.run_tick(frame(now));
        }
        let (ox, _) = eng.snapshot(h).unwrap().offset.unwrap();
        assert!(ox > 25.0, "spring never pulled toward pointer: {ox}");

        eng.pointer_left();
        for _ in 0..600 {
            now += 1.0 / 60.0;
            eng.run_tick(frame(now));
        }
        let (ox, oy) = eng.snapshot(h).unwrap().offset.unwrap();
        assert!(ox.abs() < 1.0 && oy.abs() < 1.0, "no elastic return: ({ox}, {oy})");
    }

    #[test]
    fn degraded_intersection_fires_triggers_immediately() {
        let caps = Capabilities { frame_clock: true, intersection: false };
        let mut eng = MotionEngine::new(Viewport::new(80.0, 100.0), caps);
        let h = eng.track(TrackConfig::Visibility { margin: DEFAULT_MARGIN });
        // No geometry at all — still fired.
        eng.run_tick(frame(0.0));
        assert_eq!(eng.snapshot(h).unwrap().triggered, Some(true));
    }

    #[test]
    fn shutdown_detaches_from_scheduler() {
        let mut sched = FrameScheduler::new();
        let mut eng = engine();
        eng.attach(&mut sched);
        eng.attach(&mut sched); // no double subscription
        assert_eq!(sched.subscriber_count(), 1);

        let h = eng.track(TrackConfig::Visibility { margin: 0.0 });
        eng.shutdown(&mut sched);
        assert_eq!(sched.subscriber_count(), 0);
        sched.tick(0.0);
        assert!(eng.snapshot(h).is_none());
    }
}
