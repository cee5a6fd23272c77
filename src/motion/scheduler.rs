//! The shared frame loop.
//!
//! Every animated component subscribes here instead of requesting its own
//! next-frame callback, which centralizes the ordering guarantees: one tick
//! per display frame, subscribers invoked in subscription order, and a
//! subscriber can detach itself mid-invocation without disturbing the rest
//! of the current tick.

use std::collections::HashSet;

/// Largest believable frame gap, in time-units.  A multi-second stall
/// (suspended terminal) clamps to `MAX_DT` so integrators never see a
/// giant step.
pub const MAX_DT: f64 = 0.1;

/// What a subscriber wants after being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    /// Remove this subscription; the callback will never run again.
    Detach,
}

/// Timing info handed to every subscriber.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Session-relative time of this tick.
    pub now: f64,
    /// Elapsed time since the previous tick, clamped to [`MAX_DT`].
    pub dt: f64,
}

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

/// Boxed per-frame callback.
pub type Callback = Box<dyn FnMut(FrameTick) -> Directive>;

/// The single per-session frame loop driver.
///
/// The embedding app owns the actual timer (a tokio tick, a render loop)
/// and calls [`FrameScheduler::tick`] once per frame; everything else —
/// ordering, detachment, dt computation — lives here.
pub struct FrameScheduler {
    subscribers: Vec<(SubscriptionToken, Callback)>,
    dead: HashSet<SubscriptionToken>,
    next_token: u64,
    last_now: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            dead: HashSet::new(),
            next_token: 0,
            last_now: None,
        }
    }

    /// Register `callback` to run on every tick, after all earlier
    /// subscribers.
    pub fn subscribe(&mut self, callback: Callback) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_token);
        self.next_token += 1;
        self.subscribers.push((token, callback));
        token
    }

    /// Remove a subscription.  Idempotent; unknown or already-removed
    /// tokens are ignored.  The callback is guaranteed not to run on any
    /// tick after this call.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) {
        if self.subscribers.iter().any(|(t, _)| *t == token) {
            self.dead.insert(token);
            self.compact();
        }
    }

    /// Number of live subscriptions.  The embedding loop may idle its
    /// timer when this reaches zero.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Run one frame.  Subscribers are invoked in subscription order; a
    /// `Detach` return removes the subscriber after its own invocation and
    /// leaves the remaining subscribers of this tick untouched.  No
    /// subscriber runs twice within one tick.
    pub fn tick(&mut self, now: f64) {
        let dt = match self.last_now {
            Some(prev) => (now - prev).clamp(0.0, MAX_DT),
            None => 0.0,
        };
        self.last_now = Some(now);
        let frame = FrameTick { now, dt };

        // The list is only compacted after the loop, so indices stay
        // stable and each live subscriber runs exactly once.
        let len = self.subscribers.len();
        for i in 0..len {
            let token = self.subscribers[i].0;
            if self.dead.contains(&token) {
                continue;
            }
            let directive = (self.subscribers[i].1)(frame);
            if directive == Directive::Detach {
                self.dead.insert(token);
            }
        }
        self.compact();
    }

    fn compact(&mut self) {
        if self.dead.is_empty() {
            return;
        }
        let dead = std::mem::take(&mut self.dead);
        self.subscribers.retain(|(t, _)| !dead.contains(t));
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn invokes_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = FrameScheduler::new();
        for id in 0..4 {
            let log = Rc::clone(&log);
            sched.subscribe(Box::new(move |_| {
                log.borrow_mut().push(id);
                Directive::Continue
            }));
        }
        sched.tick(0.0);
        sched.tick(0.016);
        assert_eq!(*log.borrow(), vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn detach_mid_tick_spares_remaining_subscribers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sched = FrameScheduler::new();

        let l = Rc::clone(&log);
        sched.subscribe(Box::new(move |_| {
            l.borrow_mut().push("a");
            Directive::Continue
        }));
        let l = Rc::clone(&log);
        sched.subscribe(Box::new(move |_| {
            l.borrow_mut().push("b");
            Directive::Detach
        }));
        let l = Rc::clone(&log);
        sched.subscribe(Box::new(move |_| {
            l.borrow_mut().push("c");
            Directive::Continue
        }));

        sched.tick(0.0);
        // "c" still ran on the tick "b" detached.
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(sched.subscriber_count(), 2);

        sched.tick(0.016);
        assert_eq!(*log.borrow(), vec!["a", "b", "c", "a", "c"]);
    }

    #[test]
    fn unsubscribe_before_any_tick_means_zero_invocations() {
        let count = Rc::new(RefCell::new(0u32));
        let mut sched = FrameScheduler::new();
        let c = Rc::clone(&count);
        let token = sched.subscribe(Box::new(move |_| {
            *c.borrow_mut() += 1;
            Directive::Continue
        }));
        sched.unsubscribe(token);
        sched.tick(0.0);
        sched.tick(0.016);
        assert_eq!(*count.borrow(), 0);
        assert_eq!(sched.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let mut sched = FrameScheduler::new();
        let token = sched.subscribe(Box::new(|_| Directive::Continue));
        sched.unsubscribe(token);
        sched.unsubscribe(token);
        assert_eq!(sched.subscriber_count(), 0);
    }

    #[test]
    fn dt_is_clamped_and_zero_on_first_tick() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sched = FrameScheduler::new();
        let s = Rc::clone(&seen);
        sched.subscribe(Box::new(move |t| {
            s.borrow_mut().push(t.dt);
            Directive::Continue
        }));
        sched.tick(100.0);
        sched.tick(100.016);
        sched.tick(200.0); // 100s stall
        let seen = seen.borrow();
        assert_eq!(seen[0], 0.0);
        assert!((seen[1] - 0.016).abs() < 1e-12);
        assert_eq!(seen[2], MAX_DT);
    }

    #[test]
    fn detached_subscriber_never_runs_again() {
        let count = Rc::new(RefCell::new(0u32));
        let mut sched = FrameScheduler::new();
        let c = Rc::clone(&count);
        sched.subscribe(Box::new(move |_| {
            *c.borrow_mut() += 1;
            Directive::Detach
        }));
        for i in 0..5 {
            sched.tick(i as f64 * 0.016);
        }
        assert_eq!(*count.borrow(), 1);
    }
}
