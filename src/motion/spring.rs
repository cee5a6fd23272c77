//! Damped-spring pointer offsets.
//!
//! An interactive element's offset chases a pointer-derived target with
//! damped harmonic motion instead of snapping.  While the pointer is inside
//! the element the target is the pointer's position relative to the element
//! center scaled by a strength factor; on leave the target returns to the
//! origin and the spring eases back — the characteristic elastic return.

/// Largest integration step, in time-units.  Ticks arriving late (tab
/// suspended, terminal stalled) integrate one clamped step instead of
/// exploding.
pub const MAX_DT: f64 = 0.1;

/// Spring tuning.  `stiffness` and `damping` must be positive; `strength`
/// scales pointer displacement into the target offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub strength: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        // Slightly underdamped: a hint of overshoot, no sustained wobble.
        Self { stiffness: 150.0, damping: 15.0, strength: 0.05 }
    }
}

impl SpringParams {
    pub fn new(stiffness: f64, damping: f64, strength: f64) -> Self {
        Self {
            stiffness: stiffness.max(f64::MIN_POSITIVE),
            damping: damping.max(f64::MIN_POSITIVE),
            strength,
        }
    }
}

/// Two independent axes of damped-spring state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spring2d {
    pub current: (f64, f64),
    pub velocity: (f64, f64),
    pub target: (f64, f64),
}

impl Spring2d {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the chase target.  Non-finite coordinates (malformed events)
    /// are ignored and the last valid target stays in effect.
    pub fn set_target(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.target = (x, y);
        }
    }

    /// Pointer left: decay back toward the origin.
    pub fn release(&mut self) {
        self.target = (0.0, 0.0);
    }

    /// One semi-implicit Euler step per axis:
    /// `v += (k·(target − x) − c·v)·dt; x += v·dt`.
    pub fn integrate(&mut self, params: SpringParams, dt: f64) {
        let dt = dt.clamp(0.0, MAX_DT);
        if dt == 0.0 {
            return;
        }
        let step = |cur: &mut f64, vel: &mut f64, target: f64| {
            *vel += (params.stiffness * (target - *cur) - params.damping * *vel) * dt;
            *cur += *vel * dt;
        };
        step(&mut self.current.0, &mut self.velocity.0, self.target.0);
        step(&mut self.current.1, &mut self.velocity.1, self.target.1);
    }

    /// Whether both axes are effectively at rest on their target.
    pub fn is_settled(&self, epsilon: f64) -> bool {
        let (cx, cy) = self.current;
        let (tx, ty) = self.target;
        let (vx, vy) = self.velocity;
        (cx - tx).abs() < epsilon
            && (cy - ty).abs() < epsilon
            && vx.abs() < epsilon
            && vy.abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn params() -> SpringParams {
        SpringParams::new(150.0, 15.0, 1.0)
    }

    #[test]
    fn converges_to_target_without_divergence() {
        let mut s = Spring2d::new();
        s.set_target(100.0, 0.0);

        let mut converged_frame = None;
        for frame in 0..600 {
            s.integrate(params(), DT);
            let (x, _) = s.current;
            assert!((-150.0..=150.0).contains(&x), "diverged at frame {frame}: {x}");
            if converged_frame.is_none() && (x - 100.0).abs() <= 1.0 && s.velocity.0.abs() < 5.0 {
                converged_frame = Some(frame);
            }
        }
        assert!(converged_frame.is_some(), "never reached 1% of target");
        assert!((s.current.0 - 100.0).abs() <= 1.0);
    }

    #[test]
    fn releases_back_to_origin_with_bounded_overshoot() {
        let mut s = Spring2d::new();
        s.set_target(100.0, 0.0);
        for _ in 0..600 {
            s.integrate(params(), DT);
        }

        s.release();
        let mut min_x = f64::MAX;
        for _ in 0..600 {
            s.integrate(params(), DT);
            min_x = min_x.min(s.current.0);
        }
        assert!((s.current.0).abs() <= 1.0, "did not settle at origin");
        // Slightly underdamped: a small dip past zero is fine, a bounce
        // beyond ~15% of the travel is not.
        assert!(min_x > -15.0, "overshoot too large: {min_x}");
    }

    #[test]
    fn both_axes_integrate_independently() {
        let mut s = Spring2d::new();
        s.set_target(50.0, -30.0);
        for _ in 0..600 {
            s.integrate(params(), DT);
        }
        assert!((s.current.0 - 50.0).abs() < 0.5);
        assert!((s.current.1 + 30.0).abs() < 0.5);
    }

    #[test]
    fn malformed_targets_are_ignored() {
        let mut s = Spring2d::new();
        s.set_target(10.0, 10.0);
        s.set_target(f64::NAN, 0.0);
        s.set_target(0.0, f64::INFINITY);
        assert_eq!(s.target, (10.0, 10.0));
    }

    #[test]
    fn oversized_dt_is_clamped() {
        let mut s = Spring2d::new();
        s.set_target(100.0, 0.0);
        // A 10-second stall integrates as one clamped 0.1s step, not a
        // catapult: k·Δ·dt² = 150·100·0.01 puts the first step at ~150.
        s.integrate(params(), 10.0);
        assert!(s.current.0.is_finite());
        assert!(s.current.0 > 0.0 && s.current.0 < 200.0);
    }

    #[test]
    fn settled_detection() {
        let mut s = Spring2d::new();
        assert!(s.is_settled(1e-6));
        s.set_target(5.0, 0.0);
        assert!(!s.is_settled(1e-6));
    }
}
