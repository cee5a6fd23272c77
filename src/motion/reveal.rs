//! Staggered one-shot reveal sequences.
//!
//! A sequence owns the whitespace-split tokens of a headline and, once its
//! backing visibility trigger fires, schedules one small entrance animation
//! per token: token `i` starts at `base_delay + i * per_token_delay` and
//! runs for `duration`, mapped through the sequence curve.  The start time
//! is latched exactly once; re-entering the viewport never replays it.

use super::curve::{reveal_curve, CurveSpec};

/// Per-token stagger defaults, in time-units.
pub const DEFAULT_BASE_DELAY: f64 = 0.3;
pub const DEFAULT_TOKEN_DELAY: f64 = 0.08;
pub const DEFAULT_DURATION: f64 = 0.8;

/// Interpolated render values for one token.
///
/// `opacity` runs 0 → 1; `rise` runs 1 → 0 and is the fraction of the line
/// height the token still sits below its baseline (1 = fully hidden below,
/// 0 = settled).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenRenderState {
    pub opacity: f64,
    pub rise: f64,
}

impl TokenRenderState {
    const HIDDEN: Self = Self { opacity: 0.0, rise: 1.0 };
    const REVEALED: Self = Self { opacity: 1.0, rise: 0.0 };
}

/// A one-shot staggered sequence over an ordered token list.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    tokens: Vec<String>,
    base_delay: f64,
    per_token_delay: f64,
    duration: f64,
    curve: CurveSpec,
    started_at: Option<f64>,
}

impl RevealSequence {
    /// Split `text` on whitespace, preserving token order.
    pub fn new(text: &str) -> Self {
        Self {
            tokens: text.split_whitespace().map(str::to_owned).collect(),
            base_delay: DEFAULT_BASE_DELAY,
            per_token_delay: DEFAULT_TOKEN_DELAY,
            duration: DEFAULT_DURATION,
            curve: reveal_curve(),
            started_at: None,
        }
    }

    pub fn with_delays(mut self, base_delay: f64, per_token_delay: f64) -> Self {
        self.base_delay = base_delay.max(0.0);
        self.per_token_delay = per_token_delay.max(0.0);
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Latch the sequence start.  Only the first call has any effect —
    /// the one-shot semantics live here, not in the caller.
    pub fn start(&mut self, now: f64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Derived start time of token `index`.  Never stored.
    fn token_start(&self, index: usize) -> Option<f64> {
        self.started_at
            .map(|s| s + self.base_delay + index as f64 * self.per_token_delay)
    }

    /// Compute the render state of every token at `now`.  Tokens before
    /// their start render hidden, finished tokens render settled, and
    /// in-flight tokens interpolate through the curve.
    pub fn advance(&self, now: f64) -> Vec<TokenRenderState> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let Some(start) = self.token_start(i) else {
                    return TokenRenderState::HIDDEN;
                };
                let t = now - start;
                if t <= 0.0 {
                    TokenRenderState::HIDDEN
                } else if t >= self.duration {
                    TokenRenderState::REVEALED
                } else {
                    let eased = self.curve.evaluate(t / self.duration);
                    TokenRenderState { opacity: eased, rise: 1.0 - eased }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_on_whitespace_preserving_order() {
        let seq = RevealSequence::new("Building   trust.\nAt scale");
        assert_eq!(seq.tokens(), &["Building", "trust.", "At", "scale"]);
    }

    #[test]
    fn token_start_times_are_staggered() {
        let mut seq = RevealSequence::new("Building trust.").with_delays(0.3, 0.08);
        seq.start(0.0);

        // Token 0 starts at 0.3, token 1 at 0.38.
        let eps = 1e-3;
        let states = seq.advance(0.3 - eps);
        assert_eq!(states[0], TokenRenderState::HIDDEN);
        let states = seq.advance(0.3 + eps);
        assert!(states[0].opacity > 0.0);
        assert_eq!(states[1], TokenRenderState::HIDDEN);
        let states = seq.advance(0.38 + eps);
        assert!(states[1].opacity > 0.0);
    }

    #[test]
    fn start_latches_once() {
        let mut seq = RevealSequence::new("one two");
        seq.start(5.0);
        // Re-evaluated trigger conditions must not shift the schedule.
        seq.start(9.0);
        seq.start(100.0);

        let states = seq.advance(5.3 + 1e-3);
        assert!(states[0].opacity > 0.0, "schedule moved after re-trigger");
    }

    #[test]
    fn unstarted_sequence_is_hidden() {
        let seq = RevealSequence::new("still hidden");
        for s in seq.advance(1_000.0) {
            assert_eq!(s, TokenRenderState::HIDDEN);
        }
    }

    #[test]
    fn finished_tokens_settle() {
        let mut seq = RevealSequence::new("a b c");
        seq.start(0.0);
        for s in seq.advance(50.0) {
            assert_eq!(s, TokenRenderState::REVEALED);
        }
    }

    #[test]
    fn in_flight_token_interpolates() {
        let mut seq = RevealSequence::new("word");
        seq.start(0.0);
        let s = seq.advance(0.3 + 0.4)[0]; // halfway through its 0.8s run
        assert!(s.opacity > 0.0 && s.opacity < 1.0);
        assert!((s.opacity + s.rise - 1.0).abs() < 1e-12);
    }
}
