#![forbid(unsafe_code)]

//! Kinetic (momentum) scrolling after a released pan.
//!
//! The offset still to travel decays exponentially:
//!
//!   offset(t) = -amplitude × e^(-t / τ)
//!
//! Each [`KineticScroll::step`] returns the change in offset since the
//! previous step. That increment has the sign of the release velocity and is
//! applied like an ordinary pan delta.
//!
//! # Invariants
//!
//! 1. `|amplitude|` never exceeds [`KINETIC_AMPLITUDE_LIMIT`] per axis.
//! 2. With a fixed tick, successive increments strictly shrink in magnitude.
//! 3. The simulation settles once both axes of the offset fall under
//!    [`KINETIC_REST_DELTA`]. With the amplitude limit this bounds the run to
//!    about `τ × ln(2 × limit)` ≈ 2.5 s.
//! 4. A settled simulation stays settled.
//!
//! # Failure Modes
//!
//! - A `now` earlier than the start is treated as the start (zero elapsed).

use pagepan_core::Point;
use web_time::{Duration, Instant};

/// Exponential decay constant, in milliseconds.
pub const KINETIC_TAU_MS: f64 = 325.0;
/// Minimum release speed on either axis (px/s) that starts a simulation.
pub const KINETIC_VELOCITY_THRESHOLD: f64 = 25.0;
/// Per-axis cap on the simulated travel, in pixels.
pub const KINETIC_AMPLITUDE_LIMIT: f64 = 1000.0;
/// Fraction of the release velocity converted into travel.
pub const KINETIC_AMPLIFICATION: f64 = 0.8;
/// Offset magnitude below which an axis is at rest.
pub const KINETIC_REST_DELTA: f64 = 0.5;

/// Whether a release velocity is fast enough to start a simulation.
#[inline]
#[must_use]
pub fn qualifies(velocity: Point) -> bool {
    let threshold = KINETIC_VELOCITY_THRESHOLD;
    velocity.x.abs() >= threshold || velocity.y.abs() >= threshold
}

/// Post-release deceleration state.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticScroll {
    amplitude: Point,
    start: Instant,
    previous: Point,
    settled: bool,
}

impl KineticScroll {
    /// Start a simulation for `velocity` regardless of the threshold.
    #[must_use]
    pub fn start(velocity: Point, now: Instant) -> Self {
        let limit = KINETIC_AMPLITUDE_LIMIT;
        let amplitude = (velocity * KINETIC_AMPLIFICATION).map(|v| v.clamp(-limit, limit));
        Self {
            amplitude,
            start: now,
            previous: -amplitude,
            settled: false,
        }
    }

    /// Start a simulation if `velocity` [`qualifies`].
    #[must_use]
    pub fn from_release(velocity: Point, now: Instant) -> Option<Self> {
        qualifies(velocity).then(|| Self::start(velocity, now))
    }

    #[inline]
    #[must_use]
    pub fn amplitude(&self) -> Point {
        self.amplitude
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> Instant {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// `-amplitude × e^(-elapsed / τ)`.
    #[must_use]
    pub fn offset_at(&self, now: Instant) -> Point {
        let elapsed_ms = self.elapsed(now).as_secs_f64() * 1000.0;
        let factor = (-elapsed_ms / KINETIC_TAU_MS).exp();
        -(self.amplitude * factor)
    }

    /// Instantaneous velocity (px/s) of the decay at `now`.
    #[must_use]
    pub fn velocity_at(&self, now: Instant) -> Point {
        // d/dt of -offset, in px/s.
        -(self.offset_at(now) * (1000.0 / KINETIC_TAU_MS))
    }

    /// Travel not yet delivered by [`step`](KineticScroll::step).
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> Point {
        if self.settled {
            Point::ZERO
        } else {
            -self.previous
        }
    }

    /// Advance to `now`, returning the increment since the previous step, or
    /// `None` once settled.
    pub fn step(&mut self, now: Instant) -> Option<Point> {
        if self.settled {
            return None;
        }
        let offset = self.offset_at(now);
        if offset.x.abs() < KINETIC_REST_DELTA && offset.y.abs() < KINETIC_REST_DELTA {
            self.settled = true;
            return None;
        }
        let increment = offset - self.previous;
        self.previous = offset;
        Some(increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);
    const TAU: Duration = Duration::from_millis(325);

    fn now() -> Instant {
        Instant::now()
    }

    #[test]
    fn threshold_applies_per_axis() {
        assert!(!qualifies(Point::new(24.9, -24.9)));
        assert!(qualifies(Point::new(25.0, 0.0)));
        assert!(qualifies(Point::new(0.0, -30.0)));
        let slow = KineticScroll::from_release(Point::new(10.0, 10.0), now());
        assert!(slow.is_none());
    }

    #[test]
    fn amplitude_is_scaled_and_capped() {
        let k = KineticScroll::start(Point::new(40.0, -5000.0), now());
        assert!((k.amplitude().x - 32.0).abs() < 1e-12);
        assert_eq!(k.amplitude().y, -KINETIC_AMPLITUDE_LIMIT);
    }

    #[test]
    fn one_tau_leaves_e_inverse_of_amplitude() {
        let t = now();
        let k = KineticScroll::start(Point::new(40.0, 0.0), t);
        let offset = k.offset_at(t + TAU);
        assert!((offset.x.abs() - 32.0 * (-1.0f64).exp()).abs() < 1e-3);
        assert!(offset.x.abs() > KINETIC_REST_DELTA);
    }

    #[test]
    fn increments_follow_velocity_sign_and_shrink() {
        let t = now();
        let mut k = KineticScroll::start(Point::new(400.0, -200.0), t);
        let mut last = Point::new(f64::INFINITY, f64::INFINITY);
        let mut total = Point::ZERO;
        let mut ticks = 0u32;

        while let Some(inc) = k.step(t + MS_16 * (ticks + 1)) {
            assert!(inc.x > 0.0);
            assert!(inc.y < 0.0);
            assert!(inc.x.abs() < last.x.abs());
            assert!(inc.y.abs() < last.y.abs());
            last = inc;
            total += inc;
            ticks += 1;
            assert!(ticks < 1_000);
        }

        assert!(k.is_settled());
        assert_eq!(k.remaining(), Point::ZERO);
        // Everything but the sub-threshold tail was delivered.
        assert!((total.x - 320.0).abs() < 1.0);
        assert!((total.y + 160.0).abs() < 1.0);
    }

    #[test]
    fn remaining_tracks_undelivered_travel() {
        let t = now();
        let mut k = KineticScroll::start(Point::new(100.0, 0.0), t);
        assert!((k.remaining().x - 80.0).abs() < 1e-12);
        let inc = k.step(t + TAU).unwrap_or_default();
        assert!((k.remaining().x + inc.x - 80.0).abs() < 1e-9);
    }

    #[test]
    fn settled_stays_settled() {
        let t = now();
        let mut k = KineticScroll::start(Point::new(30.0, 0.0), t);
        assert!(k.step(t + Duration::from_secs(10)).is_none());
        assert!(k.step(t + MS_16).is_none());
        assert!(k.is_settled());
    }

    #[test]
    fn velocity_decays() {
        let t = now();
        let k = KineticScroll::start(Point::new(100.0, 0.0), t);
        let v0 = k.velocity_at(t);
        let v1 = k.velocity_at(t + TAU);
        assert!(v0.x > v1.x && v1.x > 0.0);
    }
}
