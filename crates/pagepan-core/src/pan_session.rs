#![forbid(unsafe_code)]

//! Per-gesture pan state.
//!
//! A [`PanSession`] lives from the first contact-down to the last contact-up
//! of one continuous interaction. It fixes the surface's client offset at the
//! moment the interaction began ([`OriginFrame`]) so that later layout changes
//! cannot make positions drift mid-gesture, and it keeps a smoothed
//! velocity estimate used to decide whether a release continues kinetically.
//!
//! # Velocity smoothing
//!
//! On every tracked move:
//!
//! ```text
//! inst = delta / max(elapsed_ms, 1) * 1000        (px/s)
//! v'   = 0.8 * inst + 0.2 * v
//! ```
//!
//! # Invariants
//!
//! 1. `last_timestamp >= start`.
//! 2. Deltas are always measured against `last_point`, which in multi-contact
//!    mode is the contact centroid rather than any single contact.

use web_time::{Duration, Instant};

use crate::geometry::Point;

/// Weight given to the newest instantaneous velocity sample.
pub const VELOCITY_SMOOTHING: f64 = 0.8;

/// Reference frame captured when an interaction begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginFrame {
    /// Client-space offset of the interaction surface.
    pub client_offset: Point,
    /// Surface-relative position of the first contact.
    pub target_origin: Point,
}

impl OriginFrame {
    /// Convert a client-space position to surface-relative coordinates.
    #[inline]
    #[must_use]
    pub fn to_target(&self, client: Point) -> Point {
        client - self.client_offset
    }
}

/// State of one continuous pan interaction.
#[derive(Debug, Clone)]
pub struct PanSession {
    origin: OriginFrame,
    start: Instant,
    last_point: Point,
    last_timestamp: Instant,
    last_velocity: Point,
}

impl PanSession {
    /// Begin a session for a first contact at `client` on a surface whose
    /// client offset is `surface_offset`.
    #[must_use]
    pub fn begin(surface_offset: Point, client: Point, now: Instant) -> Self {
        let target_origin = client - surface_offset;
        Self {
            origin: OriginFrame {
                client_offset: surface_offset,
                target_origin,
            },
            start: now,
            last_point: target_origin,
            last_timestamp: now,
            last_velocity: Point::ZERO,
        }
    }

    #[inline]
    #[must_use]
    pub fn origin(&self) -> &OriginFrame {
        &self.origin
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Instant {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn last_point(&self) -> Point {
        self.last_point
    }

    #[inline]
    #[must_use]
    pub fn last_timestamp(&self) -> Instant {
        self.last_timestamp
    }

    /// Smoothed velocity in px/s.
    #[inline]
    #[must_use]
    pub fn last_velocity(&self) -> Point {
        self.last_velocity
    }

    /// Time since the session began. Saturates to zero if `now` is earlier.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    /// Whole milliseconds since the session began.
    #[must_use]
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        u64::try_from(self.elapsed(now).as_millis()).unwrap_or(u64::MAX)
    }

    /// Delta from the last recorded point to `point`.
    #[inline]
    #[must_use]
    pub fn delta_to(&self, point: Point) -> Point {
        point - self.last_point
    }

    /// Record a move to `point`, updating the smoothed velocity.
    ///
    /// Returns the delta from the previous point.
    pub fn track(&mut self, point: Point, now: Instant) -> Point {
        let delta = self.delta_to(point);
        let since_last = now.saturating_duration_since(self.last_timestamp);
        let elapsed_ms = (since_last.as_secs_f64() * 1000.0).max(1.0);
        let instantaneous = delta / elapsed_ms * 1000.0;
        self.last_velocity =
            instantaneous * VELOCITY_SMOOTHING + self.last_velocity * (1.0 - VELOCITY_SMOOTHING);
        self.last_point = point;
        self.last_timestamp = now;
        delta
    }

    /// Move the reference point without touching velocity.
    ///
    /// Used when the contact set changes and the centroid jumps; that jump is
    /// not user motion and must not surface as a pan delta.
    pub fn rebase_point(&mut self, point: Point) {
        self.last_point = point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const EPS: f64 = 1e-9;

    #[test]
    fn begin_captures_origin_frame() {
        let t = Instant::now();
        let session = PanSession::begin(Point::new(10.0, 20.0), Point::new(15.0, 30.0), t);
        assert_eq!(session.origin().client_offset, Point::new(10.0, 20.0));
        assert_eq!(session.origin().target_origin, Point::new(5.0, 10.0));
        assert_eq!(session.last_point(), Point::new(5.0, 10.0));
        assert_eq!(session.last_velocity(), Point::ZERO);
        assert_eq!(session.elapsed_ms(t), 0);
    }

    #[test]
    fn origin_frame_converts_client_positions() {
        let offset = Point::new(100.0, 50.0);
        let session = PanSession::begin(offset, offset, Instant::now());
        assert_eq!(
            session.origin().to_target(Point::new(130.0, 40.0)),
            Point::new(30.0, -10.0)
        );
    }

    #[test]
    fn track_smooths_velocity() {
        let t = Instant::now();
        let mut session = PanSession::begin(Point::ZERO, Point::ZERO, t);

        let delta = session.track(Point::new(10.0, 0.0), t + MS_100);
        assert_eq!(delta, Point::new(10.0, 0.0));
        // 100 px/s instantaneous, weighted 0.8 against a zero history.
        assert!((session.last_velocity().x - 80.0).abs() < EPS);
        assert_eq!(session.last_velocity().y, 0.0);

        session.track(Point::new(20.0, 0.0), t + MS_100 * 2);
        // 0.8 * 100 + 0.2 * 80
        assert!((session.last_velocity().x - 96.0).abs() < EPS);
    }

    #[test]
    fn track_floors_elapsed_at_one_millisecond() {
        let t = Instant::now();
        let mut session = PanSession::begin(Point::ZERO, Point::ZERO, t);
        session.track(Point::new(1.0, 0.0), t);
        // 1px over a floored 1ms = 1000 px/s, weighted 0.8.
        assert!((session.last_velocity().x - 800.0).abs() < EPS);
    }

    #[test]
    fn rebase_point_keeps_velocity() {
        let t = Instant::now();
        let mut session = PanSession::begin(Point::ZERO, Point::ZERO, t);
        session.track(Point::new(10.0, 0.0), t + MS_100);
        let velocity = session.last_velocity();

        session.rebase_point(Point::new(50.0, 50.0));
        assert_eq!(session.last_point(), Point::new(50.0, 50.0));
        assert_eq!(session.last_velocity(), velocity);
        let delta = session.delta_to(Point::new(55.0, 50.0));
        assert_eq!(delta, Point::new(5.0, 0.0));
    }
}
