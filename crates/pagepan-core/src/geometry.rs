#![forbid(unsafe_code)]

//! Geometric primitives and reductions over contact positions.
//!
//! All functions here are pure. They operate on surface-relative [`Point`]s
//! and are used by the dispatcher to fold a variable number of contacts into
//! a single location ([`centroid`]) and a single spread scalar
//! ([`span_measure`]).
//!
//! # Span measure
//!
//! | contacts | measure                                   |
//! |----------|-------------------------------------------|
//! | 0 or 1   | `0.0`                                     |
//! | 2        | Euclidean distance between the two points |
//! | 3+       | area of the convex hull of the points     |
//!
//! The hull area grows monotonically as contacts spread apart regardless of
//! how many contacts are down, so the ratio of two measures taken over the
//! same contact set is a usable scale factor.
//!
//! # Failure Modes
//!
//! - [`centroid`] of an empty slice has no meaning. Callers must pass at
//!   least one point; debug builds assert this and release builds return
//!   [`Point::ZERO`].
//! - A measure of `0.0` (fewer than two points, coincident or collinear
//!   contacts) must never be used as a divisor.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A 2D point (or vector) in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin / zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a vector.
    #[inline]
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Apply `f` to both components.
    #[inline]
    #[must_use]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y))
    }

    /// Whether both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Arithmetic mean of `points`.
///
/// Callers must guarantee at least one point.
#[must_use]
pub fn centroid(points: &[Point]) -> Point {
    debug_assert!(!points.is_empty(), "centroid of an empty point set");
    if points.is_empty() {
        return Point::ZERO;
    }
    let sum = points.iter().fold(Point::ZERO, |acc, &p| acc + p);
    sum / points.len() as f64
}

/// Euclidean distance between `a` and `b`.
#[inline]
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).length()
}

/// Scalar spread of a contact set. See the module docs for the table.
#[must_use]
pub fn span_measure(points: &[Point]) -> f64 {
    match points {
        [] | [_] => 0.0,
        [a, b] => distance(*a, *b),
        _ => polygon_area(&convex_hull(points)),
    }
}

/// Convex hull of `points` in counter-clockwise order (Andrew's monotone chain).
///
/// Collinear points on hull edges are dropped, so a fully collinear input
/// collapses to its two extreme points.
#[must_use]
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| match a.x.total_cmp(&b.x) {
        Ordering::Equal => a.y.total_cmp(&b.y),
        other => other,
    });
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() * 2);

    // Lower hull
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    // Upper hull
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // Last point repeats the first.
    hull.pop();
    hull
}

/// Area of a simple polygon given its vertices in order (shoelace formula).
#[must_use]
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let twice: f64 = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() / 2.0
}

/// Z component of `(a - o) × (b - o)`; positive for a counter-clockwise turn.
#[inline]
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
