#![forbid(unsafe_code)]

//! Scroll position and clamping.
//!
//! [`ScrollLimits`] are derived from the scaled content extent and the
//! container extent; [`ScrollClamp`] caches them and projects proposed
//! positions into range.
//!
//! # Invariants
//!
//! 1. `min <= max` on every axis of limits built by
//!    [`ScrollLimits::from_extents`] (`min` is 0, `max` is never negative).
//! 2. Clamping is idempotent: `clamp(clamp(p)) == clamp(p)`.
//! 3. A position returned by [`ScrollClamp::clamp`] satisfies
//!    [`ScrollLimits::contains`] for the cached limits.

use pagepan_core::Point;

use crate::extent::Extent;

/// Scroll offset of the container, in scaled-content pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub top: f64,
    pub left: f64,
}

impl ScrollPosition {
    #[inline]
    #[must_use]
    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// The position as an `(x, y)` point.
    #[inline]
    #[must_use]
    pub fn as_point(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Build from an `(x, y)` point.
    #[inline]
    #[must_use]
    pub fn from_point(point: Point) -> Self {
        Self::new(point.y, point.x)
    }
}

/// Closed range on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Project `value` into the range.
    #[inline]
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        clamp_to_range(value, self)
    }

    #[inline]
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// `min(max(value, min), max)`.
///
/// Unlike `f64::clamp` this never panics on an inverted range; `max` wins.
#[inline]
#[must_use]
pub fn clamp_to_range(value: f64, limits: Limits) -> f64 {
    value.max(limits.min).min(limits.max)
}

/// Allowed scroll range on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollLimits {
    pub top: Limits,
    pub left: Limits,
}

impl ScrollLimits {
    #[must_use]
    pub const fn new(top: Limits, left: Limits) -> Self {
        Self { top, left }
    }

    /// Limits for `scaled_content` shown inside `container`.
    ///
    /// Content smaller than the container cannot scroll on that axis.
    #[must_use]
    pub fn from_extents(scaled_content: Extent, container: Extent) -> Self {
        Self {
            top: Limits::new(0.0, (scaled_content.height - container.height).max(0.0)),
            left: Limits::new(0.0, (scaled_content.width - container.width).max(0.0)),
        }
    }

    /// Clamp both axes.
    #[must_use]
    pub fn clamp(&self, proposed: ScrollPosition) -> ScrollPosition {
        ScrollPosition {
            top: self.top.clamp(proposed.top),
            left: self.left.clamp(proposed.left),
        }
    }

    #[must_use]
    pub fn contains(&self, position: ScrollPosition) -> bool {
        self.top.contains(position.top) && self.left.contains(position.left)
    }
}

/// Caches [`ScrollLimits`] for the current extents.
///
/// Call [`update`](ScrollClamp::update) whenever the scale or either extent
/// changes.
#[derive(Debug, Clone, Default)]
pub struct ScrollClamp {
    limits: ScrollLimits,
}

impl ScrollClamp {
    #[must_use]
    pub fn new(content: Extent, scale: f64, container: Extent) -> Self {
        Self {
            limits: ScrollLimits::from_extents(content.scaled(scale), container),
        }
    }

    /// Recompute limits. Returns true if they changed.
    pub fn update(&mut self, content: Extent, scale: f64, container: Extent) -> bool {
        let limits = ScrollLimits::from_extents(content.scaled(scale), container);
        let changed = limits != self.limits;
        self.limits = limits;
        changed
    }

    #[inline]
    #[must_use]
    pub fn limits(&self) -> ScrollLimits {
        self.limits
    }

    #[inline]
    #[must_use]
    pub fn clamp(&self, proposed: ScrollPosition) -> ScrollPosition {
        self.limits.clamp(proposed)
    }
}
