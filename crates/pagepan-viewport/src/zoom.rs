#![forbid(unsafe_code)]

//! Pinch-to-zoom resolution.
//!
//! Converts pinch events into a new displayed scale and a scroll position
//! that keeps the pinch location visually fixed.
//!
//! # Invariants
//!
//! 1. The displayed and persisted scales always lie in
//!    [`MIN_SCALE`, `MAX_SCALE`].
//! 2. Without a concurrent pan delta, the anchor keeps its fractional
//!    position in the content: `(loc + new_scroll) / new_extent ==
//!    (loc + old_scroll) / old_extent`, up to rounding.
//! 3. The pinch ratio reported by the dispatcher is never clamped; only the
//!    effective ratio held here is. Pinching past a bound and back tracks
//!    smoothly.
//!
//! # Failure Modes
//!
//! - A NaN ratio is ignored. An infinite ratio resolves to the nearest bound.
//! - A zero-sized content axis yields an anchor fraction of 0 on that axis.

use pagepan_core::{PinchEvent, Point};

use crate::extent::Extent;
use crate::scroll::ScrollPosition;

/// Smallest displayed scale.
pub const MIN_SCALE: f64 = 1.0;
/// Largest displayed scale.
pub const MAX_SCALE: f64 = 10.0;

/// Clamp a scale into `[MIN_SCALE, MAX_SCALE]`. NaN maps to `MIN_SCALE`.
#[inline]
#[must_use]
pub fn bound_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return MIN_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Result of one zoom step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStep {
    /// New displayed scale.
    pub scale: f64,
    /// Unclamped scroll position that keeps the anchor fixed.
    pub scroll: ScrollPosition,
}

/// Position of `location` as a fraction of the scaled content, per axis.
#[must_use]
pub fn anchor_fraction(location: Point, scroll: ScrollPosition, scaled_content: Extent) -> Point {
    let axis = |offset: f64, extent: f64| {
        if extent > 0.0 { offset / extent } else { 0.0 }
    };
    Point::new(
        axis(location.x + scroll.left, scaled_content.width),
        axis(location.y + scroll.top, scaled_content.height),
    )
}

/// One zoom step as a pure function.
///
/// `persisted_scale * ratio` is bounded, the content is rescaled, and the
/// scroll is chosen so that `location` stays over the same content point,
/// less any pan delta carried by the same event.
#[must_use]
pub fn resolve_zoom(
    persisted_scale: f64,
    ratio: f64,
    location: Point,
    pan_delta: Point,
    scroll: ScrollPosition,
    content: Extent,
    current_scale: f64,
) -> ZoomStep {
    let fraction = anchor_fraction(location, scroll, content.scaled(current_scale));
    let scale = bound_scale(persisted_scale * ratio);
    let extent = content.scaled(scale);

    ZoomStep {
        scale,
        scroll: ScrollPosition {
            left: extent.width * fraction.x - location.x - pan_delta.x,
            top: extent.height * fraction.y - location.y - pan_delta.y,
        },
    }
}

/// Stateful resolver across pinch sessions.
///
/// Holds the scale persisted by the last finished pinch and the bounded
/// ratio applied on top of it by the pinch in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchZoom {
    persisted_scale: f64,
    effective_ratio: f64,
}

impl Default for PinchZoom {
    fn default() -> Self {
        Self::new(MIN_SCALE)
    }
}

impl PinchZoom {
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self {
            persisted_scale: bound_scale(scale),
            effective_ratio: 1.0,
        }
    }

    /// Scale persisted by the last finished pinch.
    #[inline]
    #[must_use]
    pub fn persisted_scale(&self) -> f64 {
        self.persisted_scale
    }

    /// Ratio applied by the pinch in progress, already bounded.
    #[inline]
    #[must_use]
    pub fn effective_ratio(&self) -> f64 {
        self.effective_ratio
    }

    /// `persisted_scale * effective_ratio`.
    #[inline]
    #[must_use]
    pub fn displayed_scale(&self) -> f64 {
        bound_scale(self.persisted_scale * self.effective_ratio)
    }

    /// Replace the persisted scale, abandoning any pinch in progress.
    pub fn set_scale(&mut self, scale: f64) {
        self.persisted_scale = bound_scale(scale);
        self.effective_ratio = 1.0;
    }

    /// Apply a pinch event.
    ///
    /// Returns `None` when nothing changes (the opening event of a pinch, or
    /// a NaN ratio). On the closing event the displayed scale is persisted
    /// and the scroll is left where it is.
    pub fn apply(
        &mut self,
        pinch: &PinchEvent,
        pan_delta: Point,
        scroll: ScrollPosition,
        content: Extent,
        current_scale: f64,
    ) -> Option<ZoomStep> {
        if pinch.is_first {
            self.persisted_scale = bound_scale(current_scale);
            self.effective_ratio = 1.0;
            return None;
        }
        if pinch.scale.is_nan() {
            return None;
        }

        if pinch.is_final {
            self.persisted_scale = bound_scale(self.persisted_scale * pinch.scale);
            self.effective_ratio = 1.0;
            return Some(ZoomStep {
                scale: self.persisted_scale,
                scroll,
            });
        }

        let step = resolve_zoom(
            self.persisted_scale,
            pinch.scale,
            pinch.location,
            pan_delta,
            scroll,
            content,
            current_scale,
        );
        self.effective_ratio = step.scale / self.persisted_scale;
        Some(step)
    }
}
