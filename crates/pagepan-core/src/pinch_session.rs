#![forbid(unsafe_code)]

//! Per-pinch scale bookkeeping.
//!
//! A [`PinchSession`] exists while two or more contacts are down. It keeps a
//! reference span measure, the last observed measure, and a carried scale
//! multiplier:
//!
//! ```text
//! current_ratio = (last_measure / reference_measure) * scale_multiplier
//! ```
//!
//! Whenever the contact count changes while pinching, the session is
//! *rebased*: the current ratio becomes the new multiplier and a freshly
//! measured span becomes the new reference. The ratio is therefore continuous
//! across contact-count changes even though the measure itself switches
//! between distance (two contacts) and hull area (three or more).
//!
//! # Invariants
//!
//! 1. `current_ratio()` immediately after `rebase()` equals `current_ratio()`
//!    immediately before it.
//! 2. A zero reference measure is never divided by. A session whose reference
//!    is zero is *unarmed*: its ratio is its multiplier, and it arms on the
//!    first nonzero measure it observes.
//! 3. An armed session never records a degenerate measure, so
//!    `current_ratio()` stays positive and a rebase never carries a zero
//!    multiplier.

/// Scale bookkeeping for one pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSession {
    reference_measure: f64,
    last_measure: f64,
    scale_multiplier: f64,
}

impl PinchSession {
    /// Start a fresh pinch at `measure` with multiplier 1.
    #[must_use]
    pub fn begin(measure: f64) -> Self {
        Self::with_multiplier(measure, 1.0)
    }

    /// Start a pinch at `measure` carrying `scale_multiplier` forward.
    #[must_use]
    pub fn with_multiplier(measure: f64, scale_multiplier: f64) -> Self {
        let measure = usable(measure);
        Self {
            reference_measure: measure,
            last_measure: measure,
            scale_multiplier,
        }
    }

    #[inline]
    #[must_use]
    pub fn reference_measure(&self) -> f64 {
        self.reference_measure
    }

    #[inline]
    #[must_use]
    pub fn last_measure(&self) -> f64 {
        self.last_measure
    }

    #[inline]
    #[must_use]
    pub fn scale_multiplier(&self) -> f64 {
        self.scale_multiplier
    }

    /// Whether the reference measure can be divided by.
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.reference_measure > 0.0
    }

    /// Record a newly measured span.
    ///
    /// Degenerate measures (collinear or coincident contacts) are skipped
    /// once armed; the last usable measure stays in effect.
    pub fn observe(&mut self, measure: f64) {
        let measure = usable(measure);
        if !self.is_armed() {
            self.reference_measure = measure;
        } else if measure == 0.0 {
            return;
        }
        self.last_measure = measure;
    }

    /// Scale ratio relative to the start of the pinch, including the carried
    /// multiplier.
    #[must_use]
    pub fn current_ratio(&self) -> f64 {
        if self.is_armed() {
            (self.last_measure / self.reference_measure) * self.scale_multiplier
        } else {
            self.scale_multiplier
        }
    }

    /// Re-capture the reference at `measure`, carrying the current ratio.
    pub fn rebase(&mut self, measure: f64) {
        *self = Self::with_multiplier(measure, self.current_ratio());
    }
}

/// Non-finite or negative measures are treated as degenerate.
fn usable(measure: f64) -> f64 {
    if measure.is_finite() && measure > 0.0 {
        measure
    } else {
        0.0
    }
}
