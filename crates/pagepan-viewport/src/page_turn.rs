#![forbid(unsafe_code)]

//! Page-turn swipe classification on horizontal overscroll.
//!
//! Feed [`PageTurn::on_overscroll`] the events the viewer hands off at the
//! left/right edges. The accumulated translation follows the finger within
//! the page width; on the final event the swipe resolves to a
//! [`PageTurnDecision`].

use pagepan_core::GestureEvent;

use crate::scroll::Limits;

/// Swipe thresholds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PageTurnConfig {
    /// A swipe released within this many milliseconds turns the page in any
    /// distance. Default: 250.
    pub swipe_threshold_ms: u64,
    /// Otherwise the drag must exceed this fraction of the page width.
    /// Default: 2/3.
    pub change_page_fraction: f64,
}

impl Default for PageTurnConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_ms: 250,
            change_page_fraction: 2.0 / 3.0,
        }
    }
}

/// Outcome of a finished swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageTurnDecision {
    Previous,
    Next,
    /// Snap back to the current page.
    Settle,
}

/// Swipe state for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTurn {
    config: PageTurnConfig,
    width: f64,
    has_previous: bool,
    has_next: bool,
    translate: f64,
}

impl PageTurn {
    #[must_use]
    pub fn new(config: PageTurnConfig, width: f64, has_previous: bool, has_next: bool) -> Self {
        Self {
            config,
            width,
            has_previous,
            has_next,
            translate: 0.0,
        }
    }

    /// Update neighbours and width, e.g. after a page change or resize.
    pub fn set_page(&mut self, width: f64, has_previous: bool, has_next: bool) {
        self.width = width;
        self.has_previous = has_previous;
        self.has_next = has_next;
        self.translate = 0.0;
    }

    /// Current horizontal translation of the page, for rendering.
    #[inline]
    #[must_use]
    pub fn translate(&self) -> f64 {
        self.translate
    }

    /// Allowed translation: dragging right reveals the previous page,
    /// dragging left the next one.
    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits::new(
            if self.has_next { -self.width } else { 0.0 },
            if self.has_previous { self.width } else { 0.0 },
        )
    }

    /// Accumulate one handed-off event. Returns a decision on the final event.
    pub fn on_overscroll(&mut self, event: &GestureEvent) -> Option<PageTurnDecision> {
        self.translate = self.limits().clamp(self.translate + event.pan_delta.x);
        if !event.is_final {
            return None;
        }

        let decision = self.decide(event.elapsed_ms);
        self.translate = 0.0;
        Some(decision)
    }

    fn decide(&self, elapsed_ms: u64) -> PageTurnDecision {
        let quick = elapsed_ms <= self.config.swipe_threshold_ms;
        let far = self.width * self.config.change_page_fraction;

        if self.has_previous && ((quick && self.translate > 0.0) || self.translate > far) {
            PageTurnDecision::Previous
        } else if self.has_next && ((quick && self.translate < 0.0) || self.translate < -far) {
            PageTurnDecision::Next
        } else {
            PageTurnDecision::Settle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagepan_core::Point;

    fn drag(dx: f64, elapsed_ms: u64, is_final: bool) -> GestureEvent {
        GestureEvent {
            pan_delta: Point::new(dx, 0.0),
            pinch: None,
            is_first: false,
            is_final,
            sequence_count: 2,
            velocity: Point::ZERO,
            elapsed_ms,
            is_kinetic: false,
        }
    }

    fn release(turn: &mut PageTurn, elapsed_ms: u64) -> Option<PageTurnDecision> {
        turn.on_overscroll(&drag(0.0, elapsed_ms, true))
    }

    #[test]
    fn quick_flick_turns_page() {
        let mut turn = PageTurn::new(PageTurnConfig::default(), 300.0, true, true);
        assert_eq!(turn.on_overscroll(&drag(20.0, 80, false)), None);
        assert_eq!(release(&mut turn, 120), Some(PageTurnDecision::Previous));
        assert_eq!(turn.translate(), 0.0);

        turn.on_overscroll(&drag(-20.0, 80, false));
        assert_eq!(release(&mut turn, 120), Some(PageTurnDecision::Next));
    }

    #[test]
    fn slow_drag_needs_two_thirds() {
        let mut turn = PageTurn::new(PageTurnConfig::default(), 300.0, true, true);
        turn.on_overscroll(&drag(150.0, 400, false));
        assert_eq!(release(&mut turn, 600), Some(PageTurnDecision::Settle));

        turn.on_overscroll(&drag(250.0, 400, false));
        assert_eq!(release(&mut turn, 600), Some(PageTurnDecision::Previous));
    }

    #[test]
    fn translation_is_clamped_to_available_pages() {
        let mut turn = PageTurn::new(PageTurnConfig::default(), 300.0, false, true);
        assert_eq!(turn.limits(), Limits::new(-300.0, 0.0));

        turn.on_overscroll(&drag(50.0, 10, false));
        assert_eq!(turn.translate(), 0.0);
        assert_eq!(release(&mut turn, 20), Some(PageTurnDecision::Settle));

        turn.on_overscroll(&drag(-900.0, 400, false));
        assert_eq!(turn.translate(), -300.0);
        assert_eq!(release(&mut turn, 500), Some(PageTurnDecision::Next));
    }

    #[test]
    fn set_page_resets_translation() {
        let mut turn = PageTurn::new(PageTurnConfig::default(), 300.0, true, true);
        turn.on_overscroll(&drag(40.0, 10, false));
        turn.set_page(200.0, true, false);
        assert_eq!(turn.translate(), 0.0);
        assert_eq!(turn.limits(), Limits::new(0.0, 200.0));
    }
}
