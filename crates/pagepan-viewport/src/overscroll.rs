#![forbid(unsafe_code)]

//! Overscroll hand-off.
//!
//! A pan that starts at a scroll limit and drags away from it can be handed
//! to the host (for page turning, pull-to-refresh and the like) instead of
//! scrolling. [`OverscrollGate`] decides, per gesture event, which way each
//! event goes.
//!
//! # Invariants
//!
//! 1. Once a gesture is handed off, every remaining event of that gesture is
//!    routed as overscroll. The final event clears the hand-off.
//! 2. A gesture that pinched is not eligible for hand-off. Eligibility is
//!    restored on every final event.
//! 3. Kinetic events are always scrolled.

use pagepan_core::GestureEvent;

use crate::scroll::{ScrollLimits, ScrollPosition};

/// Edges that hand off overscroll. All disabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OverscrollEdges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl OverscrollEdges {
    /// No edges.
    pub const NONE: Self = Self {
        left: false,
        right: false,
        top: false,
        bottom: false,
    };

    /// Left and right, for horizontal page turning.
    pub const HORIZONTAL: Self = Self {
        left: true,
        right: true,
        top: false,
        bottom: false,
    };

    #[must_use]
    pub fn is_enabled(&self, edge: Edge) -> bool {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// A scroll edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Checked in this order; the first match wins.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Whether `scroll` sits at this edge of `limits`.
    ///
    /// Content no larger than the container has `max == min`, so it is at
    /// both edges of that axis.
    #[must_use]
    pub fn is_at(self, scroll: ScrollPosition, limits: &ScrollLimits) -> bool {
        match self {
            Self::Left => scroll.left <= limits.left.min,
            Self::Right => scroll.left >= limits.left.max,
            Self::Top => scroll.top <= limits.top.min,
            Self::Bottom => scroll.top >= limits.top.max,
        }
    }

    /// Whether a pan delta drags content away from this edge.
    #[must_use]
    pub fn pulls_away(self, event: &GestureEvent) -> bool {
        let d = event.pan_delta;
        match self {
            Self::Left => d.x > 0.0,
            Self::Right => d.x < 0.0,
            Self::Top => d.y > 0.0,
            Self::Bottom => d.y < 0.0,
        }
    }
}

/// Where a gesture event should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Apply to the scroll position (and zoom).
    Scroll,
    /// Hand to the overscroll listener.
    Overscroll(Edge),
}

/// Per-gesture overscroll state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverscrollGate {
    edges: OverscrollEdges,
    sequence_limit: u32,
    eligible: bool,
    active: Option<Edge>,
}

impl OverscrollGate {
    #[must_use]
    pub fn new(edges: OverscrollEdges, sequence_limit: u32) -> Self {
        Self {
            edges,
            sequence_limit,
            eligible: true,
            active: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn edges(&self) -> OverscrollEdges {
        self.edges
    }

    pub fn set_edges(&mut self, edges: OverscrollEdges) {
        self.edges = edges;
    }

    pub fn set_sequence_limit(&mut self, limit: u32) {
        self.sequence_limit = limit;
    }

    #[inline]
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    /// The edge of the gesture currently handed off, if any.
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<Edge> {
        self.active
    }

    /// Route one event, given the scroll state before it is applied.
    pub fn route(
        &mut self,
        event: &GestureEvent,
        scroll: ScrollPosition,
        limits: &ScrollLimits,
    ) -> Route {
        if event.is_kinetic {
            return Route::Scroll;
        }

        let route = match self.active {
            Some(edge) => Route::Overscroll(edge),
            None => {
                if event.pinch.is_some() {
                    self.eligible = false;
                }
                match self.hand_off_edge(event, scroll, limits) {
                    Some(edge) => {
                        self.active = Some(edge);
                        Route::Overscroll(edge)
                    }
                    None => Route::Scroll,
                }
            }
        };

        if event.is_final {
            self.finish();
        }
        route
    }

    /// End the current gesture.
    pub fn finish(&mut self) {
        self.active = None;
        self.eligible = true;
    }

    fn hand_off_edge(
        &self,
        event: &GestureEvent,
        scroll: ScrollPosition,
        limits: &ScrollLimits,
    ) -> Option<Edge> {
        if !self.eligible || event.pinch.is_some() || event.sequence_count > self.sequence_limit {
            return None;
        }
        Edge::ALL.into_iter().find(|&edge| {
            self.edges.is_enabled(edge) && edge.is_at(scroll, limits) && edge.pulls_away(event)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::Limits;
    use pagepan_core::{PinchEvent, Point};

    fn pan(seq: u32, dx: f64, dy: f64) -> GestureEvent {
        GestureEvent {
            pan_delta: Point::new(dx, dy),
            pinch: None,
            is_first: seq == 1,
            is_final: false,
            sequence_count: seq,
            velocity: Point::ZERO,
            elapsed_ms: 0,
            is_kinetic: false,
        }
    }

    fn final_pan(seq: u32, dx: f64) -> GestureEvent {
        GestureEvent {
            is_final: true,
            ..pan(seq, dx, 0.0)
        }
    }

    fn limits() -> ScrollLimits {
        ScrollLimits::new(Limits::new(0.0, 500.0), Limits::new(0.0, 300.0))
    }

    fn route(gate: &mut OverscrollGate, event: GestureEvent, scroll: ScrollPosition) -> Route {
        gate.route(&event, scroll, &limits())
    }

    #[test]
    fn drag_away_from_left_edge_hands_off() {
        let mut gate = OverscrollGate::new(OverscrollEdges::HORIZONTAL, 10);
        let at_left = ScrollPosition::new(100.0, 0.0);
        let left = Route::Overscroll(Edge::Left);

        assert_eq!(route(&mut gate, pan(1, 0.0, 0.0), at_left), Route::Scroll);
        assert_eq!(route(&mut gate, pan(2, 5.0, 0.0), at_left), left);
        // Direction no longer matters once handed off.
        assert_eq!(route(&mut gate, pan(3, -50.0, 0.0), at_left), left);
        assert_eq!(route(&mut gate, final_pan(4, 0.0), at_left), left);
        assert_eq!(gate.active(), None);
    }

    #[test]
    fn drag_toward_content_scrolls() {
        let mut gate = OverscrollGate::new(OverscrollEdges::HORIZONTAL, 10);
        let at_left = ScrollPosition::new(0.0, 0.0);
        assert_eq!(route(&mut gate, pan(2, -5.0, 0.0), at_left), Route::Scroll);
    }

    #[test]
    fn right_edge_and_small_content() {
        let right = Route::Overscroll(Edge::Right);
        let mut gate = OverscrollGate::new(OverscrollEdges::HORIZONTAL, 10);
        let at_right = ScrollPosition::new(0.0, 300.0);
        assert_eq!(route(&mut gate, pan(2, -5.0, 0.0), at_right), right);

        let right_only = OverscrollEdges {
            right: true,
            ..OverscrollEdges::NONE
        };
        let mut gate = OverscrollGate::new(right_only, 10);
        let fits = ScrollLimits::default();
        let handed = gate.route(&pan(2, -5.0, 0.0), ScrollPosition::default(), &fits);
        assert_eq!(handed, right);
    }

    #[test]
    fn vertical_edges() {
        let vertical = OverscrollEdges {
            top: true,
            bottom: true,
            ..OverscrollEdges::NONE
        };
        let mut gate = OverscrollGate::new(vertical, 10);

        let at_top = ScrollPosition::new(0.0, 10.0);
        let top = route(&mut gate, pan(2, 0.0, 8.0), at_top);
        assert_eq!(top, Route::Overscroll(Edge::Top));
        gate.finish();

        let at_bottom = ScrollPosition::new(500.0, 10.0);
        let bottom = route(&mut gate, pan(2, 0.0, -8.0), at_bottom);
        assert_eq!(bottom, Route::Overscroll(Edge::Bottom));
    }

    #[test]
    fn disabled_edge_scrolls() {
        let mut gate = OverscrollGate::new(OverscrollEdges::NONE, 10);
        let origin = ScrollPosition::default();
        assert_eq!(route(&mut gate, pan(2, 5.0, 0.0), origin), Route::Scroll);
    }

    #[test]
    fn late_edge_drag_is_not_handed_off() {
        let mut gate = OverscrollGate::new(OverscrollEdges::HORIZONTAL, 10);
        let origin = ScrollPosition::default();
        assert_eq!(route(&mut gate, pan(11, 5.0, 0.0), origin), Route::Scroll);
        assert_eq!(
            route(&mut gate, pan(10, 5.0, 0.0), origin),
            Route::Overscroll(Edge::Left)
        );
    }

    #[test]
    fn pinch_revokes_eligibility_until_final() {
        let mut gate = OverscrollGate::new(OverscrollEdges::HORIZONTAL, 10);
        let origin = ScrollPosition::default();
        let pinching = GestureEvent {
            pinch: Some(PinchEvent {
                is_first: true,
                is_final: false,
                scale: 1.0,
                location: Point::ZERO,
            }),
            ..pan(2, 0.0, 0.0)
        };

        assert_eq!(route(&mut gate, pinching, origin), Route::Scroll);
        assert!(!gate.is_eligible());
        assert_eq!(route(&mut gate, pan(3, 5.0, 0.0), origin), Route::Scroll);

        assert_eq!(route(&mut gate, final_pan(4, 0.0), origin), Route::Scroll);
        assert!(gate.is_eligible());
    }

    #[test]
    fn kinetic_events_always_scroll() {
        let mut gate = OverscrollGate::new(OverscrollEdges::HORIZONTAL, 10);
        let kinetic = GestureEvent::kinetic(Point::new(5.0, 0.0), Point::ZERO, 2, 0);
        let origin = ScrollPosition::default();
        assert_eq!(route(&mut gate, kinetic, origin), Route::Scroll);
        assert_eq!(gate.active(), None);
    }
}
