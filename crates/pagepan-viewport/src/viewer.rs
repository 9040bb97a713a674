#![forbid(unsafe_code)]

//! The page viewer: a gesture dispatcher plus the viewport state it drives.
//!
//! [`Viewer`] feeds contact events to a [`GestureDispatcher`] and applies
//! each resulting [`GestureEvent`]:
//!
//! - pinch events go through [`PinchZoom`] and update the displayed scale;
//! - pan events move the scroll position;
//! - events handed off by the [`OverscrollGate`] go to the overscroll
//!   listener instead;
//! - a fast enough release starts a [`KineticScroll`], advanced by
//!   [`tick`](Viewer::tick) and cancelled by the next contact-down.
//!
//! Every scroll update goes through the [`ScrollClamp`].
//!
//! # Invariants
//!
//! 1. `scroll` is always within the limits for the current content extent,
//!    scale and container extent.
//! 2. `scale` is always within [`MIN_SCALE`](crate::MIN_SCALE) and
//!    [`MAX_SCALE`](crate::MAX_SCALE).
//! 3. At most one kinetic simulation exists, and none exists while a contact
//!    is down.

use pagepan_core::{
    ContactEvent, ContactPhase, GestureDispatcher, GestureEvent, GestureListener, GesturePhase,
    Point,
};
use web_time::Instant;

use crate::config::ViewerConfig;
use crate::extent::{Extent, fit_to_container};
use crate::kinetic::KineticScroll;
use crate::overscroll::{OverscrollGate, Route};
use crate::scroll::{ScrollClamp, ScrollLimits, ScrollPosition};
use crate::zoom::PinchZoom;

type BoxedListener = Box<dyn GestureListener>;

/// Touch-driven page viewport.
pub struct Viewer {
    config: ViewerConfig,
    dispatcher: GestureDispatcher,
    content: Extent,
    container: Extent,
    scroll: ScrollPosition,
    scale: f64,
    clamp: ScrollClamp,
    zoom: PinchZoom,
    overscroll: OverscrollGate,
    kinetic: Option<KineticScroll>,
    kinetic_sequence: u32,
    kinetic_base_ms: u64,
    listener: Option<BoxedListener>,
    overscroll_listener: Option<BoxedListener>,
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("phase", &self.dispatcher.phase())
            .field("content", &self.content)
            .field("container", &self.container)
            .field("scroll", &self.scroll)
            .field("scale", &self.scale)
            .field("kinetic", &self.kinetic.is_some())
            .field("overscroll", &self.overscroll.active())
            .finish_non_exhaustive()
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Viewer {
    /// Create a viewer with zero-sized content and container.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let zoom = PinchZoom::default();
        Self {
            dispatcher: GestureDispatcher::new(config.gesture_config()),
            content: Extent::default(),
            container: Extent::default(),
            scroll: ScrollPosition::default(),
            scale: zoom.persisted_scale(),
            clamp: ScrollClamp::default(),
            zoom,
            overscroll: OverscrollGate::new(config.overscroll, config.overscroll_sequence_limit),
            kinetic: None,
            kinetic_sequence: 0,
            kinetic_base_ms: 0,
            listener: None,
            overscroll_listener: None,
            config,
        }
    }

    /// Set the unscaled content and container extents.
    #[must_use]
    pub fn with_extents(mut self, content: Extent, container: Extent) -> Self {
        self.content = content;
        self.container = container;
        self.refresh_limits();
        self
    }

    /// Observe every gesture event, including kinetic increments.
    #[must_use]
    pub fn with_listener(mut self, listener: impl GestureListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Observe events handed off at an overscroll edge.
    #[must_use]
    pub fn with_overscroll_listener(mut self, listener: impl GestureListener + 'static) -> Self {
        self.overscroll_listener = Some(Box::new(listener));
        self
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Process one contact event. Returns the gesture events it produced.
    pub fn handle_contact(&mut self, event: &ContactEvent, now: Instant) -> Vec<GestureEvent> {
        if event.phase == ContactPhase::Down && self.kinetic.take().is_some() {
            tracing::debug!(id = event.id, "kinetic scroll cancelled by contact-down");
        }

        let gestures = self.dispatcher.process(event, now);
        for gesture in &gestures {
            self.apply(gesture, now);
        }
        gestures
    }

    /// Advance the kinetic simulation. Returns true while it is running.
    ///
    /// Emitted kinetic events continue the released gesture: their
    /// `sequence_count` and `elapsed_ms` carry on from its final event.
    ///
    /// Call every [`ViewerConfig::kinetic_tick`] while
    /// [`is_kinetic_active`](Self::is_kinetic_active).
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(kinetic) = self.kinetic.as_mut() else {
            return false;
        };

        let Some(increment) = kinetic.step(now) else {
            tracing::debug!(scroll = ?self.scroll, "kinetic scroll settled");
            self.kinetic = None;
            return false;
        };

        self.kinetic_sequence = self.kinetic_sequence.saturating_add(1);
        let since_release = kinetic.elapsed(now).as_millis();
        let since_release = u64::try_from(since_release).unwrap_or(u64::MAX);
        let elapsed_ms = self.kinetic_base_ms.saturating_add(since_release);
        let event = GestureEvent::kinetic(
            increment,
            kinetic.velocity_at(now),
            self.kinetic_sequence,
            elapsed_ms,
        );

        self.pan_by(increment);
        self.notify(&event);
        true
    }

    /// Stop any kinetic simulation in place.
    pub fn stop_kinetic(&mut self) {
        if self.kinetic.take().is_some() {
            tracing::debug!("kinetic scroll stopped");
        }
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Update the unscaled content extent and re-clamp the scroll.
    pub fn set_content_extent(&mut self, content: Extent) {
        tracing::debug!(
            width = content.width,
            height = content.height,
            "content extent changed"
        );
        self.content = content;
        self.refresh_limits();
    }

    /// Update the container extent and re-clamp the scroll.
    pub fn set_container_extent(&mut self, container: Extent) {
        tracing::debug!(
            width = container.width,
            height = container.height,
            "container extent changed"
        );
        self.container = container;
        self.refresh_limits();
    }

    /// Size the content to fit the container at the given aspect ratio.
    pub fn fit_content(&mut self, aspect_ratio: f64) {
        self.set_content_extent(fit_to_container(self.container, aspect_ratio));
    }

    /// Client-space offset of the interaction surface.
    pub fn set_surface_offset(&mut self, offset: Point) {
        self.dispatcher.set_surface_offset(offset);
    }

    /// Scroll to `position`, clamped.
    pub fn scroll_to(&mut self, position: ScrollPosition) {
        self.scroll = self.clamp.clamp(position);
    }

    /// Replace the scale, keeping the scroll clamped.
    pub fn set_scale(&mut self, scale: f64) {
        self.zoom.set_scale(scale);
        self.scale = self.zoom.persisted_scale();
        self.refresh_limits();
    }

    /// Replace the configuration. A gesture in progress keeps running.
    pub fn set_config(&mut self, config: ViewerConfig) {
        self.dispatcher.set_config(config.gesture_config());
        self.overscroll.set_edges(config.overscroll);
        self.overscroll
            .set_sequence_limit(config.overscroll_sequence_limit);
        self.config = config;
    }

    // -----------------------------------------------------------------------
    // Observable state
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn scroll(&self) -> ScrollPosition {
        self.scroll
    }

    /// Displayed scale.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale persisted by the last finished pinch.
    #[inline]
    #[must_use]
    pub fn persisted_scale(&self) -> f64 {
        self.zoom.persisted_scale()
    }

    #[inline]
    #[must_use]
    pub fn limits(&self) -> ScrollLimits {
        self.clamp.limits()
    }

    #[inline]
    #[must_use]
    pub fn content_extent(&self) -> Extent {
        self.content
    }

    #[inline]
    #[must_use]
    pub fn container_extent(&self) -> Extent {
        self.container
    }

    /// Content extent at the displayed scale.
    #[inline]
    #[must_use]
    pub fn scaled_content_extent(&self) -> Extent {
        self.content.scaled(self.scale)
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.dispatcher.phase()
    }

    /// Whether the host should suppress native scroll and selection.
    #[inline]
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.dispatcher.is_capturing()
    }

    #[inline]
    #[must_use]
    pub fn is_kinetic_active(&self) -> bool {
        self.kinetic.is_some()
    }

    #[inline]
    #[must_use]
    pub fn kinetic(&self) -> Option<&KineticScroll> {
        self.kinetic.as_ref()
    }

    /// Whether the gesture in progress has been handed off as overscroll.
    #[inline]
    #[must_use]
    pub fn is_overscrolling(&self) -> bool {
        self.overscroll.active().is_some()
    }

    #[inline]
    #[must_use]
    pub fn dispatcher(&self) -> &GestureDispatcher {
        &self.dispatcher
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

impl Viewer {
    fn apply(&mut self, event: &GestureEvent, now: Instant) {
        let limits = self.clamp.limits();
        let route = self.overscroll.route(event, self.scroll, &limits);

        match route {
            Route::Overscroll(edge) => {
                if event.is_final {
                    tracing::debug!(?edge, "overscroll gesture finished");
                }
                self.notify(event);
                if let Some(listener) = self.overscroll_listener.as_mut() {
                    listener.on_gesture(event);
                }
                return;
            }
            Route::Scroll => {}
        }

        match event.pinch {
            Some(pinch) => {
                let step = self.zoom.apply(
                    &pinch,
                    event.pan_delta,
                    self.scroll,
                    self.content,
                    self.scale,
                );
                if let Some(step) = step {
                    if pinch.is_final {
                        tracing::debug!(scale = step.scale, "pinch finished");
                    }
                    self.scale = step.scale;
                    self.clamp.update(self.content, self.scale, self.container);
                    self.scroll = self.clamp.clamp(step.scroll);
                }
            }
            None => self.pan_by(event.pan_delta),
        }

        if event.is_final {
            self.kinetic_sequence = event.sequence_count;
            self.kinetic_base_ms = event.elapsed_ms;
            self.kinetic = KineticScroll::from_release(event.velocity, now);
            if let Some(kinetic) = &self.kinetic {
                tracing::debug!(
                    velocity = ?event.velocity,
                    amplitude = ?kinetic.amplitude(),
                    "kinetic scroll started"
                );
            }
        }

        self.notify(event);
    }

    /// Content follows the contact, so the scroll moves against the delta.
    fn pan_by(&mut self, delta: Point) {
        let proposed = ScrollPosition::from_point(self.scroll.as_point() - delta);
        self.scroll = self.clamp.clamp(proposed);
    }

    fn refresh_limits(&mut self) {
        self.clamp.update(self.content, self.scale, self.container);
        self.scroll = self.clamp.clamp(self.scroll);
    }

    fn notify(&mut self, event: &GestureEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_gesture(event);
        }
    }
}
