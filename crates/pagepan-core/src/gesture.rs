#![forbid(unsafe_code)]

//! Gesture dispatch: fuses raw contact streams into pan/pinch gesture events.
//!
//! [`GestureDispatcher`] consumes [`ContactEvent`]s, maintains the
//! [`ContactTracker`], [`PanSession`] and [`PinchSession`], and emits one
//! normalized [`GestureEvent`] per handled contact event.
//!
//! # State Machine
//!
//! | state    | event                  | next     | emitted                                  |
//! |----------|------------------------|----------|------------------------------------------|
//! | Idle     | down (1st)             | Panning  | `is_first`, zero delta                    |
//! | Panning  | down (2nd)             | Pinching | pinch `is_first`, scale 1, centroid       |
//! | Pinching | down (Nth, N ≥ 3)      | Pinching | pinch with carried scale; rebase          |
//! | Panning  | move                   | Panning  | delta + velocity                          |
//! | Pinching | move                   | Pinching | centroid delta + pinch scale/location     |
//! | Panning  | up (last)              | Idle     | `is_final`, delta, velocity               |
//! | Pinching | up (drops to 1)        | Panning  | pinch `is_final`                          |
//! | Pinching | up (still ≥ 2)         | Pinching | pinch with carried scale; rebase          |
//!
//! # Invariants
//!
//! 1. The contact count is 0 in `Idle`, exactly 1 in `Panning` and ≥ 2 in
//!    `Pinching`. Checked with `debug_assert!` after every event.
//! 2. A pan session exists iff at least one contact is down; a pinch session
//!    exists iff at least two are. Both are carried by the phase enum, so a
//!    pinch operation without a pinch session cannot be expressed.
//! 3. `sequence_count` starts at 1 on the first contact-down of a gesture and
//!    increases by exactly 1 per emitted event.
//! 4. After [`reset`](GestureDispatcher::reset) the dispatcher is `Idle` with
//!    no tracked contacts and emits nothing.
//!
//! # Failure Modes
//!
//! - Host anomalies are ignored: a move or up for an id that is not tracked
//!   emits nothing. A second down for a tracked id is treated as a move.
//! - A down or move at a non-finite position is ignored. An up at a
//!   non-finite position lifts the contact where it was last seen.
//! - While disabled, a contact-down in `Idle` is ignored, so the whole
//!   interaction it would have started is ignored too. A gesture already in
//!   progress runs to completion.

use web_time::Instant;

use crate::contact::{ContactEvent, ContactId, ContactPhase, ContactPoint, ContactTracker};
use crate::geometry::{Point, centroid, span_measure};
use crate::pan_session::PanSession;
use crate::pinch_session::PinchSession;

// ---------------------------------------------------------------------------
// Output events
// ---------------------------------------------------------------------------

/// Scale component of a gesture event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchEvent {
    /// Emitted when the second contact arrives.
    pub is_first: bool,
    /// Emitted when the contact count drops back to one.
    pub is_final: bool,
    /// Current span ratio times the carried multiplier.
    pub scale: f64,
    /// Centroid of the contacts, surface-relative.
    pub location: Point,
}

/// A normalized gesture event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    /// Movement of the tracked point (single contact or centroid) since the
    /// previous event.
    pub pan_delta: Point,
    /// Present while two or more contacts are down.
    pub pinch: Option<PinchEvent>,
    /// First event of an interaction.
    pub is_first: bool,
    /// Last event of an interaction.
    pub is_final: bool,
    /// 1-based position of this event within its interaction.
    pub sequence_count: u32,
    /// Smoothed velocity in px/s.
    pub velocity: Point,
    /// Milliseconds since the interaction began.
    pub elapsed_ms: u64,
    /// Synthesized by a kinetic scroll rather than by a contact.
    pub is_kinetic: bool,
}

impl GestureEvent {
    /// A kinetic-scroll increment, shaped like an ordinary pan event so that
    /// consumers can apply it the same way.
    ///
    /// `sequence_count` and `elapsed_ms` continue from the released
    /// gesture, so kinetic events read like the tail of that interaction.
    #[must_use]
    pub fn kinetic(
        pan_delta: Point,
        velocity: Point,
        sequence_count: u32,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            pan_delta,
            pinch: None,
            is_first: false,
            is_final: false,
            sequence_count,
            velocity,
            elapsed_ms,
            is_kinetic: true,
        }
    }
}

/// Observer of emitted gesture events.
pub trait GestureListener {
    fn on_gesture(&mut self, event: &GestureEvent);
}

impl<F: FnMut(&GestureEvent)> GestureListener for F {
    fn on_gesture(&mut self, event: &GestureEvent) {
        self(event);
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Dispatcher options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureConfig {
    /// When false, new interactions are ignored (read-only surfaces).
    pub enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// Observable dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Idle,
    Panning,
    Pinching,
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Panning {
        pan: PanSession,
    },
    Pinching {
        pan: PanSession,
        pinch: PinchSession,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    First,
    Continue,
    Final,
}

// ---------------------------------------------------------------------------
// GestureDispatcher
// ---------------------------------------------------------------------------

/// Stateful pan/pinch recognizer.
///
/// Call [`process`](GestureDispatcher::process) (or
/// [`dispatch`](GestureDispatcher::dispatch) to deliver to a listener) for
/// each contact event, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct GestureDispatcher {
    config: GestureConfig,
    surface_offset: Point,
    contacts: ContactTracker,
    phase: Phase,
    sequence: u32,
}

impl GestureDispatcher {
    /// Create a dispatcher with the given configuration.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Process a contact event, returning the gesture events it produced
    /// (zero or one).
    pub fn process(&mut self, event: &ContactEvent, now: Instant) -> Vec<GestureEvent> {
        let mut out = Vec::with_capacity(1);
        let Some(position) = self.usable_position(event) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(id = event.id, "ignoring contact at non-finite position");
            return out;
        };

        let id = event.id;
        match event.phase {
            ContactPhase::Down => self.on_contact_down(id, position, now, &mut out),
            ContactPhase::Move => self.on_contact_move(id, position, now, &mut out),
            ContactPhase::Up => self.on_contact_up(id, position, now, &mut out),
        }

        self.debug_check_invariants();
        out
    }

    /// Process a contact event and deliver the results to `listener`.
    pub fn dispatch<L>(&mut self, event: &ContactEvent, now: Instant, listener: &mut L)
    where
        L: GestureListener + ?Sized,
    {
        for gesture in self.process(event, now) {
            listener.on_gesture(&gesture);
        }
    }

    /// Current state.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        match self.phase {
            Phase::Idle => GesturePhase::Idle,
            Phase::Panning { .. } => GesturePhase::Panning,
            Phase::Pinching { .. } => GesturePhase::Pinching,
        }
    }

    /// Whether an interaction is in progress. Hosts suppress native
    /// scrolling and text selection while this is true.
    #[inline]
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Active contacts.
    #[inline]
    #[must_use]
    pub fn contacts(&self) -> &ContactTracker {
        &self.contacts
    }

    /// Number of active contacts.
    #[inline]
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// The pan session, if an interaction is in progress.
    #[must_use]
    pub fn pan_session(&self) -> Option<&PanSession> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Panning { pan } | Phase::Pinching { pan, .. } => Some(pan),
        }
    }

    /// The pinch session, if two or more contacts are down.
    #[must_use]
    pub fn pinch_session(&self) -> Option<&PinchSession> {
        match &self.phase {
            Phase::Pinching { pinch, .. } => Some(pinch),
            _ => None,
        }
    }

    /// Client-space offset of the interaction surface.
    #[inline]
    #[must_use]
    pub fn surface_offset(&self) -> Point {
        self.surface_offset
    }

    /// Update the client-space offset of the interaction surface.
    ///
    /// Takes effect at the next interaction; an interaction in progress keeps
    /// the frame it captured.
    pub fn set_surface_offset(&mut self, offset: Point) {
        self.surface_offset = offset;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the configuration.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Drop all gesture state without emitting anything.
    pub fn reset(&mut self) {
        self.contacts.clear();
        self.phase = Phase::Idle;
        self.sequence = 0;
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureDispatcher {
    fn on_contact_down(
        &mut self,
        id: ContactId,
        client: Point,
        now: Instant,
        out: &mut Vec<GestureEvent>,
    ) {
        if self.contacts.contains(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!(id, "duplicate contact-down treated as move");
            self.on_contact_move(id, client, now, out);
            return;
        }

        self.phase = match std::mem::take(&mut self.phase) {
            Phase::Idle => {
                if !self.config.enabled {
                    return;
                }
                let pan = PanSession::begin(self.surface_offset, client, now);
                self.contacts
                    .upsert(ContactPoint::new(id, pan.origin().target_origin));
                self.sequence = 0;
                out.push(self.event(&pan, now, Point::ZERO, None, Order::First));

                #[cfg(feature = "tracing")]
                tracing::trace!(id, "gesture idle -> panning");
                Phase::Panning { pan }
            }
            Phase::Panning { mut pan } => {
                self.contacts
                    .upsert(ContactPoint::new(id, pan.origin().to_target(client)));
                let points = self.contacts.positions();
                let location = centroid(&points);
                let pinch = PinchSession::begin(span_measure(&points));

                let pinch_event = PinchEvent {
                    is_first: true,
                    is_final: false,
                    scale: 1.0,
                    location,
                };
                out.push(self.event(&pan, now, Point::ZERO, Some(pinch_event), Order::Continue));
                pan.rebase_point(location);

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    id,
                    measure = pinch.reference_measure(),
                    "gesture panning -> pinching"
                );
                Phase::Pinching { pan, pinch }
            }
            Phase::Pinching { mut pan, mut pinch } => {
                self.contacts
                    .upsert(ContactPoint::new(id, pan.origin().to_target(client)));
                let points = self.contacts.positions();
                let location = centroid(&points);

                let pinch_event = PinchEvent {
                    is_first: false,
                    is_final: false,
                    scale: pinch.current_ratio(),
                    location,
                };
                out.push(self.event(&pan, now, Point::ZERO, Some(pinch_event), Order::Continue));
                pan.rebase_point(location);
                pinch.rebase(span_measure(&points));

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    id,
                    contacts = points.len(),
                    multiplier = pinch.scale_multiplier(),
                    "pinch rebased on contact-down"
                );
                Phase::Pinching { pan, pinch }
            }
        };
    }

    fn on_contact_move(
        &mut self,
        id: ContactId,
        client: Point,
        now: Instant,
        out: &mut Vec<GestureEvent>,
    ) {
        if !self.contacts.contains(id) {
            return;
        }

        self.phase = match std::mem::take(&mut self.phase) {
            Phase::Idle => Phase::Idle,
            Phase::Panning { mut pan } => {
                let point = pan.origin().to_target(client);
                self.contacts.upsert(ContactPoint::new(id, point));
                let delta = pan.track(point, now);
                out.push(self.event(&pan, now, delta, None, Order::Continue));
                Phase::Panning { pan }
            }
            Phase::Pinching { mut pan, mut pinch } => {
                self.contacts
                    .upsert(ContactPoint::new(id, pan.origin().to_target(client)));
                let points = self.contacts.positions();
                let location = centroid(&points);
                pinch.observe(span_measure(&points));
                let delta = pan.track(location, now);

                let pinch_event = PinchEvent {
                    is_first: false,
                    is_final: false,
                    scale: pinch.current_ratio(),
                    location,
                };
                out.push(self.event(&pan, now, delta, Some(pinch_event), Order::Continue));
                Phase::Pinching { pan, pinch }
            }
        };
    }

    fn on_contact_up(
        &mut self,
        id: ContactId,
        client: Point,
        now: Instant,
        out: &mut Vec<GestureEvent>,
    ) {
        if !self.contacts.contains(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!(id, "ignoring contact-up for unknown contact");
            return;
        }

        self.phase = match std::mem::take(&mut self.phase) {
            Phase::Idle => Phase::Idle,
            Phase::Panning { pan } => {
                let point = pan.origin().to_target(client);
                self.contacts.remove(id);
                let delta = pan.delta_to(point);
                out.push(self.event(&pan, now, delta, None, Order::Final));

                #[cfg(feature = "tracing")]
                tracing::trace!(id, sequence = self.sequence, "gesture panning -> idle");
                Phase::Idle
            }
            Phase::Pinching { mut pan, mut pinch } => {
                self.contacts
                    .upsert(ContactPoint::new(id, pan.origin().to_target(client)));
                let location = centroid(&self.contacts.positions());
                let scale = pinch.current_ratio();

                self.contacts.remove(id);
                let remaining = self.contacts.positions();
                let ends_pinch = remaining.len() < 2;

                let pinch_event = PinchEvent {
                    is_first: false,
                    is_final: ends_pinch,
                    scale,
                    location,
                };
                out.push(self.event(&pan, now, Point::ZERO, Some(pinch_event), Order::Continue));
                pan.rebase_point(centroid(&remaining));

                if ends_pinch {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(id, scale, "gesture pinching -> panning");
                    Phase::Panning { pan }
                } else {
                    pinch.rebase(span_measure(&remaining));

                    #[cfg(feature = "tracing")]
                    tracing::trace!(
                        id,
                        contacts = remaining.len(),
                        multiplier = pinch.scale_multiplier(),
                        "pinch rebased on contact-up"
                    );
                    Phase::Pinching { pan, pinch }
                }
            }
        };
    }

    /// Client position to process for `event`, or `None` to drop it.
    fn usable_position(&self, event: &ContactEvent) -> Option<Point> {
        if event.position.is_finite() {
            return Some(event.position);
        }
        if event.phase != ContactPhase::Up {
            return None;
        }
        let pan = self.pan_session()?;
        let target = self.contacts.get(event.id)?;
        Some(target + pan.origin().client_offset)
    }

    fn event(
        &mut self,
        pan: &PanSession,
        now: Instant,
        pan_delta: Point,
        pinch: Option<PinchEvent>,
        order: Order,
    ) -> GestureEvent {
        self.sequence = self.sequence.saturating_add(1);
        GestureEvent {
            pan_delta,
            pinch,
            is_first: order == Order::First,
            is_final: order == Order::Final,
            sequence_count: self.sequence,
            velocity: pan.last_velocity(),
            elapsed_ms: pan.elapsed_ms(now),
            is_kinetic: false,
        }
    }

    fn debug_check_invariants(&self) {
        debug_assert!(
            match self.phase {
                Phase::Idle => self.contacts.is_empty(),
                Phase::Panning { .. } => self.contacts.len() == 1,
                Phase::Pinching { .. } => self.contacts.len() >= 2,
            },
            "dispatcher phase {:?} inconsistent with {} active contacts",
            self.phase(),
            self.contacts.len()
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
