#![forbid(unsafe_code)]

//! Raw contact events and the tracker of currently active contacts.
//!
//! A *contact* is one finger or cursor touching the interaction surface,
//! identified by a host-assigned id that is stable for its duration.
//!
//! [`ContactTracker`] is keyed by that id with "latest wins" semantics:
//! re-inserting an id replaces its position. Snapshots are ordered by
//! ascending id so that centroid and measure reductions always sum in the
//! same order for the same contact set.
//!
//! # Failure Modes
//!
//! None. Removing an absent id is a no-op.

use std::collections::BTreeMap;

use crate::geometry::Point;

/// Host-assigned contact identifier.
pub type ContactId = u32;

/// Lifecycle phase of a raw contact event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    Down,
    Move,
    Up,
}

/// A raw contact event as delivered by the host, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub id: ContactId,
    pub position: Point,
    pub phase: ContactPhase,
}

impl ContactEvent {
    /// Create a new contact event.
    #[must_use]
    pub const fn new(id: ContactId, position: Point, phase: ContactPhase) -> Self {
        Self {
            id,
            position,
            phase,
        }
    }

    /// A contact-down at `(x, y)`.
    #[must_use]
    pub const fn down(id: ContactId, x: f64, y: f64) -> Self {
        Self::new(id, Point::new(x, y), ContactPhase::Down)
    }

    /// A contact-move to `(x, y)`.
    #[must_use]
    pub const fn moved(id: ContactId, x: f64, y: f64) -> Self {
        Self::new(id, Point::new(x, y), ContactPhase::Move)
    }

    /// A contact-up at `(x, y)`.
    #[must_use]
    pub const fn up(id: ContactId, x: f64, y: f64) -> Self {
        Self::new(id, Point::new(x, y), ContactPhase::Up)
    }
}

/// One active contact and its latest surface-relative position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub id: ContactId,
    pub position: Point,
}

impl ContactPoint {
    /// Create a contact point.
    #[must_use]
    pub const fn new(id: ContactId, position: Point) -> Self {
        Self { id, position }
    }
}

/// Keyed collection of currently active contacts.
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    contacts: BTreeMap<ContactId, Point>,
}

impl ContactTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `contact`, replacing any previous position for its id.
    ///
    /// Returns the previous position if the id was already tracked.
    pub fn upsert(&mut self, contact: ContactPoint) -> Option<Point> {
        self.contacts.insert(contact.id, contact.position)
    }

    /// Remove the contact with `id`, returning it if present.
    pub fn remove(&mut self, id: ContactId) -> Option<ContactPoint> {
        self.contacts
            .remove(&id)
            .map(|position| ContactPoint::new(id, position))
    }

    /// Whether `id` is currently tracked.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ContactId) -> bool {
        self.contacts.contains_key(&id)
    }

    /// Latest position of `id`, if tracked.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ContactId) -> Option<Point> {
        self.contacts.get(&id).copied()
    }

    /// Number of active contacts.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether no contacts are active.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// All active contacts, ordered by ascending id.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ContactPoint> {
        self.contacts
            .iter()
            .map(|(&id, &position)| ContactPoint::new(id, position))
            .collect()
    }

    /// Positions of all active contacts, ordered by ascending id.
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.contacts.values().copied().collect()
    }

    /// Drop every contact.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}
