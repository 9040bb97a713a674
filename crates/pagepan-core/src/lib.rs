#![forbid(unsafe_code)]

//! Core: contact tracking, pan/pinch sessions, and gesture dispatch.
//!
//! # Role in pagepan
//! `pagepan-core` is the input layer. It turns raw contact-point events
//! (down / move / up, any number of concurrent contacts) into a single stream
//! of normalized [`GestureEvent`](gesture::GestureEvent)s carrying a pan
//! delta, an optional pinch scale and location, and timing data.
//!
//! # Primary responsibilities
//! - **Geometry**: centroid, distance, and the span measure (distance for two
//!   contacts, convex-hull area for three or more).
//! - **ContactTracker**: active contacts keyed by id, snapshotted in id order.
//! - **PanSession / PinchSession**: per-gesture bookkeeping, including the
//!   smoothed release velocity and the carried pinch scale.
//! - **GestureDispatcher**: the Idle / Panning / Pinching state machine.
//!
//! # How it fits in the system
//! `pagepan-viewport` consumes gesture events and owns everything that
//! depends on layout (scroll limits, zoom, kinetic scrolling). This crate
//! holds no layout state, so extents can change between events without
//! corrupting gesture bookkeeping.

pub mod contact;
pub mod geometry;
pub mod gesture;
pub mod pan_session;
pub mod pinch_session;

pub use contact::{ContactEvent, ContactId, ContactPhase, ContactPoint, ContactTracker};
pub use geometry::Point;
pub use gesture::{
    GestureConfig, GestureDispatcher, GestureEvent, GestureListener, GesturePhase, PinchEvent,
};
pub use pan_session::{OriginFrame, PanSession, VELOCITY_SMOOTHING};
pub use pinch_session::PinchSession;
