#![forbid(unsafe_code)]

//! Viewport: scroll clamping, pinch-to-zoom, kinetic scrolling and the page
//! viewer.
//!
//! # Role in pagepan
//! `pagepan-viewport` is the consumer layer. It owns everything that depends
//! on layout and applies the [`GestureEvent`](pagepan_core::GestureEvent)
//! stream from `pagepan-core` to a scroll position and a scale.
//!
//! # Primary responsibilities
//! - **ScrollClamp**: scroll limits from the scaled content and container
//!   extents, and clamping into them.
//! - **PinchZoom**: anchor-preserving zoom steps within
//!   [`MIN_SCALE`]..=[`MAX_SCALE`].
//! - **KineticScroll**: exponential post-release deceleration.
//! - **OverscrollGate / PageTurn**: edge drags handed to the host, and their
//!   classification as page turns.
//! - **Viewer**: a dispatcher plus all of the above behind one facade.
//!
//! # How it fits in the system
//! Hosts feed contact events and extent changes to a [`Viewer`], call
//! [`Viewer::tick`] on a timer while a kinetic scroll runs, and read back
//! [`Viewer::scroll`] and [`Viewer::scale`]. The pure pieces (clamping, zoom
//! resolution, the kinetic curve) are usable on their own.

pub mod config;
pub mod extent;
pub mod kinetic;
pub mod overscroll;
pub mod page_turn;
pub mod scroll;
pub mod viewer;
pub mod zoom;

pub use config::{ConfigError, ViewerConfig};
pub use extent::{Extent, fit_to_container};
pub use kinetic::{
    KINETIC_AMPLITUDE_LIMIT, KINETIC_TAU_MS, KINETIC_VELOCITY_THRESHOLD, KineticScroll,
};
pub use overscroll::{Edge, OverscrollEdges, OverscrollGate, Route};
pub use page_turn::{PageTurn, PageTurnConfig, PageTurnDecision};
pub use scroll::{Limits, ScrollClamp, ScrollLimits, ScrollPosition, clamp_to_range};
pub use viewer::Viewer;
pub use zoom::{MAX_SCALE, MIN_SCALE, PinchZoom, ZoomStep, bound_scale, resolve_zoom};

pub use pagepan_core::VELOCITY_SMOOTHING;
