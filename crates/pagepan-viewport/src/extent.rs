#![forbid(unsafe_code)]

//! Content and container sizes.

/// A width/height pair in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    /// Create a new extent.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions multiplied by `scale`.
    #[inline]
    #[must_use]
    pub fn scaled(self, scale: f64) -> Self {
        Self::new(self.width * scale, self.height * scale)
    }

    /// Width over height, or `None` for a zero height.
    #[must_use]
    pub fn aspect_ratio(self) -> Option<f64> {
        (self.height != 0.0).then(|| self.width / self.height)
    }

    /// Whether either dimension is zero or negative.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Largest extent with the given aspect ratio (width / height) that fits in
/// `container`.
///
/// Fits height when the content is relatively taller than the container
/// (`aspect_ratio <= container ratio`), otherwise fits width.
#[must_use]
pub fn fit_to_container(container: Extent, aspect_ratio: f64) -> Extent {
    let Some(container_ratio) = container.aspect_ratio() else {
        return Extent::default();
    };
    if aspect_ratio <= 0.0 || !aspect_ratio.is_finite() {
        return Extent::default();
    }

    if aspect_ratio <= container_ratio {
        Extent::new(container.height * aspect_ratio, container.height)
    } else {
        Extent::new(container.width, container.width / aspect_ratio)
    }
}
