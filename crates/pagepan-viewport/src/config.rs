#![forbid(unsafe_code)]

//! Viewer configuration.
//!
//! The scale bounds and kinetic constants are fixed; [`ViewerConfig`] holds
//! the host-integration tunables. Every field has a default, so a partial
//! TOML/JSON file only overrides what it names.
//!
//! # Example (TOML)
//!
//! ```toml
//! kinetic_tick_ms = 10
//! overscroll_sequence_limit = 10
//!
//! [overscroll]
//! left = true
//! right = true
//!
//! [page_turn]
//! swipe_threshold_ms = 250
//! change_page_fraction = 0.6667
//! ```

#[cfg(feature = "config")]
use std::path::Path;

use pagepan_core::GestureConfig;
use web_time::Duration;

use crate::overscroll::OverscrollEdges;
use crate::page_turn::PageTurnConfig;

/// Longest kinetic tick accepted by [`ViewerConfig::validate`].
pub const MAX_KINETIC_TICK_MS: u64 = 100;

/// Host-integration settings for a [`Viewer`](crate::Viewer).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewerConfig {
    /// Whether new interactions are accepted. Default: true.
    pub enabled: bool,
    /// Kinetic scroll tick interval in milliseconds. Default: 16.
    pub kinetic_tick_ms: u64,
    /// Highest `sequence_count` at which an edge drag may still be handed
    /// off. Default: 10.
    pub overscroll_sequence_limit: u32,
    /// Edges that hand off overscroll. Default: none.
    pub overscroll: OverscrollEdges,
    /// Page-turn swipe thresholds.
    pub page_turn: PageTurnConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kinetic_tick_ms: 16,
            overscroll_sequence_limit: 10,
            overscroll: OverscrollEdges::NONE,
            page_turn: PageTurnConfig::default(),
        }
    }
}

impl ViewerConfig {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_kinetic_tick(mut self, tick: Duration) -> Self {
        self.kinetic_tick_ms = u64::try_from(tick.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_overscroll(mut self, edges: OverscrollEdges) -> Self {
        self.overscroll = edges;
        self
    }

    #[must_use]
    pub fn with_overscroll_sequence_limit(mut self, limit: u32) -> Self {
        self.overscroll_sequence_limit = limit;
        self
    }

    #[must_use]
    pub fn with_page_turn(mut self, page_turn: PageTurnConfig) -> Self {
        self.page_turn = page_turn;
        self
    }

    /// Kinetic tick interval.
    #[inline]
    #[must_use]
    pub fn kinetic_tick(&self) -> Duration {
        Duration::from_millis(self.kinetic_tick_ms)
    }

    /// Dispatcher options derived from this config.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            enabled: self.enabled,
        }
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(ConfigError::Toml)?
            .validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(ConfigError::Json)?
            .validated()
    }

    /// Check all fields. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.kinetic_tick_ms == 0 || self.kinetic_tick_ms > MAX_KINETIC_TICK_MS {
            errors.push(format!(
                "kinetic_tick_ms must be in 1..={MAX_KINETIC_TICK_MS}, got {}",
                self.kinetic_tick_ms
            ));
        }

        if self.overscroll.any() && self.overscroll_sequence_limit == 0 {
            errors.push("overscroll_sequence_limit must be > 0".into());
        }

        if self.page_turn.swipe_threshold_ms == 0 {
            errors.push("page_turn.swipe_threshold_ms must be > 0".into());
        }

        let fraction = self.page_turn.change_page_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            errors.push(format!(
                "page_turn.change_page_fraction must be in (0, 1], got {fraction}"
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing, otherwise
    /// [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        for error in &errors {
            tracing::warn!(%error, "invalid viewer config");
        }
        Err(ConfigError::Validation(errors))
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading a [`ViewerConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// The parsed config failed validation.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "invalid viewer config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
