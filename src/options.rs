//! Picking sensitivity configuration.
//!
//! Exact ray/mesh intersection is too strict for thin primitives: a
//! drawn line is one pixel wide, a control point a handful. These
//! thresholds give lines and points a world-space acceptance radius
//! around the pick ray. The editor persists them alongside its other
//! settings as TOML.

use serde::{Deserialize, Serialize};

/// Proximity thresholds for thin-primitive picking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickOptions {
    /// World-space acceptance radius around the ray for polyline
    /// segments.
    pub line_threshold: f32,
    /// World-space acceptance radius around the ray for point
    /// clusters.
    pub point_threshold: f32,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            line_threshold: 0.1,
            point_threshold: 0.2,
        }
    }
}

impl PickOptions {
    /// Parse options from a TOML string; missing fields fall back to
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying TOML error on malformed input.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize options to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns the underlying TOML error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
