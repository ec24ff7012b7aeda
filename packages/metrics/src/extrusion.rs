//! Cosmetic extrusion height derived from footprint area.

use serde::{Deserialize, Serialize};

/// Area-to-height scale used for 3D rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrusionScale {
    /// Height returned when the area is not a positive finite number.
    pub fallback: f64,
    /// Lower clamp for valid areas.
    pub min: f64,
    /// Upper clamp for valid areas.
    pub max: f64,
}

impl Default for ExtrusionScale {
    fn default() -> Self {
        Self {
            fallback: 5.0,
            min: 8.0,
            max: 120.0,
        }
    }
}

impl ExtrusionScale {
    /// `√area` clamped into `[min, max]`, or `fallback` for unusable areas.
    ///
    /// The fallback is not clamped.
    #[must_use]
    pub fn height(&self, area_sqm: f64) -> f64 {
        if !area_sqm.is_finite() || area_sqm <= 0.0 {
            return self.fallback;
        }
        area_sqm.sqrt().min(self.max).max(self.min)
    }
}
