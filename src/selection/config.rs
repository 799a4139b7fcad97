//! Magnetic selection settings.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SelectError};
use crate::selection::rasterize::FillRule;
use crate::selection::resample::ResampleMode;

/// Smallest search distance the tool accepts.
pub const MIN_SEARCH_DISTANCE: u32 = 15;
/// Largest search distance the tool accepts.
pub const MAX_SEARCH_DISTANCE: u32 = 55;
/// Search distance granularity.
pub const SEARCH_DISTANCE_STEP: u32 = 5;
pub const DEFAULT_SEARCH_DISTANCE: u32 = 25;
/// Spacing between search origins along the user curve, in pixels.
pub const DEFAULT_ACCURACY: f32 = 2.0;
/// Luminance difference (0-255 scale) that must be exceeded to mark an edge.
pub const DEFAULT_THRESHOLD: i32 = 20;

/// Settings for one outline computation.
///
/// Passed explicitly into every computation; the tool keeps a copy but the
/// algorithm never reads shared state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticConfig {
    /// Total length of each search ray in pixels. The ray starts half of
    /// this distance to one side of the curve.
    pub search_distance: u32,
    pub accuracy: f32,
    pub threshold: i32,
    pub resample_mode: ResampleMode,
    pub fill_rule: FillRule,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            search_distance: DEFAULT_SEARCH_DISTANCE,
            accuracy: DEFAULT_ACCURACY,
            threshold: DEFAULT_THRESHOLD,
            resample_mode: ResampleMode::Legacy,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl MagneticConfig {
    /// Set the search distance, clamped to the allowed range and snapped to
    /// the nearest step.
    pub fn set_search_distance(&mut self, distance: u32) {
        let clamped = distance.clamp(MIN_SEARCH_DISTANCE, MAX_SEARCH_DISTANCE);
        let steps = (clamped - MIN_SEARCH_DISTANCE + SEARCH_DISTANCE_STEP / 2) / SEARCH_DISTANCE_STEP;
        self.search_distance = MIN_SEARCH_DISTANCE + steps * SEARCH_DISTANCE_STEP;
    }

    /// Builder-style variant of [`MagneticConfig::set_search_distance`].
    pub fn with_search_distance(mut self, distance: u32) -> Self {
        self.set_search_distance(distance);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SEARCH_DISTANCE..=MAX_SEARCH_DISTANCE).contains(&self.search_distance)
            || (self.search_distance - MIN_SEARCH_DISTANCE) % SEARCH_DISTANCE_STEP != 0
        {
            return Err(SelectError::InvalidConfig(format!(
                "search distance {} must be in {}..={} in steps of {}",
                self.search_distance, MIN_SEARCH_DISTANCE, MAX_SEARCH_DISTANCE, SEARCH_DISTANCE_STEP
            )));
        }
        if !(self.accuracy.is_finite() && self.accuracy > 0.0) {
            return Err(SelectError::InvalidConfig(format!(
                "accuracy must be positive, got {}",
                self.accuracy
            )));
        }
        if !(0..=255).contains(&self.threshold) {
            return Err(SelectError::InvalidConfig(format!(
                "threshold must be in 0..=255, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MagneticConfig::default();
        assert_eq!(config.search_distance, 25);
        assert_eq!(config.accuracy, 2.0);
        assert_eq!(config.threshold, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_search_distance_snaps_and_clamps() {
        let mut config = MagneticConfig::default();
        config.set_search_distance(3);
        assert_eq!(config.search_distance, 15);
        config.set_search_distance(99);
        assert_eq!(config.search_distance, 55);
        config.set_search_distance(33);
        assert_eq!(config.search_distance, 35);
        config.set_search_distance(31);
        assert_eq!(config.search_distance, 30);
    }

    #[test]
    fn test_validate_rejects_off_grid_distance() {
        let config = MagneticConfig {
            search_distance: 27,
            ..MagneticConfig::default()
        };
        assert!(matches!(config.validate(), Err(SelectError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_accuracy() {
        let config = MagneticConfig {
            accuracy: 0.0,
            ..MagneticConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MagneticConfig = serde_json::from_str(r#"{"search_distance": 40}"#).unwrap();
        assert_eq!(config.search_distance, 40);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
    }
}
