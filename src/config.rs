//! Engine configuration.
//!
//! Explicit configuration struct populated before construction. All
//! fields have documented defaults and serde support so an embedding
//! application can carry the stick section inside its own config file.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Default notifier interval while contact is held.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 10;

/// Default knob radius as a fraction of half the smaller view dimension.
pub const DEFAULT_BUTTON_SIZE_RATIO: f32 = 0.23;

/// Default boundary radius as a fraction of half the smaller view dimension.
pub const DEFAULT_BACKGROUND_SIZE_RATIO: f32 = 0.75;

/// Default single long-press threshold; the two-finger gesture fires
/// after twice this delay.
pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 500;

/// Default number of qualifying move events tolerated while the
/// two-finger gesture is armed.
pub const DEFAULT_MULTI_PRESS_MOVE_BUDGET: u32 = 5;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A size ratio was outside (0, 1].
    #[error("{field} must be in (0, 1], got {value}")]
    RatioOutOfRange { field: &'static str, value: f32 },

    /// The notifier interval was zero.
    #[error("refresh_interval_ms must be greater than zero")]
    ZeroRefreshInterval,
}

/// Axis restriction for stick motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLock {
    /// Free motion on both axes.
    #[default]
    Both,
    /// Motion along X only; Y stays pinned to the center.
    Horizontal,
    /// Motion along Y only; X stays pinned to the center.
    Vertical,
}

/// Two-finger long-press gesture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiPressConfig {
    /// Whether the gesture detector runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Single long-press threshold in milliseconds. The gesture fires
    /// after twice this delay with two fingers held.
    #[serde(default = "default_long_press_timeout")]
    pub long_press_timeout_ms: u64,

    /// Move events tolerated before the armed gesture is cancelled.
    #[serde(default = "default_move_budget")]
    pub move_budget: u32,
}

impl Default for MultiPressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            long_press_timeout_ms: DEFAULT_LONG_PRESS_TIMEOUT_MS,
            move_budget: DEFAULT_MULTI_PRESS_MOVE_BUDGET,
        }
    }
}

/// Virtual stick engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StickConfig {
    /// Fixed center (constant, set at layout) vs floating center
    /// (reset to the touch-down point of each new gesture).
    #[serde(default = "default_true")]
    pub fixed_center: bool,

    /// Snap the position back to the center when the last contact lifts.
    #[serde(default = "default_true")]
    pub auto_recenter: bool,

    /// Force the position onto the boundary circle whenever it is not
    /// exactly at the center.
    #[serde(default)]
    pub stick_to_border: bool,

    /// Axis restriction for stick motion.
    #[serde(default)]
    pub axis_lock: AxisLock,

    /// Knob radius ratio, valid range (0, 1].
    #[serde(default = "default_button_size_ratio")]
    pub button_size_ratio: f32,

    /// Boundary radius ratio, valid range (0, 1].
    #[serde(default = "default_background_size_ratio")]
    pub background_size_ratio: f32,

    /// Notifier interval in milliseconds while contact is held.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Disabled engine swallows all pointer events.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Two-finger long-press gesture settings.
    #[serde(default)]
    pub multi_press: MultiPressConfig,
}

impl Default for StickConfig {
    fn default() -> Self {
        Self {
            fixed_center: true,
            auto_recenter: true,
            stick_to_border: false,
            axis_lock: AxisLock::Both,
            button_size_ratio: DEFAULT_BUTTON_SIZE_RATIO,
            background_size_ratio: DEFAULT_BACKGROUND_SIZE_RATIO,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            enabled: true,
            multi_press: MultiPressConfig::default(),
        }
    }
}

impl StickConfig {
    /// Validate all fields, returning the first violation.
    ///
    /// Intended for construction time; runtime setters instead refuse
    /// bad values and keep the previous ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ratio_valid(self.button_size_ratio) {
            return Err(ConfigError::RatioOutOfRange {
                field: "button_size_ratio",
                value: self.button_size_ratio,
            });
        }
        if !ratio_valid(self.background_size_ratio) {
            return Err(ConfigError::RatioOutOfRange {
                field: "background_size_ratio",
                value: self.background_size_ratio,
            });
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }

    /// Update the knob size ratio. Values outside (0, 1] are refused and
    /// the previous value is kept.
    ///
    /// Returns whether the update was applied.
    pub fn set_button_size_ratio(&mut self, ratio: f32) -> bool {
        if ratio_valid(ratio) {
            self.button_size_ratio = ratio;
            true
        } else {
            warn!(ratio, "Rejected button_size_ratio outside (0, 1]");
            false
        }
    }

    /// Update the boundary size ratio. Values outside (0, 1] are refused
    /// and the previous value is kept.
    ///
    /// Returns whether the update was applied.
    pub fn set_background_size_ratio(&mut self, ratio: f32) -> bool {
        if ratio_valid(ratio) {
            self.background_size_ratio = ratio;
            true
        } else {
            warn!(ratio, "Rejected background_size_ratio outside (0, 1]");
            false
        }
    }
}

fn ratio_valid(ratio: f32) -> bool {
    ratio > 0.0 && ratio <= 1.0
}

fn default_true() -> bool {
    true
}

fn default_button_size_ratio() -> f32 {
    DEFAULT_BUTTON_SIZE_RATIO
}

fn default_background_size_ratio() -> f32 {
    DEFAULT_BACKGROUND_SIZE_RATIO
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

fn default_long_press_timeout() -> u64 {
    DEFAULT_LONG_PRESS_TIMEOUT_MS
}

fn default_move_budget() -> u32 {
    DEFAULT_MULTI_PRESS_MOVE_BUDGET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StickConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.fixed_center);
        assert!(config.auto_recenter);
        assert!(!config.stick_to_border);
        assert_eq!(config.axis_lock, AxisLock::Both);
        assert_eq!(config.refresh_interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        let mut config = StickConfig::default();
        config.button_size_ratio = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::RatioOutOfRange {
                field: "button_size_ratio",
                value: 0.0,
            })
        );

        config.button_size_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = StickConfig::default();
        config.refresh_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRefreshInterval));
    }

    #[test]
    fn test_setters_keep_previous_on_invalid() {
        let mut config = StickConfig::default();

        assert!(config.set_button_size_ratio(0.5));
        assert_eq!(config.button_size_ratio, 0.5);

        // Out of range: refused, previous value retained
        assert!(!config.set_button_size_ratio(0.0));
        assert!(!config.set_button_size_ratio(-0.2));
        assert!(!config.set_button_size_ratio(1.01));
        assert_eq!(config.button_size_ratio, 0.5);

        assert!(config.set_background_size_ratio(1.0));
        assert!(!config.set_background_size_ratio(f32::NAN));
        assert_eq!(config.background_size_ratio, 1.0);
    }

    #[test]
    fn test_serde_round_trip_and_defaults() {
        let config = StickConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: StickConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.button_size_ratio, config.button_size_ratio);
        assert_eq!(back.axis_lock, config.axis_lock);

        // Missing fields take the documented defaults
        let sparse: StickConfig = serde_json::from_str("{}").unwrap();
        assert!(sparse.fixed_center);
        assert_eq!(sparse.multi_press.move_budget, DEFAULT_MULTI_PRESS_MOVE_BUDGET);
        assert_eq!(
            sparse.multi_press.long_press_timeout_ms,
            DEFAULT_LONG_PRESS_TIMEOUT_MS
        );

        let locked: StickConfig =
            serde_json::from_str(r#"{"axis_lock": "horizontal"}"#).unwrap();
        assert_eq!(locked.axis_lock, AxisLock::Horizontal);
    }
}
