//! Printer configuration
//!
//! The state tracker reads axis bounds, home positions, jog speeds and the
//! extruder count through the read-only [`PrinterConfiguration`] capability
//! set. [`PrinterConfig`] is the serde-backed implementation, loadable from
//! TOML:
//!
//! ```toml
//! name = "workshop-i3"
//! extruder_count = 2
//! xy_jog_speed = 100.0
//! z_jog_speed = 2.0
//!
//! [x]
//! min = 0.0
//! max = 200.0
//! home = 0.0
//! ```

use crate::data::Axis;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest extruder count a configuration may declare
pub const MAX_EXTRUDER_COUNT: usize = 16;

/// Travel limits and home position of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    /// Minimum reachable coordinate
    pub min: f64,
    /// Maximum reachable coordinate
    pub max: f64,
    /// Coordinate reached by homing
    pub home: f64,
}

impl AxisLimits {
    /// Create axis limits
    pub fn new(min: f64, max: f64, home: f64) -> Self {
        Self { min, max, home }
    }

    /// Clamp a coordinate into the bounds, reporting whether it moved
    pub fn clamp(&self, value: f64) -> (f64, bool) {
        if value < self.min {
            (self.min, true)
        } else if value > self.max {
            (self.max, true)
        } else {
            (value, false)
        }
    }
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self::new(0.0, 200.0, 0.0)
    }
}

/// Read-only printer configuration consumed by the state tracker
pub trait PrinterConfiguration: Send + Sync {
    /// Limits of a Cartesian axis. The extruder axis has no limits; callers
    /// only ask for X, Y and Z.
    fn axis_limits(&self, axis: Axis) -> AxisLimits;

    /// Jog speed for X/Y moves in units per second
    fn xy_jog_speed(&self) -> f64;

    /// Jog speed for Z moves in units per second
    fn z_jog_speed(&self) -> f64;

    /// Number of physical extruders
    fn extruder_count(&self) -> usize;
}

/// Serde-backed printer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Printer display name
    pub name: String,
    /// X axis limits
    pub x: AxisLimits,
    /// Y axis limits
    pub y: AxisLimits,
    /// Z axis limits
    pub z: AxisLimits,
    /// X/Y jog speed (units per second)
    pub xy_jog_speed: f64,
    /// Z jog speed (units per second)
    pub z_jog_speed: f64,
    /// Number of physical extruders
    pub extruder_count: usize,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: "printer".to_string(),
            x: AxisLimits::default(),
            y: AxisLimits::default(),
            z: AxisLimits::default(),
            xy_jog_speed: 100.0,
            z_jog_speed: 2.0,
            extruder_count: 1,
        }
    }
}

impl PrinterConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: PrinterConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            "Loaded printer config '{}' from {}",
            config.name,
            path.display()
        );
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate semantic constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, limits) in [(Axis::X, &self.x), (Axis::Y, &self.y), (Axis::Z, &self.z)] {
            if !(limits.min.is_finite() && limits.max.is_finite() && limits.home.is_finite()) {
                return Err(ConfigError::Validation {
                    reason: format!("{} limits must be finite", axis),
                });
            }
            if limits.min > limits.max {
                return Err(ConfigError::Validation {
                    reason: format!(
                        "{} min {} exceeds max {}",
                        axis, limits.min, limits.max
                    ),
                });
            }
            if limits.home < limits.min || limits.home > limits.max {
                return Err(ConfigError::Validation {
                    reason: format!(
                        "{} home {} outside [{}, {}]",
                        axis, limits.home, limits.min, limits.max
                    ),
                });
            }
        }

        if self.xy_jog_speed <= 0.0 || self.z_jog_speed <= 0.0 {
            return Err(ConfigError::Validation {
                reason: "jog speeds must be positive".to_string(),
            });
        }

        if self.extruder_count > MAX_EXTRUDER_COUNT {
            return Err(ConfigError::Validation {
                reason: format!(
                    "extruder count {} exceeds {}",
                    self.extruder_count, MAX_EXTRUDER_COUNT
                ),
            });
        }

        Ok(())
    }

    /// Builder method to set the limits of one axis
    pub fn with_axis(mut self, axis: Axis, limits: AxisLimits) -> Self {
        match axis {
            Axis::X => self.x = limits,
            Axis::Y => self.y = limits,
            Axis::Z => self.z = limits,
            Axis::E => tracing::warn!("Extruder axis has no limits, ignoring"),
        }
        self
    }

    /// Builder method to set the extruder count
    pub fn with_extruder_count(mut self, count: usize) -> Self {
        self.extruder_count = count;
        self
    }
}

impl PrinterConfiguration for PrinterConfig {
    fn axis_limits(&self, axis: Axis) -> AxisLimits {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            // Unbounded
            Axis::E => AxisLimits::new(f64::MIN, f64::MAX, 0.0),
        }
    }

    fn xy_jog_speed(&self) -> f64 {
        self.xy_jog_speed
    }

    fn z_jog_speed(&self) -> f64 {
        self.z_jog_speed
    }

    fn extruder_count(&self) -> usize {
        self.extruder_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PrinterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_clamp() {
        let limits = AxisLimits::new(-5.0, 5.0, 0.0);
        assert_eq!(limits.clamp(2.0), (2.0, false));
        assert_eq!(limits.clamp(-7.5), (-5.0, true));
        assert_eq!(limits.clamp(5.1), (5.0, true));
    }

    #[test]
    fn test_rejects_inverted_axis() {
        let config = PrinterConfig::default().with_axis(Axis::Y, AxisLimits::new(10.0, 5.0, 7.0));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Y min 10 exceeds max 5"));
    }

    #[test]
    fn test_rejects_excessive_extruder_count() {
        let config = PrinterConfig::default().with_extruder_count(MAX_EXTRUDER_COUNT + 1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extruder count 17 exceeds 16"));
        assert!(PrinterConfig::default()
            .with_extruder_count(MAX_EXTRUDER_COUNT)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_rejects_home_out_of_range() {
        let config = PrinterConfig::default().with_axis(Axis::Z, AxisLimits::new(0.0, 100.0, 150.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PrinterConfig::from_toml_str(
            r#"
            name = "delta"
            extruder_count = 3

            [z]
            min = 0.0
            max = 320.0
            home = 320.0
            "#,
        )
        .unwrap();
        assert_eq!(config.name, "delta");
        assert_eq!(config.extruder_count(), 3);
        assert_eq!(config.axis_limits(Axis::Z).home, 320.0);
        assert_eq!(config.axis_limits(Axis::X), AxisLimits::default());
        assert_eq!(config.xy_jog_speed(), 100.0);
    }
}
