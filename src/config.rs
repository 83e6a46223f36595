//! Rule chain configuration.
//!
//! Thresholds and toggles for the built-in rules, loadable from TOML so
//! the chain can be recomposed without code changes.
//!
//! # Examples
//!
//! ```
//! use u_timetable::config::LogicConfig;
//!
//! let config = LogicConfig::from_toml_str(r#"
//!     max_estimated_class_size_ratio = 0.9
//!     teacher_conflict_check = false
//! "#).unwrap();
//!
//! assert_eq!(config.max_estimated_class_size_ratio, 0.9);
//! assert!(!config.teacher_conflict_check);
//! assert!(config.room_conflict_check);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Thresholds and toggles for
/// [`ScheduleLogic::from_config`](crate::logic::ScheduleLogic::from_config).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LogicConfig {
    /// Lower bound of estimated class size / room capacity.
    pub min_estimated_class_size_ratio: f64,

    /// Upper bound of estimated class size / room capacity.
    pub max_estimated_class_size_ratio: f64,

    /// Upper bound of class cap / room capacity.
    pub max_class_cap_ratio: f64,

    /// Enables per-assignment checks (program identity, availability, ratios).
    pub local_schedule_check: bool,

    /// Enables the no-two-classes-in-one-room check.
    pub room_conflict_check: bool,

    /// Enables the one-course-per-teacher-per-block check.
    pub teacher_conflict_check: bool,

    /// Enables the course-placed-once check.
    pub doubly_scheduled_courses_check: bool,
}

impl Default for LogicConfig {
    fn default() -> Self {
        Self {
            min_estimated_class_size_ratio: 0.0,
            max_estimated_class_size_ratio: 1.0,
            max_class_cap_ratio: 1.0,
            local_schedule_check: true,
            room_conflict_check: true,
            teacher_conflict_check: true,
            doubly_scheduled_courses_check: true,
        }
    }
}

impl LogicConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, contains invalid TOML,
    /// or fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the estimated class size ratio band.
    pub fn with_estimated_class_size_ratio(mut self, min: f64, max: f64) -> Self {
        self.min_estimated_class_size_ratio = min;
        self.max_estimated_class_size_ratio = max;
        self
    }

    /// Sets the class cap ratio ceiling.
    pub fn with_max_class_cap_ratio(mut self, max: f64) -> Self {
        self.max_class_cap_ratio = max;
        self
    }

    /// Toggles the local checks.
    pub fn with_local_schedule_check(mut self, enabled: bool) -> Self {
        self.local_schedule_check = enabled;
        self
    }

    /// Toggles the room conflict check.
    pub fn with_room_conflict_check(mut self, enabled: bool) -> Self {
        self.room_conflict_check = enabled;
        self
    }

    /// Toggles the teacher conflict check.
    pub fn with_teacher_conflict_check(mut self, enabled: bool) -> Self {
        self.teacher_conflict_check = enabled;
        self
    }

    /// Toggles the duplicate course check.
    pub fn with_doubly_scheduled_courses_check(mut self, enabled: bool) -> Self {
        self.doubly_scheduled_courses_check = enabled;
        self
    }

    /// Rejects NaN or negative ratios and an inverted estimated-size band.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratios = [
            (
                "min_estimated_class_size_ratio",
                self.min_estimated_class_size_ratio,
            ),
            (
                "max_estimated_class_size_ratio",
                self.max_estimated_class_size_ratio,
            ),
            ("max_class_cap_ratio", self.max_class_cap_ratio),
        ];
        for (name, value) in ratios {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.min_estimated_class_size_ratio > self.max_estimated_class_size_ratio {
            return Err(ConfigError::Invalid(format!(
                "min_estimated_class_size_ratio ({}) exceeds max_estimated_class_size_ratio ({})",
                self.min_estimated_class_size_ratio, self.max_estimated_class_size_ratio
            )));
        }
        Ok(())
    }
}
