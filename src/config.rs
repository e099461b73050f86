//! Regulatory and business parameters for route evaluation.

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Parameters governing drive/duty-hour rules, unloading, and trailer capacity.
///
/// Defaults follow the US hours-of-service regime (11 h driving, 14 h on duty,
/// 10 h mandatory break) with a 3200-unit trailer. Every field can be
/// overridden through the `with_*` builders or a partial JSON document.
///
/// # Examples
///
/// ```
/// use u_dispatch::config::DispatchConfig;
///
/// let cfg = DispatchConfig::default().with_depot_code(1905).with_max_capacity(2600.0);
/// assert_eq!(cfg.depot_code, Some(1905));
/// assert_eq!(cfg.resolve(0), 1905);
/// assert_eq!(cfg.max_capacity, 2600.0);
/// assert_eq!(cfg.average_speed, 40.0);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Average driving speed, distance units per hour.
    pub average_speed: f64,
    /// Unloading rate, minutes per volume unit.
    pub unload_rate_minutes: f64,
    /// Minimum unloading time at a stop with positive volume, minutes.
    pub min_unload_minutes: f64,
    /// Driving hours above which an overnight rest is required.
    pub max_drive_hours: f64,
    /// On-duty hours above which an overnight rest is required.
    pub max_duty_hours: f64,
    /// Length of the mandatory rest added to duty hours when required.
    pub mandatory_break_hours: f64,
    /// Trailer capacity in volume units.
    pub max_capacity: f64,
    /// Identifier used for the depot inside routes.
    pub depot_placeholder: usize,
    /// Real location code of the depot in the distance matrix.
    ///
    /// `None` means the matrix uses the placeholder itself.
    pub depot_code: Option<usize>,
    /// Optional hard cap on duty hours (break included) for accepting a merge.
    pub duty_hour_ceiling: Option<f64>,
    /// Factor used to extrapolate a weekly plan to a year.
    pub weeks_per_year: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            average_speed: 40.0,
            unload_rate_minutes: 0.030,
            min_unload_minutes: 30.0,
            max_drive_hours: 11.0,
            max_duty_hours: 14.0,
            mandatory_break_hours: 10.0,
            max_capacity: 3200.0,
            depot_placeholder: 0,
            depot_code: None,
            duty_hour_ceiling: None,
            weeks_per_year: 52.0,
        }
    }
}

impl DispatchConfig {
    /// Reads a (possibly partial) configuration from JSON.
    ///
    /// Fields absent from the document keep their default values.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Sets the real depot code used by the distance matrix.
    pub fn with_depot_code(mut self, code: usize) -> Self {
        self.depot_code = Some(code);
        self
    }

    /// Sets the depot placeholder used inside routes.
    pub fn with_depot_placeholder(mut self, placeholder: usize) -> Self {
        self.depot_placeholder = placeholder;
        self
    }

    /// Sets the average driving speed.
    pub fn with_average_speed(mut self, speed: f64) -> Self {
        self.average_speed = speed;
        self
    }

    /// Sets the unloading rate (minutes per volume unit) and minimum minutes per stop.
    pub fn with_unloading(mut self, rate_minutes: f64, min_minutes: f64) -> Self {
        self.unload_rate_minutes = rate_minutes;
        self.min_unload_minutes = min_minutes;
        self
    }

    /// Sets drive/duty thresholds and the mandatory break length.
    pub fn with_hours_of_service(mut self, drive: f64, duty: f64, break_hours: f64) -> Self {
        self.max_drive_hours = drive;
        self.max_duty_hours = duty;
        self.mandatory_break_hours = break_hours;
        self
    }

    /// Sets the trailer capacity.
    pub fn with_max_capacity(mut self, capacity: f64) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// Sets a hard duty-hour cap for merges.
    pub fn with_duty_hour_ceiling(mut self, ceiling: f64) -> Self {
        self.duty_hour_ceiling = Some(ceiling);
        self
    }

    /// Matrix code of the depot.
    pub fn depot(&self) -> usize {
        self.depot_code.unwrap_or(self.depot_placeholder)
    }

    /// Maps a route identifier onto its distance-matrix code.
    ///
    /// The placeholder becomes the depot code; every other identifier is
    /// returned unchanged.
    pub fn resolve(&self, id: usize) -> usize {
        if id == self.depot_placeholder {
            self.depot()
        } else {
            id
        }
    }

    /// Returns `true` if `id` names the depot, as placeholder or as real code.
    pub fn is_depot(&self, id: usize) -> bool {
        id == self.depot_placeholder || id == self.depot()
    }

    /// Settles the depot code from the available sources and returns it.
    ///
    /// An `explicit` code wins. Otherwise a code already configured is kept,
    /// and a `discovered` code (from the order table) fills an unset one.
    pub fn resolve_depot_code(
        &mut self,
        explicit: Option<usize>,
        discovered: Option<usize>,
    ) -> usize {
        match (explicit, self.depot_code, discovered) {
            (Some(code), _, _) => self.depot_code = Some(code),
            (None, None, found) => self.depot_code = found,
            (None, Some(configured), Some(found)) if configured != found => {
                warn!(
                    configured,
                    found,
                    "order table names a different depot; keeping the configured one"
                );
            }
            _ => {}
        }
        self.depot()
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.average_speed.is_finite() && self.average_speed > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "average_speed",
                value: self.average_speed,
            });
        }
        if !(self.max_capacity.is_finite() && self.max_capacity > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "max_capacity",
                value: self.max_capacity,
            });
        }
        let non_negative = [
            ("unload_rate_minutes", self.unload_rate_minutes),
            ("min_unload_minutes", self.min_unload_minutes),
            ("max_drive_hours", self.max_drive_hours),
            ("max_duty_hours", self.max_duty_hours),
            ("mandatory_break_hours", self.mandatory_break_hours),
            ("weeks_per_year", self.weeks_per_year),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if let Some(ceiling) = self.duty_hour_ceiling {
            if !(ceiling.is_finite() && ceiling > 0.0) {
                return Err(ConfigError::NonPositive {
                    field: "duty_hour_ceiling",
                    value: ceiling,
                });
            }
        }
        Ok(())
    }

    /// Unloading time in minutes for a stop receiving `volume`.
    ///
    /// Zero volume takes no time; otherwise the minimum applies.
    pub fn unload_minutes(&self, volume: f64) -> f64 {
        if volume <= 0.0 {
            return 0.0;
        }
        (volume * self.unload_rate_minutes).max(self.min_unload_minutes)
    }
}
