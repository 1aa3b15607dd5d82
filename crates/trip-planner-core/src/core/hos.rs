// crates/trip-planner-core/src/core/hos.rs
// ============================================================================
// Module: Hours-of-Service Rules
// Description: Property-carrying driver limits used by the trip simulator.
// Purpose: Centralize HOS limits with defaults and validation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Defaults follow the property-carrying driver rules: 11 hours driving and a
//! 14-hour on-duty window per day, a 30-minute break after 8 hours of
//! driving, 10 hours off duty between shifts, and a 70-hour/8-day cycle with
//! a 34-hour reset. Deployments may override any field through config.

use serde::Deserialize;
use serde::Serialize;

use crate::runtime::TripError;

/// Hours-of-service limits and trip timing assumptions.
///
/// # Invariants
/// - Every field is finite and strictly positive after [`HosRules::validate`].
/// - `driving_hours_before_break` and `max_driving_hours_per_day` do not
///   exceed `max_on_duty_hours_per_day`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HosRules {
    /// Fallback speed when the route reports no duration.
    pub average_speed_mph: f64,
    /// Distance between fueling stops.
    pub miles_per_fueling: f64,
    /// On-duty time spent fueling.
    pub fueling_hours: f64,
    /// On-duty time spent loading at pickup.
    pub pickup_hours: f64,
    /// On-duty time spent unloading at dropoff.
    pub dropoff_hours: f64,
    /// Daily driving limit.
    pub max_driving_hours_per_day: f64,
    /// Daily on-duty window.
    pub max_on_duty_hours_per_day: f64,
    /// Continuous driving allowed before a break.
    pub driving_hours_before_break: f64,
    /// Break length.
    pub rest_break_hours: f64,
    /// Off-duty period once a daily limit is reached.
    pub mandatory_off_duty_hours: f64,
    /// Rolling multi-day on-duty limit.
    pub cycle_limit_hours: f64,
    /// Off-duty period that resets the cycle.
    pub cycle_reset_hours: f64,
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            average_speed_mph: 50.0,
            miles_per_fueling: 1000.0,
            fueling_hours: 1.0,
            pickup_hours: 1.0,
            dropoff_hours: 1.0,
            max_driving_hours_per_day: 11.0,
            max_on_duty_hours_per_day: 14.0,
            driving_hours_before_break: 8.0,
            rest_break_hours: 0.5,
            mandatory_off_duty_hours: 10.0,
            cycle_limit_hours: 70.0,
            cycle_reset_hours: 34.0,
        }
    }
}

impl HosRules {
    /// Validates rule values.
    ///
    /// # Errors
    ///
    /// Returns [`TripError::InvalidRules`] naming the first offending field.
    pub fn validate(&self) -> Result<(), TripError> {
        let fields = [
            ("average_speed_mph", self.average_speed_mph),
            ("miles_per_fueling", self.miles_per_fueling),
            ("fueling_hours", self.fueling_hours),
            ("pickup_hours", self.pickup_hours),
            ("dropoff_hours", self.dropoff_hours),
            ("max_driving_hours_per_day", self.max_driving_hours_per_day),
            ("max_on_duty_hours_per_day", self.max_on_duty_hours_per_day),
            ("driving_hours_before_break", self.driving_hours_before_break),
            ("rest_break_hours", self.rest_break_hours),
            ("mandatory_off_duty_hours", self.mandatory_off_duty_hours),
            ("cycle_limit_hours", self.cycle_limit_hours),
            ("cycle_reset_hours", self.cycle_reset_hours),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(TripError::InvalidRules(format!("{name} must be finite and > 0")));
            }
        }
        if self.max_driving_hours_per_day > self.max_on_duty_hours_per_day {
            return Err(TripError::InvalidRules(
                "max_driving_hours_per_day exceeds max_on_duty_hours_per_day".to_string(),
            ));
        }
        if self.driving_hours_before_break > self.max_on_duty_hours_per_day {
            return Err(TripError::InvalidRules(
                "driving_hours_before_break exceeds max_on_duty_hours_per_day".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::HosRules;

    #[test]
    fn defaults_validate() {
        HosRules::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_and_nan_fields() {
        let rules = HosRules {
            fueling_hours: 0.0,
            ..HosRules::default()
        };
        assert!(rules.validate().is_err());
        let rules = HosRules {
            average_speed_mph: f64::NAN,
            ..HosRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn rejects_driving_limit_above_on_duty_window() {
        let rules = HosRules {
            max_driving_hours_per_day: 15.0,
            ..HosRules::default()
        };
        let err = rules.validate().unwrap_err();
        assert!(err.to_string().contains("max_driving_hours_per_day"));
    }
}
