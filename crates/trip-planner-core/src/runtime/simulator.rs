// crates/trip-planner-core/src/runtime/simulator.rs
// ============================================================================
// Module: HOS Trip Simulator
// Description: Deterministic trip walk under hours-of-service limits.
// Purpose: Produce activities, stops, and daily logs for a planned trip.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! The simulator starts with the pickup, then repeatedly either takes a
//! required rest or fueling stop, or drives one segment clipped to the next
//! limit it would hit, and finishes with the dropoff. Limits are checked in a
//! fixed order: cycle, daily limits, break, fuel.
//!
//! Driving segments are clipped to every limit, so no limit is ever
//! overshot and each loop iteration either makes progress or resets a
//! counter. The loop therefore terminates for any valid input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::clock::add_hours;
use crate::core::duty::Activity;
use crate::core::duty::DutyStatus;
use crate::core::duty::Stop;
use crate::core::duty::StopKind;
use crate::core::geo::GeoPoint;
use crate::core::geo::Polyline;
use crate::core::hos::HosRules;
use crate::core::route::Route;
use crate::runtime::TripError;
use crate::runtime::logs::DailyLog;
use crate::runtime::logs::build_daily_logs;

/// Tolerance for floating-point limit comparisons, in hours or miles.
const EPSILON: f64 = 1e-9;

// ============================================================================
// SECTION: Trip State
// ============================================================================

/// Running counters for a trip in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TripState {
    /// Trip start.
    pub start_time: OffsetDateTime,
    /// Hours elapsed since start.
    pub elapsed_hours: f64,
    /// On-duty hours in the current cycle.
    pub cycle_hours: f64,
    /// Driving hours since the last daily off-duty period.
    pub daily_driving_hours: f64,
    /// Hours in the current on-duty window.
    pub daily_on_duty_hours: f64,
    /// Driving hours since the last break.
    pub driving_since_break: f64,
    /// Miles since the last fueling.
    pub miles_since_fuel: f64,
    /// Miles driven so far.
    pub miles_traveled: f64,
    /// Total route distance.
    pub distance_miles: f64,
    /// Total route driving time reported by the provider.
    pub duration_hours: f64,
    /// Speed used when the provider reported no duration.
    fallback_speed_mph: f64,
}

impl TripState {
    /// Creates the initial state for a trip.
    #[must_use]
    pub fn new(
        start_time: OffsetDateTime,
        cycle_used: f64,
        distance_miles: f64,
        duration_hours: f64,
        rules: &HosRules,
    ) -> Self {
        Self {
            start_time,
            elapsed_hours: 0.0,
            cycle_hours: cycle_used,
            daily_driving_hours: 0.0,
            daily_on_duty_hours: 0.0,
            driving_since_break: 0.0,
            miles_since_fuel: 0.0,
            miles_traveled: 0.0,
            distance_miles,
            duration_hours,
            fallback_speed_mph: rules.average_speed_mph,
        }
    }

    /// Average speed implied by the route, or the configured fallback when
    /// the route carries no duration.
    #[must_use]
    pub fn average_speed(&self) -> f64 {
        if self.duration_hours > 0.0 && self.distance_miles > 0.0 {
            self.distance_miles / self.duration_hours
        } else {
            self.fallback_speed_mph
        }
    }

    /// Miles left to drive.
    #[must_use]
    pub fn remaining_miles(&self) -> f64 {
        (self.distance_miles - self.miles_traveled).max(0.0)
    }

    /// Fraction of the route distance already covered.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.distance_miles > 0.0 { self.miles_traveled / self.distance_miles } else { 0.0 }
    }

    /// Clears the daily counters after a full off-duty period.
    fn reset_day(&mut self) {
        self.daily_driving_hours = 0.0;
        self.daily_on_duty_hours = 0.0;
        self.driving_since_break = 0.0;
    }
}

// ============================================================================
// SECTION: Trip Plan
// ============================================================================

/// Simulated trip returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    /// Trip start.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Trip end (after dropoff).
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Route polyline in `[lon, lat]` order.
    #[serde(rename = "route")]
    pub geometry: Vec<GeoPoint>,
    /// Road distance in miles.
    #[serde(rename = "distance")]
    pub distance_miles: f64,
    /// Elapsed trip hours including every stop.
    #[serde(rename = "duration")]
    pub total_hours: f64,
    /// Hours spent driving.
    pub driving_hours: f64,
    /// Speed used to convert driving time to distance.
    pub average_speed_mph: f64,
    /// Cycle hours used when the trip ends.
    pub cycle_hours_used: f64,
    /// Planned stops in time order.
    pub stops: Vec<Stop>,
    /// Duty timeline in time order.
    pub activities: Vec<Activity>,
    /// One log sheet per calendar day.
    pub daily_logs: Vec<DailyLog>,
}

// ============================================================================
// SECTION: Simulation
// ============================================================================

/// Simulates a trip along `route` for a driver who has already used
/// `cycle_used` hours of the current cycle.
///
/// # Errors
///
/// Returns [`TripError`] when the route, rules, or cycle value is invalid, or
/// when the timeline cannot be represented.
pub fn simulate_trip(
    route: &Route,
    cycle_used: f64,
    start_time: OffsetDateTime,
    rules: &HosRules,
) -> Result<TripPlan, TripError> {
    route.validate()?;
    rules.validate()?;
    if !cycle_used.is_finite() || cycle_used < 0.0 || cycle_used > rules.cycle_limit_hours {
        return Err(TripError::InvalidInput(format!(
            "current cycle used must be within [0, {}] hours",
            rules.cycle_limit_hours
        )));
    }

    let state =
        TripState::new(start_time, cycle_used, route.distance_miles, route.duration_hours, rules);
    let mut sim = Simulation {
        rules,
        polyline: Polyline::new(&route.geometry),
        speed: state.average_speed(),
        state,
        activities: Vec::new(),
        stops: Vec::new(),
        driving_hours: 0.0,
    };

    sim.work(DutyStatus::OnDutyNotDriving, rules.pickup_hours)?;
    while sim.state.remaining_miles() > EPSILON {
        sim.step()?;
    }
    sim.work(DutyStatus::OnDutyNotDriving, rules.dropoff_hours)?;
    sim.finish(route)
}

/// Mutable simulation context.
struct Simulation<'a> {
    /// Active rule set.
    rules: &'a HosRules,
    /// Route geometry used to place stops.
    polyline: Polyline<'a>,
    /// Miles per driving hour.
    speed: f64,
    /// Running counters.
    state: TripState,
    /// Emitted duty timeline.
    activities: Vec<Activity>,
    /// Emitted stops.
    stops: Vec<Stop>,
    /// Total driving hours.
    driving_hours: f64,
}

impl Simulation<'_> {
    /// Performs one loop iteration: a required stop or one driving segment.
    fn step(&mut self) -> Result<(), TripError> {
        let rules = self.rules;
        let state = &self.state;
        if state.cycle_hours >= rules.cycle_limit_hours - EPSILON {
            self.stop(StopKind::CycleReset, DutyStatus::OffDuty, rules.cycle_reset_hours)?;
            self.state.cycle_hours = 0.0;
            self.state.reset_day();
            return Ok(());
        }
        if state.daily_driving_hours >= rules.max_driving_hours_per_day - EPSILON
            || state.daily_on_duty_hours >= rules.max_on_duty_hours_per_day - EPSILON
        {
            self.stop(StopKind::OffDuty, DutyStatus::OffDuty, rules.mandatory_off_duty_hours)?;
            self.state.reset_day();
            return Ok(());
        }
        if state.driving_since_break >= rules.driving_hours_before_break - EPSILON {
            self.stop(StopKind::RestBreak, DutyStatus::OffDuty, rules.rest_break_hours)?;
            // The break is off duty but does not pause the on-duty window.
            self.state.daily_on_duty_hours += rules.rest_break_hours;
            self.state.driving_since_break = 0.0;
            return Ok(());
        }
        if state.miles_since_fuel >= rules.miles_per_fueling - EPSILON {
            self.stop(StopKind::Fueling, DutyStatus::OnDutyNotDriving, rules.fueling_hours)?;
            self.state.daily_on_duty_hours += rules.fueling_hours;
            self.state.cycle_hours += rules.fueling_hours;
            self.state.miles_since_fuel = 0.0;
            return Ok(());
        }
        self.drive()
    }

    /// Drives until the route ends or the nearest limit is reached.
    fn drive(&mut self) -> Result<(), TripError> {
        let rules = self.rules;
        let state = &self.state;
        let hours = [
            state.remaining_miles() / self.speed,
            (rules.miles_per_fueling - state.miles_since_fuel) / self.speed,
            rules.driving_hours_before_break - state.driving_since_break,
            rules.max_driving_hours_per_day - state.daily_driving_hours,
            rules.max_on_duty_hours_per_day - state.daily_on_duty_hours,
            rules.cycle_limit_hours - state.cycle_hours,
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
        .max(0.0);

        let miles = (hours * self.speed).min(self.state.remaining_miles());
        self.record(DutyStatus::Driving, hours)?;
        let state = &mut self.state;
        state.miles_traveled += miles;
        state.miles_since_fuel += miles;
        state.daily_driving_hours += hours;
        state.daily_on_duty_hours += hours;
        state.cycle_hours += hours;
        state.driving_since_break += hours;
        self.driving_hours += hours;
        if self.state.remaining_miles() <= EPSILON {
            self.state.miles_traveled = self.state.distance_miles;
        }
        Ok(())
    }

    /// Records on-duty, not-driving work such as pickup or dropoff.
    fn work(&mut self, status: DutyStatus, hours: f64) -> Result<(), TripError> {
        self.record(status, hours)?;
        self.state.daily_on_duty_hours += hours;
        self.state.cycle_hours += hours;
        Ok(())
    }

    /// Records a stop at the current route position.
    fn stop(&mut self, kind: StopKind, status: DutyStatus, hours: f64) -> Result<(), TripError> {
        let location = self
            .polyline
            .point_at_fraction(self.state.progress())
            .ok_or_else(|| TripError::InvalidInput("route geometry must not be empty".to_string()))?;
        self.stops.push(Stop {
            time: self.state.elapsed_hours,
            location,
            kind,
            reason: kind.reason().to_string(),
            duration_hours: hours,
        });
        self.record(status, hours)
    }

    /// Appends an activity and advances the clock.
    fn record(&mut self, status: DutyStatus, hours: f64) -> Result<(), TripError> {
        let start = add_hours(self.state.start_time, self.state.elapsed_hours)?;
        self.state.elapsed_hours += hours;
        let end = add_hours(self.state.start_time, self.state.elapsed_hours)?;
        self.activities.push(Activity {
            start_time: start,
            end_time: end,
            status,
        });
        Ok(())
    }

    /// Assembles the final plan.
    fn finish(self, route: &Route) -> Result<TripPlan, TripError> {
        let end_time = add_hours(self.state.start_time, self.state.elapsed_hours)?;
        let daily_logs = build_daily_logs(&self.activities, self.speed)?;
        Ok(TripPlan {
            start_time: self.state.start_time,
            end_time,
            geometry: route.geometry.clone(),
            distance_miles: route.distance_miles,
            total_hours: self.state.elapsed_hours,
            driving_hours: self.driving_hours,
            average_speed_mph: self.speed,
            cycle_hours_used: self.state.cycle_hours,
            stops: self.stops,
            activities: self.activities,
            daily_logs,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        reason = "Test-only assertions."
    )]

    use time::OffsetDateTime;

    use super::TripState;
    use crate::core::hos::HosRules;

    fn epoch() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[test]
    fn average_speed_uses_route_totals() {
        let state = TripState::new(epoch(), 0.0, 120.0, 2.0, &HosRules::default());
        assert_eq!(state.average_speed(), 60.0);
    }

    #[test]
    fn average_speed_falls_back_without_duration() {
        let state = TripState::new(epoch(), 0.0, 100.0, 0.0, &HosRules::default());
        assert_eq!(state.average_speed(), HosRules::default().average_speed_mph);
    }

    #[test]
    fn progress_is_zero_for_empty_distance() {
        let state = TripState::new(epoch(), 0.0, 0.0, 0.0, &HosRules::default());
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.remaining_miles(), 0.0);
    }
}
