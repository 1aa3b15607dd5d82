// crates/trip-planner-core/tests/proptest_simulation.rs
// ============================================================================
// Module: Trip Simulation Property-Based Tests
// Description: Randomized routes and cycle states against HOS invariants.
// Purpose: Ensure every plan terminates and never exceeds a driving limit.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use time::OffsetDateTime;
use trip_planner_core::DutyStatus;
use trip_planner_core::GeoPoint;
use trip_planner_core::HosRules;
use trip_planner_core::Route;
use trip_planner_core::StopKind;
use trip_planner_core::TripPlan;
use trip_planner_core::simulate_trip;

const TOLERANCE: f64 = 1e-6;

fn plan_for(distance: f64, speed: f64, cycle_used: f64) -> TripPlan {
    plan_with_rules(distance, speed, cycle_used, &HosRules::default())
}

fn plan_with_rules(distance: f64, speed: f64, cycle_used: f64, rules: &HosRules) -> TripPlan {
    let route = Route {
        geometry: vec![GeoPoint([-118.24, 34.05]), GeoPoint([-112.07, 33.45])],
        distance_miles: distance,
        duration_hours: distance / speed,
    };
    let start = OffsetDateTime::from_unix_timestamp(1_704_088_800).unwrap();
    simulate_trip(&route, cycle_used, start, rules).unwrap()
}

/// Latest point (hours since the last off-duty period of at least `min_off`
/// hours, or the trip start) at which any driving segment ends.
fn max_window_at_driving_end(plan: &TripPlan, min_off: f64) -> f64 {
    let mut window_start = plan.start_time;
    let mut latest: f64 = 0.0;
    for activity in &plan.activities {
        match activity.status {
            DutyStatus::Driving => {
                let elapsed = (activity.end_time - window_start).as_seconds_f64() / 3600.0;
                latest = latest.max(elapsed);
            }
            DutyStatus::OffDuty if activity.hours() >= min_off - TOLERANCE => {
                window_start = activity.end_time;
            }
            _ => {}
        }
    }
    latest
}

/// Highest cycle total reached at the end of any driving segment. On-duty
/// time accrues from `cycle_used` and clears after an off-duty period of at
/// least `reset_hours`.
fn max_cycle_at_driving_end(plan: &TripPlan, cycle_used: f64, reset_hours: f64) -> f64 {
    let mut cycle = cycle_used;
    let mut highest: f64 = 0.0;
    for activity in &plan.activities {
        match activity.status {
            DutyStatus::Driving => {
                cycle += activity.hours();
                highest = highest.max(cycle);
            }
            DutyStatus::OnDutyNotDriving => cycle += activity.hours(),
            DutyStatus::OffDuty if activity.hours() >= reset_hours - TOLERANCE => cycle = 0.0,
            _ => {}
        }
    }
    highest
}

/// Longest driving stretch between off-duty periods of at least `min_off` hours.
fn max_driving_between(plan: &TripPlan, min_off: f64) -> f64 {
    let mut longest: f64 = 0.0;
    let mut current = 0.0;
    for activity in &plan.activities {
        match activity.status {
            DutyStatus::Driving => current += activity.hours(),
            DutyStatus::OffDuty if activity.hours() >= min_off - TOLERANCE => current = 0.0,
            _ => {}
        }
        longest = longest.max(current);
    }
    longest
}

proptest! {
    #[test]
    fn plans_respect_driving_limits(
        distance in 1.0f64..4000.0,
        speed in 25.0f64..75.0,
        cycle_used in 0.0f64..70.0,
    ) {
        let rules = HosRules::default();
        let plan = plan_for(distance, speed, cycle_used);

        prop_assert!((plan.driving_hours - distance / speed).abs() < TOLERANCE);
        prop_assert!(
            max_driving_between(&plan, rules.rest_break_hours)
                <= rules.driving_hours_before_break + TOLERANCE
        );
        prop_assert!(
            max_driving_between(&plan, rules.mandatory_off_duty_hours)
                <= rules.max_driving_hours_per_day + TOLERANCE
        );
        for pair in plan.stops.windows(2) {
            prop_assert!(pair[0].time < pair[1].time);
        }
    }

    #[test]
    fn driving_stays_inside_on_duty_window(
        distance in 1.0f64..3000.0,
        pickup_hours in 0.25f64..6.0,
        cycle_used in 0.0f64..70.0,
    ) {
        let rules = HosRules { pickup_hours, ..HosRules::default() };
        let plan = plan_with_rules(distance, 60.0, cycle_used, &rules);
        prop_assert!(
            max_window_at_driving_end(&plan, rules.mandatory_off_duty_hours)
                <= rules.max_on_duty_hours_per_day + TOLERANCE
        );
    }

    #[test]
    fn no_driving_past_exhausted_cycle(
        distance in 1.0f64..3000.0,
        cycle_used in 50.0f64..=70.0,
    ) {
        let rules = HosRules::default();
        let plan = plan_for(distance, 55.0, cycle_used);
        prop_assert!(
            max_cycle_at_driving_end(&plan, cycle_used, rules.cycle_reset_hours)
                <= rules.cycle_limit_hours + TOLERANCE
        );
        if cycle_used + rules.pickup_hours >= rules.cycle_limit_hours {
            let first_driving =
                plan.activities.iter().position(|a| a.status == DutyStatus::Driving);
            let first_reset = plan.stops.first().map(|stop| stop.kind);
            prop_assert!(first_driving.is_some());
            prop_assert_eq!(first_reset, Some(StopKind::CycleReset));
        }
    }

    #[test]
    fn timeline_is_contiguous(
        distance in 0.0f64..3000.0,
        cycle_used in 0.0f64..70.0,
    ) {
        let plan = plan_for(distance, 55.0, cycle_used);
        prop_assert_eq!(plan.activities.first().map(|a| a.start_time), Some(plan.start_time));
        prop_assert_eq!(plan.activities.last().map(|a| a.end_time), Some(plan.end_time));
        for pair in plan.activities.windows(2) {
            prop_assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        let logged: f64 = plan.daily_logs.iter().map(|log| log.totals.total()).sum();
        prop_assert!((logged - plan.total_hours).abs() < TOLERANCE);
    }
}
