// crates/trip-planner-core/tests/daily_logs.rs
// ============================================================================
// Module: Daily Log Tests
// Description: Midnight splitting and per-status totals.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only assertions are permitted."
)]

use time::OffsetDateTime;
use time::UtcOffset;
use trip_planner_core::Activity;
use trip_planner_core::DutyStatus;
use trip_planner_core::GeoPoint;
use trip_planner_core::HosRules;
use trip_planner_core::Route;
use trip_planner_core::build_daily_logs;
use trip_planner_core::simulate_trip;

/// `hours` after 2024-01-01T00:00:00Z.
fn at(hours: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_704_067_200 + hours * 3600).unwrap()
}

fn activity(start: i64, end: i64, status: DutyStatus) -> Activity {
    Activity {
        start_time: at(start),
        end_time: at(end),
        status,
    }
}

#[test]
fn splits_activity_crossing_midnight() {
    let activities = vec![
        activity(20, 30, DutyStatus::OffDuty),
        activity(30, 34, DutyStatus::Driving),
    ];
    let logs = build_daily_logs(&activities, 50.0).unwrap();

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].date, "2024-01-01");
    assert_eq!(logs[0].entries.len(), 1);
    assert_eq!(logs[0].entries[0].end_time, at(24));
    assert_eq!(logs[0].totals.off_duty, 4.0);
    assert_eq!(logs[0].driving_miles, 0.0);

    assert_eq!(logs[1].date, "2024-01-02");
    assert_eq!(logs[1].entries.len(), 2);
    assert_eq!(logs[1].entries[0].start_time, at(24));
    assert_eq!(logs[1].totals.off_duty, 6.0);
    assert_eq!(logs[1].totals.driving, 4.0);
    assert_eq!(logs[1].driving_miles, 200.0);
}

#[test]
fn multi_day_activity_fills_whole_days() {
    let activities = vec![activity(12, 72, DutyStatus::OffDuty)];
    let logs = build_daily_logs(&activities, 50.0).unwrap();

    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].totals.total(), 12.0);
    assert_eq!(logs[1].totals.total(), 24.0);
    assert_eq!(logs[2].totals.total(), 24.0);
    assert_eq!(logs[2].entries[0].end_time, at(72));
}

#[test]
fn midnight_follows_the_activity_offset() {
    let offset = UtcOffset::from_hms(-5, 0, 0).unwrap();
    // 2024-01-01T22:00-05:00 to 2024-01-02T02:00-05:00.
    let start = at(27).to_offset(offset);
    let end = at(31).to_offset(offset);
    let activities = vec![Activity {
        start_time: start,
        end_time: end,
        status: DutyStatus::Driving,
    }];
    let logs = build_daily_logs(&activities, 60.0).unwrap();

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].date, "2024-01-01");
    assert_eq!(logs[0].totals.driving, 2.0);
    assert_eq!(logs[1].date, "2024-01-02");
    assert_eq!(logs[1].driving_miles, 120.0);
}

#[test]
fn empty_timeline_has_no_logs() {
    assert!(build_daily_logs(&[], 50.0).unwrap().is_empty());
}

#[test]
fn simulated_logs_cover_the_whole_trip() {
    let route = Route {
        geometry: vec![GeoPoint([-87.6, 41.8]), GeoPoint([-74.0, 40.7])],
        distance_miles: 1500.0,
        duration_hours: 25.0,
    };
    let plan = simulate_trip(&route, 20.0, at(8), &HosRules::default()).unwrap();

    let logged: f64 = plan.daily_logs.iter().map(|log| log.totals.total()).sum();
    assert!((logged - plan.total_hours).abs() < 1e-6);
    let logged_driving: f64 = plan.daily_logs.iter().map(|log| log.totals.driving).sum();
    assert!((logged_driving - plan.driving_hours).abs() < 1e-6);
    let miles: f64 = plan.daily_logs.iter().map(|log| log.driving_miles).sum();
    assert!((miles - 1500.0).abs() < 1e-3);
    for log in &plan.daily_logs {
        assert!(log.totals.total() <= 24.0 + 1e-9, "{}", log.date);
        assert_eq!(log.totals.sleeper_berth, 0.0);
    }
}
