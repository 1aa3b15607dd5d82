// crates/trip-planner-core/src/runtime/logs.rs
// ============================================================================
// Module: Daily Log Sheets
// Description: Per-day driver log sheets built from a duty timeline.
// Purpose: Split activities at midnight and total hours per duty status.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! Activities that cross midnight are split so each [`DailyLog`] only covers
//! its own calendar day. Midnight is taken in the activity's own UTC offset.

use serde::Deserialize;
use serde::Serialize;
use time::Duration;
use time::OffsetDateTime;
use time::Time;

use crate::core::clock::hours_between;
use crate::core::duty::Activity;
use crate::core::duty::DutyStatus;
use crate::runtime::TripError;

/// One grid line on a daily log sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    /// Entry start.
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Entry end, no later than the next midnight.
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    /// Duty status.
    pub status: DutyStatus,
}

/// Hours per duty status for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTotals {
    /// Off-duty hours.
    pub off_duty: f64,
    /// Sleeper-berth hours.
    pub sleeper_berth: f64,
    /// Driving hours.
    pub driving: f64,
    /// On-duty, not-driving hours.
    pub on_duty_not_driving: f64,
}

impl StatusTotals {
    /// Adds hours to the bucket for `status`.
    pub fn add(&mut self, status: DutyStatus, hours: f64) {
        match status {
            DutyStatus::OffDuty => self.off_duty += hours,
            DutyStatus::SleeperBerth => self.sleeper_berth += hours,
            DutyStatus::Driving => self.driving += hours,
            DutyStatus::OnDutyNotDriving => self.on_duty_not_driving += hours,
        }
    }

    /// Hours for `status`.
    #[must_use]
    pub const fn get(&self, status: DutyStatus) -> f64 {
        match status {
            DutyStatus::OffDuty => self.off_duty,
            DutyStatus::SleeperBerth => self.sleeper_berth,
            DutyStatus::Driving => self.driving,
            DutyStatus::OnDutyNotDriving => self.on_duty_not_driving,
        }
    }

    /// Sum across all statuses.
    #[must_use]
    pub fn total(&self) -> f64 {
        DutyStatus::ALL.iter().map(|status| self.get(*status)).sum()
    }
}

/// Log sheet for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Entries in time order.
    pub entries: Vec<DailyLogEntry>,
    /// Hours per status.
    pub totals: StatusTotals,
    /// Miles driven during the day.
    pub driving_miles: f64,
}

/// Builds daily log sheets from a time-ordered activity list.
///
/// # Errors
///
/// Returns [`TripError::TimeOverflow`] when a midnight boundary cannot be
/// represented.
pub fn build_daily_logs(
    activities: &[Activity],
    miles_per_driving_hour: f64,
) -> Result<Vec<DailyLog>, TripError> {
    let mut logs: Vec<DailyLog> = Vec::new();
    for activity in activities {
        let mut cursor = activity.start_time;
        while cursor < activity.end_time {
            let next_midnight = cursor
                .replace_time(Time::MIDNIGHT)
                .checked_add(Duration::DAY)
                .ok_or(TripError::TimeOverflow)?;
            let segment_end = activity.end_time.min(next_midnight);
            let date = cursor.date().to_string();
            let hours = hours_between(cursor, segment_end);
            if logs.last().is_none_or(|log| log.date != date) {
                logs.push(DailyLog {
                    date,
                    entries: Vec::new(),
                    totals: StatusTotals::default(),
                    driving_miles: 0.0,
                });
            }
            if let Some(log) = logs.last_mut() {
                log.entries.push(DailyLogEntry {
                    start_time: cursor,
                    end_time: segment_end,
                    status: activity.status,
                });
                log.totals.add(activity.status, hours);
                if activity.status == DutyStatus::Driving {
                    log.driving_miles += hours * miles_per_driving_hour;
                }
            }
            cursor = segment_end;
        }
    }
    Ok(logs)
}
