//! Daily log partitioning.
//!
//! Splits a trip's continuous activity timeline into one record set per
//! calendar day. Intervals are clipped to day boundaries, gaps are
//! filled with off-duty time, and every day accounts for exactly 1440
//! minutes. Totals are rounded to the 15-minute granularity an ELD
//! reports at.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timeline::ActivityInterval;
use crate::types::{DutyStatus, HosLimits};

/// Malformed-timeline errors detected before partitioning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// An interval starts before the one preceding it.
    #[error("timeline intervals out of chronological order at index {index}")]
    OutOfOrder { index: usize },

    /// An interval starts before the previous one ends.
    #[error("timeline intervals overlap at index {index}")]
    Overlapping { index: usize },

    /// An interval has a negative duration.
    #[error("timeline interval at index {index} has negative duration")]
    NegativeDuration { index: usize },
}

/// One duty-status line on a daily log sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyStatusRecord {
    pub sequence_order: u32,
    pub status: DutyStatus,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub location: String,
    pub miles_driven: f64,
}

impl DutyStatusRecord {
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }
}

/// Per-status hour totals for one calendar day, rounded to 0.25h.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DutyTotals {
    pub off_duty_hours: f64,
    pub sleeper_berth_hours: f64,
    pub driving_hours: f64,
    pub on_duty_not_driving_hours: f64,
}

impl DutyTotals {
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.off_duty_hours
            + self.sleeper_berth_hours
            + self.driving_hours
            + self.on_duty_not_driving_hours
    }
}

/// A daily log flag: the day breaches an HOS rule.
///
/// Flags are advisory data on an otherwise complete log; a
/// non-compliant day is still generated and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DailyLogViolation {
    /// More than 11 hours of driving recorded.
    ExcessiveDriving { hours: f64 },
    /// Less than 10 hours of off-duty plus sleeper-berth time.
    InsufficientRest { rest_hours: f64 },
}

impl std::fmt::Display for DailyLogViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExcessiveDriving { hours } => {
                write!(f, "driving total {hours}h exceeds the 11-hour limit")
            }
            Self::InsufficientRest { rest_hours } => {
                write!(f, "only {rest_hours}h of rest recorded (10h required)")
            }
        }
    }
}

/// The complete 24-hour record for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogRecord {
    pub log_date: NaiveDate,
    /// Gapless records covering midnight to midnight, in time order.
    pub records: Vec<DutyStatusRecord>,
    pub totals: DutyTotals,
    pub total_miles: f64,
}

impl DailyLogRecord {
    /// Flags HOS breaches visible on this single day's totals.
    #[must_use]
    pub fn compliance_violations(&self, limits: &HosLimits) -> Vec<DailyLogViolation> {
        let mut violations = Vec::new();
        if self.totals.driving_hours > limits.max_driving_hours {
            violations.push(DailyLogViolation::ExcessiveDriving {
                hours: self.totals.driving_hours,
            });
        }
        let rest_hours = self.totals.off_duty_hours + self.totals.sleeper_berth_hours;
        if rest_hours < limits.min_off_duty_hours {
            violations.push(DailyLogViolation::InsufficientRest { rest_hours });
        }
        violations
    }
}

/// Fallback location label for synthesized off-duty records.
const REST_LOCATION: &str = "Rest location";

/// Partitions a gapless activity timeline into per-day log records.
///
/// One record is emitted per calendar date the timeline touches. An
/// interval spanning midnight is split at the boundary; its mileage
/// stays on the first fragment and the continuation carries zero, since
/// miles cannot be apportioned without route data. Any uncovered time
/// becomes synthetic off-duty records, so each day's records always sum
/// to exactly 1440 minutes.
pub fn partition_daily_logs(
    intervals: &[ActivityInterval],
) -> Result<Vec<DailyLogRecord>, TimelineError> {
    validate_timeline(intervals)?;

    let (Some(first), Some(last)) = (intervals.first(), intervals.last()) else {
        return Ok(Vec::new());
    };
    let timeline_end = last.end();

    let mut logs = Vec::new();
    let mut date = first.start.date_naive();

    loop {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        if day_start >= timeline_end {
            break;
        }
        logs.push(build_day_record(intervals, date, day_start));

        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    tracing::debug!(days = logs.len(), "partitioned timeline into daily logs");
    Ok(logs)
}

/// Builds the record set for one calendar date.
fn build_day_record(
    intervals: &[ActivityInterval],
    date: NaiveDate,
    day_start: DateTime<Utc>,
) -> DailyLogRecord {
    let day_end = day_start + Duration::days(1);

    // Clip overlapping intervals to the day window.
    let mut clipped: Vec<DutyStatusRecord> = Vec::new();
    for interval in intervals {
        let clip_start = interval.start.max(day_start);
        let clip_end = interval.end().min(day_end);
        if clip_end <= clip_start {
            continue;
        }
        // Mileage stays with the fragment that starts the interval.
        let miles_driven = if clip_start == interval.start {
            interval.miles_driven
        } else {
            0.0
        };
        clipped.push(DutyStatusRecord {
            sequence_order: 0,
            status: interval.status,
            start: clip_start,
            duration_minutes: (clip_end - clip_start).num_minutes(),
            location: interval.location.clone(),
            miles_driven,
        });
    }

    let mut records = fill_day_gaps(clipped, day_start, day_end);
    for (order, record) in records.iter_mut().enumerate() {
        record.sequence_order = u32::try_from(order).unwrap_or(u32::MAX);
    }

    let totals = day_totals(&records);
    let total_miles = records.iter().map(|r| r.miles_driven).sum();

    DailyLogRecord {
        log_date: date,
        records,
        totals,
        total_miles,
    }
}

/// Closes every gap in a day with synthetic off-duty records.
fn fill_day_gaps(
    clipped: Vec<DutyStatusRecord>,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> Vec<DutyStatusRecord> {
    let off_duty = |start: DateTime<Utc>, end: DateTime<Utc>, location: &str| DutyStatusRecord {
        sequence_order: 0,
        status: DutyStatus::OffDuty,
        start,
        duration_minutes: (end - start).num_minutes(),
        location: location.to_string(),
        miles_driven: 0.0,
    };

    if clipped.is_empty() {
        // A day with no activity is one full off-duty record.
        return vec![off_duty(day_start, day_end, REST_LOCATION)];
    }

    let mut filled = Vec::with_capacity(clipped.len() * 2);
    let mut cursor = day_start;
    let mut last_location = REST_LOCATION.to_string();

    for record in clipped {
        if record.start > cursor {
            filled.push(off_duty(cursor, record.start, &last_location));
        }
        cursor = record.end();
        last_location.clone_from(&record.location);
        filled.push(record);
    }

    if cursor < day_end {
        filled.push(off_duty(cursor, day_end, &last_location));
    }

    filled
}

/// Sums minutes per status and rounds to the nearest quarter hour.
fn day_totals(records: &[DutyStatusRecord]) -> DutyTotals {
    let mut minutes = [0_i64; 4];
    for record in records {
        let slot = match record.status {
            DutyStatus::OffDuty => 0,
            DutyStatus::SleeperBerth => 1,
            DutyStatus::Driving => 2,
            DutyStatus::OnDutyNotDriving => 3,
        };
        minutes[slot] += record.duration_minutes;
    }

    DutyTotals {
        off_duty_hours: quarter_hours(minutes[0]),
        sleeper_berth_hours: quarter_hours(minutes[1]),
        driving_hours: quarter_hours(minutes[2]),
        on_duty_not_driving_hours: quarter_hours(minutes[3]),
    }
}

/// Rounds minutes to hours at 15-minute ELD granularity.
fn quarter_hours(minutes: i64) -> f64 {
    #[expect(clippy::cast_precision_loss, reason = "day totals fit in 1440 minutes")]
    let hours = minutes as f64 / 60.0;
    (hours * 4.0).round() / 4.0
}

/// Rejects timelines the partitioner cannot represent.
fn validate_timeline(intervals: &[ActivityInterval]) -> Result<(), TimelineError> {
    for (index, interval) in intervals.iter().enumerate() {
        if interval.duration_minutes < 0 {
            return Err(TimelineError::NegativeDuration { index });
        }
    }
    for (index, pair) in intervals.windows(2).enumerate() {
        let index = index + 1;
        if pair[1].start < pair[0].start {
            return Err(TimelineError::OutOfOrder { index });
        }
        if pair[1].start < pair[0].end() {
            return Err(TimelineError::Overlapping { index });
        }
    }
    Ok(())
}
