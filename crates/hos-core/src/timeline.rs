//! Trip activity timelines.
//!
//! A timeline is an ordered, gapless sequence of [`ActivityInterval`]s
//! covering a trip from first preparation to final unloading. Breaks
//! planned by the planner are spliced into the driving intervals they
//! interrupt before the timeline is partitioned into daily logs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DutyStatus, HosLimits};

/// One contiguous duty-status period on a trip timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInterval {
    pub status: DutyStatus,
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub location: String,
    pub miles_driven: f64,
}

impl ActivityInterval {
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }
}

/// Locations and scale of a planned trip, used to lay out its timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripItinerary {
    pub distance_miles: f64,
    pub driving_hours: f64,
    pub origin: String,
    pub pickup_location: String,
    pub dropoff_location: String,
}

/// Minutes spent on pre-trip inspection and preparation.
const PREPARATION_MINUTES: i64 = 60;

/// Minutes spent loading at the shipper or unloading at the receiver.
const LOADING_MINUTES: i64 = 60;

/// Lays out a trip as a gapless activity sequence.
///
/// Shape: 1h on-duty preparation, driving to the pickup (half the
/// driving time), 1h on-duty loading, driving to the receiver, and 1h
/// on-duty unloading. Required breaks are not included; splice them in
/// with [`insert_required_breaks`].
pub fn build_trip_timeline(
    itinerary: &TripItinerary,
    start: DateTime<Utc>,
) -> Vec<ActivityInterval> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "driving hours are validated to a realistic trip range"
    )]
    let driving_minutes = (itinerary.driving_hours * 60.0).round() as i64;
    let first_leg_minutes = driving_minutes / 2;
    let second_leg_minutes = driving_minutes - first_leg_minutes;
    let leg_miles = itinerary.distance_miles / 2.0;

    let mut cursor = start;
    let mut push = |intervals: &mut Vec<ActivityInterval>,
                    status: DutyStatus,
                    duration_minutes: i64,
                    location: &str,
                    miles_driven: f64| {
        intervals.push(ActivityInterval {
            status,
            start: cursor,
            duration_minutes,
            location: location.to_string(),
            miles_driven,
        });
        cursor += Duration::minutes(duration_minutes);
    };

    let mut intervals = Vec::with_capacity(5);
    push(
        &mut intervals,
        DutyStatus::OnDutyNotDriving,
        PREPARATION_MINUTES,
        &itinerary.origin,
        0.0,
    );
    push(
        &mut intervals,
        DutyStatus::Driving,
        first_leg_minutes,
        &itinerary.pickup_location,
        leg_miles,
    );
    push(
        &mut intervals,
        DutyStatus::OnDutyNotDriving,
        LOADING_MINUTES,
        &itinerary.pickup_location,
        0.0,
    );
    push(
        &mut intervals,
        DutyStatus::Driving,
        second_leg_minutes,
        &itinerary.dropoff_location,
        itinerary.distance_miles - leg_miles,
    );
    push(
        &mut intervals,
        DutyStatus::OnDutyNotDriving,
        LOADING_MINUTES,
        &itinerary.dropoff_location,
        0.0,
    );

    intervals
}

/// Splices mandatory 30-minute breaks into a timeline.
///
/// Walks the sequence accumulating continuous driving minutes; when the
/// 8-hour mark falls inside a driving interval, that interval is split
/// at the mark, a 30-minute off-duty break is inserted between the two
/// halves, and everything after shifts 30 minutes later. Miles of a
/// split interval are apportioned by duration. A non-driving interval
/// of 30 minutes or more resets the continuous-driving counter.
///
/// The returned timeline is gapless by construction.
pub fn insert_required_breaks(
    intervals: &[ActivityInterval],
    limits: &HosLimits,
) -> Vec<ActivityInterval> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "break threshold is a small whole number of hours"
    )]
    let break_after_minutes = (limits.break_required_after_hours * 60.0).round() as i64;
    let break_minutes = 30;

    let Some(first) = intervals.first() else {
        return Vec::new();
    };

    let mut out: Vec<ActivityInterval> = Vec::with_capacity(intervals.len());
    let mut cursor = first.start;
    let mut continuous_driving = 0_i64;

    for interval in intervals {
        if interval.status == DutyStatus::Driving {
            let mut remaining_minutes = interval.duration_minutes;
            let mut remaining_miles = interval.miles_driven;

            while remaining_minutes > 0 {
                let until_break = break_after_minutes - continuous_driving;
                if remaining_minutes >= until_break {
                    #[expect(
                        clippy::cast_precision_loss,
                        reason = "interval durations are far below 2^52 minutes"
                    )]
                    let part_miles =
                        remaining_miles * (until_break as f64 / remaining_minutes as f64);
                    out.push(ActivityInterval {
                        status: DutyStatus::Driving,
                        start: cursor,
                        duration_minutes: until_break,
                        location: interval.location.clone(),
                        miles_driven: part_miles,
                    });
                    cursor += Duration::minutes(until_break);
                    remaining_minutes -= until_break;
                    remaining_miles -= part_miles;

                    out.push(ActivityInterval {
                        status: DutyStatus::OffDuty,
                        start: cursor,
                        duration_minutes: break_minutes,
                        location: interval.location.clone(),
                        miles_driven: 0.0,
                    });
                    cursor += Duration::minutes(break_minutes);
                    continuous_driving = 0;
                } else {
                    out.push(ActivityInterval {
                        status: DutyStatus::Driving,
                        start: cursor,
                        duration_minutes: remaining_minutes,
                        location: interval.location.clone(),
                        miles_driven: remaining_miles,
                    });
                    cursor += Duration::minutes(remaining_minutes);
                    continuous_driving += remaining_minutes;
                    remaining_minutes = 0;
                }
            }
        } else {
            out.push(ActivityInterval {
                status: interval.status,
                start: cursor,
                duration_minutes: interval.duration_minutes,
                location: interval.location.clone(),
                miles_driven: interval.miles_driven,
            });
            cursor += Duration::minutes(interval.duration_minutes);
            if interval.duration_minutes >= break_minutes {
                continuous_driving = 0;
            }
        }
    }

    out
}
