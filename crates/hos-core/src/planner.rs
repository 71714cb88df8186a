//! Rest-break planning across a trip's driving hours and distance.
//!
//! Simulates the consumption of driving time to place mandatory
//! 30-minute breaks and 10-hour rest periods, adds fuel and
//! pickup/dropoff stops, then sorts and merges the schedule under
//! [`MergePolicy`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::breaks::{BreakPriority, BreakType, MergePolicy, RestBreak};
use crate::types::{HosLimits, HosState};

/// Miles between refueling stops.
pub const FUEL_STOP_INTERVAL_MILES: f64 = 1000.0;

/// Fixed duration of a pickup or dropoff stop.
pub const PICKUP_DROPOFF_HOURS: f64 = 1.0;

/// Assumed average truck speed for converting hours to miles.
pub const AVERAGE_SPEED_MPH: f64 = 55.0;

/// Trip-level input errors, raised before any planning proceeds.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidTripError {
    #[error("invalid trip distance: {0} miles")]
    NonPositiveDistance(f64),

    #[error("invalid driving hours: {0}")]
    NonPositiveDrivingHours(f64),

    #[error("cycle hours out of range: {0} (must be within 0-70)")]
    CycleHoursOutOfRange(f64),

    #[error(
        "unrealistic speed implied: {speed_mph:.1} mph ({distance_miles} miles in {driving_hours} hours)"
    )]
    UnrealisticSpeed {
        speed_mph: f64,
        distance_miles: f64,
        driving_hours: f64,
    },
}

/// One deficiency found when checking a plan against the break rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanIssue {
    pub kind: PlanIssueKind,
    pub description: String,
    pub required: usize,
    pub planned: usize,
}

/// Kind of plan deficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanIssueKind {
    InsufficientThirtyMinuteBreaks,
    InsufficientTenHourBreaks,
}

/// Whether the planned breaks satisfy the mandatory-break counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCompliance {
    pub is_compliant: bool,
    pub issues: Vec<PlanIssue>,
    /// 100 when compliant, else 20 points off per issue.
    pub compliance_score: u8,
}

/// Complete break schedule for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripBreakPlan {
    /// All planned stops, ordered by driving-hour mark, post-merge.
    pub breaks: Vec<RestBreak>,
    pub mandatory_count: usize,
    pub fuel_stop_count: usize,
    pub operational_count: usize,
    pub total_break_hours: f64,
    /// Driving time plus all break time.
    pub total_trip_hours: f64,
    pub compliance: PlanCompliance,
}

/// Places 30-minute breaks along a stretch of driving.
///
/// Simulates driving in segments; every time 8 cumulative hours accrue
/// since the last qualifying break, a stop is emitted at that
/// cumulative-driving mark and the counter resets. The loop consumes a
/// positive amount of driving per iteration, so it runs at most
/// `driving_hours / 8 + 2` times.
pub fn plan_30_minute_breaks(
    driving_hours: f64,
    hours_since_break: f64,
    limits: &HosLimits,
) -> Vec<RestBreak> {
    let mut breaks = Vec::new();
    let mut remaining = driving_hours;
    let mut since_break = hours_since_break;
    let mut completed = 0.0;

    while remaining > 0.0 {
        // Overdue before this segment starts (carried-in driving hours).
        if since_break >= limits.break_required_after_hours {
            breaks.push(thirty_minute_break(completed));
            since_break = 0.0;
        }

        let segment = remaining.min(limits.break_required_after_hours - since_break);
        since_break += segment;
        completed += segment;
        remaining -= segment;

        // The 8-hour mark lands exactly at the end of the trip.
        if remaining <= 0.0 && since_break >= limits.break_required_after_hours {
            breaks.push(thirty_minute_break(completed));
            since_break = 0.0;
        }
    }

    tracing::debug!(count = breaks.len(), "planned 30-minute breaks");
    breaks
}

fn thirty_minute_break(at_driving_hours: f64) -> RestBreak {
    RestBreak {
        break_type: BreakType::ThirtyMinute,
        duration_hours: 0.5,
        at_driving_hours,
        at_trip_miles: at_driving_hours * AVERAGE_SPEED_MPH,
        is_mandatory: true,
        regulation: "395.3(a)(3)(ii)".to_string(),
        priority: BreakPriority::Critical,
        reason: "30-minute rest break after 8 hours driving".to_string(),
    }
}

/// Places 10-hour off-duty periods where the daily clocks run out.
///
/// Covers at most two duty periods: one rest where the current window's
/// headroom is exhausted, and a second 11 driving hours later if the
/// remainder still does not fit. Trips needing three or more resets are
/// reported as insufficient by the plan compliance check rather than
/// planned here.
pub fn plan_daily_rest_periods(
    driving_hours: f64,
    duty_hours: f64,
    driving_hours_used: f64,
    limits: &HosLimits,
) -> Vec<RestBreak> {
    let available_duty = limits.max_duty_period_hours - duty_hours;
    let available_driving = limits.max_driving_hours - driving_hours_used;

    let mut rest_periods = Vec::new();

    if driving_hours > available_driving || driving_hours + duty_hours > limits.max_duty_period_hours
    {
        let hours_before_rest = available_driving.min(available_duty);
        rest_periods.push(ten_hour_break(
            hours_before_rest,
            limits,
            "10 consecutive hours off duty to reset daily limits",
        ));

        let remaining_after_rest = driving_hours - hours_before_rest;
        if remaining_after_rest > limits.max_driving_hours {
            rest_periods.push(ten_hour_break(
                hours_before_rest + limits.max_driving_hours,
                limits,
                "10 consecutive hours off duty for second duty period",
            ));
        }
    }

    tracing::debug!(count = rest_periods.len(), "planned 10-hour rest periods");
    rest_periods
}

fn ten_hour_break(at_driving_hours: f64, limits: &HosLimits, reason: &str) -> RestBreak {
    RestBreak {
        break_type: BreakType::TenHour,
        duration_hours: limits.min_off_duty_hours,
        at_driving_hours,
        at_trip_miles: at_driving_hours * AVERAGE_SPEED_MPH,
        is_mandatory: true,
        regulation: "395.3(a)(1)".to_string(),
        priority: BreakPriority::Critical,
        reason: reason.to_string(),
    }
}

/// Plans every stop for a trip: mandatory HOS breaks, fuel stops, and
/// pickup/dropoff, merged into a single ordered schedule.
pub fn plan_trip_breaks(
    distance_miles: f64,
    driving_hours: f64,
    state: &HosState,
    limits: &HosLimits,
) -> Result<TripBreakPlan, InvalidTripError> {
    validate_trip_inputs(distance_miles, driving_hours, state.cycle_hours_used, limits)?;

    tracing::info!(distance_miles, driving_hours, "planning trip breaks");

    let mut mandatory =
        plan_30_minute_breaks(driving_hours, state.hours_since_break, limits);
    mandatory.extend(plan_daily_rest_periods(
        driving_hours,
        state.duty_period_hours,
        state.driving_hours,
        limits,
    ));

    // A trip that would blow the cycle needs a restart before it starts.
    let projected =
        state.cycle_hours_used + driving_hours + 2.0 * PICKUP_DROPOFF_HOURS;
    if projected > limits.max_cycle_hours {
        mandatory.push(RestBreak {
            break_type: BreakType::RestartThirtyFourHour,
            duration_hours: limits.restart_off_duty_hours,
            at_driving_hours: 0.0,
            at_trip_miles: 0.0,
            is_mandatory: true,
            regulation: "395.3(c)".to_string(),
            priority: BreakPriority::Critical,
            reason: "34-hour restart required to reset 8-day cycle before trip".to_string(),
        });
    }
    let mandatory_count = mandatory.len();

    let fuel_stops = plan_fuel_stops(distance_miles);
    let fuel_stop_count = fuel_stops.len();

    let operational = plan_operational_stops(distance_miles, driving_hours);
    let operational_count = operational.len();

    let mut all_breaks = mandatory;
    all_breaks.extend(fuel_stops);
    all_breaks.extend(operational);

    let breaks = optimize_break_schedule(all_breaks, &MergePolicy::DEFAULT);

    let total_break_hours: f64 = breaks.iter().map(|b| b.duration_hours).sum();
    let compliance = check_plan_compliance(&breaks, driving_hours, limits);

    tracing::info!(
        count = breaks.len(),
        compliant = compliance.is_compliant,
        "break plan completed"
    );

    Ok(TripBreakPlan {
        mandatory_count,
        fuel_stop_count,
        operational_count,
        total_break_hours,
        total_trip_hours: driving_hours + total_break_hours,
        compliance,
        breaks,
    })
}

/// Fuel stops every [`FUEL_STOP_INTERVAL_MILES`] along the route.
fn plan_fuel_stops(distance_miles: f64) -> Vec<RestBreak> {
    let mut stops = Vec::new();
    if distance_miles > FUEL_STOP_INTERVAL_MILES {
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "distance is validated positive and bounded by trip validation"
        )]
        let count = (distance_miles / FUEL_STOP_INTERVAL_MILES) as usize;
        for i in 1..=count {
            #[expect(clippy::cast_precision_loss, reason = "stop counts are tiny")]
            let stop_miles = (i as f64) * FUEL_STOP_INTERVAL_MILES;
            stops.push(RestBreak {
                break_type: BreakType::FuelStop,
                duration_hours: 0.5,
                at_driving_hours: stop_miles / AVERAGE_SPEED_MPH,
                at_trip_miles: stop_miles,
                is_mandatory: false,
                regulation: String::new(),
                priority: BreakPriority::Medium,
                reason: format!("Fuel stop at {stop_miles} miles"),
            });
        }
    }
    stops
}

/// Fixed pickup stop at mile zero and dropoff stop at trip end.
fn plan_operational_stops(distance_miles: f64, driving_hours: f64) -> Vec<RestBreak> {
    vec![
        RestBreak {
            break_type: BreakType::PickupDropoff,
            duration_hours: PICKUP_DROPOFF_HOURS,
            at_driving_hours: 0.0,
            at_trip_miles: 0.0,
            is_mandatory: true,
            regulation: String::new(),
            priority: BreakPriority::High,
            reason: "Pickup and loading".to_string(),
        },
        RestBreak {
            break_type: BreakType::PickupDropoff,
            duration_hours: PICKUP_DROPOFF_HOURS,
            at_driving_hours: driving_hours,
            at_trip_miles: distance_miles,
            is_mandatory: true,
            regulation: String::new(),
            priority: BreakPriority::High,
            reason: "Dropoff and unloading".to_string(),
        },
    ]
}

/// Sorts breaks by driving-hour mark and merges adjacent compatible
/// ones under the given policy.
pub fn optimize_break_schedule(mut breaks: Vec<RestBreak>, policy: &MergePolicy) -> Vec<RestBreak> {
    breaks.sort_by(|a, b| a.at_driving_hours.total_cmp(&b.at_driving_hours));

    let mut optimized: Vec<RestBreak> = Vec::with_capacity(breaks.len());
    let mut iter = breaks.into_iter().peekable();

    while let Some(mut current) = iter.next() {
        while let Some(next) = iter.next_if(|next| {
            policy.within_window(current.at_driving_hours, next.at_driving_hours)
                && policy.can_merge(current.break_type, next.break_type)
        }) {
            current = policy.merge(&current, &next);
        }
        optimized.push(current);
    }

    optimized
}

/// Counts planned mandatory breaks against the counts the trip needs.
fn check_plan_compliance(
    breaks: &[RestBreak],
    driving_hours: f64,
    limits: &HosLimits,
) -> PlanCompliance {
    let mut issues = Vec::new();

    let planned_30_minute = breaks
        .iter()
        .filter(|b| matches!(b.break_type, BreakType::ThirtyMinute | BreakType::Combined))
        .count();
    let required_30_minute = whole_intervals(driving_hours, limits.break_required_after_hours);
    if planned_30_minute < required_30_minute {
        issues.push(PlanIssue {
            kind: PlanIssueKind::InsufficientThirtyMinuteBreaks,
            description: format!(
                "Plan needs {required_30_minute} 30-minute breaks, only {planned_30_minute} planned"
            ),
            required: required_30_minute,
            planned: planned_30_minute,
        });
    }

    if driving_hours > limits.max_driving_hours {
        let planned_10_hour = breaks
            .iter()
            .filter(|b| b.break_type == BreakType::TenHour)
            .count();
        let required_10_hour = whole_intervals(driving_hours - 1.0, limits.max_driving_hours);
        if planned_10_hour < required_10_hour {
            issues.push(PlanIssue {
                kind: PlanIssueKind::InsufficientTenHourBreaks,
                description: format!(
                    "Plan needs {required_10_hour} 10-hour breaks, only {planned_10_hour} planned"
                ),
                required: required_10_hour,
                planned: planned_10_hour,
            });
        }
    }

    let is_compliant = issues.is_empty();
    let compliance_score = if is_compliant {
        100
    } else {
        u8::try_from(100_usize.saturating_sub(issues.len() * 20)).unwrap_or(0)
    };

    PlanCompliance {
        is_compliant,
        issues,
        compliance_score,
    }
}

/// `floor(hours / interval)` as a count, never negative.
fn whole_intervals(hours: f64, interval: f64) -> usize {
    if hours <= 0.0 {
        return 0;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is non-negative and bounded by validated trip hours"
    )]
    let count = (hours / interval).floor() as usize;
    count
}

fn validate_trip_inputs(
    distance_miles: f64,
    driving_hours: f64,
    cycle_hours: f64,
    limits: &HosLimits,
) -> Result<(), InvalidTripError> {
    if distance_miles <= 0.0 {
        return Err(InvalidTripError::NonPositiveDistance(distance_miles));
    }
    if driving_hours <= 0.0 {
        return Err(InvalidTripError::NonPositiveDrivingHours(driving_hours));
    }
    if cycle_hours < 0.0 || cycle_hours > limits.max_cycle_hours {
        return Err(InvalidTripError::CycleHoursOutOfRange(cycle_hours));
    }

    let speed_mph = distance_miles / driving_hours;
    if !(20.0..=80.0).contains(&speed_mph) {
        return Err(InvalidTripError::UnrealisticSpeed {
            speed_mph,
            distance_miles,
            driving_hours,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: HosLimits = HosLimits::DEFAULT;

    fn fresh_state(cycle: f64) -> HosState {
        HosState {
            cycle_hours_used: cycle,
            ..HosState::default()
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn no_breaks_for_short_drive() {
        assert!(plan_30_minute_breaks(0.0, 0.0, &LIMITS).is_empty());
        assert!(plan_30_minute_breaks(7.9, 0.0, &LIMITS).is_empty());
    }

    #[test]
    fn break_lands_exactly_at_eight_hours() {
        let breaks = plan_30_minute_breaks(8.0, 0.0, &LIMITS);
        assert_eq!(breaks.len(), 1);
        assert_close(breaks[0].at_driving_hours, 8.0);
        assert_close(breaks[0].at_trip_miles, 440.0);
    }

    #[test]
    fn sixteen_hours_needs_two_breaks() {
        let breaks = plan_30_minute_breaks(16.0, 0.0, &LIMITS);
        assert_eq!(breaks.len(), 2);
        assert_close(breaks[0].at_driving_hours, 8.0);
        assert_close(breaks[1].at_driving_hours, 16.0);
    }

    #[test]
    fn fraction_past_eight_hours_still_one_break() {
        let breaks = plan_30_minute_breaks(8.25, 0.0, &LIMITS);
        assert_eq!(breaks.len(), 1);
        assert_close(breaks[0].at_driving_hours, 8.0);
    }

    #[test]
    fn twenty_hour_drive_breaks_at_eight_and_sixteen() {
        let breaks = plan_30_minute_breaks(20.0, 0.0, &LIMITS);
        assert_eq!(breaks.len(), 2);
        assert_close(breaks[0].at_driving_hours, 8.0);
        assert_close(breaks[1].at_driving_hours, 16.0);
    }

    #[test]
    fn carried_in_hours_shift_first_break_earlier() {
        let breaks = plan_30_minute_breaks(20.0, 3.0, &LIMITS);
        assert_eq!(breaks.len(), 2);
        assert_close(breaks[0].at_driving_hours, 5.0);
        assert_close(breaks[1].at_driving_hours, 13.0);
    }

    #[test]
    fn overdue_at_start_breaks_before_any_driving() {
        let breaks = plan_30_minute_breaks(2.0, 8.0, &LIMITS);
        assert_eq!(breaks.len(), 1);
        assert_close(breaks[0].at_driving_hours, 0.0);
    }

    #[test]
    fn break_planning_terminates_across_range() {
        // P3: count equals floor(driving / 8) for a rested driver, and
        // the simulation terminates for the whole input domain.
        let mut driving = 0.0;
        while driving <= 100.0 {
            let breaks = plan_30_minute_breaks(driving, 0.0, &LIMITS);
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "test domain is [0, 100]"
            )]
            let expected = (driving / 8.0).floor() as usize;
            assert_eq!(breaks.len(), expected, "driving={driving}");
            driving += 0.5;
        }
    }

    #[test]
    fn no_rest_period_when_trip_fits_current_window() {
        assert!(plan_daily_rest_periods(9.0, 2.0, 0.0, &LIMITS).is_empty());
    }

    #[test]
    fn rest_period_placed_where_headroom_runs_out() {
        // 4h already driven, 6h on duty: driving headroom 7, duty headroom 8.
        let rest = plan_daily_rest_periods(10.0, 6.0, 4.0, &LIMITS);
        assert_eq!(rest.len(), 1);
        assert_close(rest[0].at_driving_hours, 7.0);
        assert_close(rest[0].duration_hours, 10.0);
        assert_eq!(rest[0].break_type, BreakType::TenHour);
    }

    #[test]
    fn long_haul_gets_second_rest_period() {
        // Fresh driver, 25h of driving: rest at 11h, then again at 22h.
        let rest = plan_daily_rest_periods(25.0, 0.0, 0.0, &LIMITS);
        assert_eq!(rest.len(), 2);
        assert_close(rest[0].at_driving_hours, 11.0);
        assert_close(rest[1].at_driving_hours, 22.0);
    }

    #[test]
    fn at_most_two_rest_periods_per_plan() {
        // 40 driving hours would need three resets; the planner caps at
        // two and the compliance check reports the shortfall.
        let rest = plan_daily_rest_periods(40.0, 0.0, 0.0, &LIMITS);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn trip_plan_includes_fuel_and_operational_stops() {
        let plan = plan_trip_breaks(1200.0, 22.0, &fresh_state(10.0), &LIMITS).unwrap();

        assert_eq!(plan.fuel_stop_count, 1);
        assert_eq!(plan.operational_count, 2);

        let fuel_or_combined: Vec<_> = plan
            .breaks
            .iter()
            .filter(|b| {
                matches!(b.break_type, BreakType::FuelStop | BreakType::Combined)
            })
            .collect();
        assert!(!fuel_or_combined.is_empty());

        let pickup_dropoff: Vec<_> = plan
            .breaks
            .iter()
            .filter(|b| b.break_type == BreakType::PickupDropoff)
            .collect();
        assert_eq!(pickup_dropoff.len(), 2);
        assert_close(pickup_dropoff[0].at_trip_miles, 0.0);
        assert_close(pickup_dropoff[1].at_trip_miles, 1200.0);

        // 22 driving hours crosses the 8h mark twice.
        assert!(plan.compliance.is_compliant, "{:?}", plan.compliance.issues);
        assert_eq!(plan.compliance.compliance_score, 100);
    }

    #[test]
    fn trip_plan_breaks_are_sorted() {
        let plan = plan_trip_breaks(2200.0, 40.0, &fresh_state(0.0), &LIMITS).unwrap();
        let marks: Vec<f64> = plan.breaks.iter().map(|b| b.at_driving_hours).collect();
        let mut sorted = marks.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(marks, sorted);
    }

    #[test]
    fn adjacent_thirty_minute_and_fuel_stop_merge() {
        // 8h of driving at 55mph is 440 miles; put a fuel stop right on
        // top of the mandatory break to force a merge.
        let breaks = vec![
            RestBreak {
                break_type: BreakType::ThirtyMinute,
                duration_hours: 0.5,
                at_driving_hours: 8.0,
                at_trip_miles: 440.0,
                is_mandatory: true,
                regulation: "395.3(a)(3)(ii)".to_string(),
                priority: BreakPriority::Critical,
                reason: "30-minute rest break after 8 hours driving".to_string(),
            },
            RestBreak {
                break_type: BreakType::FuelStop,
                duration_hours: 0.5,
                at_driving_hours: 8.2,
                at_trip_miles: 451.0,
                is_mandatory: false,
                regulation: String::new(),
                priority: BreakPriority::Medium,
                reason: "Fuel stop".to_string(),
            },
        ];

        let optimized = optimize_break_schedule(breaks, &MergePolicy::DEFAULT);
        assert_eq!(optimized.len(), 1);
        assert_eq!(optimized[0].break_type, BreakType::Combined);
        assert!(optimized[0].is_mandatory);
    }

    #[test]
    fn rest_periods_survive_optimization_unmerged() {
        // P6: two full rest periods at the same mark stay separate.
        let ten = ten_hour_break(11.0, &LIMITS, "first");
        let mut restart = ten.clone();
        restart.break_type = BreakType::RestartThirtyFourHour;
        restart.at_driving_hours = 11.2;

        let optimized = optimize_break_schedule(vec![ten, restart], &MergePolicy::DEFAULT);
        assert_eq!(optimized.len(), 2);
    }

    #[test]
    fn cycle_overflow_adds_pre_trip_restart() {
        // 65 cycle hours + 10 driving + 2 operational > 70.
        let plan = plan_trip_breaks(500.0, 10.0, &fresh_state(65.0), &LIMITS).unwrap();
        let restarts: Vec<_> = plan
            .breaks
            .iter()
            .filter(|b| b.break_type == BreakType::RestartThirtyFourHour)
            .collect();
        assert_eq!(restarts.len(), 1);
        assert_close(restarts[0].at_driving_hours, 0.0);
    }

    #[test]
    fn rejects_nonpositive_inputs() {
        assert!(matches!(
            plan_trip_breaks(0.0, 5.0, &fresh_state(0.0), &LIMITS),
            Err(InvalidTripError::NonPositiveDistance(_))
        ));
        assert!(matches!(
            plan_trip_breaks(300.0, 0.0, &fresh_state(0.0), &LIMITS),
            Err(InvalidTripError::NonPositiveDrivingHours(_))
        ));
        assert!(matches!(
            plan_trip_breaks(300.0, 6.0, &fresh_state(75.0), &LIMITS),
            Err(InvalidTripError::CycleHoursOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_unrealistic_speeds() {
        // 1200 miles in 10 hours is 120 mph.
        assert!(matches!(
            plan_trip_breaks(1200.0, 10.0, &fresh_state(0.0), &LIMITS),
            Err(InvalidTripError::UnrealisticSpeed { .. })
        ));
        // 100 miles in 10 hours is 10 mph.
        assert!(matches!(
            plan_trip_breaks(100.0, 10.0, &fresh_state(0.0), &LIMITS),
            Err(InvalidTripError::UnrealisticSpeed { .. })
        ));
    }

    #[test]
    fn plan_compliance_counts_ten_hour_shortfall() {
        // 40 driving hours needs floor(39/11) = 3 rest periods; the
        // planner only places two, so the plan self-reports the gap.
        let plan = plan_trip_breaks(2200.0, 40.0, &fresh_state(0.0), &LIMITS).unwrap();
        assert!(!plan.compliance.is_compliant);
        let issue = plan
            .compliance
            .issues
            .iter()
            .find(|i| i.kind == PlanIssueKind::InsufficientTenHourBreaks)
            .expect("shortfall should be reported");
        assert_eq!(issue.required, 3);
        assert_eq!(issue.planned, 2);
        assert_eq!(plan.compliance.compliance_score, 80);
    }

    #[test]
    fn total_trip_time_is_driving_plus_breaks() {
        let plan = plan_trip_breaks(550.0, 10.0, &fresh_state(0.0), &LIMITS).unwrap();
        let break_sum: f64 = plan.breaks.iter().map(|b| b.duration_hours).sum();
        assert_close(plan.total_break_hours, break_sum);
        assert_close(plan.total_trip_hours, 10.0 + break_sum);
    }
}
