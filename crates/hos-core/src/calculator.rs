//! Hours-of-Service calculations and rule validation.
//!
//! Pure functions over [`HosState`] implementing the four simultaneous
//! limits for property-carrying drivers: the 70-hour/8-day cycle, the
//! 14-hour duty window, the 11-hour driving limit, and the 30-minute
//! break rule. Nothing here performs I/O or holds state.

use serde::{Deserialize, Serialize};

use crate::breaks::BreakType;
use crate::types::{HosLimits, HosState, ValidationError};

/// Reason a driver is currently blocked from driving.
///
/// When several clocks are exhausted at once, the first one hit in the
/// fixed check order (cycle, duty period, driving, break) is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingBlock {
    CycleLimit,
    DutyPeriodLimit,
    DrivingLimit,
    BreakRequired,
}

impl std::fmt::Display for DrivingBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CycleLimit => "70-hour/8-day limit reached",
            Self::DutyPeriodLimit => "14-hour duty period limit reached",
            Self::DrivingLimit => "11-hour driving limit reached",
            Self::BreakRequired => "30-minute break required after 8 hours driving",
        };
        f.write_str(s)
    }
}

/// Remaining headroom under every HOS limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableHours {
    /// Hours left in the rolling 8-day cycle.
    pub cycle_hours: f64,
    /// Hours left in the 14-hour duty window.
    pub duty_period_hours: f64,
    /// Driving hours left in the current duty period.
    pub driving_hours: f64,
    /// Driving hours left before a 30-minute break is required.
    pub hours_until_break: f64,
    /// True iff every headroom above is strictly positive.
    pub can_drive: bool,
    /// First blocking condition when `can_drive` is false.
    pub violation_reason: Option<DrivingBlock>,
    /// Longest stretch the driver may drive without any stop.
    pub max_continuous_driving_hours: f64,
}

/// A hard regulatory breach: a limit has been exceeded, not just used up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// 49 CFR citation for the breached rule.
    pub regulation: &'static str,
    pub description: String,
    pub hours_over: f64,
}

/// Kind of regulatory breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    CycleHoursExceeded,
    DutyPeriodExceeded,
    DrivingHoursExceeded,
    BreakOverdue,
}

/// An approaching limit worth flagging before it is breached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitWarning {
    pub kind: WarningKind,
    pub description: String,
    /// Hours left before the limit in question is reached.
    pub hours_remaining: f64,
}

/// Kind of approaching-limit warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    ApproachingCycleLimit,
    BreakNeededSoon,
}

/// Outcome of checking a state against every limit.
///
/// Violations are expected business outcomes, not errors; the engine
/// always returns a complete report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub is_compliant: bool,
    /// 0-100; each violation costs 25 points, each warning 5.
    pub compliance_score: u8,
    pub violations: Vec<Violation>,
    pub warnings: Vec<LimitWarning>,
}

/// One way a driver could satisfy their rest obligations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestOption {
    pub break_type: BreakType,
    pub duration_hours: f64,
    pub description: &'static str,
    pub regulation: &'static str,
    /// Which clocks this rest resets.
    pub restores: &'static [&'static str],
}

/// Minimum rest needed before the driver may drive again, plus options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestRequirement {
    pub minimum_rest_hours: f64,
    pub required_rest_type: Option<BreakType>,
    pub options: Vec<RestOption>,
}

/// Projected effect of a planned trip on the 8-day cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleImpact {
    pub current_cycle_hours: f64,
    pub estimated_driving_hours: f64,
    /// Fixed allowance for pickup and dropoff (1 hour each).
    pub pickup_dropoff_hours: f64,
    pub estimated_total_hours: f64,
    pub projected_cycle_hours: f64,
    pub exceeds_cycle_limit: bool,
    /// On-duty hours the driver could still spend without a restart.
    pub max_possible_trip_hours: f64,
    pub requires_restart: bool,
    pub hours_over_limit: f64,
}

/// On-duty allowance added to driving time when projecting a trip:
/// one hour at the shipper, one at the receiver.
pub const TRIP_PICKUP_DROPOFF_HOURS: f64 = 2.0;

/// Computes remaining headroom under all four HOS limits.
///
/// Fails only on malformed input (negative hours, driving exceeding
/// duty time); an exhausted limit is reported through `can_drive` and
/// `violation_reason`, never as an error.
pub fn calculate_available_hours(
    state: &HosState,
    limits: &HosLimits,
) -> Result<AvailableHours, ValidationError> {
    state.validate()?;

    let cycle = (limits.max_cycle_hours - state.cycle_hours_used).max(0.0);
    let duty_period = (limits.max_duty_period_hours - state.duty_period_hours).max(0.0);
    let driving = (limits.max_driving_hours - state.driving_hours).max(0.0);
    let hours_until_break =
        (limits.break_required_after_hours - state.hours_since_break).max(0.0);

    // Fixed check order: the first exhausted clock is the reported reason.
    let violation_reason = if cycle <= 0.0 {
        Some(DrivingBlock::CycleLimit)
    } else if duty_period <= 0.0 {
        Some(DrivingBlock::DutyPeriodLimit)
    } else if driving <= 0.0 {
        Some(DrivingBlock::DrivingLimit)
    } else if hours_until_break <= 0.0 {
        Some(DrivingBlock::BreakRequired)
    } else {
        None
    };
    let can_drive = violation_reason.is_none();

    let max_continuous_driving_hours = if hours_until_break <= 0.0 {
        0.0
    } else {
        cycle
            .min(duty_period)
            .min(driving)
            .min(hours_until_break)
            .max(0.0)
    };

    tracing::debug!(can_drive, max_continuous_driving_hours, "availability computed");

    Ok(AvailableHours {
        cycle_hours: cycle,
        duty_period_hours: duty_period,
        driving_hours: driving,
        hours_until_break,
        can_drive,
        violation_reason,
        max_continuous_driving_hours,
    })
}

/// Checks a state for exceeded limits and near-limit conditions.
pub fn validate_hos_compliance(state: &HosState, limits: &HosLimits) -> ComplianceReport {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    if state.cycle_hours_used > limits.max_cycle_hours {
        violations.push(Violation {
            kind: ViolationKind::CycleHoursExceeded,
            regulation: "395.3(b)",
            description: format!(
                "Cycle hours ({}) exceeds {}-hour limit",
                state.cycle_hours_used, limits.max_cycle_hours
            ),
            hours_over: state.cycle_hours_used - limits.max_cycle_hours,
        });
    } else if state.cycle_hours_used >= limits.max_cycle_hours - 5.0 {
        warnings.push(LimitWarning {
            kind: WarningKind::ApproachingCycleLimit,
            description: format!(
                "Approaching {}-hour cycle limit (currently at {} hours)",
                limits.max_cycle_hours, state.cycle_hours_used
            ),
            hours_remaining: limits.max_cycle_hours - state.cycle_hours_used,
        });
    }

    if state.duty_period_hours > limits.max_duty_period_hours {
        violations.push(Violation {
            kind: ViolationKind::DutyPeriodExceeded,
            regulation: "395.3(a)(2)",
            description: format!(
                "Duty period ({}) exceeds {}-hour limit",
                state.duty_period_hours, limits.max_duty_period_hours
            ),
            hours_over: state.duty_period_hours - limits.max_duty_period_hours,
        });
    }

    if state.driving_hours > limits.max_driving_hours {
        violations.push(Violation {
            kind: ViolationKind::DrivingHoursExceeded,
            regulation: "395.3(a)(3)",
            description: format!(
                "Driving hours ({}) exceeds {}-hour limit",
                state.driving_hours, limits.max_driving_hours
            ),
            hours_over: state.driving_hours - limits.max_driving_hours,
        });
    }

    if state.hours_since_break > limits.break_required_after_hours {
        violations.push(Violation {
            kind: ViolationKind::BreakOverdue,
            regulation: "395.3(a)(3)(ii)",
            description: format!(
                "30-minute break required after {} hours driving (currently at {} hours)",
                limits.break_required_after_hours, state.hours_since_break
            ),
            hours_over: state.hours_since_break - limits.break_required_after_hours,
        });
    } else if state.hours_since_break >= limits.break_required_after_hours - 1.0 {
        warnings.push(LimitWarning {
            kind: WarningKind::BreakNeededSoon,
            description: format!(
                "30-minute break will be required soon (driven {} of {} hours)",
                state.hours_since_break, limits.break_required_after_hours
            ),
            hours_remaining: limits.break_required_after_hours - state.hours_since_break,
        });
    }

    let is_compliant = violations.is_empty();
    let compliance_score = score_from_counts(violations.len(), warnings.len());

    ComplianceReport {
        is_compliant,
        compliance_score,
        violations,
        warnings,
    }
}

/// Determines the minimum rest required before driving may resume,
/// along with every rest option currently on the table.
///
/// Priority order: an overdue 30-minute break is the cheapest remedy;
/// an exhausted driving or duty clock demands 10 hours off duty. The
/// 34-hour restart is offered as an option (never the minimum) once the
/// cycle is within 10 hours of its cap.
pub fn calculate_required_rest(
    state: &HosState,
    needs_30_minute_break: bool,
    limits: &HosLimits,
) -> RestRequirement {
    let mut options = Vec::new();

    if needs_30_minute_break {
        options.push(RestOption {
            break_type: BreakType::ThirtyMinute,
            duration_hours: 0.5,
            description: "30-minute rest break required after 8 hours driving",
            regulation: "395.3(a)(3)(ii)",
            restores: &["driving_eligibility"],
        });
    }

    let daily_limits_exhausted = state.driving_hours >= limits.max_driving_hours
        || state.duty_period_hours >= limits.max_duty_period_hours;
    if daily_limits_exhausted {
        options.push(RestOption {
            break_type: BreakType::TenHour,
            duration_hours: limits.min_off_duty_hours,
            description: "10 consecutive hours off duty to reset daily limits",
            regulation: "395.3(a)(1)",
            restores: &["duty_period", "driving_hours"],
        });
    }

    if state.cycle_hours_used >= limits.max_cycle_hours - 10.0 {
        options.push(RestOption {
            break_type: BreakType::RestartThirtyFourHour,
            duration_hours: limits.restart_off_duty_hours,
            description: "34 consecutive hours off duty to restart 8-day cycle",
            regulation: "395.3(c)",
            restores: &["cycle_hours", "duty_period", "driving_hours"],
        });
    }

    let (minimum_rest_hours, required_rest_type) = if needs_30_minute_break {
        (0.5, Some(BreakType::ThirtyMinute))
    } else if daily_limits_exhausted {
        (limits.min_off_duty_hours, Some(BreakType::TenHour))
    } else {
        (0.0, None)
    };

    RestRequirement {
        minimum_rest_hours,
        required_rest_type,
        options,
    }
}

/// Projects the cycle-hours impact of a planned trip.
///
/// A fixed 2-hour pickup/dropoff allowance is added on top of driving
/// time before comparing against the cycle cap.
pub fn calculate_cycle_hours_for_trip(
    estimated_driving_hours: f64,
    current_cycle_hours: f64,
    limits: &HosLimits,
) -> CycleImpact {
    let estimated_total_hours = estimated_driving_hours + TRIP_PICKUP_DROPOFF_HOURS;
    let projected_cycle_hours = current_cycle_hours + estimated_total_hours;
    let exceeds_cycle_limit = projected_cycle_hours > limits.max_cycle_hours;

    CycleImpact {
        current_cycle_hours,
        estimated_driving_hours,
        pickup_dropoff_hours: TRIP_PICKUP_DROPOFF_HOURS,
        estimated_total_hours,
        projected_cycle_hours,
        exceeds_cycle_limit,
        max_possible_trip_hours: limits.max_cycle_hours - current_cycle_hours,
        requires_restart: exceeds_cycle_limit,
        hours_over_limit: (projected_cycle_hours - limits.max_cycle_hours).max(0.0),
    }
}

/// Compliance score: 100 minus 25 per violation and 5 per warning.
fn score_from_counts(violations: usize, warnings: usize) -> u8 {
    let penalty = violations.saturating_mul(25) + warnings.saturating_mul(5);
    u8::try_from(100_usize.saturating_sub(penalty)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: HosLimits = HosLimits::DEFAULT;

    fn state(cycle: f64, duty: f64, driving: f64, since_break: f64) -> HosState {
        HosState {
            cycle_hours_used: cycle,
            duty_period_hours: duty,
            driving_hours: driving,
            hours_since_break: since_break,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn headroom_sums_back_to_limits() {
        // P1: available + used == limit for every clock while under limit.
        let s = state(42.5, 6.25, 3.75, 2.0);
        let avail = calculate_available_hours(&s, &LIMITS).unwrap();
        assert_close(avail.cycle_hours + s.cycle_hours_used, 70.0);
        assert_close(avail.duty_period_hours + s.duty_period_hours, 14.0);
        assert_close(avail.driving_hours + s.driving_hours, 11.0);
        assert_close(avail.hours_until_break + s.hours_since_break, 8.0);
    }

    #[test]
    fn mid_shift_driver_scenario() {
        let avail = calculate_available_hours(&state(65.0, 10.0, 9.0, 3.0), &LIMITS).unwrap();
        assert_close(avail.cycle_hours, 5.0);
        assert_close(avail.duty_period_hours, 4.0);
        assert_close(avail.driving_hours, 2.0);
        assert!(avail.can_drive);
        assert!(avail.violation_reason.is_none());
        assert_close(avail.max_continuous_driving_hours, 2.0);
    }

    #[test]
    fn exhausted_cycle_blocks_driving() {
        let avail = calculate_available_hours(&state(70.0, 0.0, 0.0, 0.0), &LIMITS).unwrap();
        assert!(!avail.can_drive);
        let reason = avail.violation_reason.expect("should be blocked");
        assert_eq!(reason, DrivingBlock::CycleLimit);
        assert!(reason.to_string().contains("70-hour/8-day limit reached"));
    }

    #[test]
    fn block_reason_follows_fixed_check_order() {
        // Cycle and duty both exhausted: cycle is checked first.
        let avail = calculate_available_hours(&state(70.0, 14.0, 11.0, 8.0), &LIMITS).unwrap();
        assert_eq!(avail.violation_reason, Some(DrivingBlock::CycleLimit));

        // Only duty and break exhausted: duty wins.
        let avail = calculate_available_hours(&state(30.0, 14.0, 8.0, 8.0), &LIMITS).unwrap();
        assert_eq!(avail.violation_reason, Some(DrivingBlock::DutyPeriodLimit));

        // Only the break clock exhausted.
        let avail = calculate_available_hours(&state(30.0, 9.0, 8.0, 8.0), &LIMITS).unwrap();
        assert_eq!(avail.violation_reason, Some(DrivingBlock::BreakRequired));
        assert_close(avail.max_continuous_driving_hours, 0.0);
    }

    #[test]
    fn can_drive_iff_all_headrooms_positive() {
        // P2: no state is both drivable and blocked.
        let cases = [
            state(0.0, 0.0, 0.0, 0.0),
            state(69.9, 13.9, 10.9, 7.9),
            state(70.0, 5.0, 2.0, 1.0),
            state(50.0, 14.0, 11.0, 0.0),
            state(10.0, 10.0, 10.0, 8.0),
        ];
        for s in cases {
            let avail = calculate_available_hours(&s, &LIMITS).unwrap();
            let all_positive = avail.cycle_hours > 0.0
                && avail.duty_period_hours > 0.0
                && avail.driving_hours > 0.0
                && avail.hours_until_break > 0.0;
            assert_eq!(avail.can_drive, all_positive, "state {s:?}");
            assert_eq!(avail.violation_reason.is_none(), avail.can_drive, "state {s:?}");
        }
    }

    #[test]
    fn availability_is_pure() {
        // P5: same input, same output.
        let s = state(33.0, 7.0, 5.5, 4.0);
        let first = calculate_available_hours(&s, &LIMITS).unwrap();
        let second = calculate_available_hours(&s, &LIMITS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(calculate_available_hours(&state(-1.0, 0.0, 0.0, 0.0), &LIMITS).is_err());
        assert!(calculate_available_hours(&state(0.0, 25.0, 0.0, 0.0), &LIMITS).is_err());
        assert!(calculate_available_hours(&state(0.0, 3.0, 4.0, 0.0), &LIMITS).is_err());
    }

    #[test]
    fn compliant_state_scores_100() {
        let report = validate_hos_compliance(&state(30.0, 6.0, 4.0, 2.0), &LIMITS);
        assert!(report.is_compliant);
        assert_eq!(report.compliance_score, 100);
        assert!(report.violations.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn exceeded_limits_produce_violations_with_citations() {
        let report = validate_hos_compliance(&state(72.0, 15.0, 12.0, 9.0), &LIMITS);
        assert!(!report.is_compliant);
        assert_eq!(report.violations.len(), 4);

        let kinds: Vec<_> = report.violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::CycleHoursExceeded,
                ViolationKind::DutyPeriodExceeded,
                ViolationKind::DrivingHoursExceeded,
                ViolationKind::BreakOverdue,
            ]
        );
        assert_eq!(report.violations[0].regulation, "395.3(b)");
        assert_close(report.violations[0].hours_over, 2.0);
        // 4 violations at 25 points each floors the score.
        assert_eq!(report.compliance_score, 0);
    }

    #[test]
    fn near_limit_states_warn_without_violating() {
        let report = validate_hos_compliance(&state(66.0, 5.0, 4.0, 7.5), &LIMITS);
        assert!(report.is_compliant);
        assert_eq!(report.violations.len(), 0);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].kind, WarningKind::ApproachingCycleLimit);
        assert_eq!(report.warnings[1].kind, WarningKind::BreakNeededSoon);
        assert_eq!(report.compliance_score, 90);
    }

    #[test]
    fn exactly_at_limit_is_exhausted_not_exceeded() {
        let report = validate_hos_compliance(&state(70.0, 14.0, 11.0, 8.0), &LIMITS);
        // At the boundary nothing is exceeded; cycle and break both warn.
        assert!(report.is_compliant);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn required_rest_prioritizes_30_minute_break() {
        let requirement = calculate_required_rest(&state(65.0, 13.0, 10.0, 8.0), true, &LIMITS);
        assert_close(requirement.minimum_rest_hours, 0.5);
        assert_eq!(requirement.required_rest_type, Some(BreakType::ThirtyMinute));
        // Near the cycle cap, the restart shows up as an option too.
        assert!(
            requirement
                .options
                .iter()
                .any(|o| o.break_type == BreakType::RestartThirtyFourHour)
        );
    }

    #[test]
    fn required_rest_demands_10_hours_when_daily_limits_spent() {
        let requirement = calculate_required_rest(&state(40.0, 14.0, 10.0, 4.0), false, &LIMITS);
        assert_close(requirement.minimum_rest_hours, 10.0);
        assert_eq!(requirement.required_rest_type, Some(BreakType::TenHour));
    }

    #[test]
    fn required_rest_is_zero_for_fresh_driver() {
        let requirement = calculate_required_rest(&HosState::default(), false, &LIMITS);
        assert_close(requirement.minimum_rest_hours, 0.0);
        assert!(requirement.required_rest_type.is_none());
        assert!(requirement.options.is_empty());
    }

    #[test]
    fn cycle_impact_includes_pickup_dropoff_allowance() {
        let impact = calculate_cycle_hours_for_trip(10.0, 50.0, &LIMITS);
        assert_close(impact.estimated_total_hours, 12.0);
        assert_close(impact.projected_cycle_hours, 62.0);
        assert!(!impact.exceeds_cycle_limit);
        assert!(!impact.requires_restart);
        assert_close(impact.max_possible_trip_hours, 20.0);
        assert_close(impact.hours_over_limit, 0.0);
    }

    #[test]
    fn cycle_impact_flags_restart_when_projection_overflows() {
        let impact = calculate_cycle_hours_for_trip(10.0, 60.0, &LIMITS);
        assert!(impact.exceeds_cycle_limit);
        assert!(impact.requires_restart);
        assert_close(impact.hours_over_limit, 2.0);
    }
}
