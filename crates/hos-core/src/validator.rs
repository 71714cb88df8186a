//! Trip-level compliance validation.
//!
//! Answers "can this trip be completed, and what must happen first" by
//! combining start eligibility, projected cycle impact, and the break
//! plan into one report with deterministic recommendations.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculator::{
    self, AvailableHours, ComplianceReport, CycleImpact, DrivingBlock, RestRequirement,
};
use crate::planner::{self, InvalidTripError, TripBreakPlan};
use crate::types::{HosLimits, HosState, ValidationError};

/// Minimal trip description the validator needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripSpec {
    pub distance_miles: f64,
    pub driving_hours: f64,
}

/// Errors that stop validation before a report can be produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TripValidationError {
    #[error(transparent)]
    InvalidState(#[from] ValidationError),

    #[error(transparent)]
    InvalidTrip(#[from] InvalidTripError),
}

/// A condition blocking the driver from starting the trip at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartIssue {
    pub kind: StartIssueKind,
    pub description: String,
    pub current_hours: f64,
    pub limit: f64,
    pub required_action: &'static str,
}

/// Kind of start-eligibility blocker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartIssueKind {
    CycleLimitReached,
    DutyPeriodLimitReached,
    DrivingLimitReached,
    BreakRequired,
}

/// A trip-level compliance problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripIssue {
    pub kind: TripIssueKind,
    pub description: String,
}

/// Kind of trip-level compliance problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripIssueKind {
    ExceedsCycleLimit,
    BreakPlanDeficiency,
}

/// A trip-level advisory that does not block compliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripWarning {
    pub kind: TripWarningKind,
    pub description: String,
}

/// Kind of trip-level advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripWarningKind {
    LongTripDuration,
}

/// How urgently a recommendation should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
}

impl RecommendationPriority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RecommendationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of trip execution a recommendation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    PreTrip,
    Planning,
    Operational,
}

/// A remedial or preparatory action derived from a failed sub-check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub category: RecommendationCategory,
    pub title: &'static str,
    pub description: String,
    pub action: String,
    pub regulation: &'static str,
}

/// Full validation outcome for one trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripComplianceReport {
    /// Start-eligible, cycle fits, and the break plan is sufficient.
    pub is_compliant: bool,
    /// 0-100 aggregate score across every sub-check.
    pub compliance_score: u8,
    pub can_start_trip: bool,
    pub start_issues: Vec<StartIssue>,
    pub cycle_impact: CycleImpact,
    pub break_plan: TripBreakPlan,
    pub issues: Vec<TripIssue>,
    pub warnings: Vec<TripWarning>,
    pub recommendations: Vec<Recommendation>,
}

/// Driver-level eligibility to begin (or continue) driving.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverEligibility {
    pub is_eligible: bool,
    pub can_drive_now: bool,
    pub violation_reason: Option<DrivingBlock>,
    pub availability: AvailableHours,
    pub current_compliance: ComplianceReport,
    /// Set when a specific driving requirement cannot be met.
    pub insufficient_hours: Option<InsufficientHours>,
    /// Set when the driver is blocked and must rest first.
    pub required_rest: Option<RestRequirement>,
}

/// A required stretch of driving that exceeds what is available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsufficientHours {
    pub required_hours: f64,
    pub available_hours: f64,
}

/// Validates a complete trip against the HOS rules.
pub fn validate_trip_compliance(
    trip: &TripSpec,
    state: &HosState,
    limits: &HosLimits,
) -> Result<TripComplianceReport, TripValidationError> {
    state.validate()?;
    tracing::info!(
        distance_miles = trip.distance_miles,
        driving_hours = trip.driving_hours,
        "validating trip compliance"
    );

    let start_issues = check_start_eligibility(state, limits);
    let can_start_trip = start_issues.is_empty();

    let cycle_impact = calculator::calculate_cycle_hours_for_trip(
        trip.driving_hours,
        state.cycle_hours_used,
        limits,
    );

    let break_plan =
        planner::plan_trip_breaks(trip.distance_miles, trip.driving_hours, state, limits)?;

    let mut issues = Vec::new();
    if cycle_impact.exceeds_cycle_limit {
        issues.push(TripIssue {
            kind: TripIssueKind::ExceedsCycleLimit,
            description: format!(
                "Trip would exceed 70-hour/8-day limit by {} hours",
                cycle_impact.hours_over_limit
            ),
        });
    }
    for plan_issue in &break_plan.compliance.issues {
        issues.push(TripIssue {
            kind: TripIssueKind::BreakPlanDeficiency,
            description: plan_issue.description.clone(),
        });
    }

    let mut warnings = Vec::new();
    if break_plan.total_trip_hours > 24.0 {
        warnings.push(TripWarning {
            kind: TripWarningKind::LongTripDuration,
            description: format!(
                "Trip duration ({:.1} hours) exceeds 24 hours",
                break_plan.total_trip_hours
            ),
        });
    }

    let recommendations =
        build_recommendations(&start_issues, &cycle_impact, &break_plan);
    let compliance_score = overall_score(
        can_start_trip,
        issues.len(),
        warnings.len(),
        break_plan.compliance.compliance_score,
    );
    let is_compliant = can_start_trip && issues.is_empty();

    tracing::info!(is_compliant, compliance_score, "trip validation completed");

    Ok(TripComplianceReport {
        is_compliant,
        compliance_score,
        can_start_trip,
        start_issues,
        cycle_impact,
        break_plan,
        issues,
        warnings,
        recommendations,
    })
}

/// Validates a driver's eligibility to drive, optionally against a
/// specific driving-hours requirement.
pub fn validate_driver_eligibility(
    state: &HosState,
    required_driving_hours: Option<f64>,
    limits: &HosLimits,
) -> Result<DriverEligibility, ValidationError> {
    let availability = calculator::calculate_available_hours(state, limits)?;
    let current_compliance = calculator::validate_hos_compliance(state, limits);

    let insufficient_hours = required_driving_hours.and_then(|required| {
        (required > availability.max_continuous_driving_hours).then_some(InsufficientHours {
            required_hours: required,
            available_hours: availability.max_continuous_driving_hours,
        })
    });

    let required_rest = (!availability.can_drive).then(|| {
        calculator::calculate_required_rest(
            state,
            state.hours_since_break >= limits.break_required_after_hours,
            limits,
        )
    });

    Ok(DriverEligibility {
        is_eligible: availability.can_drive && insufficient_hours.is_none(),
        can_drive_now: availability.can_drive,
        violation_reason: availability.violation_reason,
        availability,
        current_compliance,
        insufficient_hours,
        required_rest,
    })
}

/// Validates a batch of independent trips in parallel.
///
/// Each trip's run shares nothing with the others, so the batch
/// parallelizes without coordination.
pub fn validate_trips(
    trips: &[(TripSpec, HosState)],
    limits: &HosLimits,
) -> Vec<Result<TripComplianceReport, TripValidationError>> {
    trips
        .par_iter()
        .map(|(trip, state)| validate_trip_compliance(trip, state, limits))
        .collect()
}

/// Re-runs the four blocking conditions against the pre-trip state.
fn check_start_eligibility(state: &HosState, limits: &HosLimits) -> Vec<StartIssue> {
    let mut issues = Vec::new();

    if state.cycle_hours_used >= limits.max_cycle_hours {
        issues.push(StartIssue {
            kind: StartIssueKind::CycleLimitReached,
            description: "70-hour/8-day cycle limit reached".to_string(),
            current_hours: state.cycle_hours_used,
            limit: limits.max_cycle_hours,
            required_action: "34-hour restart required",
        });
    }
    if state.duty_period_hours >= limits.max_duty_period_hours {
        issues.push(StartIssue {
            kind: StartIssueKind::DutyPeriodLimitReached,
            description: "14-hour duty period limit reached".to_string(),
            current_hours: state.duty_period_hours,
            limit: limits.max_duty_period_hours,
            required_action: "10 hours off duty required",
        });
    }
    if state.driving_hours >= limits.max_driving_hours {
        issues.push(StartIssue {
            kind: StartIssueKind::DrivingLimitReached,
            description: "11-hour driving limit reached".to_string(),
            current_hours: state.driving_hours,
            limit: limits.max_driving_hours,
            required_action: "10 hours off duty required",
        });
    }
    if state.hours_since_break >= limits.break_required_after_hours {
        issues.push(StartIssue {
            kind: StartIssueKind::BreakRequired,
            description: "30-minute break required after 8 hours driving".to_string(),
            current_hours: state.hours_since_break,
            limit: limits.break_required_after_hours,
            required_action: "30-minute break required",
        });
    }

    issues
}

/// One recommendation per failed sub-check, in a fixed order.
fn build_recommendations(
    start_issues: &[StartIssue],
    cycle_impact: &CycleImpact,
    break_plan: &TripBreakPlan,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for issue in start_issues {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::High,
            category: RecommendationCategory::PreTrip,
            title: "Address Start Eligibility Issue",
            description: issue.description.clone(),
            action: issue.required_action.to_string(),
            regulation: "HOS Pre-Trip Requirements",
        });
    }

    if cycle_impact.requires_restart {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::High,
            category: RecommendationCategory::Planning,
            title: "34-Hour Restart Required",
            description: "Trip requires 34-hour restart before beginning".to_string(),
            action: "Schedule 34 consecutive hours off duty before trip".to_string(),
            regulation: "395.3(c)",
        });
    }

    if break_plan.breaks.len() > 3 {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Medium,
            category: RecommendationCategory::Planning,
            title: "Multiple Breaks Required",
            description: format!("Trip requires {} breaks", break_plan.breaks.len()),
            action: "Plan break locations and timing in advance".to_string(),
            regulation: "HOS Break Planning",
        });
    }

    if break_plan.fuel_stop_count > 0 {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Medium,
            category: RecommendationCategory::Operational,
            title: "Fuel Stop Planning",
            description: format!("Plan {} fuel stops", break_plan.fuel_stop_count),
            action: "Identify fuel stops along route every 1000 miles".to_string(),
            regulation: "Operational Requirement",
        });
    }

    recommendations
}

/// Aggregate score: 30 points for start eligibility, 15 per issue,
/// 5 per warning, and a fifth of the break plan's own deficit.
fn overall_score(
    can_start: bool,
    issue_count: usize,
    warning_count: usize,
    plan_score: u8,
) -> u8 {
    #[expect(
        clippy::cast_precision_loss,
        reason = "issue and warning counts are tiny"
    )]
    let mut score = 100.0
        - f64::from(u8::from(!can_start)) * 30.0
        - (issue_count as f64) * 15.0
        - (warning_count as f64) * 5.0
        - 0.2 * f64::from(100 - plan_score.min(100));
    score = score.clamp(0.0, 100.0);
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to 0-100"
    )]
    let score = score as u8;
    score
}
