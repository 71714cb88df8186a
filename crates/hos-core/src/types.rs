//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for driver state inputs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A field that must be non-negative was negative.
    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// Cycle hours beyond any plausible 8-day total.
    #[error("cycle hours out of range: {value} (max 100)")]
    CycleHoursOutOfRange { value: f64 },

    /// Duty period hours beyond a single 24-hour day.
    #[error("duty period hours out of range: {value} (max 24)")]
    DutyPeriodOutOfRange { value: f64 },

    /// Hours since last break beyond a single 24-hour day.
    #[error("hours since last break out of range: {value} (max 24)")]
    HoursSinceBreakOutOfRange { value: f64 },

    /// Driving time cannot exceed time on duty.
    #[error("driving hours ({driving}) cannot exceed duty period hours ({duty})")]
    DrivingExceedsDutyPeriod { driving: f64, duty: f64 },

    /// Unrecognized duty status string.
    #[error("unknown duty status: {value}")]
    UnknownDutyStatus { value: String },
}

/// Duty status of a driver at an instant.
///
/// Exactly one status is active at any time; the four values match the
/// four lines of an ELD log grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    OffDuty,
    SleeperBerth,
    Driving,
    OnDutyNotDriving,
}

impl DutyStatus {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OffDuty => "off_duty",
            Self::SleeperBerth => "sleeper_berth",
            Self::Driving => "driving",
            Self::OnDutyNotDriving => "on_duty_not_driving",
        }
    }

    /// Whether time in this status counts as rest for the 30-minute
    /// break rule (any non-driving status qualifies).
    #[must_use]
    pub const fn is_rest(&self) -> bool {
        !matches!(self, Self::Driving)
    }

    /// Whether time in this status counts toward on-duty totals.
    #[must_use]
    pub const fn is_on_duty(&self) -> bool {
        matches!(self, Self::Driving | Self::OnDutyNotDriving)
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DutyStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off_duty" => Ok(Self::OffDuty),
            "sleeper_berth" => Ok(Self::SleeperBerth),
            "driving" => Ok(Self::Driving),
            "on_duty_not_driving" => Ok(Self::OnDutyNotDriving),
            _ => Err(ValidationError::UnknownDutyStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// Regulatory limits for property-carrying drivers (49 CFR 395.3).
///
/// Immutable configuration passed by reference into every calculation.
/// [`HosLimits::DEFAULT`] carries the current FMCSA values; tests and
/// future rule changes can construct their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HosLimits {
    /// Maximum on-duty hours in the rolling 8-day cycle.
    pub max_cycle_hours: f64,
    /// Maximum span of a duty period from first on-duty time.
    pub max_duty_period_hours: f64,
    /// Maximum driving hours within one duty period.
    pub max_driving_hours: f64,
    /// Driving hours after which a 30-minute break is required.
    pub break_required_after_hours: f64,
    /// Consecutive off-duty hours that reset the daily limits.
    pub min_off_duty_hours: f64,
    /// Consecutive off-duty hours that restart the 8-day cycle.
    pub restart_off_duty_hours: f64,
}

impl HosLimits {
    pub const DEFAULT: Self = Self {
        max_cycle_hours: 70.0,
        max_duty_period_hours: 14.0,
        max_driving_hours: 11.0,
        break_required_after_hours: 8.0,
        min_off_duty_hours: 10.0,
        restart_off_duty_hours: 34.0,
    };
}

impl Default for HosLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Snapshot of a driver's regulatory position at a point in time.
///
/// All four clocks are independent countdowns; a driver is eligible to
/// drive only while every one of them has remaining headroom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HosState {
    /// Hours on duty in the rolling 8-day window.
    pub cycle_hours_used: f64,
    /// Hours since the start of the current duty window.
    pub duty_period_hours: f64,
    /// Hours driven in the current duty window.
    pub driving_hours: f64,
    /// Hours driven since the last break of 30 minutes or more.
    pub hours_since_break: f64,
}

impl HosState {
    /// Checks that every field is inside its physical domain.
    ///
    /// This guards *malformed input* only; being over a regulatory
    /// limit (e.g. 72 cycle hours) is a compliance violation, not a
    /// validation error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("cycle hours", self.cycle_hours_used),
            ("duty period hours", self.duty_period_hours),
            ("driving hours", self.driving_hours),
            ("hours since last break", self.hours_since_break),
        ] {
            if value < 0.0 {
                return Err(ValidationError::Negative { field, value });
            }
        }
        if self.cycle_hours_used > 100.0 {
            return Err(ValidationError::CycleHoursOutOfRange {
                value: self.cycle_hours_used,
            });
        }
        if self.duty_period_hours > 24.0 {
            return Err(ValidationError::DutyPeriodOutOfRange {
                value: self.duty_period_hours,
            });
        }
        if self.hours_since_break > 24.0 {
            return Err(ValidationError::HoursSinceBreakOutOfRange {
                value: self.hours_since_break,
            });
        }
        if self.driving_hours > self.duty_period_hours {
            return Err(ValidationError::DrivingExceedsDutyPeriod {
                driving: self.driving_hours,
                duty: self.duty_period_hours,
            });
        }
        Ok(())
    }
}
