//! Planned rest-break model and the break merge policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of planned stop or rest period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakType {
    /// Mandatory 30-minute break after 8 cumulative driving hours.
    ThirtyMinute,
    /// 10 consecutive hours off duty resetting the daily limits.
    TenHour,
    /// 34 consecutive hours off duty restarting the 8-day cycle.
    RestartThirtyFourHour,
    /// Refueling stop.
    FuelStop,
    /// Pickup or dropoff at a shipper/receiver.
    PickupDropoff,
    /// Two compatible breaks merged into one stop.
    Combined,
}

impl BreakType {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ThirtyMinute => "30_minute",
            Self::TenHour => "10_hour",
            Self::RestartThirtyFourHour => "34_hour_restart",
            Self::FuelStop => "fuel_stop",
            Self::PickupDropoff => "pickup_dropoff",
            Self::Combined => "combined",
        }
    }

    /// Whether this is a full off-duty rest period (never merged with
    /// another rest period).
    #[must_use]
    pub const fn is_rest_period(&self) -> bool {
        matches!(self, Self::TenHour | Self::RestartThirtyFourHour)
    }
}

impl fmt::Display for BreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreakType {
    type Err = UnknownBreakType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "30_minute" => Ok(Self::ThirtyMinute),
            "10_hour" => Ok(Self::TenHour),
            "34_hour_restart" => Ok(Self::RestartThirtyFourHour),
            "fuel_stop" => Ok(Self::FuelStop),
            "pickup_dropoff" => Ok(Self::PickupDropoff),
            "combined" => Ok(Self::Combined),
            _ => Err(UnknownBreakType(s.to_string())),
        }
    }
}

impl Serialize for BreakType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BreakType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown break type strings.
#[derive(Debug, Clone)]
pub struct UnknownBreakType(String);

impl fmt::Display for UnknownBreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown break type: {}", self.0)
    }
}

impl std::error::Error for UnknownBreakType {}

/// Scheduling priority of a planned break.
///
/// Ordered so that merging two breaks can keep the higher priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BreakPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl BreakPriority {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for BreakPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreakPriority {
    type Err = UnknownBreakPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(UnknownBreakPriority(s.to_string())),
        }
    }
}

/// Error type for unknown break priority strings.
#[derive(Debug, Clone)]
pub struct UnknownBreakPriority(String);

impl fmt::Display for UnknownBreakPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown break priority: {}", self.0)
    }
}

impl std::error::Error for UnknownBreakPriority {}

/// A planned stop on a trip, immutable once created.
///
/// Positions are expressed as marks on the cumulative-driving axis:
/// `at_driving_hours` is how many hours of driving precede the stop,
/// `at_trip_miles` the corresponding odometer distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestBreak {
    pub break_type: BreakType,
    pub duration_hours: f64,
    pub at_driving_hours: f64,
    pub at_trip_miles: f64,
    pub is_mandatory: bool,
    /// CFR citation, empty for operational stops.
    pub regulation: String,
    pub priority: BreakPriority,
    pub reason: String,
}

/// Policy governing which adjacent breaks may be collapsed into one stop.
///
/// Only a 30-minute break and a fuel stop are compatible; two full rest
/// periods are never merged, and nothing merges with a rest period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergePolicy {
    /// Two breaks whose driving-hour marks differ by at most this much
    /// are candidates for merging.
    pub window_hours: f64,
}

impl MergePolicy {
    pub const DEFAULT: Self = Self { window_hours: 0.5 };

    /// Whether breaks at these two driving-hour marks are close enough.
    #[must_use]
    pub fn within_window(&self, a_hours: f64, b_hours: f64) -> bool {
        (a_hours - b_hours).abs() <= self.window_hours
    }

    /// Whether two break types are compatible for merging.
    #[must_use]
    pub fn can_merge(&self, a: BreakType, b: BreakType) -> bool {
        if a.is_rest_period() || b.is_rest_period() {
            return false;
        }
        matches!(
            (a, b),
            (BreakType::ThirtyMinute, BreakType::FuelStop)
                | (BreakType::FuelStop, BreakType::ThirtyMinute)
        )
    }

    /// Merges two compatible breaks into a single combined stop.
    ///
    /// Keeps the longer duration and the higher priority; mandatory if
    /// either side was; reasons are concatenated. The merged stop sits
    /// at the earlier break's position.
    #[must_use]
    pub fn merge(&self, a: &RestBreak, b: &RestBreak) -> RestBreak {
        RestBreak {
            break_type: BreakType::Combined,
            duration_hours: a.duration_hours.max(b.duration_hours),
            at_driving_hours: a.at_driving_hours,
            at_trip_miles: a.at_trip_miles,
            is_mandatory: a.is_mandatory || b.is_mandatory,
            regulation: if a.regulation.is_empty() {
                b.regulation.clone()
            } else {
                a.regulation.clone()
            },
            priority: a.priority.max(b.priority),
            reason: format!("{} + {}", a.reason, b.reason),
        }
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
