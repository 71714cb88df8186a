//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hos_core::HosState;

/// Hours-of-Service compliance engine.
///
/// Plans FMCSA-compliant rest breaks for trips, checks driver
/// eligibility, and generates ELD daily logs.
#[derive(Debug, Parser)]
#[command(name = "hos", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Current driver HOS clocks, shared by several subcommands.
#[derive(Debug, Args)]
pub struct StateArgs {
    /// Hours already used in the 8-day cycle.
    #[arg(long, default_value_t = 0.0)]
    pub cycle_hours: f64,

    /// Hours on duty in the current duty period.
    #[arg(long, default_value_t = 0.0)]
    pub duty_hours: f64,

    /// Hours driven in the current duty period.
    #[arg(long, default_value_t = 0.0)]
    pub driving_hours_used: f64,

    /// Hours driven since the last 30-minute break.
    #[arg(long, default_value_t = 0.0)]
    pub since_break: f64,
}

impl StateArgs {
    #[must_use]
    pub const fn to_state(&self) -> HosState {
        HosState {
            cycle_hours_used: self.cycle_hours,
            duty_period_hours: self.duty_hours,
            driving_hours: self.driving_hours_used,
            hours_since_break: self.since_break,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan rest breaks and validate a trip's compliance.
    Plan {
        /// Trip distance in miles.
        #[arg(long)]
        distance: f64,

        /// Estimated driving time in hours.
        #[arg(long)]
        driving_hours: f64,

        #[command(flatten)]
        state: StateArgs,

        /// Persist the trip and its break plan to the database.
        #[arg(long)]
        save: bool,

        /// Output the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check driver eligibility and current compliance.
    Check {
        #[command(flatten)]
        state: StateArgs,

        /// Driving hours the next assignment requires.
        #[arg(long)]
        trip_driving_hours: Option<f64>,

        /// Output the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate ELD daily logs for a trip timeline.
    Logs {
        /// Trip distance in miles.
        #[arg(long)]
        distance: f64,

        /// Estimated driving time in hours.
        #[arg(long)]
        driving_hours: f64,

        /// Trip start time (RFC 3339, e.g. 2024-03-04T06:00:00Z).
        #[arg(long)]
        start: String,

        /// Where the trip begins.
        #[arg(long, default_value = "Home terminal")]
        origin: String,

        /// Pickup location.
        #[arg(long, default_value = "Shipper")]
        pickup: String,

        /// Dropoff location.
        #[arg(long, default_value = "Receiver")]
        dropoff: String,

        #[command(flatten)]
        state: StateArgs,

        /// Persist the trip and its daily logs to the database.
        #[arg(long)]
        save: bool,

        /// Output the logs as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List persisted trips.
    Trips {
        /// Output the trips as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show database status.
    Status,
}
