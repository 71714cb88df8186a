//! Plan command: break planning plus full trip compliance validation.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;

use hos_core::{HosLimits, HosState, TripComplianceReport, TripSpec, validate_trip_compliance};
use hos_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    trip: &TripSpec,
    state: &HosState,
    db: Option<&mut Database>,
    json: bool,
) -> Result<()> {
    let report = validate_trip_compliance(trip, state, &HosLimits::DEFAULT)
        .context("trip validation failed")?;

    if let Some(db) = db {
        let trip_id = db
            .insert_trip(trip, state, Utc::now())
            .context("failed to save trip")?;
        db.save_break_plan(&trip_id, &report.break_plan)
            .context("failed to save break plan")?;
        tracing::info!(%trip_id, "trip and break plan saved");
    }

    if json {
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
    } else {
        render(writer, trip, &report)?;
    }
    Ok(())
}

fn render<W: Write>(writer: &mut W, trip: &TripSpec, report: &TripComplianceReport) -> Result<()> {
    writeln!(
        writer,
        "Trip plan: {} miles, {} driving hours",
        trip.distance_miles, trip.driving_hours
    )?;
    let status = if report.is_compliant {
        "COMPLIANT"
    } else {
        "NON-COMPLIANT"
    };
    writeln!(writer, "Status: {status} (score {})", report.compliance_score)?;
    writeln!(
        writer,
        "Driving {:.1}h + breaks {:.1}h = {:.1}h total",
        trip.driving_hours, report.break_plan.total_break_hours, report.break_plan.total_trip_hours
    )?;

    writeln!(writer)?;
    writeln!(writer, "Breaks:")?;
    for (index, b) in report.break_plan.breaks.iter().enumerate() {
        writeln!(
            writer,
            "  {}. {} at {:.1}h ({:.0} mi), {:.1}h - {}",
            index + 1,
            b.break_type,
            b.at_driving_hours,
            b.at_trip_miles,
            b.duration_hours,
            b.reason
        )?;
    }

    if !report.start_issues.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Start eligibility issues:")?;
        for issue in &report.start_issues {
            writeln!(writer, "  - {} ({})", issue.description, issue.required_action)?;
        }
    }

    if !report.issues.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Issues:")?;
        for issue in &report.issues {
            writeln!(writer, "  - {}", issue.description)?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Warnings:")?;
        for warning in &report.warnings {
            writeln!(writer, "  - {}", warning.description)?;
        }
    }

    if !report.recommendations.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Recommendations:")?;
        for rec in &report.recommendations {
            writeln!(writer, "  [{}] {}: {}", rec.priority, rec.title, rec.action)?;
        }
    }

    Ok(())
}
