//! Check command: driver eligibility and current compliance.

use std::io::Write;

use anyhow::{Context, Result};

use hos_core::{DriverEligibility, HosLimits, HosState, validate_driver_eligibility};

pub fn run<W: Write>(
    writer: &mut W,
    state: &HosState,
    trip_driving_hours: Option<f64>,
    json: bool,
) -> Result<()> {
    let eligibility = validate_driver_eligibility(state, trip_driving_hours, &HosLimits::DEFAULT)
        .context("eligibility check failed")?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &eligibility)?;
        writeln!(writer)?;
    } else {
        render(writer, &eligibility)?;
    }
    Ok(())
}

fn render<W: Write>(writer: &mut W, eligibility: &DriverEligibility) -> Result<()> {
    let verdict = if eligibility.is_eligible {
        "ELIGIBLE"
    } else {
        "NOT ELIGIBLE"
    };
    writeln!(writer, "Driver: {verdict}")?;

    match &eligibility.violation_reason {
        Some(reason) => writeln!(writer, "Cannot drive: {reason}")?,
        None => writeln!(writer, "Can drive now")?,
    }

    let avail = &eligibility.availability;
    writeln!(
        writer,
        "Available: cycle {:.1}h, duty window {:.1}h, driving {:.1}h, until break {:.1}h",
        avail.cycle_hours, avail.duty_period_hours, avail.driving_hours, avail.hours_until_break
    )?;
    writeln!(
        writer,
        "Max continuous driving: {:.1}h",
        avail.max_continuous_driving_hours
    )?;

    let compliance = &eligibility.current_compliance;
    writeln!(
        writer,
        "Compliance score: {} ({} violations, {} warnings)",
        compliance.compliance_score,
        compliance.violations.len(),
        compliance.warnings.len()
    )?;
    for violation in &compliance.violations {
        writeln!(writer, "  violation [{}]: {}", violation.regulation, violation.description)?;
    }
    for warning in &compliance.warnings {
        writeln!(writer, "  warning: {}", warning.description)?;
    }

    if let Some(shortfall) = &eligibility.insufficient_hours {
        writeln!(
            writer,
            "Requested {:.1}h of driving but only {:.1}h available",
            shortfall.required_hours, shortfall.available_hours
        )?;
    }

    if let Some(rest) = &eligibility.required_rest {
        writeln!(writer)?;
        writeln!(
            writer,
            "Minimum rest required: {:.1}h",
            rest.minimum_rest_hours
        )?;
        for option in &rest.options {
            writeln!(
                writer,
                "  option: {} ({:.1}h) - {}",
                option.break_type, option.duration_hours, option.description
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn renders_eligible_driver() {
        let state = HosState {
            cycle_hours_used: 30.0,
            duty_period_hours: 6.0,
            driving_hours: 4.0,
            hours_since_break: 2.0,
        };
        let mut output = Vec::new();
        run(&mut output, &state, None, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output.trim_end(), @r"
        Driver: ELIGIBLE
        Can drive now
        Available: cycle 40.0h, duty window 8.0h, driving 7.0h, until break 6.0h
        Max continuous driving: 6.0h
        Compliance score: 100 (0 violations, 0 warnings)
        ");
    }

    #[test]
    fn renders_blocked_driver_with_rest_options() {
        let state = HosState {
            cycle_hours_used: 40.0,
            duty_period_hours: 14.0,
            driving_hours: 10.0,
            hours_since_break: 4.0,
        };
        let mut output = Vec::new();
        run(&mut output, &state, None, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("NOT ELIGIBLE"));
        assert!(output.contains("14-hour duty period limit reached"));
        assert!(output.contains("Minimum rest required: 10.0h"));
    }

    #[test]
    fn malformed_state_is_an_error() {
        let state = HosState {
            cycle_hours_used: -2.0,
            ..HosState::default()
        };
        let mut output = Vec::new();
        assert!(run(&mut output, &state, None, false).is_err());
    }
}
