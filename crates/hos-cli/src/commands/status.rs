//! Status command for showing database contents.

use std::io::Write;

use anyhow::{Context, Result};

use hos_db::Database;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let counts = db.counts()?;

    writeln!(writer, "HOS database status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;
    writeln!(writer, "Trips: {}", counts.trips)?;
    writeln!(writer, "Rest breaks: {}", counts.rest_breaks)?;
    writeln!(writer, "Daily logs: {}", counts.daily_logs)?;

    Ok(())
}
