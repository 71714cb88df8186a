//! Trips command: list persisted trips.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use hos_db::{Database, TripRecord};

#[derive(Serialize)]
struct TripRow<'a> {
    id: &'a str,
    created_at: String,
    distance_miles: f64,
    driving_hours: f64,
    cycle_hours: f64,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let trips = db.list_trips()?;

    if json {
        let rows: Vec<TripRow<'_>> = trips.iter().map(to_row).collect();
        serde_json::to_writer_pretty(&mut *writer, &rows)?;
        writeln!(writer)?;
        return Ok(());
    }

    if trips.is_empty() {
        writeln!(writer, "No trips recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Trips ({}):", trips.len())?;
    for trip in &trips {
        writeln!(
            writer,
            "- {} {} {} mi / {}h driving (cycle {}h)",
            trip.id,
            trip.created_at.format("%Y-%m-%d %H:%M"),
            trip.trip.distance_miles,
            trip.trip.driving_hours,
            trip.state.cycle_hours_used
        )?;
    }
    Ok(())
}

fn to_row(trip: &TripRecord) -> TripRow<'_> {
    TripRow {
        id: &trip.id,
        created_at: trip.created_at.to_rfc3339(),
        distance_miles: trip.trip.distance_miles,
        driving_hours: trip.trip.driving_hours,
        cycle_hours: trip.state.cycle_hours_used,
    }
}
