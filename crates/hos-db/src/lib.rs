//! Storage layer for the HOS compliance engine.
//!
//! Persists trips, planned rest breaks, and generated daily logs using
//! `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send`
//! but not `Sync`. A `Database` instance can be moved between threads
//! but cannot be shared across threads without external
//! synchronization (e.g. a `Mutex<Database>` or one instance per
//! thread).
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 format
//! (e.g. `2024-01-15T10:30:00.000Z`) so lexicographic ordering matches
//! chronological ordering; log dates are `YYYY-MM-DD` TEXT. Duty
//! statuses, break types, and priorities are stored as their canonical
//! snake_case strings and parsed back through the core `FromStr`
//! implementations on load.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use thiserror::Error;
use uuid::Uuid;

use hos_core::daily_log::{DailyLogRecord, DutyStatusRecord, DutyTotals};
use hos_core::planner::TripBreakPlan;
use hos_core::{BreakPriority, BreakType, DutyStatus, HosState, RestBreak, TripSpec};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for record {record_id}: {timestamp}")]
    TimestampParse {
        record_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Failed to parse a stored log date.
    #[error("invalid log date for record {record_id}: {date}")]
    DateParse {
        record_id: String,
        date: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A stored enum string no longer parses.
    #[error("invalid stored value for record {record_id}: {message}")]
    InvalidStoredValue { record_id: String, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A persisted trip with the driver state it was planned against.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub trip: TripSpec,
    pub state: HosState,
}

/// Row counts per table, for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableCounts {
    pub trips: usize,
    pub rest_breaks: usize,
    pub daily_logs: usize,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the
    /// connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized
    /// database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS trips (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                distance_miles REAL NOT NULL,
                driving_hours REAL NOT NULL,
                cycle_hours REAL NOT NULL DEFAULT 0,
                duty_hours REAL NOT NULL DEFAULT 0,
                driving_hours_used REAL NOT NULL DEFAULT 0,
                hours_since_break REAL NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_trips_created ON trips(created_at);

            CREATE TABLE IF NOT EXISTS rest_breaks (
                id TEXT PRIMARY KEY,
                trip_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                break_type TEXT NOT NULL,
                duration_hours REAL NOT NULL,
                at_driving_hours REAL NOT NULL,
                at_trip_miles REAL NOT NULL,
                is_mandatory INTEGER NOT NULL,
                priority TEXT NOT NULL,
                regulation TEXT NOT NULL,
                reason TEXT NOT NULL,
                FOREIGN KEY (trip_id) REFERENCES trips(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_rest_breaks_trip ON rest_breaks(trip_id);

            CREATE TABLE IF NOT EXISTS daily_logs (
                id TEXT PRIMARY KEY,
                trip_id TEXT NOT NULL,
                log_date TEXT NOT NULL,
                hours_off_duty REAL NOT NULL,
                hours_sleeper_berth REAL NOT NULL,
                hours_driving REAL NOT NULL,
                hours_on_duty_not_driving REAL NOT NULL,
                total_miles REAL NOT NULL,
                UNIQUE (trip_id, log_date),
                FOREIGN KEY (trip_id) REFERENCES trips(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_daily_logs_trip ON daily_logs(trip_id);

            CREATE TABLE IF NOT EXISTS duty_status_records (
                id TEXT PRIMARY KEY,
                daily_log_id TEXT NOT NULL,
                sequence_order INTEGER NOT NULL,
                duty_status TEXT NOT NULL,
                start_time TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                location TEXT NOT NULL,
                miles_driven REAL NOT NULL,
                FOREIGN KEY (daily_log_id) REFERENCES daily_logs(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_duty_records_log
                ON duty_status_records(daily_log_id);
            ",
        )?;
        Ok(())
    }

    /// Inserts a trip and returns its generated ID.
    pub fn insert_trip(
        &mut self,
        trip: &TripSpec,
        state: &HosState,
        created_at: DateTime<Utc>,
    ) -> Result<String, DbError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "
            INSERT INTO trips
            (id, created_at, distance_miles, driving_hours, cycle_hours, duty_hours,
             driving_hours_used, hours_since_break)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id,
                format_timestamp(created_at),
                trip.distance_miles,
                trip.driving_hours,
                state.cycle_hours_used,
                state.duty_period_hours,
                state.driving_hours,
                state.hours_since_break,
            ],
        )?;
        Ok(id)
    }

    /// Lists all trips, most recent first.
    pub fn list_trips(&self) -> Result<Vec<TripRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, created_at, distance_miles, driving_hours, cycle_hours,
                   duty_hours, driving_hours_used, hours_since_break
            FROM trips
            ORDER BY created_at DESC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                TripSpec {
                    distance_miles: row.get(2)?,
                    driving_hours: row.get(3)?,
                },
                HosState {
                    cycle_hours_used: row.get(4)?,
                    duty_period_hours: row.get(5)?,
                    driving_hours: row.get(6)?,
                    hours_since_break: row.get(7)?,
                },
            ))
        })?;

        let mut trips = Vec::new();
        for row in rows {
            let (id, created_at, trip, state) = row?;
            let created_at = parse_timestamp(&id, &created_at)?;
            trips.push(TripRecord {
                id,
                created_at,
                trip,
                state,
            });
        }
        Ok(trips)
    }

    /// Saves a trip's break plan, replacing any previously stored plan.
    pub fn save_break_plan(
        &mut self,
        trip_id: &str,
        plan: &TripBreakPlan,
    ) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM rest_breaks WHERE trip_id = ?", params![trip_id])?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO rest_breaks
                (id, trip_id, seq, break_type, duration_hours, at_driving_hours,
                 at_trip_miles, is_mandatory, priority, regulation, reason)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for (seq, rest_break) in plan.breaks.iter().enumerate() {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    trip_id,
                    seq,
                    rest_break.break_type.as_str(),
                    rest_break.duration_hours,
                    rest_break.at_driving_hours,
                    rest_break.at_trip_miles,
                    rest_break.is_mandatory,
                    rest_break.priority.as_str(),
                    rest_break.regulation,
                    rest_break.reason,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Loads a trip's planned breaks in schedule order.
    pub fn get_breaks(&self, trip_id: &str) -> Result<Vec<RestBreak>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, break_type, duration_hours, at_driving_hours, at_trip_miles,
                   is_mandatory, priority, regulation, reason
            FROM rest_breaks
            WHERE trip_id = ?
            ORDER BY seq ASC
            ",
        )?;
        let rows = stmt.query_map(params![trip_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, bool>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut breaks = Vec::new();
        for row in rows {
            let (id, break_type, duration, at_hours, at_miles, mandatory, priority, regulation, reason) =
                row?;
            breaks.push(RestBreak {
                break_type: parse_stored(&id, &break_type, BreakType::from_str)?,
                duration_hours: duration,
                at_driving_hours: at_hours,
                at_trip_miles: at_miles,
                is_mandatory: mandatory,
                priority: parse_stored(&id, &priority, BreakPriority::from_str)?,
                regulation,
                reason,
            });
        }
        Ok(breaks)
    }

    /// Saves the daily logs for a trip, replacing any stored before.
    pub fn save_daily_logs(
        &mut self,
        trip_id: &str,
        logs: &[DailyLogRecord],
    ) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM daily_logs WHERE trip_id = ?",
            params![trip_id],
        )?;
        {
            let mut log_stmt = tx.prepare(
                "
                INSERT INTO daily_logs
                (id, trip_id, log_date, hours_off_duty, hours_sleeper_berth,
                 hours_driving, hours_on_duty_not_driving, total_miles)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            let mut record_stmt = tx.prepare(
                "
                INSERT INTO duty_status_records
                (id, daily_log_id, sequence_order, duty_status, start_time,
                 duration_minutes, location, miles_driven)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;

            for log in logs {
                let log_id = Uuid::new_v4().to_string();
                log_stmt.execute(params![
                    log_id,
                    trip_id,
                    log.log_date.format("%Y-%m-%d").to_string(),
                    log.totals.off_duty_hours,
                    log.totals.sleeper_berth_hours,
                    log.totals.driving_hours,
                    log.totals.on_duty_not_driving_hours,
                    log.total_miles,
                ])?;

                for record in &log.records {
                    record_stmt.execute(params![
                        Uuid::new_v4().to_string(),
                        log_id,
                        record.sequence_order,
                        record.status.as_str(),
                        format_timestamp(record.start),
                        record.duration_minutes,
                        record.location,
                        record.miles_driven,
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Loads a trip's daily logs in date order, records included.
    pub fn get_daily_logs(&self, trip_id: &str) -> Result<Vec<DailyLogRecord>, DbError> {
        let mut log_stmt = self.conn.prepare(
            "
            SELECT id, log_date, hours_off_duty, hours_sleeper_berth,
                   hours_driving, hours_on_duty_not_driving, total_miles
            FROM daily_logs
            WHERE trip_id = ?
            ORDER BY log_date ASC
            ",
        )?;
        let log_rows = log_stmt.query_map(params![trip_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                DutyTotals {
                    off_duty_hours: row.get(2)?,
                    sleeper_berth_hours: row.get(3)?,
                    driving_hours: row.get(4)?,
                    on_duty_not_driving_hours: row.get(5)?,
                },
                row.get::<_, f64>(6)?,
            ))
        })?;

        let mut logs = Vec::new();
        for row in log_rows {
            let (log_id, date, totals, total_miles) = row?;
            let log_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|source| {
                DbError::DateParse {
                    record_id: log_id.clone(),
                    date: date.clone(),
                    source,
                }
            })?;
            let records = self.get_duty_records(&log_id)?;
            logs.push(DailyLogRecord {
                log_date,
                records,
                totals,
                total_miles,
            });
        }
        Ok(logs)
    }

    fn get_duty_records(&self, daily_log_id: &str) -> Result<Vec<DutyStatusRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, sequence_order, duty_status, start_time, duration_minutes,
                   location, miles_driven
            FROM duty_status_records
            WHERE daily_log_id = ?
            ORDER BY sequence_order ASC
            ",
        )?;
        let rows = stmt.query_map(params![daily_log_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, f64>(6)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, sequence_order, status, start, duration_minutes, location, miles_driven) =
                row?;
            records.push(DutyStatusRecord {
                sequence_order,
                status: parse_stored(&id, &status, DutyStatus::from_str)?,
                start: parse_timestamp(&id, &start)?,
                duration_minutes,
                location,
                miles_driven,
            });
        }
        Ok(records)
    }

    /// Counts rows per table for status output.
    pub fn counts(&self) -> Result<TableCounts, DbError> {
        let count = |table: &str| -> Result<usize, DbError> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
            Ok(usize::try_from(n).unwrap_or(0))
        };
        Ok(TableCounts {
            trips: count("trips")?,
            rest_breaks: count("rest_breaks")?,
            daily_logs: count("daily_logs")?,
        })
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(record_id: &str, timestamp: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            record_id: record_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn parse_stored<T, E: std::fmt::Display>(
    record_id: &str,
    value: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, DbError> {
    parse(value).map_err(|err| DbError::InvalidStoredValue {
        record_id: record_id.to_string(),
        message: err.to_string(),
    })
}
