use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hos_cli::commands::{check, logs, plan, status, trips};
use hos_cli::{Cli, Commands, Config};
use hos_core::{TripItinerary, TripSpec};

/// Load config and open the database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(hos_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = hos_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

#[allow(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout();

    match &cli.command {
        Some(Commands::Plan {
            distance,
            driving_hours,
            state,
            save,
            json,
        }) => {
            let trip = TripSpec {
                distance_miles: *distance,
                driving_hours: *driving_hours,
            };
            if *save {
                let (mut db, _config) = open_database(cli.config.as_deref())?;
                plan::run(&mut stdout, &trip, &state.to_state(), Some(&mut db), *json)?;
            } else {
                plan::run(&mut stdout, &trip, &state.to_state(), None, *json)?;
            }
        }
        Some(Commands::Check {
            state,
            trip_driving_hours,
            json,
        }) => {
            check::run(&mut stdout, &state.to_state(), *trip_driving_hours, *json)?;
        }
        Some(Commands::Logs {
            distance,
            driving_hours,
            start,
            origin,
            pickup,
            dropoff,
            state,
            save,
            json,
        }) => {
            let itinerary = TripItinerary {
                distance_miles: *distance,
                driving_hours: *driving_hours,
                origin: origin.clone(),
                pickup_location: pickup.clone(),
                dropoff_location: dropoff.clone(),
            };
            if *save {
                let (mut db, _config) = open_database(cli.config.as_deref())?;
                logs::run(
                    &mut stdout,
                    &itinerary,
                    start,
                    &state.to_state(),
                    Some(&mut db),
                    *json,
                )?;
            } else {
                logs::run(&mut stdout, &itinerary, start, &state.to_state(), None, *json)?;
            }
        }
        Some(Commands::Trips { json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            trips::run(&mut stdout, &db, *json)?;
        }
        Some(Commands::Status) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            if let Some(parent) = config.database_path.parent() {
                std::fs::create_dir_all(parent).context("failed to create database directory")?;
            }
            status::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
