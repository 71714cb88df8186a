//! HOS compliance CLI library.
//!
//! This crate provides the CLI interface for the HOS compliance engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, StateArgs};
pub use config::Config;
