//! cctimesheet CLI library.
//!
//! This crate provides the CLI interface and the reusable
//! [`generate_timesheet`] function for embedding reports elsewhere.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use commands::report::{TimesheetRequest, generate_timesheet};
pub use config::Config;
