//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Timesheets from Claude Code activity.
///
/// Imports Claude Code session logs into a local database and reports the
/// time spent per project in 15-minute blocks.
#[derive(Debug, Parser)]
#[command(name = "cctimesheet", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file path (overrides the configured location).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import Claude Code JSONL session logs into the database.
    Ingest {
        /// A single JSONL file to import instead of the whole projects directory.
        file: Option<PathBuf>,

        /// Claude projects directory to scan for `*.jsonl` files.
        #[arg(long)]
        projects_dir: Option<PathBuf>,
    },

    /// Print a timesheet of activity in 15-minute blocks.
    #[command(allow_negative_numbers = true)]
    Report {
        /// Number of days back (e.g., 7) or a start date as YYYYMMDD (default: 7 days).
        since: Option<String>,

        /// Only include projects matching this glob (case-insensitive).
        #[arg(short, long)]
        project: Option<String>,

        /// Exclude projects matching this glob (case-insensitive).
        #[arg(short = 'x', long)]
        exclude: Option<String>,

        /// Merge all projects per day so concurrent work is counted once.
        #[arg(short, long)]
        group: bool,
    },

    /// Show database location and per-project message counts.
    Status,
}
