//! Report command for generating timesheets.
//!
//! This module implements `cctimesheet report` and the reusable
//! [`generate_timesheet`] entry point that returns the same text.

use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use cts_core::report::{no_matches_message, no_messages_message, render};
use cts_core::{ProjectFilter, ProjectNamer, ReportOptions, aggregate, resolve_cutoff};
use cts_db::Database;

use crate::commands::util::open_database;

/// What to report on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimesheetRequest {
    /// Days back (e.g. `"7"`) or a `YYYYMMDD` start date. Defaults to 7 days.
    pub since: Option<String>,
    /// Glob of project names to include.
    pub include: Option<String>,
    /// Glob of project names to exclude.
    pub exclude: Option<String>,
    /// Merge each day's projects into one entry.
    pub merge: bool,
}

impl TimesheetRequest {
    fn options(&self) -> Result<ReportOptions> {
        Ok(ReportOptions {
            filter: ProjectFilter::new(self.include.as_deref(), self.exclude.as_deref())?,
            merge: self.merge,
        })
    }
}

/// Generates the timesheet text from an open database.
pub fn generate(
    db: &Database,
    cutoff: NaiveDateTime,
    options: &ReportOptions,
    namer: &ProjectNamer,
    now: NaiveDateTime,
) -> Result<String> {
    let rows = db.messages_since(cutoff)?;
    tracing::debug!(rows = rows.len(), %cutoff, "loaded messages");
    if rows.is_empty() {
        return Ok(no_messages_message(cutoff));
    }

    let activity = aggregate(rows.iter().map(|row| &row.message), namer, options);
    if activity.is_empty() {
        return Ok(no_matches_message(&options.filter));
    }

    Ok(render(&activity, cutoff, options, now))
}

/// Generates a timesheet from the database at `db_path`.
///
/// The cutoff is resolved against the local wall clock.
pub fn generate_timesheet(
    db_path: &Path,
    request: &TimesheetRequest,
    namer: &ProjectNamer,
) -> Result<String> {
    let db = open_database(db_path)?;
    let now = Local::now().naive_local();
    let cutoff = resolve_cutoff(request.since.as_deref(), now)?;
    let options = request.options()?;
    generate(&db, cutoff, &options, namer, now)
}

/// Runs the report command.
pub fn run(db_path: &Path, request: &TimesheetRequest, namer: &ProjectNamer) -> Result<()> {
    let output = generate_timesheet(db_path, request, namer)?;
    println!("{output}");
    Ok(())
}
