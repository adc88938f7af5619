//! Core domain logic for cctimesheet.
//!
//! This crate contains the fundamental types and logic for:
//! - Messages: extracting activity records from Claude Code JSONL logs
//! - Buckets: truncating timestamps to 15-minute units of attributed time
//! - Activity: grouping buckets per day and project, with filtering and merging
//! - Reports: rendering the activity map as a plain-text timesheet

mod activity;
pub mod bucket;
pub mod cutoff;
pub mod filter;
pub mod message;
pub mod project;
pub mod report;
pub mod source;

pub use activity::{ActivityMap, DayActivity, ProjectActivity, ReportOptions, aggregate};
pub use bucket::{TimeBucket, TimestampError, hours, parse_timestamp};
pub use cutoff::{CutoffError, format_cutoff, parse_cutoff, resolve_cutoff};
pub use filter::{FilterError, GlobFilter, ProjectFilter};
pub use message::{LineError, Message, ParsedSource};
pub use project::ProjectNamer;
pub use source::{Source, SourceError, SourceScan, discover_sources, scan_sources};
