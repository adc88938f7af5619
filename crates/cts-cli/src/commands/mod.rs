//! CLI subcommand implementations.

pub mod ingest;
pub mod report;
pub mod status;
pub mod util;
