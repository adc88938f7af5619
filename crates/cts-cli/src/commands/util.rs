//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use cts_db::Database;

/// Opens the database at `path`, creating its parent directory if needed.
pub fn open_database(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display()))?;
    }
    Database::open(path)
        .with_context(|| format!("could not connect to database {}", path.display()))
}
