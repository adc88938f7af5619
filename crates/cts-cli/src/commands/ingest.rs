//! Ingest command for importing Claude Code session logs.
//!
//! Each JSONL file's containing directory names the project its messages are
//! attributed to. Sources are parsed in parallel in batches, then inserted
//! sequentially so diagnostics and row order follow path order.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cts_core::{Source, SourceScan, discover_sources, scan_sources};
use cts_db::Database;

use crate::commands::util::open_database;

/// Number of files between progress updates.
const PROGRESS_INTERVAL: usize = 10;

/// Running totals for a batch import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub files: usize,
    pub messages: usize,
}

/// Logs per-line and per-source problems, then inserts what parsed.
///
/// Returns the number of rows inserted; a failing source contributes zero.
fn store_scan(db: &mut Database, scan: SourceScan) -> usize {
    let path = scan.source.path.display();
    let parsed = match scan.result {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "skipping source");
            return 0;
        }
    };

    for error in &parsed.errors {
        tracing::warn!(%path, line = error.line, error = %error.source, "skipping malformed line");
    }

    match db.insert_messages(&parsed.messages) {
        Ok(inserted) => {
            tracing::debug!(%path, inserted, "ingested source");
            inserted
        }
        Err(e) => {
            tracing::warn!(%path, error = %e, "failed to store messages");
            0
        }
    }
}

/// Ingests a single JSONL file.
pub fn ingest_file(db: &mut Database, path: &Path) -> Result<usize> {
    if !path.is_file() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let source = Source::from_path(path);
    let scan = SourceScan {
        result: source.read(),
        source,
    };
    Ok(store_scan(db, scan))
}

/// Ingests `sources` in order, calling `progress` every few files and after the last.
pub fn ingest_sources<F>(db: &mut Database, sources: &[Source], mut progress: F) -> IngestSummary
where
    F: FnMut(usize, usize, usize),
{
    let total = sources.len();
    let mut summary = IngestSummary::default();

    for batch in sources.chunks(PROGRESS_INTERVAL) {
        for scan in scan_sources(batch) {
            summary.messages += store_scan(db, scan);
            summary.files += 1;
            if summary.files % PROGRESS_INTERVAL == 0 || summary.files == total {
                progress(summary.files, total, summary.messages);
            }
        }
    }

    summary
}

/// Ingests every `*.jsonl` file beneath `projects_dir`.
pub fn ingest_directory<F>(db: &mut Database, projects_dir: &Path, progress: F) -> Result<IngestSummary>
where
    F: FnMut(usize, usize, usize),
{
    if !projects_dir.is_dir() {
        anyhow::bail!(
            "Claude projects directory not found at {}. Use --projects-dir to specify a different location",
            projects_dir.display()
        );
    }
    let sources = discover_sources(projects_dir)
        .with_context(|| format!("failed to scan {}", projects_dir.display()))?;
    tracing::debug!(count = sources.len(), "discovered sources");
    Ok(ingest_sources(db, &sources, progress))
}

/// Runs the ingest command.
pub fn run(db_path: &Path, file: Option<&Path>, projects_dir: &Path) -> Result<()> {
    let mut db = open_database(db_path)?;

    if let Some(file) = file {
        let count = ingest_file(&mut db, file)?;
        let name = file.file_name().unwrap_or(file.as_os_str()).to_string_lossy();
        println!("Processed {name}: {count} messages inserted");
        return Ok(());
    }

    println!("Processing all JSONL files in {}...", projects_dir.display());
    let summary = ingest_directory(&mut db, projects_dir, |done, total, messages| {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\rProcessed {done}/{total} files, {messages} messages inserted");
        let _ = stderr.flush();
    })?;
    if summary.files > 0 {
        eprintln!();
    }

    println!(
        "Complete! Processed {} files, inserted {} messages",
        summary.files, summary.messages
    );
    println!("Database: {}", db_path.display());
    Ok(())
}
