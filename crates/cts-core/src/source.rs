//! Discovery and parallel parsing of JSONL log sources.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use rayon::prelude::*;
use thiserror::Error;

use crate::message::{ParsedSource, parse_lines};

/// Buffer size for `BufReader` (64KB; session logs can be large).
const BUFFER_SIZE: usize = 64 * 1024;

/// Errors while locating or reading a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The discovery pattern built from the projects directory was invalid.
    #[error("invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// A JSONL file together with the raw project identifier it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: PathBuf,
    pub project_name: String,
}

impl Source {
    /// Builds a source whose project identifier is its containing directory's name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let project_name = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, project_name }
    }

    /// Reads and parses the whole file.
    pub fn read(&self) -> Result<ParsedSource, SourceError> {
        let io_error = |source| SourceError::Io {
            path: self.path.clone(),
            source,
        };
        let file = File::open(&self.path).map_err(io_error)?;
        let reader = BufReader::with_capacity(BUFFER_SIZE, file);
        parse_lines(reader, &self.project_name).map_err(io_error)
    }
}

/// The result of reading one source.
#[derive(Debug)]
pub struct SourceScan {
    pub source: Source,
    pub result: Result<ParsedSource, SourceError>,
}

/// Finds every `*.jsonl` file beneath `root`, in path order.
///
/// Entries that cannot be accessed during the walk are logged and skipped.
pub fn discover_sources(root: &Path) -> Result<Vec<Source>, SourceError> {
    let escaped = Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/*.jsonl", escaped.trim_end_matches('/'));

    let mut sources = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => sources.push(Source::from_path(path)),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable entry");
            }
        }
    }
    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

/// Reads sources in parallel. Results keep the order of `sources`.
pub fn scan_sources(sources: &[Source]) -> Vec<SourceScan> {
    sources
        .par_iter()
        .map(|source| SourceScan {
            source: source.clone(),
            result: source.read(),
        })
        .collect()
}
