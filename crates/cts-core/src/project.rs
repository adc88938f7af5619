//! Display names for Claude Code project identifiers.
//!
//! Claude Code stores each project's logs in a directory named after the
//! project path with separators replaced by dashes, e.g.
//! `/Users/me/Code/app/api` becomes `-Users-me-Code-app-api`.

use std::path::Path;

/// Turns raw project identifiers into readable names.
///
/// Identifiers under the code directory lose that prefix entirely, identifiers
/// under the home directory are shown relative to `~/`, and any remaining
/// dashes become slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNamer {
    code_prefix: Option<String>,
    home_prefix: Option<String>,
}

impl ProjectNamer {
    pub fn new(home_dir: &Path, code_dir: &Path) -> Self {
        Self {
            code_prefix: prefix_for(code_dir),
            home_prefix: prefix_for(home_dir),
        }
    }

    /// A namer that only strips the leading dash and converts separators.
    pub const fn plain() -> Self {
        Self {
            code_prefix: None,
            home_prefix: None,
        }
    }

    pub fn display_name(&self, raw: &str) -> String {
        if let Some(rest) = strip(raw, self.code_prefix.as_deref()) {
            return rest.replace('-', "/");
        }
        if let Some(rest) = strip(raw, self.home_prefix.as_deref()) {
            return format!("~/{}", rest.replace('-', "/"));
        }
        raw.strip_prefix('-').unwrap_or(raw).replace('-', "/")
    }
}

fn strip<'a>(raw: &'a str, prefix: Option<&str>) -> Option<&'a str> {
    prefix.and_then(|prefix| raw.strip_prefix(prefix))
}

/// Encoded form of `dir` followed by the separator that precedes a child.
fn prefix_for(dir: &Path) -> Option<String> {
    let encoded = encode_path(dir);
    let encoded = encoded.trim_end_matches('-');
    if encoded.is_empty() {
        None
    } else {
        Some(format!("{encoded}-"))
    }
}

/// Encodes a filesystem path the way Claude Code names project directories.
pub fn encode_path(path: &Path) -> String {
    path.to_string_lossy().replace(['/', '\\', '.'], "-")
}
