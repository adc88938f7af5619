//! Case-insensitive glob filters over project display names.

use glob::{MatchOptions, Pattern};
use thiserror::Error;

/// `*` and `?` also match `/`, so a pattern covers the whole display name.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A glob pattern that could not be compiled.
#[derive(Debug, Error)]
#[error("invalid glob pattern '{pattern}': {source}")]
pub struct FilterError {
    pub pattern: String,
    #[source]
    pub source: glob::PatternError,
}

/// A compiled glob matched against full names, ignoring case.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    raw: String,
    pattern: Pattern,
}

impl GlobFilter {
    pub fn new(raw: &str) -> Result<Self, FilterError> {
        let normalized = escape_unclosed_brackets(&collapse_stars(&raw.to_lowercase()));
        let pattern = Pattern::new(&normalized).map_err(|source| FilterError {
            pattern: raw.to_string(),
            source,
        })?;
        Ok(Self {
            raw: raw.to_string(),
            pattern,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern
            .matches_with(&name.to_lowercase(), MATCH_OPTIONS)
    }

    /// The pattern as the user wrote it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Runs of `*` behave like a single `*`; `glob` reserves `**` for whole path components.
fn collapse_stars(pattern: &str) -> String {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Rewrites every `[` that never closes as the literal class `[[]`, the way shell globbing treats it.
fn escape_unclosed_brackets(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut escaped = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '[' {
            escaped.push(chars[i]);
            i += 1;
            continue;
        }
        // A leading `!` negates and a `]` right after the opening bracket is a member.
        let mut j = i + 1;
        if chars.get(j) == Some(&'!') {
            j += 1;
        }
        if chars.get(j) == Some(&']') {
            j += 1;
        }
        let close = chars
            .get(j..)
            .and_then(|rest| rest.iter().position(|&c| c == ']'))
            .map(|offset| j + offset);
        if let Some(close) = close {
            escaped.extend(&chars[i..=close]);
            i = close + 1;
        } else {
            escaped.push_str("[[]");
            i += 1;
        }
    }
    escaped
}

/// Include/exclude selection of projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    include: Option<GlobFilter>,
    exclude: Option<GlobFilter>,
}

impl ProjectFilter {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            include: include.map(GlobFilter::new).transpose()?,
            exclude: exclude.map(GlobFilter::new).transpose()?,
        })
    }

    /// Whether `name` passes the include pattern (if any) and avoids the exclude pattern (if any).
    pub fn allows(&self, name: &str) -> bool {
        let included = self.include.as_ref().is_none_or(|p| p.matches(name));
        let excluded = self.exclude.as_ref().is_some_and(|p| p.matches(name));
        included && !excluded
    }

    pub fn include(&self) -> Option<&str> {
        self.include.as_ref().map(GlobFilter::as_str)
    }

    pub fn exclude(&self) -> Option<&str> {
        self.exclude.as_ref().map(GlobFilter::as_str)
    }

    pub const fn is_active(&self) -> bool {
        self.include.is_some() || self.exclude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_matches_whole_name_case_insensitively() {
        let filter = ProjectFilter::new(Some("*acme*"), None).unwrap();
        assert!(filter.allows("acme/backend"));
        assert!(filter.allows("work/acme-2"));
        assert!(filter.allows("Work/ACME"));
        assert!(!filter.allows("other/project"));
    }

    #[test]
    fn test_patterns_are_anchored() {
        let filter = ProjectFilter::new(Some("acme"), None).unwrap();
        assert!(filter.allows("ACME"));
        assert!(!filter.allows("acme/backend"));
    }

    #[test]
    fn test_question_mark_matches_one_character() {
        let filter = GlobFilter::new("proj?").unwrap();
        assert!(filter.matches("proj1"));
        assert!(filter.matches("proj/"));
        assert!(!filter.matches("proj"));
        assert!(!filter.matches("proj12"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = ProjectFilter::new(Some("*acme*"), Some("*backend")).unwrap();
        assert!(filter.allows("acme/frontend"));
        assert!(!filter.allows("acme/backend"));
        assert!(!filter.allows("other/project"));
    }

    #[test]
    fn test_exclude_alone_keeps_everything_else() {
        let filter = ProjectFilter::new(None, Some("~/*")).unwrap();
        assert!(!filter.allows("~/notes"));
        assert!(filter.allows("myproj/api"));
    }

    #[test]
    fn test_no_patterns_allow_everything() {
        let filter = ProjectFilter::default();
        assert!(!filter.is_active());
        assert!(filter.allows("anything"));
    }

    #[test]
    fn test_repeated_stars_behave_like_one() {
        let filter = GlobFilter::new("*acme**").unwrap();
        assert!(filter.matches("work/acme/api"));
        assert_eq!(filter.as_str(), "*acme**");
    }

    #[test]
    fn test_character_classes_are_supported() {
        let filter = GlobFilter::new("proj[0-9]").unwrap();
        assert!(filter.matches("proj7"));
        assert!(!filter.matches("projx"));
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let filter = GlobFilter::new("proj[").unwrap();
        assert!(filter.matches("proj["));
        assert!(filter.matches("PROJ["));
        assert!(!filter.matches("proja"));
        assert_eq!(filter.as_str(), "proj[");
    }

    #[test]
    fn test_unclosed_bracket_after_wildcard() {
        let filter = GlobFilter::new("*[a*").unwrap();
        assert!(filter.matches("work/[abc"));
        assert!(!filter.matches("work/abc"));
    }

    #[test]
    fn test_nested_open_bracket_joins_the_class() {
        let filter = GlobFilter::new("[x[0-9]").unwrap();
        assert!(filter.matches("7"));
        assert!(filter.matches("["));
        assert!(!filter.matches("[x7"));
    }

    #[test]
    fn test_empty_and_negated_brackets_are_literal() {
        assert!(GlobFilter::new("a[]").unwrap().matches("a[]"));
        assert!(GlobFilter::new("a[!]").unwrap().matches("a[!]"));
        assert!(GlobFilter::new("[!]a]").unwrap().matches("b"));
    }
}
