//! Message records extracted from Claude Code session logs.
//!
//! Each log line is a JSON object. Only lines carrying both a `timestamp` and a
//! `sessionId` become [`Message`]s; everything else is either skipped silently
//! (missing fields) or reported as a [`LineError`] (invalid JSON).

use std::io::{self, BufRead};

use serde_json::{Map, Value};
use thiserror::Error;

/// A log line that could not be parsed as a JSON object.
#[derive(Debug, Error)]
#[error("failed to parse line {line}: {source}")]
pub struct LineError {
    /// 1-based line number within the source.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// An activity record ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// ISO 8601 timestamp, stored exactly as it appeared in the log.
    pub timestamp: String,
    pub session_id: String,
    /// Raw project identifier (the encoded directory name).
    pub project_name: String,
    pub message_type: Option<String>,
    pub uuid: Option<String>,
}

/// The outcome of reading one line source.
#[derive(Debug, Default)]
pub struct ParsedSource {
    pub messages: Vec<Message>,
    pub errors: Vec<LineError>,
}

/// Parses a single log line.
///
/// Returns `Ok(None)` for well-formed objects that lack a timestamp or session ID.
pub fn parse_line(line: &str, project_name: &str) -> Result<Option<Message>, serde_json::Error> {
    parse_bytes(line.as_bytes(), project_name)
}

/// Like [`parse_line`], but accepts raw bytes so invalid UTF-8 surfaces as a JSON error.
fn parse_bytes(line: &[u8], project_name: &str) -> Result<Option<Message>, serde_json::Error> {
    let object: Map<String, Value> = serde_json::from_slice(line)?;

    let Some(timestamp) = non_empty_str(&object, "timestamp") else {
        return Ok(None);
    };
    let Some(session_id) = non_empty_str(&object, "sessionId") else {
        return Ok(None);
    };

    Ok(Some(Message {
        timestamp: timestamp.to_string(),
        session_id: session_id.to_string(),
        project_name: project_name.to_string(),
        message_type: object.get("type").and_then(Value::as_str).map(String::from),
        uuid: object.get("uuid").and_then(Value::as_str).map(String::from),
    }))
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Parses every line of a reader, collecting messages and per-line errors.
///
/// Blank lines are ignored. A line that is not valid UTF-8 is reported like any
/// other malformed line. Only an I/O error aborts the whole source.
pub fn parse_lines<R: BufRead>(reader: R, project_name: &str) -> io::Result<ParsedSource> {
    let mut parsed = ParsedSource::default();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }
        match parse_bytes(trimmed, project_name) {
            Ok(Some(message)) => parsed.messages.push(message),
            Ok(None) => {}
            Err(source) => parsed.errors.push(LineError {
                line: idx + 1,
                source,
            }),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn test_parse_line_extracts_known_fields() {
        let line = r#"{"timestamp":"2025-01-15T10:30:00.000Z","sessionId":"s1","type":"user","uuid":"u1","message":{"role":"user"}}"#;
        let message = parse_line(line, "-Users-dev-proj").unwrap().unwrap();

        assert_eq!(
            message,
            Message {
                timestamp: "2025-01-15T10:30:00.000Z".to_string(),
                session_id: "s1".to_string(),
                project_name: "-Users-dev-proj".to_string(),
                message_type: Some("user".to_string()),
                uuid: Some("u1".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_line_skips_records_without_session() {
        let line = r#"{"type":"summary","timestamp":"2025-01-15T10:30:00Z"}"#;
        assert!(parse_line(line, "p").unwrap().is_none());
    }

    #[test]
    fn test_parse_line_skips_empty_timestamp() {
        let line = r#"{"timestamp":"","sessionId":"s1"}"#;
        assert!(parse_line(line, "p").unwrap().is_none());
    }

    #[test]
    fn test_parse_line_treats_non_string_fields_as_absent() {
        let line = r#"{"timestamp":"2025-01-15T10:30:00Z","sessionId":"s1","type":3,"uuid":null}"#;
        let message = parse_line(line, "p").unwrap().unwrap();
        assert_eq!(message.message_type, None);
        assert_eq!(message.uuid, None);
    }

    #[test]
    fn test_parse_line_rejects_non_objects() {
        assert!(parse_line(r#"["2025-01-15T10:30:00Z","s1"]"#, "p").is_err());
        assert!(parse_line("not json", "p").is_err());
    }

    #[test]
    fn test_parse_lines_continues_past_bad_lines() {
        let input = concat!(
            r#"{"timestamp":"2025-01-15T10:30:00Z","sessionId":"s1"}"#,
            "\n",
            "{malformed\n",
            "\n",
            r#"{"type":"file-history-snapshot"}"#,
            "\n",
            r#"{"timestamp":"2025-01-15T10:31:00Z","sessionId":"s1"}"#,
            "\n",
        );

        let parsed = parse_lines(Cursor::new(input), "proj").unwrap();

        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
        assert!(parsed.errors[0].to_string().starts_with("failed to parse line 2"));
    }

    #[test]
    fn test_parse_lines_keeps_duplicate_records() {
        let line = r#"{"timestamp":"2025-01-15T10:30:00Z","sessionId":"s1"}"#;
        let input = format!("{line}\n{line}\n");

        let parsed = parse_lines(Cursor::new(input), "proj").unwrap();

        assert_eq!(parsed.messages.len(), 2);
    }

    #[test]
    fn test_parse_lines_reports_invalid_utf8_and_keeps_going() {
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"timestamp":"2025-01-15T10:30:00Z","sessionId":"s1"}"#);
        input.push(b'\n');
        input.extend_from_slice(b"{\"timestamp\":\"2025-01-15T10:31:00Z\",\"sessionId\":\"s1\",\"text\":\"\xe2\x82\"}");
        input.push(b'\n');
        input.extend_from_slice(br#"{"timestamp":"2025-01-15T10:32:00Z","sessionId":"s1"}"#);

        let parsed = parse_lines(Cursor::new(input), "proj").unwrap();

        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
    }

    #[test]
    fn test_parse_lines_handles_crlf_endings() {
        let input = "{\"timestamp\":\"2025-01-15T10:30:00Z\",\"sessionId\":\"s1\"}\r\n\r\n";

        let parsed = parse_lines(Cursor::new(input), "proj").unwrap();

        assert_eq!(parsed.messages.len(), 1);
        assert!(parsed.errors.is_empty());
    }
}
