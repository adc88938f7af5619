//! Status command for showing what the database holds.

use std::io::Write;

use anyhow::Result;
use cts_core::ProjectNamer;
use cts_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    db_path: &std::path::Path,
    namer: &ProjectNamer,
) -> Result<()> {
    let total = db.count_messages()?;

    writeln!(writer, "cctimesheet status")?;
    writeln!(writer, "Database: {}", db_path.display())?;

    if total == 0 {
        writeln!(writer, "No messages recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Messages: {total}")?;
    writeln!(writer, "Projects:")?;
    for summary in db.project_summaries()? {
        writeln!(
            writer,
            "- {}: {} messages, last {}",
            namer.display_name(&summary.project_name),
            summary.message_count,
            summary.last_timestamp
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use cts_core::Message;
    use insta::assert_snapshot;

    fn message(timestamp: &str, project: &str) -> Message {
        Message {
            timestamp: timestamp.to_string(),
            session_id: "sess-1".to_string(),
            project_name: project.to_string(),
            message_type: None,
            uuid: None,
        }
    }

    #[test]
    fn test_status_command_outputs_counts_per_project() {
        let temp = tempfile::tempdir().unwrap();
        let db_path = temp.path().join("messages.db");
        let mut db = Database::open(&db_path).unwrap();
        db.insert_messages(&[
            message("2025-01-01T00:00:00Z", "-Users-pdenya-Code-myproj-api"),
            message("2025-01-01T00:02:00Z", "-Users-pdenya-Code-myproj-api"),
            message("2025-01-02T09:00:00Z", "-Users-pdenya-notes"),
        ])
        .unwrap();
        let namer = ProjectNamer::new(Path::new("/Users/pdenya"), Path::new("/Users/pdenya/Code"));

        let mut output = Vec::new();
        run(&mut output, &db, &db_path, &namer).unwrap();

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&db_path.display().to_string(), "[TEMP]/messages.db");
        assert_snapshot!(output, @r"
        cctimesheet status
        Database: [TEMP]/messages.db
        Messages: 3
        Projects:
        - ~/notes: 1 messages, last 2025-01-02T09:00:00Z
        - myproj/api: 2 messages, last 2025-01-01T00:02:00Z
        ");
    }

    #[test]
    fn test_status_command_on_empty_database() {
        let db = Database::open_in_memory().unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, Path::new("memory.db"), &ProjectNamer::plain()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "cctimesheet status\nDatabase: memory.db\nNo messages recorded.\n");
    }
}
