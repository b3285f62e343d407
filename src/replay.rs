//! Offline replay of recorded lifecycle events
//!
//! An event log holds one JSON object per line:
//!
//! ```text
//! {"thread": "main", "at": 1000, "event": {"type": "request", "phase": "settings-building"}}
//! {"thread": "main", "at": 1250, "event": {"type": "result", "phase": "settings-building"}}
//! ```
//!
//! `thread` defaults to `main`. Events whose `type` tag is unknown are
//! replayed as unsupported events rather than rejected.

use crate::clock::ManualClock;
use crate::error::{ReplayError, Result};
use crate::event::RawEvent;
use crate::profiler::Profiler;
use crate::timing::ThreadKey;
use serde::Deserialize;
use std::io::BufRead;
use std::sync::Arc;
use tracing::debug;

fn default_thread() -> String {
    "main".to_string()
}

/// One line of an event log
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayRecord {
    #[serde(default = "default_thread")]
    pub thread: String,
    /// Delivery time in milliseconds
    pub at: i64,
    pub event: RawEvent,
}

#[derive(Deserialize)]
struct LooseRecord {
    #[serde(default = "default_thread")]
    thread: String,
    at: i64,
    event: serde_json::Value,
}

/// Parse a single log line
pub fn parse_record(line: &str) -> std::result::Result<ReplayRecord, serde_json::Error> {
    let loose: LooseRecord = serde_json::from_str(line)?;
    let event = match RawEvent::deserialize(&loose.event) {
        Ok(event) => event,
        Err(err) => match loose.event.get("type").and_then(|t| t.as_str()) {
            Some(type_name) if !is_known_tag(type_name) => RawEvent::other(type_name),
            _ => return Err(err),
        },
    };
    Ok(ReplayRecord {
        thread: loose.thread,
        at: loose.at,
        event,
    })
}

fn is_known_tag(tag: &str) -> bool {
    matches!(
        tag,
        "request" | "result" | "repository" | "execution" | "other"
    )
}

/// Read every record of an event log, skipping blank lines
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<ReplayRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record(&line).map_err(|source| ReplayError::Parse {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Feed records to `profiler`, moving its clock to each record's time
pub fn replay(profiler: &Profiler<Arc<ManualClock>>, records: &[ReplayRecord]) {
    for record in records {
        profiler.clock().set(record.at);
        let thread = ThreadKey::named(record.thread.as_str());
        let outcome = profiler.on_event_from(&thread, &record.event);
        debug!(thread = %record.thread, at = record.at, ?outcome, "Replayed event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Phase, SETTINGS_BUILDING};
    use crate::profiler::MemorySink;
    use std::io::Cursor;

    #[test]
    fn test_parse_record_defaults_thread() {
        let record =
            parse_record(r#"{"at": 5, "event": {"type": "request", "phase": "settings-building"}}"#)
                .unwrap();
        assert_eq!(record.thread, "main");
        assert_eq!(record.at, 5);
        assert_eq!(
            record.event,
            RawEvent::Request {
                phase: Phase::SettingsBuilding
            }
        );
    }

    #[test]
    fn test_unknown_tag_becomes_other() {
        let record = parse_record(r#"{"at": 0, "event": {"type": "java.lang.String"}}"#).unwrap();
        assert_eq!(record.event, RawEvent::other("java.lang.String"));
    }

    #[test]
    fn test_unlisted_discriminants_keep_the_replay_going() {
        let log = concat!(
            r#"{"at": 100, "event": {"type": "request", "phase": "settings-building"}}"#,
            "\n",
            r#"{"at": 300, "event": {"type": "result", "phase": "settings-building"}}"#,
            "\n",
            r#"{"at": 400, "event": {"type": "execution", "kind": "ProjectFinished"}}"#,
            "\n",
            r#"{"at": 500, "event": {"type": "repository", "kind": "ARTIFACT_RELOCATED"}}"#,
            "\n",
        );
        let records = read_records(Cursor::new(log)).unwrap();
        assert_eq!(records.len(), 4);

        let profiler = Profiler::with_clock(Arc::new(ManualClock::new(0)), MemorySink::new());
        replay(&profiler, &records);

        let snapshot = profiler.snapshot();
        assert_eq!(snapshot.executions.len(), 1);
        assert_eq!(snapshot.executions[SETTINGS_BUILDING], vec![200]);
        assert!(snapshot.unsupported.is_empty());
        assert_eq!(profiler.tracker().pending(&ThreadKey::named("main")), 0);
    }

    #[test]
    fn test_malformed_known_tag_is_an_error() {
        assert!(
            parse_record(r#"{"at": 0, "event": {"type": "request", "phase": "nope"}}"#).is_err()
        );
        assert!(parse_record(r#"{"at": 0, "event": 42}"#).is_err());
        assert!(parse_record("not json").is_err());
    }

    #[test]
    fn test_read_records_reports_line_number() {
        let log = "\n{\"at\": 0, \"event\": {\"type\": \"other\", \"type_name\": \"x\"}}\n{broken\n";
        match read_records(Cursor::new(log)) {
            Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_replay_uses_record_timestamps() {
        let log = concat!(
            r#"{"thread": "t1", "at": 100, "event": {"type": "request", "phase": "settings-building"}}"#,
            "\n",
            r#"{"thread": "t1", "at": 350, "event": {"type": "result", "phase": "settings-building"}}"#,
            "\n",
        );
        let records = read_records(Cursor::new(log)).unwrap();
        let profiler = Profiler::with_clock(Arc::new(ManualClock::new(0)), MemorySink::new());
        replay(&profiler, &records);

        assert_eq!(profiler.snapshot().executions[SETTINGS_BUILDING], vec![250]);
    }
}
