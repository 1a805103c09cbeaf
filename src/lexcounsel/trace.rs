//! Append-only JSONL trace of a discussion run.
//!
//! [`TraceRecorder`] writes one JSON object per line to `trace.jsonl` inside a
//! per-run directory, flushing after every record so a crash never loses the
//! already-observed events. Within one discussion, line order is write order.
//!
//! Event vocabulary emitted by the core: `case_context`, `message`,
//! `discussion_timeout`, `user_timeout`, `user_followup_timeout`,
//! `user_judge_review_timeout`, `judge_decision`, `discussion_finished`, and
//! a final `result` carrying the synthesized recommendation.
//!
//! Trace failures are logged and swallowed: observability must never alter the
//! discussion control flow.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::lexcounsel::schema::Message;

/// Create a timestamped run directory under `base_dir`.
pub fn create_run_dir(base_dir: &Path) -> std::io::Result<PathBuf> {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let run_dir = base_dir.join(timestamp);
    fs::create_dir_all(&run_dir)?;
    Ok(run_dir)
}

/// Append-only event sink for one discussion run.
pub struct TraceRecorder {
    trace_path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl TraceRecorder {
    /// Open (or create) `trace.jsonl` inside `run_dir` for appending.
    pub fn new(run_dir: &Path) -> std::io::Result<Self> {
        let trace_path = run_dir.join("trace.jsonl");
        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&trace_path)?;
        Ok(TraceRecorder {
            trace_path,
            writer: Mutex::new(BufWriter::new(handle)),
        })
    }

    /// Path of the underlying `trace.jsonl` file.
    pub fn path(&self) -> &Path {
        &self.trace_path
    }

    /// Record one appended conversation message.
    pub fn record_message(&self, message: &Message) {
        self.record_event("message", json!({ "message": message }));
    }

    /// Record an arbitrary event. `payload` must be a JSON object; its fields
    /// are merged next to the timestamp and event type.
    pub fn record_event(&self, event_type: &str, payload: Value) {
        let mut record = Map::new();
        record.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        record.insert("type".to_string(), Value::String(event_type.to_string()));
        if let Value::Object(fields) = payload {
            for (key, value) in fields {
                record.insert(key, value);
            }
        }

        let line = match serde_json::to_string(&Value::Object(record)) {
            Ok(line) => line,
            Err(err) => {
                log::warn!("Could not serialize trace event '{}': {}", event_type, err);
                return;
            }
        };

        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            log::warn!("Could not write trace event '{}': {}", event_type, err);
        }
    }

    /// Flush any buffered output. Also performed on drop.
    pub fn close(&self) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writer.flush() {
            log::warn!("Could not flush trace file: {}", err);
        }
    }
}

impl Drop for TraceRecorder {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexcounsel::schema::Message as SchemaMessage;

    #[test]
    fn writes_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let trace = TraceRecorder::new(dir.path()).unwrap();

        trace.record_event("case_context", json!({"country": "SK"}));
        trace.record_message(&SchemaMessage::user("Late delivery dispute"));
        trace.close();

        let contents = fs::read_to_string(trace.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "case_context");
        assert_eq!(first["country"], "SK");
        assert!(first["timestamp"].is_string());

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "message");
        assert_eq!(second["message"]["agent_name"], "User");
    }

    #[test]
    fn run_dir_is_created_under_base() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = create_run_dir(dir.path()).unwrap();
        assert!(run_dir.starts_with(dir.path()));
        assert!(run_dir.is_dir());
    }
}
