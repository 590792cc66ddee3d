//! JSONL transcript writer for deliberation events.
//!
//! One JSON object per line. Every record carries an `event` name and an
//! `at` timestamp; the event's own fields sit alongside them at the top
//! level so the transcript greps cleanly.

use council_application::ports::deliberation_log::{DeliberationEvent, DeliberationLogger};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Appends deliberation events to a JSONL transcript file.
///
/// Thread-safe via `Mutex<BufWriter<File>>`; every line is flushed as it
/// is written so a crash loses at most the current event.
pub struct JsonlDeliberationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlDeliberationLogger {
    /// Open the transcript at `path`, creating parent directories as
    /// needed. Returns `None` (with a warning) if the file cannot be
    /// opened; the run then proceeds without a transcript.
    pub fn new(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let opened = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| File::create(&path));

        match opened {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path,
            }),
            Err(e) => {
                warn!("Transcript disabled, cannot open {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the flat record for one event. Envelope keys win over payload
    /// keys of the same name; a non-object payload lands under `detail`;
    /// a null payload contributes nothing.
    fn to_record(event: DeliberationEvent, at: String) -> Value {
        let mut record = serde_json::Map::new();
        record.insert("event".to_string(), Value::String(event.event_type.to_string()));
        record.insert("at".to_string(), Value::String(at));

        match event.payload {
            Value::Object(fields) => {
                for (key, value) in fields {
                    record.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                record.insert("detail".to_string(), other);
            }
        }

        Value::Object(record)
    }
}

impl DeliberationLogger for JsonlDeliberationLogger {
    fn log(&self, event: DeliberationEvent) {
        let at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = Self::to_record(event, at);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}").and_then(|()| writer.flush());
        }
    }
}

impl Drop for JsonlDeliberationLogger {
    fn drop(&mut self) {
        // No other handles exist during drop, so skip the lock.
        if let Ok(writer) = self.writer.get_mut() {
            let _ = writer.flush();
        }
    }
}
