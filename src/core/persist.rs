//! # Message Persistence
//!
//! Append-only record of conversation turns in `~/.bloby/messages.jsonl`.
//!
//! One JSON object per line. Only user and assistant entries are written;
//! notices stay on screen. A failing sink never affects the visible log, the
//! caller logs the error and moves on.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::log::{EntryKind, LogEntry};

pub const DEFAULT_FILE_NAME: &str = "messages.jsonl";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersistRecord {
    pub session_id: String,
    pub kind: EntryKind,
    pub text: String,
    pub created_at: DateTime<Local>,
}

impl PersistRecord {
    /// `None` for entries that are not part of the conversation.
    pub fn from_entry(session_id: &str, entry: &LogEntry) -> Option<Self> {
        if !entry.kind().is_conversation() {
            return None;
        }
        Some(Self {
            session_id: session_id.to_string(),
            kind: entry.kind(),
            text: entry.text().to_string(),
            created_at: entry.created_at(),
        })
    }
}

pub trait MessageSink: Send + Sync {
    fn append(&self, record: &PersistRecord) -> io::Result<()>;
}

/// `~/.bloby/messages.jsonl`, or `None` without a home directory.
pub fn default_path() -> Option<PathBuf> {
    crate::core::config::bloby_dir().map(|dir| dir.join(DEFAULT_FILE_NAME))
}

#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MessageSink for JsonlSink {
    fn append(&self, record: &PersistRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(record).map_err(io::Error::other)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log::MessageLog;

    fn temp_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bloby-persist-{}", uuid::Uuid::new_v4()));
        dir.join(name)
    }

    #[test]
    fn test_notices_are_not_persisted() {
        let log = MessageLog::new();
        let banner = log.last().unwrap();
        assert!(PersistRecord::from_entry("s1", banner).is_none());
    }

    #[test]
    fn test_appends_one_line_per_record() {
        let path = temp_file("messages.jsonl");
        let sink = JsonlSink::new(&path);

        let mut log = MessageLog::new();
        log.push(EntryKind::UserInput, "hello");
        let user = PersistRecord::from_entry("s1", log.last().unwrap()).unwrap();
        log.push(EntryKind::AssistantReply, "hi\nthere");
        let reply = PersistRecord::from_entry("s1", log.last().unwrap()).unwrap();

        sink.append(&user).unwrap();
        sink.append(&reply).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["session_id"], "s1");
        assert_eq!(first["kind"], "user_input");
        assert_eq!(first["text"], "hello");

        let second: PersistRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second, reply);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = temp_file("occupied");
        fs::create_dir_all(&dir).unwrap();
        // A directory where the file should be.
        let sink = JsonlSink::new(&dir);
        let mut log = MessageLog::new();
        log.push(EntryKind::UserInput, "x");
        let record = PersistRecord::from_entry("s", log.last().unwrap()).unwrap();
        assert!(sink.append(&record).is_err());
        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }
}
