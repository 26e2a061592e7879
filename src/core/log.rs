//! # Message Log
//!
//! The ordered transcript shown in the terminal. Entries are immutable and
//! only ever appended; the single exception is `reset`, used by `clear`,
//! which swaps the whole log for one notice.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{ChatRole, ChatTurn};

pub const WELCOME_BANNER: &str = "\
╔══════════════════════════════════════════════════════════╗
║            BLOBY TERMINAL v1.0 - GROQ Interface          ║
╠══════════════════════════════════════════════════════════╣
║  Powered by Llama 3.3 70B                                ║
║  Type your question and press Enter                      ║
║  Type 'clear' to clear the terminal                      ║
║  Type 'help' for available commands                      ║
╚══════════════════════════════════════════════════════════╝";

pub const CLEARED_NOTICE: &str = "Terminal cleared.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    UserInput,
    AssistantReply,
    SystemNotice,
}

impl EntryKind {
    /// Tag used in exported transcripts.
    pub fn tag(self) -> &'static str {
        match self {
            EntryKind::UserInput => "USER",
            EntryKind::AssistantReply => "BLOBY",
            EntryKind::SystemNotice => "SYSTEM",
        }
    }

    /// Only conversation turns are sent to the chat collaborator and persisted.
    pub fn is_conversation(self) -> bool {
        matches!(self, EntryKind::UserInput | EntryKind::AssistantReply)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    id: Uuid,
    kind: EntryKind,
    text: String,
    created_at: DateTime<Local>,
}

impl LogEntry {
    fn new(kind: EntryKind, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            text,
            created_at: Local::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    /// A fresh log holding the welcome banner.
    pub fn new() -> Self {
        Self {
            entries: vec![LogEntry::new(
                EntryKind::SystemNotice,
                WELCOME_BANNER.to_string(),
            )],
        }
    }

    pub fn push(&mut self, kind: EntryKind, text: impl Into<String>) -> &LogEntry {
        let idx = self.entries.len();
        self.entries.push(LogEntry::new(kind, text.into()));
        &self.entries[idx]
    }

    /// Replaces every entry with a single notice.
    pub fn reset(&mut self, notice: impl Into<String>) {
        self.entries = vec![LogEntry::new(EntryKind::SystemNotice, notice.into())];
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Number of operator submissions, shown in the status bar.
    pub fn query_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::UserInput)
            .count()
    }

    /// Plain-text export of the whole log.
    pub fn transcript(&self, now: DateTime<Local>) -> String {
        crate::core::export::transcript(&self.entries, now)
    }

    /// The most recent `limit` conversation turns, oldest first.
    ///
    /// `skip_last` excludes that many trailing entries first, so the
    /// submission currently being sent is not duplicated in its own history.
    pub fn chat_history(&self, limit: usize, skip_last: usize) -> Vec<ChatTurn> {
        let end = self.entries.len().saturating_sub(skip_last);
        let turns: Vec<&LogEntry> = self.entries[..end]
            .iter()
            .filter(|e| e.kind.is_conversation())
            .collect();
        let start = turns.len().saturating_sub(limit);
        turns[start..]
            .iter()
            .map(|e| ChatTurn {
                role: match e.kind {
                    EntryKind::UserInput => ChatRole::User,
                    _ => ChatRole::Assistant,
                },
                content: e.text.clone(),
            })
            .collect()
    }
}
