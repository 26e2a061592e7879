//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{ChatClient, ChatError, ChatRequest};
use crate::core::persist::{MessageSink, PersistRecord};

/// A chat client that answers every request with the same result and
/// remembers what it was asked.
pub struct CannedClient {
    result: Result<String, ChatError>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl CannedClient {
    pub fn replying(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ChatError) -> Self {
        Self {
            result: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatClient for CannedClient {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        self.result.clone()
    }
}

/// Keeps appended records in memory.
#[derive(Default)]
pub struct MemorySink {
    pub records: Mutex<Vec<PersistRecord>>,
}

impl MessageSink for MemorySink {
    fn append(&self, record: &PersistRecord) -> io::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
