//! # Command History
//!
//! Previously submitted input lines plus a browse cursor for Up/Down recall.
//!
//! The cursor is an offset from the newest entry: `-1` means "not browsing",
//! `0` is the newest entry and `len - 1` the oldest. It never leaves
//! `[-1, len - 1]`.

#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: isize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
        }
    }

    /// Appends a submitted line and stops browsing.
    pub fn record(&mut self, raw: impl Into<String>) {
        self.entries.push(raw.into());
        self.cursor = -1;
    }

    /// Steps toward the oldest entry and returns the text to put in the input.
    ///
    /// At the oldest entry the cursor stays put and the same entry is returned.
    /// Returns `None` when there is no history at all.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() as isize - 1;
        if self.cursor < last {
            self.cursor += 1;
        }
        Some(self.current())
    }

    /// Steps back toward "not browsing".
    ///
    /// Returns the text to put in the input: the next newer entry, or an empty
    /// string once the cursor returns to `-1`. Returns `None` when not browsing.
    pub fn newer(&mut self) -> Option<&str> {
        match self.cursor {
            c if c < 0 => None,
            0 => {
                self.cursor = -1;
                Some("")
            }
            _ => {
                self.cursor -= 1;
                Some(self.current())
            }
        }
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = -1;
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn current(&self) -> &str {
        let idx = self.entries.len() as isize - 1 - self.cursor;
        &self.entries[idx as usize]
    }
}
