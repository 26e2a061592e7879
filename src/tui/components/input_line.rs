//! # InputLine Component
//!
//! Single-line command input behind the `bloby>` prompt.
//!
//! The cursor is a char index into the buffer; on screen it is placed using
//! display width (`unicode-width`), so wide characters and combining marks
//! land where the terminal draws them. Text longer than the line scrolls
//! horizontally to keep the cursor visible.
//!
//! While a chat request is in flight the line renders disabled, showing
//! `Processing...` instead of the buffer.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::theme::Theme;
use crate::tui::component::EventHandler;
use crate::tui::components::hsl_color;
use crate::tui::components::message_list::USER_PREFIX;
use crate::tui::event::TuiEvent;

pub const PROCESSING_TEXT: &str = "Processing...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Enter with the current contents; the buffer is cleared.
    Submit(String),
    ContentChanged,
}

#[derive(Debug, Default)]
pub struct InputLine {
    buffer: String,
    /// Cursor position in chars.
    cursor: usize,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the contents and moves the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.buffer.chars().count();
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn insert_str(&mut self, text: &str) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: Theme, disabled: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let prompt_style = Style::default()
            .fg(hsl_color(theme.prompt()))
            .add_modifier(Modifier::BOLD);

        if disabled {
            let line = Line::from(vec![
                Span::styled(USER_PREFIX, prompt_style.add_modifier(Modifier::DIM)),
                Span::styled(PROCESSING_TEXT, Style::default().fg(hsl_color(theme.dim()))),
            ]);
            frame.buffer_mut().set_line(area.x, area.y, &line, area.width);
            return;
        }

        let prompt_width = USER_PREFIX.width() as u16;
        let available = area.width.saturating_sub(prompt_width).saturating_sub(1) as usize;

        // Drop leading chars until the cursor fits.
        let chars: Vec<char> = self.buffer.chars().collect();
        let mut start = 0;
        let width_to_cursor =
            |from: usize| -> usize { chars[from..self.cursor].iter().map(|c| c.width().unwrap_or(0)).sum() };
        while start < self.cursor && width_to_cursor(start) > available {
            start += 1;
        }
        let visible: String = chars[start..].iter().collect();

        let line = Line::from(vec![
            Span::styled(USER_PREFIX, prompt_style),
            Span::styled(visible, Style::default().fg(hsl_color(theme.primary()))),
        ]);
        frame.buffer_mut().set_line(area.x, area.y, &line, area.width);

        let cursor_x = area.x + prompt_width + width_to_cursor(start) as u16;
        frame.set_cursor_position(Position::new(cursor_x.min(area.right().saturating_sub(1)), area.y));
    }
}

impl EventHandler for InputLine {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<InputEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
            }
            TuiEvent::Paste(text) => {
                // Single line: newlines become spaces.
                let flat = text.replace(['\r', '\n'], " ");
                self.insert_str(&flat);
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.buffer.remove(at);
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.chars().count() {
                    return None;
                }
                let at = self.byte_index(self.cursor);
                self.buffer.remove(at);
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
                return None;
            }
            TuiEvent::CursorRight => {
                self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
                return None;
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                return None;
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.chars().count();
                return None;
            }
            TuiEvent::Submit => return Some(InputEvent::Submit(self.take())),
            _ => return None,
        }
        Some(InputEvent::ContentChanged)
    }
}
