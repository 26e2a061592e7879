//! # MessageList Component
//!
//! Scrollable view of the message log.
//!
//! ## Responsibilities
//!
//! - Wrap each entry to the viewport width
//! - Keep the view pinned to the newest entry unless the operator scrolled up
//! - Leave every cell it has no text for untouched, so the rain layer shows
//!   through around and between the lines
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the log entries (props).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use uuid::Uuid;

use crate::core::log::{EntryKind, LogEntry};
use crate::core::theme::Theme;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::hsl_color;
use crate::tui::event::TuiEvent;

pub const USER_PREFIX: &str = "bloby> ";
const REPLY_INDENT: &str = "  ";
/// Lines moved per mouse-wheel notch.
const WHEEL_STEP: usize = 3;

/// Scroll state for the message list.
/// Must be persisted in the parent TuiState.
#[derive(Debug, Clone)]
pub struct MessageListState {
    /// First visible line.
    pub offset: usize,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Wrapped line count from the last render.
    pub total_lines: usize,
    /// Wrapped lines from the last render, reused while the log is unchanged.
    cache: Option<LineCache>,
}

/// Identifies the input a set of wrapped lines was built from. The log only
/// grows or is reset, so count plus last id is enough to spot a change.
#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    entry_count: usize,
    last_id: Option<Uuid>,
    width: u16,
    theme: Theme,
}

#[derive(Debug, Clone)]
struct LineCache {
    key: CacheKey,
    lines: Vec<Line<'static>>,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            stick_to_bottom: true,
            viewport_height: 0,
            total_lines: 0,
            cache: None,
        }
    }

    /// Wrapped lines for `entries`, rebuilt only when the log, width or
    /// theme changed since the last call.
    fn lines_for(&mut self, entries: &[LogEntry], theme: Theme, width: u16) -> &[Line<'static>] {
        let key = CacheKey {
            entry_count: entries.len(),
            last_id: entries.last().map(|e| e.id()),
            width,
            theme,
        };
        let stale = self.cache.as_ref().is_none_or(|c| c.key != key);
        if stale {
            let lines = entries
                .iter()
                .flat_map(|e| entry_lines(e, theme, width))
                .collect();
            self.cache = Some(LineCache { key, lines });
        }
        self.cache.as_ref().map_or(&[], |c| c.lines.as_slice())
    }

    fn max_offset(&self) -> usize {
        self.total_lines
            .saturating_sub(self.viewport_height as usize)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.stick_to_bottom = self.offset >= self.max_offset();
    }

    /// Scrolling back to (or past) the end re-pins to bottom.
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
        if self.offset >= self.max_offset() {
            self.offset = self.max_offset();
            self.stick_to_bottom = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.offset = self.max_offset();
    }

    fn page(&self) -> usize {
        (self.viewport_height as usize).saturating_sub(1).max(1)
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp => self.scroll_up(WHEEL_STEP),
            TuiEvent::ScrollDown => self.scroll_down(WHEEL_STEP),
            TuiEvent::ScrollPageUp => self.scroll_up(self.page()),
            TuiEvent::ScrollPageDown => self.scroll_down(self.page()),
            _ => return None,
        }
        Some(())
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let options = textwrap::Options::new(width.max(1))
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

/// Wraps one entry into styled lines, followed by a blank spacer line.
pub fn entry_lines(entry: &LogEntry, theme: Theme, width: u16) -> Vec<Line<'static>> {
    let width = width as usize;
    let mut lines = Vec::new();
    match entry.kind() {
        EntryKind::UserInput => {
            let prompt = Style::default()
                .fg(hsl_color(theme.prompt()))
                .add_modifier(Modifier::BOLD);
            let body = Style::default().fg(hsl_color(theme.primary()));
            let indent = " ".repeat(USER_PREFIX.len());
            for (i, text) in wrap(entry.text(), width.saturating_sub(USER_PREFIX.len()))
                .into_iter()
                .enumerate()
            {
                let lead = if i == 0 {
                    Span::styled(USER_PREFIX, prompt)
                } else {
                    Span::raw(indent.clone())
                };
                lines.push(Line::from(vec![lead, Span::styled(text, body)]));
            }
        }
        EntryKind::AssistantReply => {
            let body = Style::default().fg(hsl_color(theme.primary()));
            for text in wrap(entry.text(), width.saturating_sub(REPLY_INDENT.len())) {
                lines.push(Line::from(vec![
                    Span::raw(REPLY_INDENT),
                    Span::styled(text, body),
                ]));
            }
        }
        EntryKind::SystemNotice => {
            let dim = Style::default().fg(hsl_color(theme.dim()));
            for text in wrap(entry.text(), width) {
                lines.push(Line::styled(text, dim));
            }
        }
    }
    lines.push(Line::default());
    lines
}

/// Scrollable log view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub entries: &'a [LogEntry],
    pub theme: Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, entries: &'a [LogEntry], theme: Theme) -> Self {
        Self {
            state,
            entries,
            theme,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let total_lines = self
            .state
            .lines_for(self.entries, self.theme, area.width)
            .len();

        self.state.total_lines = total_lines;
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            self.state.offset = self.state.max_offset();
        } else {
            self.state.offset = self.state.offset.min(self.state.max_offset());
        }

        let offset = self.state.offset;
        let lines = self.state.lines_for(self.entries, self.theme, area.width);
        let buf = frame.buffer_mut();
        for (row, line) in lines
            .iter()
            .skip(offset)
            .take(area.height as usize)
            .enumerate()
        {
            // set_line only touches the cells the spans cover.
            buf.set_line(area.x, area.y + row as u16, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log::MessageLog;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn log_with(n: usize) -> MessageLog {
        let mut log = MessageLog::new();
        log.reset("start");
        for i in 0..n {
            log.push(EntryKind::UserInput, format!("question {i}"));
            log.push(EntryKind::AssistantReply, format!("answer {i}"));
        }
        log
    }

    fn draw(log: &MessageLog, state: &mut MessageListState, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| MessageList::new(state, log.entries(), Theme::Green).render(f, f.area()))
            .unwrap();
        terminal
    }

    #[test]
    fn test_renders_prompt_and_indented_reply() {
        let log = log_with(1);
        let mut state = MessageListState::new();
        let terminal = draw(&log, &mut state, 40, 10);
        let rows = rows(&terminal);
        assert!(rows.iter().any(|r| r.starts_with("bloby> question 0")));
        assert!(rows.iter().any(|r| r.starts_with("  answer 0")));
        assert!(rows.iter().any(|r| r.starts_with("start")));
    }

    #[test]
    fn test_sticks_to_bottom() {
        let log = log_with(20);
        let mut state = MessageListState::new();
        let terminal = draw(&log, &mut state, 40, 6);
        let rows = rows(&terminal);
        assert!(rows.iter().any(|r| r.contains("answer 19")));
        assert!(!rows.iter().any(|r| r.contains("question 0")));
        assert_eq!(state.offset, state.total_lines - 6);
    }

    #[test]
    fn test_scroll_up_unpins_and_down_repins() {
        let log = log_with(20);
        let mut state = MessageListState::new();
        draw(&log, &mut state, 40, 6);
        let bottom = state.offset;

        state.handle_event(&TuiEvent::ScrollPageUp);
        assert!(!state.stick_to_bottom);
        assert_eq!(state.offset, bottom - 5);

        state.handle_event(&TuiEvent::ScrollPageDown);
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
        assert_eq!(state.offset, bottom);
    }

    #[test]
    fn test_long_lines_wrap_with_indent() {
        let mut log = MessageLog::new();
        log.reset("x");
        log.push(EntryKind::UserInput, "one two three four five six");
        let mut state = MessageListState::new();
        let terminal = draw(&log, &mut state, 20, 10);
        let rows = rows(&terminal);
        assert!(rows[2].starts_with("bloby> one two"));
        assert!(rows[3].starts_with("       "));
        assert!(rows[3].trim_start().starts_with("four") || rows[3].trim_start().starts_with("three"));
    }

    #[test]
    fn test_wrapped_lines_reused_until_log_changes() {
        let mut log = log_with(3);
        let mut state = MessageListState::new();
        draw(&log, &mut state, 40, 10);
        let first = state.cache.as_ref().unwrap().lines.as_ptr();
        draw(&log, &mut state, 40, 10);
        assert_eq!(state.cache.as_ref().unwrap().lines.as_ptr(), first);

        log.push(EntryKind::AssistantReply, "fresh reply");
        let terminal = draw(&log, &mut state, 40, 10);
        assert!(rows(&terminal).iter().any(|r| r.starts_with("  fresh reply")));
    }

    #[test]
    fn test_cache_tracks_reset_width_and_theme() {
        let mut log = MessageLog::new();
        log.reset("before");
        let mut state = MessageListState::new();
        draw(&log, &mut state, 40, 4);

        // Same entry count, different entry.
        log.reset("after");
        let terminal = draw(&log, &mut state, 40, 4);
        assert!(rows(&terminal)[0].starts_with("after"));

        draw(&log, &mut state, 30, 4);
        assert_eq!(state.cache.as_ref().unwrap().key.width, 30);

        let mut terminal = Terminal::new(TestBackend::new(30, 4)).unwrap();
        terminal
            .draw(|f| MessageList::new(&mut state, log.entries(), Theme::Amber).render(f, f.area()))
            .unwrap();
        assert_eq!(
            terminal.backend().buffer()[(0, 0)].fg,
            hsl_color(Theme::Amber.dim())
        );
    }

    #[test]
    fn test_untouched_cells_keep_background() {
        let mut log = MessageLog::new();
        log.reset("hi");
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
        terminal
            .draw(|f| {
                for y in 0..3 {
                    for x in 0..10 {
                        if let Some(cell) = f.buffer_mut().cell_mut((x, y)) {
                            cell.set_char('#');
                        }
                    }
                }
                MessageList::new(&mut state, log.entries(), Theme::Green).render(f, f.area());
            })
            .unwrap();
        let rows = rows(&terminal);
        assert_eq!(rows[0], "hi########");
        assert_eq!(rows[2], "##########");
    }
}
