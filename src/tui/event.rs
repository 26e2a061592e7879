use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Core actions (passed to core::update)
    Submit,
    HistoryOlder,
    HistoryNewer,
    CancelInput,
    ClearLog,
    ToggleBackground,
    CycleTheme,
    Quit,

    // TUI-local events (handled directly in TUI)
    InputChar(char),
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    Resize(u16, u16),
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

/// Wait up to `timeout` for the next event we care about.
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if event::poll(timeout)? {
        Ok(translate(event::read()?))
    } else {
        Ok(None)
    }
}

/// Maps a raw crossterm event to a `TuiEvent`. Unhandled events map to `None`.
pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(w, h) => Some(TuiEvent::Resize(w, h)),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<TuiEvent> {
    // Key release events arrive on Windows and with enhanced keyboard flags.
    if key.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::CancelInput),
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(TuiEvent::ClearLog),
        (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(TuiEvent::ToggleBackground),
        (KeyModifiers::CONTROL, _) => None,
        (_, KeyCode::F(2)) => Some(TuiEvent::CycleTheme),
        (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Delete) => Some(TuiEvent::Delete),
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Esc) => Some(TuiEvent::Quit),
        (_, KeyCode::Up) => Some(TuiEvent::HistoryOlder),
        (_, KeyCode::Down) => Some(TuiEvent::HistoryNewer),
        (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
        (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
        (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
        (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseEvent;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press))
    }

    #[test]
    fn test_shortcuts() {
        let cases = [
            (key(KeyCode::Char('c'), KeyModifiers::CONTROL), TuiEvent::CancelInput),
            (key(KeyCode::Char('l'), KeyModifiers::CONTROL), TuiEvent::ClearLog),
            (key(KeyCode::Char('b'), KeyModifiers::CONTROL), TuiEvent::ToggleBackground),
            (key(KeyCode::F(2), KeyModifiers::NONE), TuiEvent::CycleTheme),
            (key(KeyCode::Esc, KeyModifiers::NONE), TuiEvent::Quit),
            (key(KeyCode::Up, KeyModifiers::NONE), TuiEvent::HistoryOlder),
            (key(KeyCode::Down, KeyModifiers::NONE), TuiEvent::HistoryNewer),
            (key(KeyCode::PageUp, KeyModifiers::NONE), TuiEvent::ScrollPageUp),
            (key(KeyCode::Enter, KeyModifiers::NONE), TuiEvent::Submit),
        ];
        for (event, expected) in cases {
            assert_eq!(translate(event), Some(expected));
        }
    }

    #[test]
    fn test_shifted_characters_are_input() {
        assert_eq!(
            translate(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('A'))
        );
        assert_eq!(translate(key(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let event = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(translate(event), None);
    }

    #[test]
    fn test_mouse_and_resize() {
        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(scroll), Some(TuiEvent::ScrollUp));
        assert_eq!(translate(Event::Resize(100, 40)), Some(TuiEvent::Resize(100, 40)));
    }
}
