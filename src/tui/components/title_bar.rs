//! # TitleBar Component
//!
//! Top line of the terminal: the shell-style host label on the left
//! (`bloby@groq:~`) and a wall clock on the right.
//!
//! Purely presentational. The clock string is formatted by the caller so the
//! component stays deterministic under test:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(&app.backend_name, Local::now().format("%H:%M:%S").to_string(), app.theme);
//! title_bar.render(frame, title_area);
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

use crate::core::theme::Theme;
use crate::tui::component::Component;
use crate::tui::components::hsl_color;

pub struct TitleBar {
    /// Backend label, e.g. "groq" or "relay".
    pub backend_name: String,
    pub clock: String,
    pub theme: Theme,
}

impl TitleBar {
    pub fn new(backend_name: impl Into<String>, clock: impl Into<String>, theme: Theme) -> Self {
        Self {
            backend_name: backend_name.into(),
            clock: clock.into(),
            theme,
        }
    }

    pub fn label(&self) -> String {
        format!("bloby@{}:~", self.backend_name)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buf = frame.buffer_mut();
        let label = Line::styled(
            self.label(),
            Style::default()
                .fg(hsl_color(self.theme.prompt()))
                .add_modifier(Modifier::BOLD),
        );
        buf.set_line(area.x, area.y, &label, area.width);

        // Clock only when it does not collide with the label.
        let clock_width = self.clock.width() as u16;
        let label_width = label.width() as u16;
        if label_width + 1 + clock_width <= area.width {
            let clock = Line::styled(
                self.clock.clone(),
                Style::default().fg(hsl_color(self.theme.dim())),
            );
            buf.set_line(area.right() - clock_width, area.y, &clock, clock_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(title_bar: &mut TitleBar, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_label_and_clock() {
        let mut title_bar = TitleBar::new("groq", "12:34:56", Theme::Green);
        let text = render(&mut title_bar, 40);
        assert!(text.starts_with("bloby@groq:~"));
        assert!(text.ends_with("12:34:56"));
    }

    #[test]
    fn test_relay_backend_label() {
        let mut title_bar = TitleBar::new("relay", "00:00:00", Theme::Blue);
        assert_eq!(title_bar.label(), "bloby@relay:~");
        assert!(render(&mut title_bar, 40).starts_with("bloby@relay:~"));
    }

    #[test]
    fn test_narrow_terminal_drops_clock() {
        let mut title_bar = TitleBar::new("groq", "12:34:56", Theme::Green);
        let text = render(&mut title_bar, 16);
        assert!(text.starts_with("bloby@groq:~"));
        assert!(!text.contains("12:34"));
    }

    #[test]
    fn test_uses_theme_prompt_colour() {
        let mut title_bar = TitleBar::new("groq", "", Theme::Amber);
        let mut terminal = Terminal::new(TestBackend::new(20, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        let cell = &terminal.backend().buffer()[(0, 0)];
        assert_eq!(cell.fg, hsl_color(Theme::Amber.prompt()));
    }
}
