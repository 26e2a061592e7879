//! # StatusBar Component
//!
//! Bottom line: `GROQ API | llama-3.3-70b-versatile` on the left and the
//! number of queries this session on the right, both dimmed.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;

use crate::core::theme::Theme;
use crate::tui::component::Component;
use crate::tui::components::hsl_color;

pub struct StatusBar {
    pub backend_name: String,
    pub model_name: String,
    pub query_count: usize,
    pub theme: Theme,
}

impl StatusBar {
    pub fn left_text(&self) -> String {
        format!("{} API | {}", self.backend_name.to_uppercase(), self.model_name)
    }

    pub fn right_text(&self) -> String {
        match self.query_count {
            1 => "1 query".to_string(),
            n => format!("{n} queries"),
        }
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = Style::default().fg(hsl_color(self.theme.dim()));
        let buf = frame.buffer_mut();

        let right = self.right_text();
        let right_width = right.len() as u16;
        let left_budget = area.width.saturating_sub(right_width + 1);
        buf.set_line(area.x, area.y, &Line::styled(self.left_text(), style), left_budget);
        if right_width <= area.width {
            buf.set_line(
                area.right() - right_width,
                area.y,
                &Line::styled(right, style),
                right_width,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn bar(count: usize) -> StatusBar {
        StatusBar {
            backend_name: "groq".into(),
            model_name: "llama-3.3-70b-versatile".into(),
            query_count: count,
            theme: Theme::Green,
        }
    }

    fn render(status: &mut StatusBar, width: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, 1)).unwrap();
        terminal.draw(|f| status.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_backend_model_and_count() {
        let text = render(&mut bar(3), 60);
        assert!(text.starts_with("GROQ API | llama-3.3-70b-versatile"));
        assert!(text.ends_with("3 queries"));
    }

    #[test]
    fn test_singular_query() {
        assert_eq!(bar(1).right_text(), "1 query");
        assert_eq!(bar(0).right_text(), "0 queries");
    }

    #[test]
    fn test_count_survives_narrow_width() {
        let text = render(&mut bar(12), 20);
        assert!(text.ends_with("12 queries"));
        assert!(text.starts_with("GROQ API"));
    }
}
