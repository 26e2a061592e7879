use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, RainLayer, StatusBar, TitleBar};

/// Draws one frame: rain first, then the text layers on top of it.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: DateTime<Local>) {
    if app.background_visible
        && let Some(field) = &tui.rain
    {
        frame.render_widget(
            RainLayer {
                field,
                theme: app.theme,
            },
            frame.area(),
        );
    }

    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1), Length(1)]);
    let [title_area, log_area, input_area, status_area] = layout.areas(frame.area());

    TitleBar::new(
        app.backend_name.as_str(),
        now.format("%H:%M:%S").to_string(),
        app.theme,
    )
    .render(frame, title_area);

    MessageList::new(&mut tui.message_list, app.log.entries(), app.theme).render(frame, log_area);

    tui.input.render(frame, input_area, app.theme, app.is_loading);

    StatusBar {
        backend_name: app.backend_name.clone(),
        model_name: app.model_name.clone(),
        query_count: app.log.query_count(),
        theme: app.theme,
    }
    .render(frame, status_area);
}
