//! # TUI Components
//!
//! Every widget on the terminal screen, bottom layer first:
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── rain.rs          (glyph rain painted under everything)
//! ├── title_bar.rs     (`bloby@groq:~` and the clock)
//! ├── message_list.rs  (scrollable log, transparent between lines)
//! ├── input_line.rs    (`bloby>` prompt with the editable buffer)
//! └── status_bar.rs    (backend, model and query count)
//! ```
//!
//! ## Patterns
//!
//! Stateless components (`TitleBar`, `StatusBar`, `RainLayer`) receive all
//! data as props in their struct fields and render it.
//!
//! Stateful components (`InputLine`, `MessageListState`) keep presentation
//! state across frames in `TuiState` and implement `EventHandler`.
//!
//! Text is written with `Buffer::set_line`, which only touches the cells a
//! span covers. Nothing here clears its area, so the rain stays visible
//! wherever there is no text.

use ratatui::style::Color;

use crate::core::theme::Hsl;

pub mod input_line;
pub mod message_list;
pub mod rain;
mod status_bar;
mod title_bar;

pub use input_line::{InputEvent, InputLine};
pub use message_list::{MessageList, MessageListState};
pub use rain::RainLayer;
pub use status_bar::StatusBar;
pub use title_bar::TitleBar;

/// Terminal colour for a theme colour.
pub fn hsl_color(hsl: Hsl) -> Color {
    let (r, g, b) = hsl.to_rgb();
    Color::Rgb(r, g, b)
}
