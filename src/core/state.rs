//! # Application State
//!
//! Core session state for Bloby. Domain logic only, no TUI-specific types.
//! Presentation state (input buffer, scroll offset, rain field) lives in the
//! `tui` module.
//!
//! ```text
//! App
//! ├── log: MessageLog               // transcript shown on screen
//! ├── history: CommandHistory       // submitted lines, newest last
//! ├── theme: Theme                  // active colour theme
//! ├── background_visible: bool      // rain animation on/off
//! ├── is_loading: bool              // a chat request is in flight
//! ├── session_id: String            // tags persisted records
//! ├── model_name: String            // shown in title and `about`
//! ├── backend_name: String          // "groq" or "relay"
//! ├── export_dir: PathBuf           // where `export` writes
//! ├── persist: bool                 // emit Persist effects
//! └── rng: StdRng                   // randomness for commands and rain
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::config::ResolvedConfig;
use crate::core::history::CommandHistory;
use crate::core::log::MessageLog;
use crate::core::theme::Theme;

pub struct App {
    pub log: MessageLog,
    pub history: CommandHistory,
    pub theme: Theme,
    pub background_visible: bool,
    pub is_loading: bool,
    pub session_id: String,
    pub model_name: String,
    pub backend_name: String,
    pub export_dir: PathBuf,
    /// When false, no `Effect::Persist` is produced.
    pub persist: bool,
    pub rng: StdRng,
}

impl App {
    pub fn new(model_name: impl Into<String>, backend_name: impl Into<String>, rng: StdRng) -> Self {
        Self {
            log: MessageLog::new(),
            history: CommandHistory::new(),
            theme: Theme::default(),
            background_visible: true,
            is_loading: false,
            session_id: uuid::Uuid::new_v4().to_string(),
            model_name: model_name.into(),
            backend_name: backend_name.into(),
            export_dir: PathBuf::from("."),
            persist: false,
            rng,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(
            config.groq.model.clone(),
            config.backend.to_string(),
            StdRng::from_os_rng(),
        );
        app.theme = config.theme;
        app.background_visible = config.background;
        app.export_dir = config.export_dir.clone();
        app.persist = config.persist_path.is_some();
        app
    }

    /// Deterministic app for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::new("test-model", "test", StdRng::seed_from_u64(seed))
    }
}
