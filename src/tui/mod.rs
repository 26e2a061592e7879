//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Rain running**: the poll timeout follows the `RainTicker`, so frames
//!   arrive roughly every 33ms and each fired tick advances the field once.
//! - **Rain hidden**: the ticker is stopped and the loop sleeps up to 500ms,
//!   waking for input, background results and the once-a-second clock.
//!
//! ## Background Work
//!
//! Chat requests, transcript writes and persistence appends run on tokio
//! tasks. Results come back over an `mpsc` channel as `Action`s and go
//! through `update` like keyboard input does.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::{self, stdout};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use rand::Rng;

use crate::chat::{ChatClient, ChatRequest, GroqClient, RelayClient};
use crate::core::action::{Action, Effect, update};
use crate::core::animation::{RainField, RainTicker};
use crate::core::config::{Backend, ResolvedConfig};
use crate::core::persist::{JsonlSink, MessageSink, PersistRecord};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputEvent, InputLine, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub input: InputLine,
    pub message_list: MessageListState,
    /// Present only while the background is visible.
    pub rain: Option<RainField>,
    pub ticker: RainTicker,
    pub cell_width: u16,
    /// Last known terminal size.
    pub size: (u16, u16),
}

impl TuiState {
    pub fn new(cell_width: u16) -> Self {
        Self {
            input: InputLine::new(),
            message_list: MessageListState::new(),
            rain: None,
            ticker: RainTicker::default(),
            cell_width: cell_width.max(1),
            size: (0, 0),
        }
    }

    /// Creates or drops the rain field to match `app.background_visible`.
    pub fn sync_background(&mut self, app: &mut App, width: u16, height: u16, now: Instant) {
        self.size = (width, height);
        match (app.background_visible, self.rain.is_some()) {
            (true, false) => {
                self.rain = Some(RainField::new(width, height, self.cell_width, &mut app.rng));
                self.ticker.start(now);
                debug!("Rain started ({}x{})", width, height);
            }
            (false, true) => {
                self.rain = None;
                self.ticker.stop();
                debug!("Rain stopped");
            }
            _ => {}
        }
    }

    /// Rebuilds the field for a new terminal size. No-op while hidden.
    pub fn resize<R: Rng + ?Sized>(&mut self, width: u16, height: u16, rng: &mut R) {
        self.size = (width, height);
        if let Some(field) = &mut self.rain {
            field.resize(width, height, rng);
        }
    }

    /// Advances the rain when a frame is due. Returns true if it moved.
    pub fn tick_rain(&mut self, app: &mut App, now: Instant) -> bool {
        if !self.ticker.fire(now) {
            return false;
        }
        if let Some(field) = &mut self.rain {
            field.tick(app.theme.glow(), &mut app.rng);
        }
        true
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

/// Build the chat client for the configured backend.
pub fn build_client(config: &ResolvedConfig) -> Arc<dyn ChatClient> {
    match config.backend {
        Backend::Groq => Arc::new(GroqClient::new(
            config.groq_api_key.clone(),
            config.groq.clone(),
        )),
        Backend::Relay => Arc::new(RelayClient::new(config.relay_url.clone())),
    }
}

/// Where background tasks send their results, plus what they need.
struct Workers {
    client: Arc<dyn ChatClient>,
    sink: Option<Arc<dyn MessageSink>>,
    tx: mpsc::Sender<Action>,
}

impl Workers {
    /// Carries out effects. Returns true when the app should quit.
    fn apply(&self, effects: Vec<Effect>, tui: &mut TuiState) -> bool {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::FillInput(text) => tui.input.set_text(text),
                Effect::SpawnChat(request) => self.spawn_chat(request),
                Effect::Persist(record) => self.spawn_persist(record),
                Effect::Export { path, contents } => self.spawn_export(path, contents),
                Effect::Quit => quit = true,
            }
        }
        quit
    }

    fn spawn_chat(&self, request: ChatRequest) {
        info!(
            "Spawning chat request via {} ({} history turns)",
            self.client.name(),
            request.history.len()
        );
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.complete(&request).await;
            if tx.send(Action::ChatResolved(result)).is_err() {
                warn!("Failed to send chat result: receiver dropped");
            }
        });
    }

    fn spawn_persist(&self, record: PersistRecord) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        tokio::task::spawn_blocking(move || {
            if let Err(e) = sink.append(&record) {
                warn!("Failed to persist {} entry: {}", record.kind.tag(), e);
            }
        });
    }

    fn spawn_export(&self, path: std::path::PathBuf, contents: String) {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = std::fs::write(&path, contents)
                .map(|_| path.clone())
                .map_err(|e| e.to_string());
            match &result {
                Ok(p) => info!("Transcript written to {}", p.display()),
                Err(e) => warn!("Transcript export to {} failed: {}", path.display(), e),
            }
            if tx.send(Action::ExportFinished(result)).is_err() {
                warn!("Failed to send export result: receiver dropped");
            }
        });
    }
}

/// Maps a terminal event to a core action, if it is one.
fn core_action(event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::HistoryOlder => Some(Action::HistoryOlder),
        TuiEvent::HistoryNewer => Some(Action::HistoryNewer),
        TuiEvent::CancelInput => Some(Action::CancelInput),
        TuiEvent::ClearLog => Some(Action::ClearLog),
        TuiEvent::ToggleBackground => Some(Action::ToggleBackground),
        TuiEvent::CycleTheme => Some(Action::CycleTheme),
        TuiEvent::Quit => Some(Action::Quit),
        _ => None,
    }
}

pub fn run(config: ResolvedConfig) -> io::Result<()> {
    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let workers = Workers {
        client: build_client(&config),
        sink: config
            .persist_path
            .clone()
            .map(|path| Arc::new(JsonlSink::new(path)) as Arc<dyn MessageSink>),
        tx,
    };

    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(config.cell_width);
    info!(
        "Session {} started (backend={}, model={})",
        app.session_id, app.backend_name, app.model_name
    );

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let size = terminal.size()?;
    tui.sync_background(&mut app, size.width, size.height, Instant::now());

    let mut needs_redraw = true;
    let mut last_clock = Local::now().timestamp();

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, Local::now()))?;
            needs_redraw = false;
        }

        let timeout = tui
            .ticker
            .timeout(Instant::now())
            .map_or(IDLE_POLL, |t| t.min(IDLE_POLL));
        let first_event = poll_event_timeout(timeout)?;
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(|| poll_event_immediate().ok().flatten()))
        {
            if let TuiEvent::Resize(w, h) = event {
                tui.resize(w, h, &mut app.rng);
                continue;
            }

            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
            ) {
                tui.message_list.handle_event(&event);
                continue;
            }

            if let Some(action) = core_action(&event) {
                should_quit |= workers.apply(update(&mut app, action), &mut tui);
                continue;
            }

            // The input line is disabled while a reply is pending.
            if app.is_loading {
                continue;
            }
            if let Some(InputEvent::Submit(text)) = tui.input.handle_event(&event) {
                tui.message_list.scroll_to_bottom();
                should_quit |= workers.apply(update(&mut app, Action::Submit(text)), &mut tui);
            }
        }

        if should_quit {
            break;
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if workers.apply(update(&mut app, action), &mut tui) {
                should_quit = true;
            }
        }
        if should_quit {
            break;
        }

        let (w, h) = tui.size;
        tui.sync_background(&mut app, w, h, Instant::now());
        if tui.tick_rain(&mut app, Instant::now()) {
            needs_redraw = true;
        }

        let clock = Local::now().timestamp();
        if clock != last_clock {
            last_clock = clock;
            needs_redraw = true;
        }
    }

    info!("Session {} ended", app.session_id);
    ratatui::restore();
    Ok(())
}
