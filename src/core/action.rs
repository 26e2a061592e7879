//! # Actions
//!
//! Everything that can happen in Bloby becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The chat collaborator answers? That's `Action::ChatResolved(result)`.
//!
//! `update()` mutates the state for an action and returns the `Effect`s the
//! adapter must carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! This makes everything testable: feed actions, inspect state and effects.

use std::path::PathBuf;

use chrono::Local;
use log::{debug, info, warn};

use crate::chat::{ChatError, ChatRequest, HISTORY_LIMIT};
use crate::core::commands::{self, CommandContext, Dispatch, Outcome};
use crate::core::export;
use crate::core::log::{CLEARED_NOTICE, EntryKind};
use crate::core::persist::PersistRecord;
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    /// The operator pressed Enter with this raw input.
    Submit(String),
    /// Up arrow: recall an older input.
    HistoryOlder,
    /// Down arrow: recall a newer input.
    HistoryNewer,
    /// Ctrl+C: drop the current input and stop browsing history.
    CancelInput,
    /// Ctrl+L
    ClearLog,
    /// F2
    CycleTheme,
    /// Ctrl+B
    ToggleBackground,
    ChatResolved(Result<String, ChatError>),
    ExportFinished(Result<PathBuf, String>),
    Quit,
}

/// Side effects requested by `update`, carried out by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the input line's contents.
    FillInput(String),
    SpawnChat(ChatRequest),
    Persist(PersistRecord),
    Export { path: PathBuf, contents: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Submit(raw) => submit(app, &raw),
        // The input line is disabled while a reply is pending.
        Action::HistoryOlder | Action::HistoryNewer | Action::CancelInput if app.is_loading => {
            debug!("Ignoring input editing while a request is in flight");
            Vec::new()
        }
        Action::HistoryOlder => app
            .history
            .older()
            .map(|s| vec![Effect::FillInput(s.to_string())])
            .unwrap_or_default(),
        Action::HistoryNewer => app
            .history
            .newer()
            .map(|s| vec![Effect::FillInput(s.to_string())])
            .unwrap_or_default(),
        Action::CancelInput => {
            app.history.reset_cursor();
            vec![Effect::FillInput(String::new())]
        }
        Action::ClearLog => {
            app.log.reset(CLEARED_NOTICE);
            Vec::new()
        }
        Action::CycleTheme => {
            app.theme = app.theme.next();
            app.log
                .push(EntryKind::SystemNotice, commands::theme_notice(app.theme));
            Vec::new()
        }
        Action::ToggleBackground => {
            app.background_visible = !app.background_visible;
            app.log.push(
                EntryKind::SystemNotice,
                commands::background_notice(app.background_visible),
            );
            Vec::new()
        }
        Action::ChatResolved(result) => {
            app.is_loading = false;
            match result {
                Ok(reply) => {
                    info!("Chat reply received ({} bytes)", reply.len());
                    append(app, EntryKind::AssistantReply, reply)
                }
                Err(e) => {
                    warn!("Chat request failed: {}", e);
                    append(
                        app,
                        EntryKind::SystemNotice,
                        format!("Error: {}", e.user_message()),
                    )
                }
            }
        }
        Action::ExportFinished(result) => {
            let text = match result {
                Ok(path) => format!("Transcript saved to {}", path.display()),
                Err(e) => format!("Error: Failed to export transcript: {e}"),
            };
            append(app, EntryKind::SystemNotice, text)
        }
        Action::Quit => vec![Effect::Quit],
    }
}

fn submit(app: &mut App, raw: &str) -> Vec<Effect> {
    let input = raw.trim();
    if input.is_empty() {
        return Vec::new();
    }
    if app.is_loading {
        debug!("Ignoring submission while a request is in flight");
        return Vec::new();
    }

    app.history.record(input);
    let mut effects = append(app, EntryKind::UserInput, input.to_string());

    match commands::resolve(input) {
        Dispatch::Local { command, args } => {
            debug!("Local command: {} {:?}", command.name(), args);
            let now = Local::now();
            let outcome = {
                let mut ctx = CommandContext {
                    history: &app.history,
                    theme: app.theme,
                    background_visible: app.background_visible,
                    session_id: &app.session_id,
                    model_name: &app.model_name,
                    now,
                    rng: &mut app.rng,
                };
                commands::execute(command, &args, &mut ctx)
            };
            effects.extend(apply_outcome(app, outcome, now));
        }
        Dispatch::Canned(reply) => {
            effects.extend(append(app, EntryKind::AssistantReply, reply.to_string()));
        }
        Dispatch::Chat(query) => {
            // The entry just appended is this query; keep it out of the history.
            let history = app.log.chat_history(HISTORY_LIMIT, 1);
            info!("Dispatching chat query ({} history turns)", history.len());
            app.is_loading = true;
            effects.push(Effect::SpawnChat(ChatRequest::new(query, history)));
        }
    }
    effects
}

fn apply_outcome(app: &mut App, outcome: Outcome, now: chrono::DateTime<Local>) -> Vec<Effect> {
    match outcome {
        Outcome::Notice(text) => append(app, EntryKind::SystemNotice, text),
        Outcome::SetTheme(theme) => {
            app.theme = theme;
            append(app, EntryKind::SystemNotice, commands::theme_notice(theme))
        }
        Outcome::SetBackground(visible) => {
            app.background_visible = visible;
            append(
                app,
                EntryKind::SystemNotice,
                commands::background_notice(visible),
            )
        }
        Outcome::Clear => {
            app.log.reset(CLEARED_NOTICE);
            Vec::new()
        }
        Outcome::Export => vec![Effect::Export {
            path: app.export_dir.join(export::file_name(now)),
            contents: app.log.transcript(now),
        }],
    }
}

/// Appends an entry and, for conversation turns, asks for it to be persisted.
fn append(app: &mut App, kind: EntryKind, text: String) -> Vec<Effect> {
    let entry = app.log.push(kind, text);
    if !app.persist {
        return Vec::new();
    }
    PersistRecord::from_entry(&app.session_id, entry)
        .map(Effect::Persist)
        .into_iter()
        .collect()
}
