//! # Core Application Logic
//!
//! Bloby's business logic. It knows nothing about any specific UI technology
//! or transport.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • commands, animation  │
//!                    │                         │
//!                    │  No UI. No network.     │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    Chat    │      │  Persist / │
//!     │  Adapter   │      │   client   │      │   Export   │
//!     │ (ratatui)  │      │  (tokio)   │      │ (blocking) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`commands`]: Built-in command registry and dispatcher
//! - [`animation`]: The falling-glyph background model

pub mod action;
pub mod animation;
pub mod commands;
pub mod config;
pub mod export;
pub mod history;
pub mod log;
pub mod persist;
pub mod state;
pub mod theme;
