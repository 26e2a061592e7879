//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.bloby/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chat::groq::{
    DEFAULT_GROQ_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, GroqOptions,
};
use crate::core::animation::DEFAULT_CELL_WIDTH;
use crate::core::persist;
use crate::core::theme::Theme;

/// Which chat collaborator the terminal talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Call the Groq API directly.
    #[default]
    Groq,
    /// Go through a `bloby relay` server.
    Relay,
}

impl Backend {
    fn parse(value: &str) -> Option<Backend> {
        match value.trim().to_lowercase().as_str() {
            "groq" => Some(Backend::Groq),
            "relay" => Some(Backend::Relay),
            _ => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Groq => f.write_str("groq"),
            Backend::Relay => f.write_str("relay"),
        }
    }
}

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BlobyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub groq: GroqConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub theme: Option<Theme>,
    pub background: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub backend: Option<Backend>,
    pub relay_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RelayConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PersistenceConfig {
    pub enabled: Option<bool>,
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExportConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AnimationConfig {
    pub cell_width: Option<u16>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_RELAY_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787/chat";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: Backend,
    pub theme: Theme,
    pub background: bool,
    pub relay_url: String,
    pub relay_bind: String,
    pub groq_api_key: Option<String>,
    pub groq: GroqOptions,
    /// `None` when persistence is disabled.
    pub persist_path: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub cell_width: u16,
}

/// Values given on the command line. `None` means not specified.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub backend: Option<Backend>,
    pub theme: Option<Theme>,
    pub no_background: bool,
    pub relay_bind: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.bloby`.
pub fn bloby_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".bloby"))
}

/// Returns the path to `~/.bloby/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    bloby_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.bloby/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BlobyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BlobyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BlobyConfig::default());
        }
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<BlobyConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(BlobyConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BlobyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Bloby Terminal Configuration
# Every setting is optional. Anything left out uses the built-in default.
# Override order: defaults → this file → env vars → CLI flags.

# [general]
# theme = "green"                    # green, amber, blue, matrix, pink
# background = true                  # falling-glyph animation

# [chat]
# backend = "groq"                   # "groq" (direct) or "relay"; env BLOBY_BACKEND
# relay_url = "http://127.0.0.1:8787/chat"   # env BLOBY_RELAY_URL

# [groq]
# api_key = "gsk_..."                # Or set GROQ_API_KEY env var
# base_url = "https://api.groq.com/openai/v1"   # env GROQ_BASE_URL
# model = "llama-3.3-70b-versatile"  # env BLOBY_MODEL
# temperature = 0.7
# max_tokens = 2048
# system_prompt = "You are a terminal assistant."
# system_prompt_file = "system.md"   # Path relative to ~/.bloby/

# [relay]
# bind = "127.0.0.1:8787"            # env BLOBY_RELAY_BIND

# [persistence]
# enabled = true
# path = "/home/me/.bloby/messages.jsonl"

# [export]
# dir = "."                          # where `export` writes transcripts

# [animation]
# cell_width = 2                     # terminal columns per glyph
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve against the process environment.
pub fn resolve(config: &BlobyConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Collapses defaults → config file → env vars → CLI. `env` looks up one
/// variable; blank values count as unset.
pub fn resolve_with_env<F>(config: &BlobyConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    // Backend: CLI → env → config → default
    let backend = cli
        .backend
        .or_else(|| {
            env("BLOBY_BACKEND").and_then(|v| {
                let parsed = Backend::parse(&v);
                if parsed.is_none() {
                    warn!("Ignoring unknown BLOBY_BACKEND value: {}", v);
                }
                parsed
            })
        })
        .or(config.chat.backend)
        .unwrap_or_default();

    let theme = cli.theme.or(config.general.theme).unwrap_or_default();
    let background = !cli.no_background && config.general.background.unwrap_or(true);

    let relay_url = env("BLOBY_RELAY_URL")
        .or_else(|| config.chat.relay_url.clone())
        .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());

    let relay_bind = cli
        .relay_bind
        .clone()
        .or_else(|| env("BLOBY_RELAY_BIND"))
        .or_else(|| config.relay.bind.clone())
        .unwrap_or_else(|| DEFAULT_RELAY_BIND.to_string());

    let groq_api_key = env("GROQ_API_KEY").or_else(|| config.groq.api_key.clone());

    let groq = GroqOptions {
        base_url: env("GROQ_BASE_URL")
            .or_else(|| config.groq.base_url.clone())
            .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
        model: env("BLOBY_MODEL")
            .or_else(|| config.groq.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        temperature: config.groq.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: config.groq.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        system_prompt: resolve_system_prompt(config, bloby_dir().as_deref()),
    };

    let persist_path = if config.persistence.enabled.unwrap_or(true) {
        config
            .persistence
            .path
            .as_ref()
            .map(PathBuf::from)
            .or_else(persist::default_path)
    } else {
        None
    };

    let export_dir = config
        .export
        .dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    ResolvedConfig {
        backend,
        theme,
        background,
        relay_url,
        relay_bind,
        groq_api_key,
        groq,
        persist_path,
        export_dir,
        cell_width: config
            .animation
            .cell_width
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_CELL_WIDTH),
    }
}

/// Resolves the system prompt: inline wins over file, both win over default.
fn resolve_system_prompt(config: &BlobyConfig, base_dir: Option<&Path>) -> String {
    if let Some(ref prompt) = config.groq.system_prompt {
        return prompt.clone();
    }

    // Try loading from system_prompt_file (relative to ~/.bloby/)
    if let (Some(file), Some(base)) = (config.groq.system_prompt_file.as_ref(), base_dir) {
        let prompt_path = base.join(file);
        match fs::read_to_string(&prompt_path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded system prompt from {}", prompt_path.display());
                    return trimmed;
                }
                warn!("System prompt file is empty: {}", prompt_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read system prompt file {}: {}",
                    prompt_path.display(),
                    e
                );
            }
        }
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}
