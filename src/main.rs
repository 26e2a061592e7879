use bloby::core::config::{self, Backend, BlobyConfig, CliOverrides};
use bloby::core::theme::Theme;
use bloby::{chat, relay, tui};

use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bloby", about = "Retro AI terminal with glyph rain")]
struct Args {
    /// Chat backend to use (overrides config and BLOBY_BACKEND)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Colour theme to start with
    #[arg(short, long, value_enum)]
    theme: Option<Theme>,

    /// Start with the rain background hidden
    #[arg(long)]
    no_background: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP relay that forwards chat requests to Groq
    Relay {
        /// Address to listen on, e.g. 127.0.0.1:8787
        #[arg(long)]
        bind: Option<String>,
    },
}

fn load_or_default() -> BlobyConfig {
    match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring config file: {}", e);
            eprintln!("bloby: {e}, using defaults");
            BlobyConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match args.command {
        Some(Command::Relay { bind }) => {
            // The relay has no UI, so log to the terminal.
            let _ = TermLogger::init(
                LevelFilter::Info,
                log_config,
                TerminalMode::Stderr,
                ColorChoice::Auto,
            );

            let cli = CliOverrides {
                relay_bind: bind,
                ..CliOverrides::default()
            };
            let resolved = config::resolve(&load_or_default(), &cli);
            if resolved.groq_api_key.is_none() {
                log::warn!("GROQ_API_KEY is not set; every request will fail with 500");
            }
            let upstream = Arc::new(chat::GroqClient::new(
                resolved.groq_api_key.clone(),
                resolved.groq.clone(),
            ));
            relay::serve(&resolved.relay_bind, upstream).await
        }
        None => {
            // Initialize file logger - writes to bloby.log in current directory
            if let Ok(log_file) = File::create("bloby.log") {
                let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
            }

            let cli = CliOverrides {
                backend: args.backend,
                theme: args.theme,
                no_background: args.no_background,
                relay_bind: None,
            };
            let resolved = config::resolve(&load_or_default(), &cli);
            log::info!(
                "Bloby starting up with backend: {} (theme={}, background={})",
                resolved.backend,
                resolved.theme,
                resolved.background
            );

            tui::run(resolved)
        }
    }
}
