//! # Command Registry
//!
//! Resolves one submitted line into either a local built-in command, a canned
//! reply, or a chat query for the remote collaborator.
//!
//! ```text
//! input ──► resolve() ──► Dispatch::Local { command, args } ──► execute() ──► Outcome
//!                     ├─► Dispatch::Canned(reply)
//!                     └─► Dispatch::Chat(query)
//! ```
//!
//! Commands are a closed enum: adding one means adding a variant, and the
//! compiler points at every match that needs a new arm. Handlers never do I/O;
//! anything with side effects (export, theme, background) is returned as an
//! `Outcome` for `core::action::update` to apply.

pub mod ascii;
pub mod calc;
pub mod fun;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;

use crate::core::history::CommandHistory;
use crate::core::theme::Theme;

/// Reply given locally when someone asks who built the assistant.
pub const CANNED_CREATOR_REPLY: &str = "I'm Bloby, a terminal assistant built by the Bloby \
    team on top of the Groq API, running Meta's Llama 3.3 70B model.";

/// Substrings (lowercase) that route to `CANNED_CREATOR_REPLY` instead of the network.
///
/// This is a plain substring heuristic; it will also match sentences that
/// merely contain one of these phrases.
const CREATOR_PHRASES: &[&str] = &[
    "who made you",
    "who created you",
    "who built you",
    "who developed you",
    "who programmed you",
    "who is your creator",
    "kdo tě vytvořil",
    "kdo tě udělal",
    "kdo tě naprogramoval",
    "kdo je tvůj tvůrce",
];

const BACKGROUND_OPTIONS: &str = "on, off, toggle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    History,
    Theme,
    Background,
    Export,
    Calc,
    Roll,
    Flip,
    Joke,
    Quote,
    Fortune,
    Ascii,
    Echo,
    Date,
    Whoami,
    About,
}

impl Command {
    pub const ALL: [Command; 17] = [
        Command::Help,
        Command::Clear,
        Command::History,
        Command::Theme,
        Command::Background,
        Command::Export,
        Command::Calc,
        Command::Roll,
        Command::Flip,
        Command::Joke,
        Command::Quote,
        Command::Fortune,
        Command::Ascii,
        Command::Echo,
        Command::Date,
        Command::Whoami,
        Command::About,
    ];

    /// Case-insensitive lookup by name or alias.
    pub fn lookup(token: &str) -> Option<Command> {
        let token = token.to_lowercase();
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.names().contains(&token.as_str()))
    }

    /// Primary name first, then aliases.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Command::Help => &["help"],
            Command::Clear => &["clear", "cls"],
            Command::History => &["history"],
            Command::Theme => &["theme"],
            Command::Background => &["background", "bg"],
            Command::Export => &["export"],
            Command::Calc => &["calc"],
            Command::Roll => &["roll", "dice"],
            Command::Flip => &["flip", "coin"],
            Command::Joke => &["joke"],
            Command::Quote => &["quote"],
            Command::Fortune => &["fortune"],
            Command::Ascii => &["ascii"],
            Command::Echo => &["echo"],
            Command::Date => &["date", "time"],
            Command::Whoami => &["whoami"],
            Command::About => &["about"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    fn usage(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Clear => "clear",
            Command::History => "history",
            Command::Theme => "theme <green|amber|blue|matrix|pink>",
            Command::Background => "background <on|off|toggle>",
            Command::Export => "export",
            Command::Calc => "calc <expression>",
            Command::Roll => "roll [sides]",
            Command::Flip => "flip",
            Command::Joke => "joke",
            Command::Quote => "quote",
            Command::Fortune => "fortune",
            Command::Ascii => "ascii <text>",
            Command::Echo => "echo <text>",
            Command::Date => "date",
            Command::Whoami => "whoami",
            Command::About => "about",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Command::Help => "Show this help message",
            Command::Clear => "Clear the terminal",
            Command::History => "Show command history",
            Command::Theme => "Switch the color theme",
            Command::Background => "Show or hide the rain animation (alias: bg)",
            Command::Export => "Save the transcript to a text file",
            Command::Calc => "Evaluate arithmetic: + - * / % ( )",
            Command::Roll => "Roll a die (default 6 sides)",
            Command::Flip => "Flip a coin",
            Command::Joke => "Tell a programming joke",
            Command::Quote => "Show a quote",
            Command::Fortune => "Open a fortune cookie",
            Command::Ascii => "Render text as a banner (max 10 chars)",
            Command::Echo => "Print text back",
            Command::Date => "Show the current date and time",
            Command::Whoami => "Show operator and session",
            Command::About => "About this terminal",
        }
    }
}

/// Where a submitted line goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Local { command: Command, args: String },
    Canned(&'static str),
    Chat(String),
}

/// Splits `input` into a command token and the remaining argument text, then
/// decides where it goes. `input` is expected trimmed and non-empty.
pub fn resolve(input: &str) -> Dispatch {
    let input = input.trim();
    let (token, args) = match input.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (input, ""),
    };

    if let Some(command) = Command::lookup(token) {
        return Dispatch::Local {
            command,
            args: args.to_string(),
        };
    }

    // Plain substring match, so "who created you a problem" also hits.
    let lowered = input.to_lowercase();
    if CREATOR_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Dispatch::Canned(CANNED_CREATOR_REPLY);
    }

    Dispatch::Chat(input.to_string())
}

/// What a local command asks the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Notice(String),
    SetTheme(Theme),
    SetBackground(bool),
    Clear,
    Export,
}

/// Read-only view of the session plus the random source, handed to handlers.
pub struct CommandContext<'a> {
    pub history: &'a CommandHistory,
    pub theme: Theme,
    pub background_visible: bool,
    pub session_id: &'a str,
    pub model_name: &'a str,
    pub now: DateTime<Local>,
    pub rng: &'a mut StdRng,
}

/// Runs a local command. Never fails: bad input becomes a notice.
pub fn execute(command: Command, args: &str, ctx: &mut CommandContext<'_>) -> Outcome {
    match command {
        Command::Help => Outcome::Notice(help_text()),
        Command::Clear => Outcome::Clear,
        Command::History => Outcome::Notice(history_text(ctx.history)),
        Command::Theme => theme(args),
        Command::Background => background(args, ctx.background_visible),
        Command::Export => Outcome::Export,
        Command::Calc => Outcome::Notice(calculate(args)),
        Command::Roll => {
            let sides = parse_sides(args);
            let value = fun::roll(sides, ctx.rng);
            Outcome::Notice(format!("🎲 Rolled d{sides}: {value}"))
        }
        Command::Flip => {
            let side = if fun::flip(ctx.rng) { "Heads" } else { "Tails" };
            Outcome::Notice(format!("🪙 {side}!"))
        }
        Command::Joke => Outcome::Notice(fun::pick(fun::JOKES, ctx.rng).to_string()),
        Command::Quote => Outcome::Notice(fun::pick(fun::QUOTES, ctx.rng).to_string()),
        Command::Fortune => Outcome::Notice(format!(
            "🥠 {}",
            fun::pick(fun::FORTUNES, ctx.rng)
        )),
        Command::Ascii if args.is_empty() => usage(command),
        Command::Ascii => Outcome::Notice(ascii::render(&ascii::truncate(args))),
        Command::Echo if args.is_empty() => usage(command),
        Command::Echo => Outcome::Notice(args.to_string()),
        Command::Date => Outcome::Notice(ctx.now.format("%A, %d.%m.%Y %H:%M:%S").to_string()),
        Command::Whoami => Outcome::Notice(format!(
            "operator@bloby (session {})",
            ctx.session_id
        )),
        Command::About => Outcome::Notice(format!(
            "BLOBY TERMINAL v{}\nModel: {}\nTheme: {}",
            env!("CARGO_PKG_VERSION"),
            ctx.model_name,
            ctx.theme
        )),
    }
}

fn usage(command: Command) -> Outcome {
    Outcome::Notice(format!("Usage: {}", command.usage()))
}

/// Missing, non-numeric or zero sides fall back to a six-sided die.
fn parse_sides(args: &str) -> u32 {
    args.split_whitespace()
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(6)
}

fn theme(args: &str) -> Outcome {
    if args.is_empty() {
        return Outcome::Notice(format!(
            "Usage: {}\nAvailable themes: {}",
            Command::Theme.usage(),
            Theme::options()
        ));
    }
    match args.parse::<Theme>() {
        Ok(theme) => Outcome::SetTheme(theme),
        Err(_) => Outcome::Notice(format!(
            "Unknown theme '{}'. Available themes: {}",
            args,
            Theme::options()
        )),
    }
}

fn background(args: &str, visible: bool) -> Outcome {
    match args.to_lowercase().as_str() {
        "" => Outcome::Notice(format!(
            "Usage: {}",
            Command::Background.usage()
        )),
        "on" | "show" => Outcome::SetBackground(true),
        "off" | "hide" => Outcome::SetBackground(false),
        "toggle" => Outcome::SetBackground(!visible),
        other => Outcome::Notice(format!(
            "Unknown option '{other}'. Valid options: {BACKGROUND_OPTIONS}"
        )),
    }
}

fn calculate(args: &str) -> String {
    if args.is_empty() {
        return format!("Usage: {}", Command::Calc.usage());
    }
    match calc::evaluate(args) {
        Ok(value) => format!("{} = {}", args, calc::format_number(value)),
        Err(e) => format!("Error: {e}"),
    }
}

fn history_text(history: &CommandHistory) -> String {
    if history.is_empty() {
        return "No command history yet.".to_string();
    }
    let lines: Vec<String> = history
        .entries()
        .iter()
        .enumerate()
        .map(|(i, cmd)| format!("  {}. {}", i + 1, cmd))
        .collect();
    format!("Command history:\n{}", lines.join("\n"))
}

fn help_text() -> String {
    let mut text = String::from("Available commands:\n");
    for command in Command::ALL {
        text.push_str(&format!("  {:<28} - {}\n", command.usage(), command.summary()));
    }
    text.push_str(
        "\nAnything else is sent to the AI.\n\
         \nKeyboard shortcuts:\n\
         \x20 ↑/↓      - Navigate command history\n\
         \x20 PgUp/PgDn - Scroll the transcript\n\
         \x20 F2       - Cycle theme\n\
         \x20 Ctrl+B   - Toggle background animation\n\
         \x20 Ctrl+L   - Clear terminal\n\
         \x20 Ctrl+C   - Cancel current input\n\
         \x20 Esc      - Quit",
    );
    text
}

/// Notice appended after a theme change.
pub fn theme_notice(theme: Theme) -> String {
    format!("Theme changed to {theme}.")
}

/// Notice appended after the background is shown or hidden.
pub fn background_notice(visible: bool) -> String {
    if visible {
        "Background animation enabled.".to_string()
    } else {
        "Background animation disabled.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    struct Fixture {
        history: CommandHistory,
        rng: StdRng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                history: CommandHistory::new(),
                rng: StdRng::seed_from_u64(3),
            }
        }

        fn run(&mut self, input: &str) -> Outcome {
            let Dispatch::Local { command, args } = resolve(input) else {
                panic!("expected a local command for {input:?}");
            };
            let mut ctx = CommandContext {
                history: &self.history,
                theme: Theme::Green,
                background_visible: true,
                session_id: "test-session",
                model_name: "test-model",
                now: Local::now(),
                rng: &mut self.rng,
            };
            execute(command, &args, &mut ctx)
        }

        fn notice(&mut self, input: &str) -> String {
            match self.run(input) {
                Outcome::Notice(text) => text,
                other => panic!("expected notice for {input:?}, got {other:?}"),
            }
        }
    }

    fn rolled_value(notice: &str) -> u32 {
        notice.rsplit(' ').next().unwrap().parse().unwrap()
    }

    #[test]
    fn test_every_name_and_alias_resolves_locally_in_any_case() {
        for command in Command::ALL {
            for name in command.names() {
                for variant in [name.to_string(), name.to_uppercase()] {
                    let input = format!("{variant} arg");
                    assert!(
                        matches!(resolve(&input), Dispatch::Local { command: c, .. } if c == command),
                        "{input} should resolve to {command:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_token_goes_to_chat_with_full_input() {
        assert_eq!(
            resolve("  what is rust?  "),
            Dispatch::Chat("what is rust?".to_string())
        );
        assert_eq!(
            resolve("helpme please"),
            Dispatch::Chat("helpme please".to_string())
        );
    }

    #[test]
    fn test_args_are_split_and_trimmed() {
        assert_eq!(
            resolve("CALC   2 + 2 "),
            Dispatch::Local {
                command: Command::Calc,
                args: "2 + 2".to_string()
            }
        );
        assert_eq!(
            resolve("help"),
            Dispatch::Local {
                command: Command::Help,
                args: String::new()
            }
        );
    }

    #[test]
    fn test_creator_question_is_answered_locally() {
        assert_eq!(
            resolve("Hey, WHO MADE YOU?"),
            Dispatch::Canned(CANNED_CREATOR_REPLY)
        );
        assert_eq!(
            resolve("Kdo tě vytvořil?"),
            Dispatch::Canned(CANNED_CREATOR_REPLY)
        );
    }

    #[test]
    fn test_creator_phrase_does_not_shadow_commands() {
        assert!(matches!(
            resolve("echo who made you"),
            Dispatch::Local {
                command: Command::Echo,
                ..
            }
        ));
    }

    #[test]
    fn test_roll_defaults_to_six() {
        let mut f = Fixture::new();
        for input in ["roll", "roll abc", "roll 0", "roll -5", "roll 99999999999999"] {
            for _ in 0..50 {
                let notice = f.notice(input);
                assert!(notice.contains("d6"), "{input}: {notice}");
                let value = rolled_value(&notice);
                assert!((1..=6).contains(&value));
            }
        }
    }

    #[test]
    fn test_roll_twenty() {
        let mut f = Fixture::new();
        for _ in 0..200 {
            let value = rolled_value(&f.notice("roll 20"));
            assert!((1..=20).contains(&value));
        }
    }

    #[test]
    fn test_calc_evaluates_and_rejects() {
        let mut f = Fixture::new();
        let ok = f.notice("calc 2 + 2 * 3");
        assert!(ok.contains('8'));
        assert!(!ok.starts_with("Error"));

        let bad = f.notice("calc alert(1)");
        assert!(bad.starts_with("Error:"), "{bad}");

        let zero = f.notice("calc 1/0");
        assert!(zero.starts_with("Error:"));

        assert_eq!(f.notice("calc"), "Usage: calc <expression>");
    }

    #[test]
    fn test_theme_command() {
        let mut f = Fixture::new();
        assert_eq!(f.run("theme amber"), Outcome::SetTheme(Theme::Amber));
        assert_eq!(f.run("THEME Pink"), Outcome::SetTheme(Theme::Pink));

        let unknown = f.notice("theme purple");
        assert!(unknown.contains("green, amber, blue, matrix, pink"));

        let usage = f.notice("theme");
        assert!(usage.starts_with("Usage:"));
    }

    #[test]
    fn test_background_command() {
        let mut f = Fixture::new();
        assert_eq!(f.run("bg off"), Outcome::SetBackground(false));
        assert_eq!(f.run("background on"), Outcome::SetBackground(true));
        assert_eq!(f.run("bg toggle"), Outcome::SetBackground(false));
        assert!(f.notice("bg sideways").contains(BACKGROUND_OPTIONS));
        assert!(f.notice("bg").starts_with("Usage:"));
    }

    #[test]
    fn test_ascii_truncates_and_requires_text() {
        let mut f = Fixture::new();
        assert_eq!(f.notice("ascii"), "Usage: ascii <text>");
        let long = f.notice("ascii ABCDEFGHIJKLMNOP");
        assert_eq!(long, ascii::render("ABCDEFGHIJ"));
    }

    #[test]
    fn test_history_lists_entries() {
        let mut f = Fixture::new();
        assert_eq!(f.notice("history"), "No command history yet.");
        f.history.record("joke");
        f.history.record("history");
        let text = f.notice("history");
        assert!(text.contains("1. joke"));
        assert!(text.contains("2. history"));
    }

    #[test]
    fn test_help_mentions_every_command() {
        let mut f = Fixture::new();
        let help = f.notice("help");
        for command in Command::ALL {
            assert!(help.contains(command.name()), "help is missing {command:?}");
        }
    }

    #[test]
    fn test_clear_and_export_outcomes() {
        let mut f = Fixture::new();
        assert_eq!(f.run("clear"), Outcome::Clear);
        assert_eq!(f.run("CLS"), Outcome::Clear);
        assert_eq!(f.run("export"), Outcome::Export);
    }

    #[test]
    fn test_echo() {
        let mut f = Fixture::new();
        assert_eq!(f.notice("echo  hello   world "), "hello   world");
        assert_eq!(f.notice("echo"), "Usage: echo <text>");
    }
}
