//! Plain-text transcript export.

use chrono::{DateTime, Local};

use crate::core::log::LogEntry;

const RULE_WIDTH: usize = 60;

/// `bloby-transcript-YYYY-MM-DD_HH-MM-SS.txt`
pub fn file_name(now: DateTime<Local>) -> String {
    format!("bloby-transcript-{}.txt", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Renders the log as text. Each line of an entry carries its time and tag so
/// multi-line replies stay attributable when grepped.
pub fn transcript(entries: &[LogEntry], now: DateTime<Local>) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str("BLOBY TERMINAL TRANSCRIPT\n");
    out.push_str(&format!("Exported: {}\n", now.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Entries: {}\n", entries.len()));
    out.push_str(&rule);
    out.push('\n');

    for entry in entries {
        let prefix = format!(
            "[{}] {}:",
            entry.created_at().format("%H:%M:%S"),
            entry.kind().tag()
        );
        for line in entry.text().lines() {
            if line.is_empty() {
                out.push_str(&prefix);
            } else {
                out.push_str(&format!("{prefix} {line}"));
            }
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log::{EntryKind, MessageLog};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(
            file_name(fixed_now()),
            "bloby-transcript-2024-03-09_14-05-07.txt"
        );
    }

    #[test]
    fn test_transcript_tags_every_line() {
        let mut log = MessageLog::new();
        log.reset("Terminal cleared.");
        log.push(EntryKind::UserInput, "hello");
        log.push(EntryKind::AssistantReply, "line one\nline two");

        let text = transcript(log.entries(), fixed_now());
        assert!(text.starts_with("BLOBY TERMINAL TRANSCRIPT\n"));
        assert!(text.contains("Exported: 2024-03-09 14:05:07"));
        assert!(text.contains("Entries: 3"));

        let tagged: Vec<&str> = text.lines().filter(|l| l.starts_with('[')).collect();
        assert_eq!(tagged.len(), 4);
        assert!(tagged[0].ends_with("SYSTEM: Terminal cleared."));
        assert!(tagged[1].ends_with("USER: hello"));
        assert!(tagged[2].ends_with("BLOBY: line one"));
        assert!(tagged[3].ends_with("BLOBY: line two"));
    }

    #[test]
    fn test_entries_are_separated_by_rule() {
        let mut log = MessageLog::new();
        log.reset("x");
        log.push(EntryKind::UserInput, "y");
        let text = transcript(log.entries(), fixed_now());
        let rules = text.lines().filter(|l| *l == "-".repeat(60)).count();
        assert_eq!(rules, 3);
    }
}
