//! Block-letter banners for the `ascii` command.

pub const MAX_CHARS: usize = 10;
const ROWS: usize = 5;

type Glyph = [&'static str; ROWS];

const UNKNOWN: Glyph = [" ███ ", "█   █", "  ██ ", "     ", "  █  "];

fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        'A' => [" ███ ", "█   █", "█████", "█   █", "█   █"],
        'B' => ["████ ", "█   █", "████ ", "█   █", "████ "],
        'C' => [" ████", "█    ", "█    ", "█    ", " ████"],
        'D' => ["████ ", "█   █", "█   █", "█   █", "████ "],
        'E' => ["█████", "█    ", "████ ", "█    ", "█████"],
        'F' => ["█████", "█    ", "████ ", "█    ", "█    "],
        'G' => [" ████", "█    ", "█  ██", "█   █", " ████"],
        'H' => ["█   █", "█   █", "█████", "█   █", "█   █"],
        'I' => ["█████", "  █  ", "  █  ", "  █  ", "█████"],
        'J' => ["█████", "   █ ", "   █ ", "█  █ ", " ██  "],
        'K' => ["█   █", "█  █ ", "███  ", "█  █ ", "█   █"],
        'L' => ["█    ", "█    ", "█    ", "█    ", "█████"],
        'M' => ["█   █", "██ ██", "█ █ █", "█   █", "█   █"],
        'N' => ["█   █", "██  █", "█ █ █", "█  ██", "█   █"],
        'O' => [" ███ ", "█   █", "█   █", "█   █", " ███ "],
        'P' => ["████ ", "█   █", "████ ", "█    ", "█    "],
        'Q' => [" ███ ", "█   █", "█ █ █", "█  █ ", " ██ █"],
        'R' => ["████ ", "█   █", "████ ", "█  █ ", "█   █"],
        'S' => [" ████", "█    ", " ███ ", "    █", "████ "],
        'T' => ["█████", "  █  ", "  █  ", "  █  ", "  █  "],
        'U' => ["█   █", "█   █", "█   █", "█   █", " ███ "],
        'V' => ["█   █", "█   █", "█   █", " █ █ ", "  █  "],
        'W' => ["█   █", "█   █", "█ █ █", "██ ██", "█   █"],
        'X' => ["█   █", " █ █ ", "  █  ", " █ █ ", "█   █"],
        'Y' => ["█   █", " █ █ ", "  █  ", "  █  ", "  █  "],
        'Z' => ["█████", "   █ ", "  █  ", " █   ", "█████"],
        '0' => [" ███ ", "█  ██", "█ █ █", "██  █", " ███ "],
        '1' => ["  █  ", " ██  ", "  █  ", "  █  ", " ███ "],
        '2' => [" ███ ", "█   █", "  ██ ", " █   ", "█████"],
        '3' => ["████ ", "    █", " ███ ", "    █", "████ "],
        '4' => ["█   █", "█   █", "█████", "    █", "    █"],
        '5' => ["█████", "█    ", "████ ", "    █", "████ "],
        '6' => [" ███ ", "█    ", "████ ", "█   █", " ███ "],
        '7' => ["█████", "    █", "   █ ", "  █  ", "  █  "],
        '8' => [" ███ ", "█   █", " ███ ", "█   █", " ███ "],
        '9' => [" ███ ", "█   █", " ████", "    █", " ███ "],
        ' ' => ["   ", "   ", "   ", "   ", "   "],
        '!' => ["  █  ", "  █  ", "  █  ", "     ", "  █  "],
        '-' => ["     ", "     ", "█████", "     ", "     "],
        '.' => ["     ", "     ", "     ", "     ", "  █  "],
        _ => UNKNOWN,
    }
}

/// Keeps at most `MAX_CHARS` characters.
pub fn truncate(text: &str) -> String {
    text.chars().take(MAX_CHARS).collect()
}

/// Renders `text` (already truncated by the caller if needed) as five rows.
pub fn render(text: &str) -> String {
    let glyphs: Vec<Glyph> = text.chars().map(glyph).collect();
    (0..ROWS)
        .map(|row| {
            glyphs
                .iter()
                .map(|g| g[row])
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_has_five_rows() {
        let banner = render("HI");
        let rows: Vec<&str> = banner.lines().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], "█   █ █████");
        assert_eq!(rows[2], "█████   █");
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        assert_eq!(render("abc"), render("ABC"));
    }

    #[test]
    fn test_unknown_characters_use_placeholder() {
        assert_eq!(render("ž"), render("?"));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("hello world!"), "hello worl");
        assert_eq!(truncate("ěščřžýáíéú123"), "ěščřžýáíéú");
        assert_eq!(truncate("short"), "short");
    }
}
