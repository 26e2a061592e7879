//! Canned texts for the decorative commands.

use rand::Rng;
use rand::seq::IndexedRandom;

pub const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 types of people: those who understand binary and those who don't.",
    "A SQL query walks into a bar, goes up to two tables and asks: \"Can I join you?\"",
    "Why did the developer go broke? Because he used up all his cache.",
    "I would tell you a UDP joke, but you might not get it.",
    "Debugging: being the detective in a crime movie where you are also the murderer.",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
    "Proč programátoři nemají rádi přírodu? Má příliš mnoho bugů.",
];

pub const QUOTES: &[&str] = &[
    "\"Talk is cheap. Show me the code.\" - Linus Torvalds",
    "\"Programs must be written for people to read, and only incidentally for machines to execute.\" - Harold Abelson",
    "\"Simplicity is prerequisite for reliability.\" - Edsger W. Dijkstra",
    "\"Premature optimization is the root of all evil.\" - Donald Knuth",
    "\"The best way to predict the future is to invent it.\" - Alan Kay",
    "\"First, solve the problem. Then, write the code.\" - John Johnson",
    "\"Make it work, make it right, make it fast.\" - Kent Beck",
];

pub const FORTUNES: &[&str] = &[
    "A clean build is in your near future.",
    "Your next commit will pass CI on the first try.",
    "Beware of off-by-one errors in the coming week.",
    "The bug you seek is in the last place you will look.",
    "An unexpected merge conflict brings an opportunity to learn.",
    "You will soon refactor something you wrote a year ago, and wince.",
    "Fortune favors those who write tests.",
];

/// Picks one line uniformly.
pub fn pick<R: Rng + ?Sized>(lines: &'static [&'static str], rng: &mut R) -> &'static str {
    lines.choose(rng).copied().unwrap_or("")
}

/// `true` is heads.
pub fn flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.random_bool(0.5)
}

/// Uniform roll in `1..=sides`.
pub fn roll<R: Rng + ?Sized>(sides: u32, rng: &mut R) -> u32 {
    rng.random_range(1..=sides.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_pick_returns_member() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(JOKES.contains(&pick(JOKES, &mut rng)));
            assert!(QUOTES.contains(&pick(QUOTES, &mut rng)));
            assert!(FORTUNES.contains(&pick(FORTUNES, &mut rng)));
        }
    }

    #[test]
    fn test_roll_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let n = roll(20, &mut rng);
            assert!((1..=20).contains(&n));
        }
    }

    #[test]
    fn test_flip_produces_both_sides() {
        let mut rng = StdRng::seed_from_u64(1);
        let heads = (0..200).filter(|_| flip(&mut rng)).count();
        assert!(heads > 50 && heads < 150);
    }
}
