//! # Themes
//!
//! The fixed set of named palettes. Each theme is defined by a single "glow"
//! colour in HSL; every other colour the UI needs is derived from it, so the
//! rain renderer and the text styles always agree.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Hue (degrees), saturation and lightness (percent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Same hue and saturation, different lightness.
    pub fn with_lightness(self, l: f32) -> Self {
        Self { l, ..self }
    }

    /// Converts to 8-bit RGB.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_byte(r), to_byte(g), to_byte(b))
    }

    /// RGB of this colour drawn over black with the given opacity.
    pub fn to_rgb_over_black(self, alpha: f32) -> (u8, u8, u8) {
        let (r, g, b) = self.to_rgb();
        let a = alpha.clamp(0.0, 1.0);
        let scale = |v: u8| (v as f32 * a).round() as u8;
        (scale(r), scale(g), scale(b))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Green,
    Amber,
    Blue,
    Matrix,
    Pink,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Green,
        Theme::Amber,
        Theme::Blue,
        Theme::Matrix,
        Theme::Pink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Green => "green",
            Theme::Amber => "amber",
            Theme::Blue => "blue",
            Theme::Matrix => "matrix",
            Theme::Pink => "pink",
        }
    }

    /// The glow colour that drives both the rain and the text palette.
    pub fn glow(self) -> Hsl {
        match self {
            Theme::Green => Hsl::new(120.0, 100.0, 50.0),
            Theme::Amber => Hsl::new(38.0, 100.0, 50.0),
            Theme::Blue => Hsl::new(200.0, 100.0, 55.0),
            Theme::Matrix => Hsl::new(135.0, 100.0, 40.0),
            Theme::Pink => Hsl::new(320.0, 100.0, 65.0),
        }
    }

    /// Main text colour.
    pub fn primary(self) -> Hsl {
        self.glow()
    }

    /// Secondary text (system notices, timestamps, borders).
    pub fn dim(self) -> Hsl {
        let glow = self.glow();
        glow.with_lightness((glow.l - 20.0).max(20.0))
    }

    /// Prompt colour, a little brighter than the body text.
    pub fn prompt(self) -> Hsl {
        let glow = self.glow();
        glow.with_lightness((glow.l + 15.0).min(85.0))
    }

    /// The theme after this one, wrapping around.
    pub fn next(self) -> Theme {
        let idx = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(idx + 1) % Theme::ALL.len()]
    }

    /// Comma-separated list of valid names, for usage notices.
    pub fn options() -> String {
        Theme::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| format!("unknown theme '{}'", s.trim()))
    }
}
