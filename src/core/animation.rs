//! # Rain Animation
//!
//! The falling-glyph background, as a pure model with no terminal types.
//!
//! The field keeps the previous frame in a grid of cells. Each tick fades the
//! whole grid a little instead of clearing it, then draws a bright head glyph
//! and a dimmer trail for every column. Fading is what leaves the trails
//! behind the heads.
//!
//! ```text
//! columns = width / cell_width
//! drops[i]  : current head row of column i (fractional)
//! speeds[i] : rows per tick, drawn once per column
//! ```

use std::time::{Duration, Instant};

use rand::Rng;

use crate::core::theme::Hsl;

/// Milliseconds between ticks (~30 fps).
pub const TICK_MS: u64 = 33;
/// Terminal columns per glyph cell.
pub const DEFAULT_CELL_WIDTH: u16 = 2;
/// Opacity of the black overlay painted over the previous frame each tick.
pub const FADE_ALPHA: f32 = 0.04;
/// Chance per tick that a column past the bottom restarts from the top.
pub const RESET_PROBABILITY: f64 = 0.025;
pub const MIN_SPEED: f32 = 0.3;
pub const MAX_SPEED: f32 = 0.8;
pub const TRAIL_LENGTH: usize = 8;

/// Cells dimmer than this are cleared.
const ALPHA_FLOOR: f32 = 0.02;
const HEAD_ALPHA: f32 = 0.9;

pub const GLYPHS: &str = "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝ0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ<>{}[]|\\/@#$%&*+=";

/// One grid cell of the persisted frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainCell {
    pub glyph: char,
    /// HSL lightness the glyph was drawn with.
    pub lightness: f32,
    /// Remaining opacity; 0 means empty.
    pub alpha: f32,
}

impl RainCell {
    const EMPTY: RainCell = RainCell {
        glyph: ' ',
        lightness: 0.0,
        alpha: 0.0,
    };

    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

#[derive(Debug, Clone)]
pub struct RainField {
    glyphs: Vec<char>,
    cell_width: u16,
    width: u16,
    height: u16,
    drops: Vec<f32>,
    speeds: Vec<f32>,
    cells: Vec<RainCell>,
}

impl RainField {
    pub fn new<R: Rng + ?Sized>(width: u16, height: u16, cell_width: u16, rng: &mut R) -> Self {
        let mut field = Self {
            glyphs: GLYPHS.chars().collect(),
            cell_width: cell_width.max(1),
            width: 0,
            height: 0,
            drops: Vec::new(),
            speeds: Vec::new(),
            cells: Vec::new(),
        };
        field.resize(width, height, rng);
        field
    }

    /// Rebuilds every column for a new viewport. Drop progress is discarded.
    pub fn resize<R: Rng + ?Sized>(&mut self, width: u16, height: u16, rng: &mut R) {
        self.width = width;
        self.height = height;
        let columns = (width / self.cell_width) as usize;
        self.drops = vec![1.0; columns];
        self.speeds = (0..columns)
            .map(|_| rng.random_range(MIN_SPEED..MAX_SPEED))
            .collect();
        self.cells = vec![RainCell::EMPTY; columns * height as usize];
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn drops(&self) -> &[f32] {
        &self.drops
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    /// The cell at grid column `col`, row `row`.
    pub fn cell(&self, col: usize, row: usize) -> Option<&RainCell> {
        if col >= self.columns() || row >= self.height as usize {
            return None;
        }
        self.cells.get(row * self.columns() + col)
    }

    /// Advances one frame. `glow` is read fresh every tick so a theme change
    /// shows up on the next frame.
    pub fn tick<R: Rng + ?Sized>(&mut self, glow: Hsl, rng: &mut R) {
        self.fade();

        let head_lightness = (glow.l + 20.0).min(80.0);
        for col in 0..self.columns() {
            let drop = self.drops[col];
            let head_row = drop.floor() as i64;

            let glyph = self.random_glyph(rng);
            self.paint(col, head_row, glyph, head_lightness, HEAD_ALPHA);

            if drop > 1.0 {
                for j in 1..=TRAIL_LENGTH {
                    let row = head_row - j as i64;
                    if row < 0 {
                        break;
                    }
                    let alpha = (1.0 - j as f32 / 10.0) * 0.4;
                    let lightness = (glow.l - j as f32 * 5.0).max(15.0);
                    let glyph = self.random_glyph(rng);
                    self.paint(col, row, glyph, lightness, alpha);
                }
            }

            if head_row > self.height as i64 && rng.random_bool(RESET_PROBABILITY) {
                self.drops[col] = 0.0;
            }
            self.drops[col] += self.speeds[col];
        }
    }

    fn fade(&mut self) {
        let keep = 1.0 - FADE_ALPHA;
        for cell in &mut self.cells {
            cell.alpha *= keep;
            if cell.alpha < ALPHA_FLOOR {
                *cell = RainCell::EMPTY;
            }
        }
    }

    /// Draws a glyph over whatever is in the cell (source-over blending).
    fn paint(&mut self, col: usize, row: i64, glyph: char, lightness: f32, alpha: f32) {
        if row < 0 || row >= self.height as i64 {
            return;
        }
        let idx = row as usize * self.columns() + col;
        if let Some(cell) = self.cells.get_mut(idx) {
            let blended = alpha + cell.alpha * (1.0 - alpha);
            *cell = RainCell {
                glyph,
                lightness,
                alpha: blended.min(1.0),
            };
        }
    }

    fn random_glyph<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.glyphs[rng.random_range(0..self.glyphs.len())]
    }
}

/// Schedules animation frames. A stopped ticker never fires.
#[derive(Debug, Clone, Default)]
pub struct RainTicker {
    next: Option<Instant>,
}

impl RainTicker {
    pub fn interval() -> Duration {
        Duration::from_millis(TICK_MS)
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + Self::interval());
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Time left until the next frame, or `None` when stopped.
    pub fn timeout(&self, now: Instant) -> Option<Duration> {
        self.next.map(|at| at.saturating_duration_since(now))
    }

    /// Returns true and schedules the following frame when a frame is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next {
            Some(at) if now >= at => {
                self.next = Some(now + Self::interval());
                true
            }
            _ => false,
        }
    }
}
