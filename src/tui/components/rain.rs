//! # Rain Layer
//!
//! Paints a `RainField` into the frame buffer as the bottom layer. Every
//! visible cell becomes one glyph whose colour is the theme's glow hue and
//! saturation at the cell's lightness, blended over black by the cell's
//! alpha. Empty cells are left untouched.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::core::animation::RainField;
use crate::core::theme::Theme;

pub struct RainLayer<'a> {
    pub field: &'a RainField,
    pub theme: Theme,
}

impl Widget for RainLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let glow = self.theme.glow();
        let cell_width = self.field.cell_width();
        let rows = (self.field.height()).min(area.height) as usize;

        for col in 0..self.field.columns() {
            let x = area.x.saturating_add(col as u16 * cell_width);
            if x >= area.right() {
                break;
            }
            for row in 0..rows {
                let Some(cell) = self.field.cell(col, row) else {
                    continue;
                };
                if !cell.is_visible() {
                    continue;
                }
                let (r, g, b) = glow.with_lightness(cell.lightness).to_rgb_over_black(cell.alpha);
                let y = area.y + row as u16;
                if let Some(target) = buf.cell_mut((x, y)) {
                    target
                        .set_char(cell.glyph)
                        .set_style(Style::default().fg(Color::Rgb(r, g, b)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::theme::Hsl;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn ticked_field(width: u16, height: u16, ticks: usize) -> RainField {
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = RainField::new(width, height, 2, &mut rng);
        for _ in 0..ticks {
            field.tick(Theme::Green.glow(), &mut rng);
        }
        field
    }

    fn painted_columns(buf: &Buffer) -> Vec<u16> {
        let area = buf.area;
        let mut cols = Vec::new();
        for y in 0..area.height {
            for x in 0..area.width {
                if buf[(x, y)].symbol() != " " && !cols.contains(&x) {
                    cols.push(x);
                }
            }
        }
        cols
    }

    #[test]
    fn test_glyphs_land_on_cell_boundaries() {
        let field = ticked_field(20, 10, 5);
        let mut terminal = Terminal::new(TestBackend::new(20, 10)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    RainLayer {
                        field: &field,
                        theme: Theme::Green,
                    },
                    f.area(),
                )
            })
            .unwrap();

        let cols = painted_columns(terminal.backend().buffer());
        assert!(!cols.is_empty());
        assert!(cols.iter().all(|x| x % 2 == 0));
    }

    #[test]
    fn test_colour_follows_theme() {
        let field = ticked_field(2, 5, 1);
        let mut terminal = Terminal::new(TestBackend::new(2, 5)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    RainLayer {
                        field: &field,
                        theme: Theme::Amber,
                    },
                    f.area(),
                )
            })
            .unwrap();

        let head = field.cell(0, 1).unwrap();
        let expected = Theme::Amber
            .glow()
            .with_lightness(head.lightness)
            .to_rgb_over_black(head.alpha);
        let cell = &terminal.backend().buffer()[(0, 1)];
        assert_eq!(cell.fg, Color::Rgb(expected.0, expected.1, expected.2));
        let green = Hsl::new(120.0, 100.0, head.lightness).to_rgb_over_black(head.alpha);
        assert_ne!(cell.fg, Color::Rgb(green.0, green.1, green.2));
    }

    #[test]
    fn test_smaller_area_is_clipped() {
        let field = ticked_field(40, 20, 10);
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(
                    RainLayer {
                        field: &field,
                        theme: Theme::Green,
                    },
                    f.area(),
                )
            })
            .unwrap();
        // Drawing past the buffer would have panicked.
        assert_eq!(terminal.backend().buffer().area.width, 10);
    }
}
