//! Board drawing
//!
//! Everything is redrawn each tick: border, squares, pieces, the selection
//! outline and the coordinate labels.

use chess_duel_core::config::{DisplayConfig, Rgb};
use chess_duel_core::{BoardLayout, Session};
use macroquad::color::{Color as Tint, WHITE};
use macroquad::math::vec2;
use macroquad::shapes::{draw_rectangle, draw_rectangle_lines};
use macroquad::text::{draw_text, measure_text};
use macroquad::texture::{draw_texture_ex, DrawTextureParams};
use macroquad::window::clear_background;
use shakmaty::Square;

use crate::sprites::SpriteSet;

struct Palette {
    light: Tint,
    dark: Tint,
    border: Tint,
    label: Tint,
    highlight: Tint,
}

fn tint(rgb: Rgb) -> Tint {
    Tint::from_rgba(rgb.0, rgb.1, rgb.2, 255)
}

/// a1 is dark
pub fn is_dark(square: Square) -> bool {
    (u32::from(square.file()) + u32::from(square.rank())) % 2 == 0
}

pub struct Renderer {
    layout: BoardLayout,
    palette: Palette,
    highlight_width: f32,
    label_size: u16,
    sprites: SpriteSet,
}

impl Renderer {
    pub fn new(display: &DisplayConfig, layout: BoardLayout, sprites: SpriteSet) -> Self {
        Self {
            layout,
            palette: Palette {
                light: tint(display.light_square),
                dark: tint(display.dark_square),
                border: tint(display.border_color),
                label: tint(display.label_color),
                highlight: tint(display.highlight),
            },
            highlight_width: display.highlight_width,
            label_size: display.label_size,
            sprites,
        }
    }

    pub fn draw(&self, session: &Session) {
        // The border is whatever the squares don't cover
        clear_background(self.palette.border);

        for square in Square::ALL {
            let rect = self.layout.square_rect(square);
            let fill = if is_dark(square) {
                self.palette.dark
            } else {
                self.palette.light
            };
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, fill);

            let texture = session.board().piece_at(square).and_then(|p| self.sprites.get(p));
            if let Some(texture) = texture {
                draw_texture_ex(
                    texture,
                    rect.x,
                    rect.y,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(vec2(rect.w, rect.h)),
                        ..Default::default()
                    },
                );
            }
        }

        if let Some(square) = session.selected() {
            let rect = self.layout.square_rect(square);
            draw_rectangle_lines(
                rect.x,
                rect.y,
                rect.w,
                rect.h,
                self.highlight_width,
                self.palette.highlight,
            );
        }

        self.draw_labels();
    }

    /// File letters above and below the board, rank digits left and right
    fn draw_labels(&self) {
        let size = self.layout.square_size();
        let border = self.layout.border;
        let near = border / 2.0;
        let far = border + self.layout.board_size + border / 2.0;

        for i in 0..8 {
            let along = border + i as f32 * size + size / 2.0;

            let file = self.layout.file_label(i).to_string();
            self.draw_centered(&file, along, near);
            self.draw_centered(&file, along, far);

            let rank = self.layout.rank_label(i).to_string();
            self.draw_centered(&rank, near, along);
            self.draw_centered(&rank, far, along);
        }
    }

    fn draw_centered(&self, text: &str, cx: f32, cy: f32) {
        let dims = measure_text(text, None, self.label_size, 1.0);
        draw_text(
            text,
            cx - dims.width / 2.0,
            cy + dims.offset_y / 2.0,
            f32::from(self.label_size),
            self.palette.label,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_colors() {
        assert!(is_dark(Square::A1));
        assert!(is_dark(Square::H8));
        assert!(!is_dark(Square::H1));
        assert!(!is_dark(Square::A8));
        assert!(!is_dark(Square::E4));
    }
}
