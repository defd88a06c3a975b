//! Pixel <-> square mapping
//!
//! The board is drawn inside a border of fixed width. The mapper and the
//! renderer both go through [`BoardLayout`], so a click always selects the
//! square that was drawn under the cursor.

use shakmaty::{Color, File, Rank, Square};

/// A point in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Half-open containment: left/top edges inside, right/bottom outside
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// a1 bottom-left, files a..h left to right, rank 8 on top
    WhiteBottom,
    /// h8 bottom-left, files h..a left to right, rank 1 on top
    BlackBottom,
}

impl Orientation {
    /// The orientation that puts `side`'s pieces at the bottom of the window
    pub fn for_side(side: Color) -> Self {
        match side {
            Color::White => Orientation::WhiteBottom,
            Color::Black => Orientation::BlackBottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub board_size: f32,
    pub border: f32,
    pub orientation: Orientation,
}

impl BoardLayout {
    pub fn new(board_size: f32, border: f32, orientation: Orientation) -> Self {
        Self {
            board_size,
            border,
            orientation,
        }
    }

    pub fn square_size(&self) -> f32 {
        self.board_size / 8.0
    }

    /// Width (and height) of the whole window, border included
    pub fn window_size(&self) -> f32 {
        self.board_size + 2.0 * self.border
    }

    /// The square under `p`, or `None` in the border or outside the window
    pub fn square_at(&self, p: Point) -> Option<Square> {
        let x = p.x - self.border;
        let y = p.y - self.border;
        if x < 0.0 || y < 0.0 || x >= self.board_size || y >= self.board_size {
            return None;
        }

        let size = self.square_size();
        let col = ((x / size) as u32).min(7);
        let row = ((y / size) as u32).min(7);
        Some(self.square_in_cell(col, row))
    }

    /// Pixel rectangle the square is drawn in
    pub fn square_rect(&self, square: Square) -> Rect {
        let (col, row) = self.cell_of(square);
        let size = self.square_size();
        Rect {
            x: self.border + col as f32 * size,
            y: self.border + row as f32 * size,
            w: size,
            h: size,
        }
    }

    /// Square drawn at screen column `col`, row `row` (both 0..8, from top-left)
    pub fn square_in_cell(&self, col: u32, row: u32) -> Square {
        let (file, rank) = match self.orientation {
            Orientation::WhiteBottom => (col, 7 - row),
            Orientation::BlackBottom => (7 - col, row),
        };
        Square::from_coords(File::new(file), Rank::new(rank))
    }

    /// Screen `(col, row)` of a square
    pub fn cell_of(&self, square: Square) -> (u32, u32) {
        let file = u32::from(square.file());
        let rank = u32::from(square.rank());
        match self.orientation {
            Orientation::WhiteBottom => (file, 7 - rank),
            Orientation::BlackBottom => (7 - file, rank),
        }
    }

    /// File letter shown above and below screen column `col`
    pub fn file_label(&self, col: u32) -> char {
        self.square_in_cell(col, 0).file().char()
    }

    /// Rank digit shown left and right of screen row `row`
    pub fn rank_label(&self, row: u32) -> char {
        self.square_in_cell(0, row).rank().char()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(orientation: Orientation) -> BoardLayout {
        BoardLayout::new(800.0, 50.0, orientation)
    }

    #[test]
    fn test_border_maps_to_none() {
        for orientation in [Orientation::WhiteBottom, Orientation::BlackBottom] {
            let layout = layout(orientation);
            let edge = layout.window_size();
            for offset in [0.0, 10.0, 25.0, 49.9] {
                for along in [0.0, 60.0, 450.0, 899.0] {
                    assert_eq!(layout.square_at(Point::new(offset, along)), None);
                    assert_eq!(layout.square_at(Point::new(along, offset)), None);
                    let far = edge - layout.border + offset;
                    assert_eq!(layout.square_at(Point::new(far, along)), None);
                    assert_eq!(layout.square_at(Point::new(along, far)), None);
                }
            }
            assert_eq!(layout.square_at(Point::new(-5.0, 400.0)), None);
            assert_eq!(layout.square_at(Point::new(850.0, 400.0)), None);
        }
    }

    #[test]
    fn test_round_trip_contains_point() {
        for orientation in [Orientation::WhiteBottom, Orientation::BlackBottom] {
            let layout = layout(orientation);
            let mut y = 50.0;
            while y < 850.0 {
                let mut x = 50.0;
                while x < 850.0 {
                    let p = Point::new(x, y);
                    let square = layout.square_at(p).unwrap();
                    assert!(layout.square_rect(square).contains(p), "{:?} -> {}", p, square);
                    x += 7.3;
                }
                y += 7.3;
            }
        }
    }

    #[test]
    fn test_white_bottom_corners() {
        let layout = layout(Orientation::WhiteBottom);
        assert_eq!(layout.square_at(Point::new(60.0, 840.0)), Some(Square::A1));
        assert_eq!(layout.square_at(Point::new(840.0, 60.0)), Some(Square::H8));
        assert_eq!(layout.file_label(0), 'a');
        assert_eq!(layout.rank_label(0), '8');
    }

    #[test]
    fn test_black_bottom_corners() {
        let layout = layout(Orientation::BlackBottom);
        assert_eq!(layout.square_at(Point::new(60.0, 60.0)), Some(Square::H1));
        assert_eq!(layout.square_at(Point::new(840.0, 840.0)), Some(Square::A8));
        assert_eq!(layout.file_label(0), 'h');
        assert_eq!(layout.rank_label(0), '1');
    }

    #[test]
    fn test_every_square_has_a_distinct_cell() {
        let layout = layout(Orientation::BlackBottom);
        let mut seen = std::collections::HashSet::new();
        for square in Square::ALL {
            let (col, row) = layout.cell_of(square);
            assert_eq!(layout.square_in_cell(col, row), square);
            assert!(seen.insert((col, row)));
        }
    }

    #[test]
    fn test_orientation_for_side() {
        assert_eq!(Orientation::for_side(Color::White), Orientation::WhiteBottom);
        assert_eq!(Orientation::for_side(Color::Black), Orientation::BlackBottom);
    }
}
