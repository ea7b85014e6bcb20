//! Core value types: tiles and their positions on the board.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

/// Shape printed on a tile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Shape {
    /// Circle.
    Circle,
    /// Four-pointed star.
    Star,
    /// Diamond.
    Diamond,
    /// Square.
    Square,
    /// Triangle.
    Triangle,
    /// Clover.
    Clover,
}

/// Color of a tile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Red.
    Red,
    /// Orange.
    Orange,
    /// Yellow.
    Yellow,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Purple.
    Purple,
}

/// A tile: one shape in one color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display("{color} {shape}")]
pub struct Piece {
    /// Shape of the tile.
    pub shape: Shape,
    /// Color of the tile.
    pub color: Color,
}

impl Piece {
    /// Creates a tile.
    pub fn new(shape: Shape, color: Color) -> Self {
        Self { shape, color }
    }

    /// Every distinct tile, color-major.
    pub fn all() -> impl Iterator<Item = Piece> {
        Color::iter().flat_map(|color| Shape::iter().map(move |shape| Piece::new(shape, color)))
    }

    /// Two tiles may touch when they share exactly one of shape or color.
    ///
    /// Identical tiles and tiles with nothing in common are both rejected.
    pub fn is_compatible(&self, other: &Piece) -> bool {
        let same_color = self.color == other.color;
        let same_shape = self.shape == other.shape;
        same_color != same_shape
    }
}

/// One of the four axis-aligned neighbours of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Towards lower rows.
    Up,
    /// Towards higher rows.
    Down,
    /// Towards lower columns.
    Left,
    /// Towards higher columns.
    Right,
}

impl Direction {
    /// Row and column delta of a single step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// A cell on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display("({row}, {column})")]
pub struct Position {
    /// Row index; may be negative.
    pub row: i32,
    /// Column index; may be negative.
    pub column: i32,
}

impl Position {
    /// Creates a position.
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// The cell `steps` cells away in `direction`, or `None` past the edge
    /// of the coordinate space.
    pub fn step(self, direction: Direction, steps: i32) -> Option<Self> {
        let (dr, dc) = direction.delta();
        Some(Self {
            row: self.row.checked_add(dr.checked_mul(steps)?)?,
            column: self.column.checked_add(dc.checked_mul(steps)?)?,
        })
    }

    /// Whether `other` lies on the same row or the same column.
    pub fn shares_line_with(self, other: Position) -> bool {
        self.row == other.row || self.column == other.column
    }
}

/// A tile committed to (or proposed for) a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{piece} at ({row}, {column})")]
pub struct GamePiece {
    /// The tile.
    pub piece: Piece,
    /// Row of the cell.
    pub row: i32,
    /// Column of the cell.
    pub column: i32,
}

impl GamePiece {
    /// Creates a placed tile.
    pub fn new(piece: Piece, row: i32, column: i32) -> Self {
        Self { piece, row, column }
    }

    /// The cell this tile occupies.
    pub fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_all_pieces_are_distinct() {
        let pieces: std::collections::HashSet<_> = Piece::all().collect();
        assert_eq!(pieces.len(), 36);
    }

    #[test]
    fn test_compatibility_is_exclusive_or() {
        let red_star = Piece::new(Shape::Star, Color::Red);
        assert!(!red_star.is_compatible(&Piece::new(Shape::Star, Color::Red)));
        assert!(!red_star.is_compatible(&Piece::new(Shape::Circle, Color::Blue)));
        assert!(red_star.is_compatible(&Piece::new(Shape::Star, Color::Blue)));
        assert!(red_star.is_compatible(&Piece::new(Shape::Clover, Color::Red)));
    }

    #[test]
    fn test_names_round_trip_through_strings() {
        assert_eq!(Shape::from_str("clover").unwrap(), Shape::Clover);
        assert_eq!(Color::Purple.to_string(), "purple");
        assert_eq!(
            Piece::new(Shape::Diamond, Color::Yellow).to_string(),
            "yellow diamond"
        );
    }

    #[test]
    fn test_game_piece_json_shape() {
        let gp = GamePiece::new(Piece::new(Shape::Circle, Color::Red), 90, 91);
        let json = serde_json::to_value(gp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "piece": {"shape": "circle", "color": "red"},
                "row": 90,
                "column": 91,
            })
        );
    }

    #[test]
    fn test_step_moves_along_axis() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::Up, 2), Some(Position::new(-2, 0)));
        assert_eq!(origin.step(Direction::Right, 3), Some(Position::new(0, 3)));
        assert!(origin.shares_line_with(Position::new(0, 7)));
        assert!(!origin.shares_line_with(Position::new(1, 1)));
    }

    #[test]
    fn test_step_stops_at_coordinate_limits() {
        let corner = Position::new(i32::MAX, i32::MIN);
        assert_eq!(corner.step(Direction::Down, 1), None);
        assert_eq!(corner.step(Direction::Left, 1), None);
        assert_eq!(
            corner.step(Direction::Up, 6),
            Some(Position::new(i32::MAX - 6, i32::MIN))
        );
        assert_eq!(
            corner.step(Direction::Right, 6),
            Some(Position::new(i32::MAX, i32::MIN + 6))
        );
    }
}
