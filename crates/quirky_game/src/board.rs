//! Sparse board storage and its bounding box.

use crate::piece::{Direction, GamePiece, Piece, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Row and column of the cell the bounding box starts from.
pub const DEFAULT_ORIGIN: Position = Position { row: 90, column: 90 };

/// Smallest rectangle enclosing every placed tile (and the origin cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Lowest occupied row.
    pub top: i32,
    /// Highest occupied row.
    pub bottom: i32,
    /// Lowest occupied column.
    pub left: i32,
    /// Highest occupied column.
    pub right: i32,
}

impl Dimensions {
    /// A one-cell box.
    pub fn at(position: Position) -> Self {
        Self {
            top: position.row,
            bottom: position.row,
            left: position.column,
            right: position.column,
        }
    }

    /// Grows the box to include `position`. Never shrinks.
    pub fn expand(&mut self, position: Position) {
        self.top = self.top.min(position.row);
        self.bottom = self.bottom.max(position.row);
        self.left = self.left.min(position.column);
        self.right = self.right.max(position.column);
    }

    /// Whether `position` lies inside the box.
    pub fn contains(&self, position: Position) -> bool {
        (self.top..=self.bottom).contains(&position.row)
            && (self.left..=self.right).contains(&position.column)
    }

    /// Number of rows covered.
    pub fn height(&self) -> u64 {
        u64::from(self.top.abs_diff(self.bottom)) + 1
    }

    /// Number of columns covered.
    pub fn width(&self) -> u64 {
        u64::from(self.left.abs_diff(self.right)) + 1
    }
}

/// Committed tiles, indexed by cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: Vec<GamePiece>,
    cells: HashMap<Position, Piece>,
    dimensions: Dimensions,
}

impl Board {
    /// An empty board whose bounding box starts at [`DEFAULT_ORIGIN`].
    pub fn new() -> Self {
        Self::with_origin(DEFAULT_ORIGIN)
    }

    /// An empty board whose bounding box starts at `origin`.
    pub fn with_origin(origin: Position) -> Self {
        Self {
            pieces: Vec::new(),
            cells: HashMap::new(),
            dimensions: Dimensions::at(origin),
        }
    }

    /// Whether a tile sits at `position`.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.cells.contains_key(&position)
    }

    /// The tile at `position`, if any.
    pub fn get(&self, position: Position) -> Option<Piece> {
        self.cells.get(&position).copied()
    }

    /// The tile `steps` cells away from `position` in `direction`.
    ///
    /// Cells past the edge of the coordinate space are always empty.
    pub fn adjacent(
        &self,
        position: Position,
        direction: Direction,
        steps: i32,
    ) -> Option<GamePiece> {
        let target = position.step(direction, steps)?;
        self.get(target)
            .map(|piece| GamePiece::new(piece, target.row, target.column))
    }

    /// Tiles in the order they were placed.
    pub fn pieces(&self) -> &[GamePiece] {
        &self.pieces
    }

    /// Current bounding box.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of tiles on the board.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Whether nothing has been placed yet.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Records a tile. Callers check occupancy first.
    pub(crate) fn place(&mut self, game_piece: GamePiece) {
        let position = game_piece.position();
        debug_assert!(!self.is_occupied(position), "cell {position} already taken");
        self.cells.insert(position, game_piece.piece);
        self.pieces.push(game_piece);
        self.dimensions.expand(position);
        trace!(%position, dimensions = ?self.dimensions, "Placed piece on board");
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
