//! Placement validation and scoring.
//!
//! A candidate tile is checked against the board in four directions. Each
//! direction is walked cell by cell until an empty cell is reached; every
//! tile met on the way must share exactly one attribute with the candidate.
//! Tiles that were already on the board before the current turn earn one
//! point each. A placement is committed only after every check has passed.

use crate::board::Board;
use crate::piece::{Direction, GamePiece, Position};
use strum::IntoEnumIterator;
use tracing::{debug, instrument, warn};

/// Longest run of tiles allowed in a single line.
pub const MAX_LINE: i32 = 6;

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlacementError {
    /// The target cell already holds a tile.
    #[display("A piece already exists at {}", _0)]
    AlreadyOccupied(Position),

    /// A tile in one of the candidate's lines is identical or unrelated.
    #[display("Piece is adjacent to incompatible piece: {}", _0)]
    IncompatibleAdjacent(GamePiece),

    /// The line would grow beyond [`MAX_LINE`] tiles.
    #[display("Line would exceed {} pieces", MAX_LINE)]
    TooManyInLine,

    /// The tile is off the row/column of this turn's earlier tiles.
    #[display("Piece must be in the same row or column as others placed this turn")]
    NotColinearThisTurn,
}

impl std::error::Error for PlacementError {}

/// Tiles placed since the current turn began.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnPlacements {
    pieces: Vec<GamePiece>,
}

impl TurnPlacements {
    /// No tiles placed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `game_piece` was placed this turn.
    pub fn contains(&self, game_piece: &GamePiece) -> bool {
        self.pieces.contains(game_piece)
    }

    /// Whether every tile placed this turn shares a row or column with `position`.
    pub fn all_in_line_with(&self, position: Position) -> bool {
        self.pieces
            .iter()
            .all(|gp| gp.position().shares_line_with(position))
    }

    /// Tiles placed this turn, oldest first.
    pub fn pieces(&self) -> &[GamePiece] {
        &self.pieces
    }

    /// Number of tiles placed this turn.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Whether no tile has been placed this turn.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Forgets this turn's tiles.
    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    fn push(&mut self, game_piece: GamePiece) {
        self.pieces.push(game_piece);
    }
}

/// Walks one direction from the candidate and returns the bonus it earns.
fn walk_line(
    board: &Board,
    turn: &TurnPlacements,
    candidate: &GamePiece,
    direction: Direction,
) -> Result<u32, PlacementError> {
    let origin = candidate.position();
    let mut bonus = 0;

    for step in 1..=MAX_LINE {
        let Some(neighbour) = board.adjacent(origin, direction, step) else {
            return Ok(bonus);
        };
        if step == MAX_LINE {
            return Err(PlacementError::TooManyInLine);
        }
        if !candidate.piece.is_compatible(&neighbour.piece) {
            return Err(PlacementError::IncompatibleAdjacent(neighbour));
        }
        if !turn.contains(&neighbour) {
            bonus += 1;
        }
    }

    Ok(bonus)
}

/// Checks a placement without touching any state and returns its score.
#[instrument(skip(board, turn), fields(piece = %candidate))]
pub fn validate(
    board: &Board,
    turn: &TurnPlacements,
    candidate: &GamePiece,
) -> Result<u32, PlacementError> {
    let position = candidate.position();
    if board.is_occupied(position) {
        return Err(PlacementError::AlreadyOccupied(position));
    }

    let mut bonus = 0;
    for direction in Direction::iter() {
        bonus += walk_line(board, turn, candidate, direction)?;
    }

    if !turn.all_in_line_with(position) {
        return Err(PlacementError::NotColinearThisTurn);
    }

    Ok(1 + bonus)
}

/// Validates a placement and, if it is legal, commits it.
///
/// On success the tile is on the board and recorded as placed this turn, and
/// the returned value is the number of points earned. On failure nothing is
/// modified.
#[instrument(skip(board, turn), fields(piece = %candidate))]
pub fn place(
    board: &mut Board,
    turn: &mut TurnPlacements,
    candidate: GamePiece,
) -> Result<u32, PlacementError> {
    let points = validate(board, turn, &candidate).inspect_err(|e| {
        warn!(error = %e, "Placement rejected");
    })?;

    board.place(candidate);
    turn.push(candidate);

    debug!(points, turn_pieces = turn.len(), "Placement committed");
    Ok(points)
}
