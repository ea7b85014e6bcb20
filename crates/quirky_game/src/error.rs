//! Errors returned by game sessions.

use crate::piece::Piece;
use crate::placement::PlacementError;

/// A request against a game session that could not be carried out.
///
/// Every variant is recoverable: the session is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum GameError {
    /// The board rules refused the placement.
    #[display("Invalid placement: {}", _0)]
    InvalidPlacement(PlacementError),

    /// The player tried to place a tile that is not in their hand.
    #[display("Player does not hold a {}", _0)]
    #[from(ignore)]
    PlayerMustOwnTile(Piece),

    /// Another player in the game already uses this name.
    #[display("Player {} already exists", _0)]
    #[from(ignore)]
    PlayerAlreadyExists(String),

    /// No player with this name is in the game.
    #[display("Player {} not found", _0)]
    #[from(ignore)]
    PlayerNotFound(String),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::InvalidPlacement(e) => Some(e),
            _ => None,
        }
    }
}
