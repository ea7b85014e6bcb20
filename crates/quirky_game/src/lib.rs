//! Quirky game engine.
//!
//! Pure game-state logic for a Qwirkle-style tile game: a shared bag of
//! 108 tiles, a sparse board with placement rules and scoring, and turn
//! rotation among the players of a game.
//!
//! # Example
//!
//! ```
//! use quirky_game::{GameSession, TurnOutcome};
//!
//! let mut session = GameSession::new("lounge");
//! session.join("alice").unwrap();
//! session.join("bob").unwrap();
//!
//! let tile = session.hand("alice").unwrap()[0];
//! let points = session.place_tile("alice", tile, 90, 90).unwrap();
//! assert_eq!(points, 1);
//!
//! let outcome = session.end_turn("alice").unwrap();
//! assert!(matches!(outcome, TurnOutcome::Passed { .. }));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bag;
mod board;
mod error;
pub mod invariants;
mod piece;
mod placement;
mod player;
mod session;
mod turn;

pub use bag::{BagEntry, COPIES_PER_PIECE, PieceBag};
pub use board::{Board, DEFAULT_ORIGIN, Dimensions};
pub use error::GameError;
pub use piece::{Color, Direction, GamePiece, Piece, Position, Shape};
pub use placement::{MAX_LINE, PlacementError, TurnPlacements, place, validate};
pub use player::{HAND_SIZE, Player, PlayerSummary};
pub use session::GameSession;
pub use turn::{Departure, TurnController, TurnOutcome};
