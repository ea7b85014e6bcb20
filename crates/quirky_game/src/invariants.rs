//! First-class invariants for game sessions.
//!
//! Invariants are properties that must hold after every operation on a
//! [`GameSession`]. Sessions check them in debug builds; tests check them
//! directly.

use crate::bag::COPIES_PER_PIECE;
use crate::piece::Piece;
use crate::player::HAND_SIZE;
use crate::session::GameSession;
use std::collections::HashSet;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);
impl_invariant_set!(I1, I2, I3, I4, I5);

/// Every tile is in exactly one place: the bag, a hand, or the board.
pub struct TileConservation;

impl Invariant<GameSession> for TileConservation {
    fn holds(session: &GameSession) -> bool {
        Piece::all().all(|piece| {
            let in_bag = session.bag().count(&piece);
            let in_hands: u32 = session
                .players()
                .iter()
                .map(|p| p.hand().iter().filter(|h| **h == piece).count() as u32)
                .sum();
            let on_board = session
                .board_pieces()
                .iter()
                .filter(|gp| gp.piece == piece)
                .count() as u32;
            in_bag + in_hands + on_board == COPIES_PER_PIECE
        })
    }

    fn description() -> &'static str {
        "Each tile is in the bag, a hand, or on the board, three of each in total"
    }
}

/// No two board tiles share a cell.
pub struct UniqueCells;

impl Invariant<GameSession> for UniqueCells {
    fn holds(session: &GameSession) -> bool {
        let mut seen = HashSet::new();
        session
            .board_pieces()
            .iter()
            .all(|gp| seen.insert(gp.position()))
    }

    fn description() -> &'static str {
        "A board cell holds at most one tile"
    }
}

/// Exactly one player holds the turn whenever anyone is playing.
pub struct SingleTurnHolder;

impl Invariant<GameSession> for SingleTurnHolder {
    fn holds(session: &GameSession) -> bool {
        let holders = session.players().iter().filter(|p| *p.has_turn()).count();
        if session.players().is_empty() {
            holders == 0
        } else {
            holders == 1
        }
    }

    fn description() -> &'static str {
        "Exactly one player has the turn"
    }
}

/// Tiles placed this turn are on the board.
pub struct TurnPlacementsOnBoard;

impl Invariant<GameSession> for TurnPlacementsOnBoard {
    fn holds(session: &GameSession) -> bool {
        session
            .turn_placements()
            .pieces()
            .iter()
            .all(|gp| session.board().get(gp.position()) == Some(gp.piece))
    }

    fn description() -> &'static str {
        "Tiles placed this turn are on the board"
    }
}

/// No hand exceeds [`HAND_SIZE`].
pub struct BoundedHands;

impl Invariant<GameSession> for BoundedHands {
    fn holds(session: &GameSession) -> bool {
        session.players().iter().all(|p| p.hand_size() <= HAND_SIZE)
    }

    fn description() -> &'static str {
        "No hand holds more than six tiles"
    }
}

/// Every invariant a session maintains.
pub type SessionInvariants = (
    TileConservation,
    UniqueCells,
    SingleTurnHolder,
    TurnPlacementsOnBoard,
    BoundedHands,
);
