//! A single game room: board, bag, players and the current turn.

use crate::bag::{BagEntry, PieceBag};
use crate::board::{Board, DEFAULT_ORIGIN, Dimensions};
use crate::error::GameError;
use crate::invariants::{InvariantSet, InvariantViolation, SessionInvariants};
use crate::piece::{GamePiece, Piece, Position};
use crate::placement::{self, TurnPlacements};
use crate::player::{Player, PlayerSummary};
use crate::turn::{Departure, TurnController, TurnOutcome};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use tracing::{debug, info, instrument, warn};

/// All state belonging to one game.
///
/// Every mutating method either succeeds completely or leaves the session
/// untouched.
#[derive(Debug, Clone)]
pub struct GameSession {
    name: String,
    board: Board,
    bag: PieceBag,
    turns: TurnController,
    turn_placements: TurnPlacements,
    rng: Pcg64Mcg,
}

impl GameSession {
    /// Creates a session with a full bag and a randomly seeded draw order.
    pub fn new(name: impl Into<String>) -> Self {
        let seed = rand::thread_rng().next_u64();
        Self::with_seed(name, DEFAULT_ORIGIN, seed)
    }

    /// Creates a session with a fixed board origin and a reproducible draw order.
    #[instrument(skip(name), fields(session = tracing::field::Empty))]
    pub fn with_seed(name: impl Into<String>, origin: Position, seed: u64) -> Self {
        let name = name.into();
        tracing::Span::current().record("session", name.as_str());
        info!(%origin, "Creating game session");
        Self {
            name,
            board: Board::with_origin(origin),
            bag: PieceBag::full(),
            turns: TurnController::new(),
            turn_placements: TurnPlacements::new(),
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Name of the game.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The bag of undrawn tiles.
    pub fn bag(&self) -> &PieceBag {
        &self.bag
    }

    /// Remaining bag contents.
    pub fn bag_entries(&self) -> &[BagEntry] {
        self.bag.entries()
    }

    /// Tiles on the board in placement order.
    pub fn board_pieces(&self) -> &[GamePiece] {
        self.board.pieces()
    }

    /// Bounding box of the board.
    pub fn dimensions(&self) -> Dimensions {
        self.board.dimensions()
    }

    /// Players in turn order.
    pub fn players(&self) -> &[Player] {
        self.turns.players()
    }

    /// Public view of every player, in turn order.
    pub fn player_summaries(&self) -> Vec<(String, PlayerSummary)> {
        self.turns
            .players()
            .iter()
            .map(|p| (p.name().clone(), PlayerSummary::from(p)))
            .collect()
    }

    /// Looks up a player.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.turns.player(name)
    }

    /// Tiles in `player`'s hand.
    pub fn hand(&self, player: &str) -> Result<&[Piece], GameError> {
        self.turns
            .player(player)
            .map(|p| p.hand().as_slice())
            .ok_or_else(|| GameError::PlayerNotFound(player.to_string()))
    }

    /// The player whose turn it is.
    pub fn active_player(&self) -> Option<&Player> {
        self.turns.active_player()
    }

    /// Tiles placed during the current turn.
    pub fn turn_placements(&self) -> &TurnPlacements {
        &self.turn_placements
    }

    /// Whether every player has left.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Adds a player and deals them a hand.
    #[instrument(skip(self), fields(session = %self.name))]
    pub fn join(&mut self, player: &str) -> Result<(), GameError> {
        self.turns
            .add_player(player, &mut self.bag, &mut self.rng)
            .inspect_err(|e| warn!(error = %e, "Join refused"))?;
        self.debug_check_invariants();
        Ok(())
    }

    /// Removes a player, returning their tiles to the bag.
    #[instrument(skip(self), fields(session = %self.name))]
    pub fn leave(&mut self, player: &str) -> Result<Departure, GameError> {
        let departure = self
            .turns
            .remove_player(player, &mut self.bag, &mut self.rng)?;
        if matches!(departure.turn, TurnOutcome::Passed { .. }) {
            self.turn_placements.clear();
        }
        self.debug_check_invariants();
        Ok(departure)
    }

    /// Places a tile from `player`'s hand and returns the points earned.
    #[instrument(skip(self), fields(session = %self.name))]
    pub fn place_tile(
        &mut self,
        player: &str,
        piece: Piece,
        row: i32,
        column: i32,
    ) -> Result<u32, GameError> {
        let holder = self.turns.player_mut(player)?;
        if !holder.holds(&piece) {
            warn!(%piece, "Player does not hold the tile");
            return Err(GameError::PlayerMustOwnTile(piece));
        }

        let candidate = GamePiece::new(piece, row, column);
        let points = placement::place(&mut self.board, &mut self.turn_placements, candidate)?;

        holder.take(&piece);
        holder.award(points);
        debug!(points, total = *holder.points(), "Tile placed");

        self.debug_check_invariants();
        Ok(points)
    }

    /// Ends `player`'s turn.
    ///
    /// A request from a player without the turn is accepted and ignored.
    #[instrument(skip(self), fields(session = %self.name))]
    pub fn end_turn(&mut self, player: &str) -> Result<TurnOutcome, GameError> {
        let outcome = self.turns.end_turn(player, &mut self.bag, &mut self.rng)?;
        if matches!(outcome, TurnOutcome::Passed { .. }) {
            self.turn_placements.clear();
        }
        self.debug_check_invariants();
        Ok(outcome)
    }

    /// Checks every session invariant.
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        SessionInvariants::check_all(self)
    }

    fn debug_check_invariants(&self) {
        if cfg!(debug_assertions)
            && let Err(violations) = self.check_invariants()
        {
            for violation in violations {
                warn!(session = %self.name, violation = %violation.description, "Invariant violated");
            }
        }
    }
}
