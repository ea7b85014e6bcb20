//! Turn rotation among the players of a game.
//!
//! Players are kept in join order. The first player to join holds the turn;
//! ending a turn hands it to the next player in the current order, wrapping
//! around after the last one, and tops up that player's hand from the bag.

use crate::bag::PieceBag;
use crate::error::GameError;
use crate::player::{HAND_SIZE, Player};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Result of an end-turn request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TurnOutcome {
    /// The requesting player did not hold the turn; nothing changed.
    Ignored,
    /// The turn moved from one player to another (possibly the same one).
    Passed {
        /// Player whose turn ended.
        from: String,
        /// Player who now holds the turn.
        to: String,
    },
}

/// Result of a player leaving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The turn moved as a side effect of the departure.
    pub turn: TurnOutcome,
    /// No players remain.
    pub now_empty: bool,
}

/// Ordered player registry that tracks whose turn it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnController {
    players: Vec<Player>,
}

impl TurnController {
    /// No players yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a player by name.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    pub(crate) fn player_mut(&mut self, name: &str) -> Result<&mut Player, GameError> {
        self.players
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| GameError::PlayerNotFound(name.to_string()))
    }

    /// The player currently holding the turn.
    pub fn active_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| *p.has_turn())
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether nobody is playing.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn index_of(&self, name: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| GameError::PlayerNotFound(name.to_string()))
    }

    /// Adds a player with a freshly drawn hand.
    ///
    /// The first player in an empty game receives the turn.
    #[instrument(skip(self, bag, rng))]
    pub fn add_player<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        bag: &mut PieceBag,
        rng: &mut R,
    ) -> Result<&Player, GameError> {
        if self.player(name).is_some() {
            return Err(GameError::PlayerAlreadyExists(name.to_string()));
        }

        let mut player = Player::new(name, bag.draw(HAND_SIZE, rng));
        if self.players.is_empty() {
            player.set_turn(true);
        }
        info!(
            hand_size = player.hand_size(),
            has_turn = *player.has_turn(),
            "Player joined"
        );

        self.players.push(player);
        let idx = self.players.len() - 1;
        Ok(&self.players[idx])
    }

    /// Ends `name`'s turn and gives it to the next player.
    ///
    /// A player who does not hold the turn gets [`TurnOutcome::Ignored`].
    #[instrument(skip(self, bag, rng))]
    pub fn end_turn<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        bag: &mut PieceBag,
        rng: &mut R,
    ) -> Result<TurnOutcome, GameError> {
        let idx = self.index_of(name)?;
        if !*self.players[idx].has_turn() {
            debug!("Ignoring end of turn from player without the turn");
            return Ok(TurnOutcome::Ignored);
        }
        Ok(self.advance_from(idx, bag, rng))
    }

    fn advance_from<R: Rng + ?Sized>(
        &mut self,
        idx: usize,
        bag: &mut PieceBag,
        rng: &mut R,
    ) -> TurnOutcome {
        self.players[idx].set_turn(false);

        let next_idx = (idx + 1) % self.players.len();
        let next = &mut self.players[next_idx];
        next.set_turn(true);
        let drawn = bag.draw(next.missing_tiles(), rng);
        next.refill(drawn);

        let outcome = TurnOutcome::Passed {
            from: self.players[idx].name().clone(),
            to: self.players[next_idx].name().clone(),
        };
        info!(?outcome, bag_remaining = bag.len(), "Turn passed");
        outcome
    }

    /// Removes a player, returning their hand to the bag.
    ///
    /// If the player held the turn, it passes to the next player first.
    #[instrument(skip(self, bag, rng))]
    pub fn remove_player<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        bag: &mut PieceBag,
        rng: &mut R,
    ) -> Result<Departure, GameError> {
        let idx = self.index_of(name)?;

        let turn = if *self.players[idx].has_turn() && self.players.len() > 1 {
            self.advance_from(idx, bag, rng)
        } else {
            TurnOutcome::Ignored
        };

        let mut player = self.players.remove(idx);
        bag.return_pieces(player.surrender_hand());

        let now_empty = self.players.is_empty();
        info!(remaining_players = self.players.len(), now_empty, "Player left");
        Ok(Departure { turn, now_empty })
    }
}
