//! Players and their hands.

use crate::piece::Piece;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Number of tiles a full hand holds.
pub const HAND_SIZE: usize = 6;

/// A participant in a game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Player {
    /// Unique within a game.
    name: String,
    /// Tiles held but not yet placed.
    hand: Vec<Piece>,
    /// Total score; only ever grows.
    points: u32,
    /// Whether this player is the one expected to act.
    has_turn: bool,
}

impl Player {
    /// Creates a player holding `hand`.
    pub fn new(name: impl Into<String>, hand: Vec<Piece>) -> Self {
        Self {
            name: name.into(),
            hand,
            points: 0,
            has_turn: false,
        }
    }

    /// Number of tiles in hand.
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    /// How many tiles the hand is short of [`HAND_SIZE`].
    pub fn missing_tiles(&self) -> usize {
        HAND_SIZE.saturating_sub(self.hand.len())
    }

    /// Whether the hand contains `piece`.
    pub fn holds(&self, piece: &Piece) -> bool {
        self.hand.contains(piece)
    }

    /// Removes one copy of `piece` from the hand.
    pub(crate) fn take(&mut self, piece: &Piece) -> Option<Piece> {
        let idx = self.hand.iter().position(|p| p == piece)?;
        Some(self.hand.remove(idx))
    }

    /// Adds freshly drawn tiles to the hand.
    pub(crate) fn refill(&mut self, drawn: Vec<Piece>) {
        self.hand.extend(drawn);
    }

    /// Empties the hand, handing the tiles back to the caller.
    pub(crate) fn surrender_hand(&mut self) -> Vec<Piece> {
        std::mem::take(&mut self.hand)
    }

    pub(crate) fn award(&mut self, points: u32) {
        self.points += points;
    }

    pub(crate) fn set_turn(&mut self, has_turn: bool) {
        self.has_turn = has_turn;
    }
}

/// What other players may see about a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// Total score.
    pub points: u32,
    /// Whether it is this player's turn.
    pub has_turn: bool,
    /// Number of tiles held.
    pub hand_size: usize,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            points: player.points,
            has_turn: player.has_turn,
            hand_size: player.hand.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Color, Shape};

    #[test]
    fn test_take_removes_single_copy() {
        let star = Piece::new(Shape::Star, Color::Red);
        let mut player = Player::new("alice", vec![star, star]);
        assert_eq!(player.take(&star), Some(star));
        assert_eq!(player.hand_size(), 1);
        assert_eq!(player.missing_tiles(), 5);
        assert!(player.holds(&star));
        assert_eq!(player.take(&Piece::new(Shape::Star, Color::Blue)), None);
    }

    #[test]
    fn test_summary_hides_hand() {
        let mut player = Player::new("bob", vec![Piece::new(Shape::Clover, Color::Green)]);
        player.award(4);
        player.set_turn(true);
        let summary = PlayerSummary::from(&player);
        assert_eq!(
            summary,
            PlayerSummary {
                points: 4,
                has_turn: true,
                hand_size: 1
            }
        );
    }
}
