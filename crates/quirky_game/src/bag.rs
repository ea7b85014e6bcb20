//! The shared bag of undrawn tiles.

use crate::piece::Piece;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Number of copies of each distinct tile in a fresh bag.
pub const COPIES_PER_PIECE: u32 = 3;

/// Identical tiles remaining in the bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct BagEntry {
    /// The tile.
    pub piece: Piece,
    /// How many copies are left; never zero while the entry exists.
    pub count: u32,
}

/// Multiset of tiles that players draw from.
///
/// Each physical tile is equally likely to be drawn, so a combination with
/// three copies left is three times as likely as one with a single copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceBag {
    entries: Vec<BagEntry>,
}

impl PieceBag {
    /// A bag holding [`COPIES_PER_PIECE`] of every combination.
    pub fn full() -> Self {
        Self {
            entries: Piece::all()
                .map(|piece| BagEntry::new(piece, COPIES_PER_PIECE))
                .collect(),
        }
    }

    /// A bag with nothing in it.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Remaining entries, one per distinct tile.
    pub fn entries(&self) -> &[BagEntry] {
        &self.entries
    }

    /// Total number of tiles left.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }

    /// Whether the bag has run out.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies of `piece` still in the bag.
    pub fn count(&self, piece: &Piece) -> u32 {
        self.entries
            .iter()
            .find(|e| e.piece == *piece)
            .map_or(0, |e| e.count)
    }

    /// Draws up to `n` tiles at random.
    ///
    /// Returns fewer than `n` tiles when the bag empties first.
    #[instrument(skip(self, rng), fields(remaining = self.len()))]
    pub fn draw<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<Piece> {
        let mut drawn = Vec::with_capacity(n);
        let mut remaining = self.len();

        while drawn.len() < n && remaining > 0 {
            let mut ticket = rng.gen_range(0..remaining);
            let idx = self
                .entries
                .iter()
                .position(|entry| {
                    let count = entry.count as usize;
                    if ticket < count {
                        true
                    } else {
                        ticket -= count;
                        false
                    }
                })
                .unwrap_or(self.entries.len() - 1);

            let entry = &mut self.entries[idx];
            drawn.push(entry.piece);
            entry.count -= 1;
            if entry.count == 0 {
                self.entries.remove(idx);
            }
            remaining -= 1;
        }

        debug!(requested = n, drawn = drawn.len(), remaining, "Drew pieces");
        drawn
    }

    /// Puts tiles back into the bag.
    #[instrument(skip_all)]
    pub fn return_pieces<I>(&mut self, pieces: I)
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut returned = 0usize;
        for piece in pieces {
            match self.entries.iter_mut().find(|e| e.piece == piece) {
                Some(entry) => entry.count += 1,
                None => self.entries.push(BagEntry::new(piece, 1)),
            }
            returned += 1;
        }
        debug!(returned, remaining = self.len(), "Returned pieces");
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::full()
    }
}
