//! Registry of running games.
//!
//! Each game lives behind its own lock so that mutations to one game are
//! serialized while reads may proceed in parallel. The registry map has its
//! own lock; join and leave hold it for their whole duration so a game is
//! never destroyed while a player is joining it. Locks are always taken map
//! first, game second.

use crate::chat::ChatLog;
use crate::config::ServerConfig;
use crate::error::ApiError;
use quirky_game::{GameSession, Position, TurnOutcome};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument};

/// A game and its chat.
#[derive(Debug)]
pub struct GameRoom {
    /// Game state.
    pub session: GameSession,
    /// Chat for players of this game.
    pub chat: ChatLog,
}

/// Shared handle to a single game.
pub type SharedRoom = Arc<RwLock<GameRoom>>;

#[derive(Debug)]
struct Inner {
    rooms: HashMap<String, SharedRoom>,
    rng: Pcg64Mcg,
}

/// Every running game, keyed by name.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Inner>>,
    origin: Position,
    chat_lines: usize,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl SessionRegistry {
    /// Creates an empty registry using the board and chat settings of `config`.
    #[instrument(skip(config))]
    pub fn new(config: &ServerConfig) -> Self {
        let seed = (*config.seed()).unwrap_or_else(|| rand::thread_rng().next_u64());
        info!(seeded = config.seed().is_some(), "Creating session registry");
        Self {
            inner: Arc::new(Mutex::new(Inner {
                rooms: HashMap::new(),
                rng: Pcg64Mcg::seed_from_u64(seed),
            })),
            origin: config.board_origin(),
            chat_lines: *config.chat_lines(),
        }
    }

    /// Creates a game and seats its creator.
    ///
    /// If `requested` is taken, random digits are appended until the name is
    /// free. Returns the name actually used.
    #[instrument(skip(self))]
    pub fn create_session(&self, requested: &str, creator: &str) -> Result<String, ApiError> {
        if requested.trim().is_empty() {
            return Err(ApiError::BadRequest("game name must not be empty".into()));
        }
        if creator.trim().is_empty() {
            return Err(ApiError::BadRequest("player name must not be empty".into()));
        }

        let mut inner = lock(&self.inner);
        let mut name = requested.to_string();
        while inner.rooms.contains_key(&name) {
            let digit = inner.rng.gen_range(0..10u8);
            name.push(char::from(b'0' + digit));
        }

        let seed = inner.rng.next_u64();
        let mut session = GameSession::with_seed(name.clone(), self.origin, seed);
        session.join(creator)?;

        let room = GameRoom {
            session,
            chat: ChatLog::new(self.chat_lines),
        };
        inner.rooms.insert(name.clone(), Arc::new(RwLock::new(room)));
        info!(session = %name, games = inner.rooms.len(), "Game created");
        Ok(name)
    }

    /// Handle to a game, if it exists.
    pub fn room(&self, name: &str) -> Result<SharedRoom, ApiError> {
        lock(&self.inner)
            .rooms
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::SessionNotFound(name.to_string()))
    }

    /// Names of every running game.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = lock(&self.inner).rooms.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of running games.
    pub fn len(&self) -> usize {
        lock(&self.inner).rooms.len()
    }

    /// Whether no game is running.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with shared access to a game.
    pub fn with_room<R>(&self, name: &str, f: impl FnOnce(&GameRoom) -> R) -> Result<R, ApiError> {
        let room = self.room(name)?;
        let guard = read(&room);
        Ok(f(&guard))
    }

    /// Runs `f` with exclusive access to a game.
    pub fn with_room_mut<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut GameRoom) -> R,
    ) -> Result<R, ApiError> {
        let room = self.room(name)?;
        let mut guard = write(&room);
        Ok(f(&mut guard))
    }

    /// Adds a player to an existing game.
    #[instrument(skip(self))]
    pub fn join_session(&self, game: &str, player: &str) -> Result<(), ApiError> {
        if player.trim().is_empty() {
            return Err(ApiError::BadRequest("player name must not be empty".into()));
        }
        let inner = lock(&self.inner);
        let room = inner
            .rooms
            .get(game)
            .ok_or_else(|| ApiError::SessionNotFound(game.to_string()))?;
        write(room).session.join(player)?;
        Ok(())
    }

    /// Removes a player, destroying the game when nobody is left.
    #[instrument(skip(self))]
    pub fn leave_session(&self, game: &str, player: &str) -> Result<TurnOutcome, ApiError> {
        let mut inner = lock(&self.inner);
        let room = inner
            .rooms
            .get(game)
            .cloned()
            .ok_or_else(|| ApiError::SessionNotFound(game.to_string()))?;

        let departure = write(&room).session.leave(player)?;
        if departure.now_empty {
            inner.rooms.remove(game);
            info!(session = %game, games = inner.rooms.len(), "Game destroyed");
        }
        Ok(departure.turn)
    }

    /// Places a tile for `player` and returns the points earned.
    #[instrument(skip(self))]
    pub fn place_tile(
        &self,
        game: &str,
        player: &str,
        piece: quirky_game::Piece,
        row: i32,
        column: i32,
    ) -> Result<u32, ApiError> {
        let points = self.with_room_mut(game, |room| {
            room.session.place_tile(player, piece, row, column)
        })??;
        debug!(points, "Tile placed");
        Ok(points)
    }

    /// Ends `player`'s turn.
    #[instrument(skip(self))]
    pub fn end_turn(&self, game: &str, player: &str) -> Result<TurnOutcome, ApiError> {
        Ok(self.with_room_mut(game, |room| room.session.end_turn(player))??)
    }
}
