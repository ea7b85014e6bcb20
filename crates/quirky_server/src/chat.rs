//! Bounded chat logs with incremental fetch.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Lines kept before the oldest are dropped.
pub const DEFAULT_CHAT_LINES: usize = 1000;

/// One message in a chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct ChatLine {
    /// Sequence number, starting at 0.
    pub id: u64,
    /// Who wrote the line.
    pub name: String,
    /// What they wrote.
    pub input: String,
}

/// Append-only chat log that keeps the most recent lines.
#[derive(Debug, Clone)]
pub struct ChatLog {
    lines: VecDeque<ChatLine>,
    capacity: usize,
    next_id: u64,
}

impl ChatLog {
    /// An empty log holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 0,
        }
    }

    /// Appends a line and returns its id.
    pub fn push(&mut self, name: impl Into<String>, input: impl Into<String>) -> u64 {
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        let id = self.next_id;
        self.next_id += 1;
        self.lines.push_back(ChatLine::new(id, name.into(), input.into()));
        debug!(id, kept = self.lines.len(), "Chat line added");
        id
    }

    /// Lines newer than `last_id`, or every kept line when `last_id` is `None`.
    pub fn since(&self, last_id: Option<u64>) -> Vec<ChatLine> {
        match last_id {
            Some(last) => self
                .lines
                .iter()
                .filter(|line| line.id > last)
                .cloned()
                .collect(),
            None => self.lines.iter().cloned().collect(),
        }
    }

    /// Number of lines kept.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been said.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_LINES)
    }
}
