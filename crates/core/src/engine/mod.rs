//! Opponent engines
//!
//! The session only needs three things from an opponent: its name, a move for
//! the current board, and a way to shut it down.

pub mod analysis;
pub mod uci;

use std::time::Duration;

use shakmaty::Move;
use thiserror::Error;

use crate::rules::GameBoard;

pub use analysis::{Evaluation, SearchReport};
pub use uci::UciEngine;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to start engine: {0}")]
    Spawn(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("No '{waiting_for}' from engine within {after:?}")]
    Timeout { waiting_for: String, after: Duration },

    #[error("Engine closed its output")]
    Closed,
}

pub trait Engine {
    /// Display name, used for the PGN player tag
    fn name(&self) -> &str;

    /// Picks a legal move for the side to move, thinking for about `limit`
    fn best_move(&mut self, board: &GameBoard, limit: Duration) -> Result<Move, EngineError>;

    /// Releases the engine. Safe to call more than once.
    fn quit(&mut self) -> Result<(), EngineError>;
}
