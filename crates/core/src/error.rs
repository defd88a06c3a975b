//! Error types for chess-duel-core

use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid position: {0}")]
    Position(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}

pub type Result<T> = std::result::Result<T, Error>;
