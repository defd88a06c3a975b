use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] chess_duel_core::Error),

    #[error("Could not load sprite {}: {reason}", .path.display())]
    Sprite { path: PathBuf, reason: String },
}

impl From<chess_duel_core::EngineError> for AppError {
    fn from(e: chess_duel_core::EngineError) -> Self {
        AppError::Core(e.into())
    }
}
