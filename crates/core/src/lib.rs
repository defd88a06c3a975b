//! Chess Duel Core Library
//!
//! Everything behind the board window: the rules wrapper, square mapping,
//! result classification, PGN storage, the UCI engine client and the turn
//! state machine. Rendering lives in the `chess-duel` binary.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod parser;
pub mod prompt;
pub mod result;
pub mod rules;
pub mod session;
pub mod storage;

pub use config::Config;
pub use engine::{Engine, EngineError, UciEngine};
pub use error::{Error, Result};
pub use geometry::{BoardLayout, Orientation, Point, Rect};
pub use result::{classify, draw_claim, GameResult};
pub use rules::{GameBoard, Rules};
pub use session::{InputEvent, Phase, PlayedMove, Session};
pub use storage::PgnArchive;
