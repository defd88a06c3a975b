//! Parser module for chess game formats
//!
//! Currently supports:
//! - PGN (Portable Game Notation), reading and writing

pub mod pgn;

// Re-export commonly used items for convenience
pub use pgn::PgnGame;
pub use pgn::{parse_pgn_file, parse_pgn_string};
