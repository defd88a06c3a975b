//! Game result classification

use std::fmt;
use std::str::FromStr;

use shakmaty::Color;

use crate::rules::Rules;

/// A PGN result token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    /// Game unfinished or abandoned (`*`)
    Undetermined,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Undetermined => "*",
        }
    }

    /// The side that won, if any
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1-0" => Ok(GameResult::WhiteWins),
            "0-1" => Ok(GameResult::BlackWins),
            "1/2-1/2" => Ok(GameResult::Draw),
            "*" => Ok(GameResult::Undetermined),
            other => Err(format!("unknown result token '{}'", other)),
        }
    }
}

/// Result of the game as it stands.
///
/// Checks run in a fixed order and the first match wins: stalemate,
/// insufficient material, claimable threefold repetition, checkmate. A
/// checkmated position that is also a claimable repetition is scored a draw.
pub fn classify<R: Rules + ?Sized>(board: &R) -> GameResult {
    if board.is_stalemate()
        || board.is_insufficient_material()
        || board.can_claim_threefold_repetition()
    {
        GameResult::Draw
    } else if board.is_checkmate() {
        match board.turn() {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    } else {
        GameResult::Undetermined
    }
}

/// Draw check run every tick while the game is in progress
pub fn draw_claim<R: Rules + ?Sized>(board: &R) -> Option<GameResult> {
    if board.can_claim_draw()
        || board.can_claim_threefold_repetition()
        || board.halfmove_clock() >= 100
    {
        Some(GameResult::Draw)
    } else {
        None
    }
}
