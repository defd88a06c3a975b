//! PGN file of finished games

use shakmaty::Color;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::parser::pgn::{parse_pgn_file, PgnGame};
use crate::result::GameResult;
use crate::rules::GameBoard;

/// Player tag used for the person at the board
pub const HUMAN_NAME: &str = "Human";

/// A PGN file that games are appended to.
///
/// The file is rewritten as a whole on every save: prior games are read back,
/// the new one goes last, and everything is written out again.
pub struct PgnArchive {
    path: PathBuf,
}

impl PgnArchive {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Games currently in the file; none if it does not exist yet
    pub fn load(&self) -> Result<Vec<PgnGame>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        parse_pgn_file(&self.path)
    }

    /// Appends `game`, returning how many games the file now holds
    pub fn append(&self, game: PgnGame) -> Result<usize> {
        let mut games = self.load()?;
        games.push(game);

        let mut text = String::new();
        for game in &games {
            text.push_str(&game.to_string());
            text.push_str("\n\n");
        }

        let tmp = self.path.with_extension("pgn.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;

        info!("Saved game {} to {}", games.len(), self.path.display());
        Ok(games.len())
    }

    /// Records a finished human-vs-engine game
    pub fn save_game(
        &self,
        board: &GameBoard,
        human: Color,
        engine_name: &str,
        result: GameResult,
    ) -> Result<usize> {
        let game = game_record(board, human, engine_name, result);
        info!("Recording {} ({} plies)", game.summary(), game.move_count());
        self.append(game)
    }
}

/// PGN record of a game with the player tags set from the human's side
pub fn game_record(
    board: &GameBoard,
    human: Color,
    engine_name: &str,
    result: GameResult,
) -> PgnGame {
    let (white, black) = match human {
        Color::White => (HUMAN_NAME, engine_name),
        Color::Black => (engine_name, HUMAN_NAME),
    };

    let mut game = PgnGame::from_board(board);
    game.set_header("Result", result.as_str());
    game.set_header("White", white);
    game.set_header("Black", black);
    game
}
