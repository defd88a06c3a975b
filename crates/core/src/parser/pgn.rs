//! PGN reading and writing

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, Position};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;

use crate::error::{Error, Result};
use crate::rules::GameBoard;

/// Movetext lines are wrapped at this width
const LINE_WIDTH: usize = 80;

/// A chess game as stored in a PGN file
#[derive(Debug, Clone)]
pub struct PgnGame {
    /// Tag pairs in file order
    pub headers: Vec<(String, String)>,
    /// Moves in SAN, check suffixes included
    pub moves: Vec<String>,
    /// Position after the last move
    pub final_position: Chess,
}

impl PgnGame {
    /// Game record for a board: Seven Tag Roster with today's date, plus
    /// `SetUp`/`FEN` when the game did not start from the initial position.
    pub fn from_board(board: &GameBoard) -> Self {
        let date = chrono::Local::now().format("%Y.%m.%d").to_string();
        let mut headers: Vec<(String, String)> = [
            ("Event", "?"),
            ("Site", "?"),
            ("Date", date.as_str()),
            ("Round", "?"),
            ("White", "?"),
            ("Black", "?"),
            ("Result", "*"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        if let Some(fen) = board.start_fen() {
            headers.push(("SetUp".to_string(), "1".to_string()));
            headers.push(("FEN".to_string(), fen));
        }

        PgnGame {
            headers,
            moves: board.san_moves().to_vec(),
            final_position: board.position().clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces a tag's value in place, or appends the tag
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    pub fn white(&self) -> Option<&str> {
        self.header("White")
    }

    pub fn black(&self) -> Option<&str> {
        self.header("Black")
    }

    pub fn result(&self) -> Option<&str> {
        self.header("Result")
    }

    /// Returns the number of moves (half-moves/ply)
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn summary(&self) -> String {
        let white = self.white().unwrap_or("Unknown");
        let black = self.black().unwrap_or("Unknown");
        let result = self.result().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }

    /// Move number and side of the first move, from the FEN tag if present
    fn first_move(&self) -> (u32, bool) {
        let Some(fen) = self.header("FEN") else {
            return (1, true);
        };
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let white = fields.get(1).map_or(true, |turn| *turn != "b");
        let number = fields.get(5).and_then(|n| n.parse().ok()).unwrap_or(1);
        (number, white)
    }

    fn movetext(&self) -> String {
        let (mut number, mut white_to_move) = self.first_move();
        let mut tokens = Vec::with_capacity(self.moves.len() * 3 / 2 + 1);

        for (ply, san) in self.moves.iter().enumerate() {
            if white_to_move {
                tokens.push(format!("{}.", number));
            } else if ply == 0 {
                tokens.push(format!("{}...", number));
            }
            tokens.push(san.clone());
            if !white_to_move {
                number += 1;
            }
            white_to_move = !white_to_move;
        }
        tokens.push(self.result().unwrap_or("*").to_string());

        let mut text = String::new();
        let mut line_len = 0;
        for token in tokens {
            if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
                text.push('\n');
                line_len = 0;
            } else if line_len > 0 {
                text.push(' ');
                line_len += 1;
            }
            line_len += token.len();
            text.push_str(&token);
        }
        text
    }
}

impl fmt::Display for PgnGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            writeln!(f, "[{} \"{}\"]", name, escaped)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.movetext())
    }
}

/// Holds state while parsing the movetext section
struct GameMoves {
    headers: Vec<(String, String)>,
    moves: Vec<String>,
    current_position: Chess,
    error: Option<String>,
}

struct GameParser;

impl Visitor for GameParser {
    type Tags = Vec<(String, String)>;
    type Movetext = GameMoves;
    type Output = std::result::Result<PgnGame, String>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(Vec::new())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let name_str = String::from_utf8_lossy(name).into_owned();
        let value_str = value.decode_utf8_lossy().to_string();
        tags.push((name_str, value_str));
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        let fen = tags
            .iter()
            .find(|(k, _)| k == "FEN")
            .map(|(_, v)| v.clone());

        let current_position = match fen {
            Some(fen) => match start_position(&fen) {
                Ok(position) => position,
                Err(e) => return ControlFlow::Break(Err(e)),
            },
            None => Chess::default(),
        };

        ControlFlow::Continue(GameMoves {
            headers: tags,
            moves: Vec::new(),
            current_position,
            error: None,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if movetext.error.is_some() {
            return ControlFlow::Continue(());
        }

        let played = san
            .san
            .to_move(&movetext.current_position)
            .map_err(|e| e.to_string())
            .and_then(|m| {
                movetext
                    .current_position
                    .clone()
                    .play(m)
                    .map_err(|_| "illegal move".to_string())
            });

        match played {
            Ok(new_pos) => {
                movetext.moves.push(san.to_string());
                movetext.current_position = new_pos;
            }
            Err(e) => {
                let ply = movetext.moves.len() + 1;
                movetext.error = Some(format!("move {} ('{}') at ply {}", e, san, ply));
            }
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        match movetext.error {
            Some(e) => Err(e),
            None => Ok(PgnGame {
                headers: movetext.headers,
                moves: movetext.moves,
                final_position: movetext.current_position,
            }),
        }
    }
}

fn start_position(fen: &str) -> std::result::Result<Chess, String> {
    let parsed: Fen = fen.parse().map_err(|e| format!("bad FEN tag '{}': {}", fen, e))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| format!("bad FEN tag '{}': {}", fen, e))
}

pub fn parse_pgn_file<P: AsRef<Path>>(path: P) -> Result<Vec<PgnGame>> {
    let contents = fs::read_to_string(path)?;
    parse_pgn_string(&contents)
}

/// Parses every game in `pgn`. Empty input yields no games; any game that
/// does not replay legally is an error.
pub fn parse_pgn_string(pgn: &str) -> Result<Vec<PgnGame>> {
    let mut parser = GameParser;
    let mut games: Vec<PgnGame> = Vec::new();

    let cursor = Cursor::new(pgn.as_bytes());
    let mut reader = pgn_reader::Reader::new(cursor);

    loop {
        match reader.read_game(&mut parser) {
            Ok(Some(Ok(game))) => games.push(game),
            Ok(Some(Err(e))) => {
                return Err(Error::Pgn(format!("game {}: {}", games.len() + 1, e)))
            }
            Ok(None) => break,
            Err(e) => return Err(Error::Pgn(e.to_string())),
        }
    }

    Ok(games)
}
