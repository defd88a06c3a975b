//! Board state backed by shakmaty
//!
//! shakmaty's `Chess` knows the current position only. `GameBoard` adds the
//! history a full game needs: where it started, which moves were played (and
//! their SAN), and a repetition key for every position reached.

use shakmaty::{
    fen::Fen, san::San, san::SanPlus, CastlingMode, Chess, Color, EnPassantMode, Move, Piece,
    Position, Role, Square,
};

use crate::error::{Error, Result};

/// FEN of the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The queries the result classifier needs from a board.
pub trait Rules {
    fn turn(&self) -> Color;
    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;
    /// Fifty-move or threefold claim available to the side to move
    fn can_claim_draw(&self) -> bool;
    fn can_claim_threefold_repetition(&self) -> bool;
    fn halfmove_clock(&self) -> u32;
}

#[derive(Debug, Clone)]
pub struct GameBoard {
    start: Chess,
    position: Chess,
    moves: Vec<Move>,
    san_moves: Vec<String>,
    /// One key per position reached, starting position included
    keys: Vec<String>,
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::from_position(Chess::default())
    }
}

impl GameBoard {
    /// Creates a board in the standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Chess) -> Self {
        let key = repetition_key(&position);
        Self {
            start: position.clone(),
            position,
            moves: Vec::new(),
            san_moves: Vec::new(),
            keys: vec![key],
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let parsed: Fen = fen
            .parse()
            .map_err(|e| Error::Position(format!("{}: {}", fen, e)))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| Error::Position(format!("{}: {}", fen, e)))?;
        Ok(Self::from_position(position))
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square)
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// FEN of the starting position, or `None` for the standard setup
    pub fn start_fen(&self) -> Option<String> {
        let fen = Fen::from_position(&self.start, EnPassantMode::Legal).to_string();
        if fen == STARTING_FEN {
            None
        } else {
            Some(fen)
        }
    }

    /// Moves played so far, oldest first
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// SAN of each played move, with `+`/`#` suffixes
    pub fn san_moves(&self) -> &[String] {
        &self.san_moves
    }

    /// Played moves in UCI notation
    pub fn uci_moves(&self) -> Vec<String> {
        self.moves.iter().map(|m| uci_string(*m)).collect()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.position.legal_moves().contains(&mv)
    }

    /// True when no legal move remains or neither side can mate
    pub fn is_game_over(&self) -> bool {
        self.position.legal_moves().is_empty() || self.position.is_insufficient_material()
    }

    /// SAN of `mv` in the current position, including the check suffix
    pub fn san(&self, mv: Move) -> Result<String> {
        let next = self.after(mv)?;
        Ok(san_with_suffix(&self.position, &next, mv))
    }

    /// Applies a legal move
    pub fn push(&mut self, mv: Move) -> Result<()> {
        let next = self.after(mv)?;
        let san = san_with_suffix(&self.position, &next, mv);

        self.keys.push(repetition_key(&next));
        self.san_moves.push(san);
        self.moves.push(mv);
        self.position = next;
        Ok(())
    }

    /// Parses and plays a move in SAN (`Nf3`, `exd5`, `Qh5#`)
    pub fn push_san(&mut self, san: &str) -> Result<Move> {
        let parsed: SanPlus = san
            .parse()
            .map_err(|e| Error::IllegalMove(format!("{}: {}", san, e)))?;
        let mv = parsed
            .san
            .to_move(&self.position)
            .map_err(|e| Error::IllegalMove(format!("{}: {}", san, e)))?;
        self.push(mv)?;
        Ok(mv)
    }

    /// Finds the legal move going from `from` to `to`.
    ///
    /// Castling is found by the king's two-square step. Pawn moves to the last
    /// rank resolve to the queen promotion.
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        let wanted = format!("{}{}", from, to);
        self.legal_moves().into_iter().find(|m| {
            uci_string(*m).starts_with(&wanted) && matches!(m.promotion(), None | Some(Role::Queen))
        })
    }

    pub fn can_claim_fifty_moves(&self) -> bool {
        let legal = self.position.legal_moves();
        if legal.is_empty() {
            return false;
        }
        let clock = self.position.halfmoves();
        if clock >= 100 {
            return true;
        }
        clock >= 99
            && legal.into_iter().any(|mv| {
                self.position
                    .clone()
                    .play(mv)
                    .map(|next| next.halfmoves() >= 100 && !next.legal_moves().is_empty())
                    .unwrap_or(false)
            })
    }

    fn occurrences(&self, key: &str) -> usize {
        self.keys.iter().filter(|k| k.as_str() == key).count()
    }

    fn after(&self, mv: Move) -> Result<Chess> {
        if !self.is_legal(mv) {
            return Err(Error::IllegalMove(uci_string(mv)));
        }
        self.position
            .clone()
            .play(mv)
            .map_err(|_| Error::IllegalMove(uci_string(mv)))
    }
}

impl Rules for GameBoard {
    fn turn(&self) -> Color {
        self.position.turn()
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn can_claim_draw(&self) -> bool {
        self.can_claim_fifty_moves() || self.can_claim_threefold_repetition()
    }

    /// The current position occurred three times, or some legal move makes it so
    fn can_claim_threefold_repetition(&self) -> bool {
        let Some(current) = self.keys.last() else {
            return false;
        };
        if self.occurrences(current) >= 3 {
            return true;
        }

        self.position.legal_moves().into_iter().any(|mv| {
            self.position
                .clone()
                .play(mv)
                .map(|next| self.occurrences(&repetition_key(&next)) + 1 >= 3)
                .unwrap_or(false)
        })
    }

    fn halfmove_clock(&self) -> u32 {
        self.position.halfmoves()
    }
}

/// Move in UCI notation, castling written as the king's step
pub fn uci_string(mv: Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

/// Placement, side to move, castling rights and legal en passant square
fn repetition_key(position: &Chess) -> String {
    let fen = Fen::from_position(position, EnPassantMode::Legal).to_string();
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

fn san_with_suffix(before: &Chess, after: &Chess, mv: Move) -> String {
    let mut san = San::from_move(before, mv).to_string();
    if after.is_checkmate() {
        san.push('#');
    } else if after.is_check() {
        san.push('+');
    }
    san
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(board: &mut GameBoard, sans: &[&str]) {
        for san in sans {
            board.push_san(san).unwrap();
        }
    }

    #[test]
    fn test_starting_position() {
        let board = GameBoard::new();
        assert_eq!(board.turn(), Color::White);
        assert_eq!(board.legal_moves().len(), 20);
        assert_eq!(board.fen(), STARTING_FEN);
        assert!(board.start_fen().is_none());
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_push_records_san_and_uci() {
        let mut board = GameBoard::new();
        play_all(&mut board, &["e4", "e5", "Nf3"]);

        assert_eq!(board.san_moves(), ["e4", "e5", "Nf3"]);
        assert_eq!(board.uci_moves(), ["e2e4", "e7e5", "g1f3"]);
        assert_eq!(board.turn(), Color::Black);
    }

    #[test]
    fn test_push_rejects_illegal_move() {
        let mut board = GameBoard::new();
        assert!(board.push_san("e5").is_err());
        assert!(board.push_san("Ke2").is_err());
        assert!(board.moves().is_empty());
    }

    #[test]
    fn test_check_and_mate_suffixes() {
        let mut board = GameBoard::new();
        play_all(&mut board, &["e4", "f6", "d4", "g5", "Qh5#"]);
        assert_eq!(board.san_moves().last().map(String::as_str), Some("Qh5#"));
        assert!(board.is_checkmate());
        assert!(board.is_game_over());
    }

    #[test]
    fn test_find_move_resolves_castling_and_promotion() {
        let board = GameBoard::from_fen("4k3/P7/8/8/8/8/8/4K2R w K - 0 1").unwrap();

        let castle = board.find_move(Square::E1, Square::G1).unwrap();
        assert_eq!(uci_string(castle), "e1g1");

        let promotion = board.find_move(Square::A7, Square::A8).unwrap();
        assert_eq!(promotion.promotion(), Some(Role::Queen));

        assert!(board.find_move(Square::E1, Square::E3).is_none());
    }

    #[test]
    fn test_start_fen_for_custom_position() {
        let fen = "8/8/8/4k3/8/4K3/8/R7 w - - 0 1";
        let board = GameBoard::from_fen(fen).unwrap();
        assert_eq!(board.start_fen().as_deref(), Some(fen));
    }

    #[test]
    fn test_invalid_fen() {
        assert!(matches!(
            GameBoard::from_fen("not a fen"),
            Err(Error::Position(_))
        ));
    }

    #[test]
    fn test_threefold_claimable_one_move_early() {
        let mut board = GameBoard::new();
        play_all(&mut board, &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6"]);
        assert!(!board.can_claim_threefold_repetition());

        board.push_san("Ng1").unwrap();
        // Ng8 would bring the starting position back a third time
        assert!(board.can_claim_threefold_repetition());
        assert!(board.can_claim_draw());
    }

    #[test]
    fn test_fifty_move_claim() {
        let at_limit = GameBoard::from_fen("8/8/8/4k3/8/4K3/8/R7 w - - 100 60").unwrap();
        assert!(at_limit.can_claim_fifty_moves());

        let one_short = GameBoard::from_fen("8/8/8/4k3/8/4K3/8/R7 w - - 99 60").unwrap();
        assert!(one_short.can_claim_fifty_moves());

        let fresh = GameBoard::from_fen("8/8/8/4k3/8/4K3/8/R7 w - - 40 60").unwrap();
        assert!(!fresh.can_claim_fifty_moves());
    }

    #[test]
    fn test_fifty_move_claim_needs_play_after_the_hundredth_ply() {
        // Kf7 is White's only move and it stalemates Black
        let board = GameBoard::from_fen("7k/7p/5PKP/5PPP/8/8/8/8 w - - 99 80").unwrap();
        assert_eq!(board.legal_moves().len(), 1);
        assert!(!board.can_claim_fifty_moves());
        assert!(!board.can_claim_draw());

        let mut after = board.clone();
        after.push_san("Kf7").unwrap();
        assert!(after.is_stalemate());
    }
}
