//! End-to-end games driven through `Session` with a scripted opponent
//!
//! These cover the whole path a real game takes: mouse events in, engine
//! moves, game end, and the PGN file on disk.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chess_duel_core::engine::EngineError;
use chess_duel_core::rules::uci_string;
use chess_duel_core::{
    BoardLayout, Engine, GameBoard, GameResult, InputEvent, Orientation, PgnArchive, Phase,
    Session,
};
use shakmaty::{Color, Move, Square};

const MOVE_TIME: Duration = Duration::from_millis(2000);

/// Plays a fixed list of UCI moves, one per request
struct ScriptedEngine {
    replies: VecDeque<&'static str>,
    requests: Vec<Duration>,
    quit: bool,
}

impl ScriptedEngine {
    fn new(replies: &[&'static str]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            requests: Vec::new(),
            quit: false,
        }
    }
}

impl Engine for ScriptedEngine {
    fn name(&self) -> &str {
        "Scripted 1.0"
    }

    fn best_move(&mut self, board: &GameBoard, limit: Duration) -> Result<Move, EngineError> {
        self.requests.push(limit);
        let reply = self
            .replies
            .pop_front()
            .ok_or_else(|| EngineError::Protocol("script exhausted".into()))?;
        board
            .legal_moves()
            .into_iter()
            .find(|m| uci_string(*m) == reply)
            .ok_or_else(|| EngineError::Protocol(format!("illegal scripted move {}", reply)))
    }

    fn quit(&mut self) -> Result<(), EngineError> {
        self.quit = true;
        Ok(())
    }
}

fn new_session(board: GameBoard, human: Color) -> Session {
    let layout = BoardLayout::new(800.0, 50.0, Orientation::for_side(human));
    Session::new(board, human, layout)
}

/// Presses on `from` and releases on `to`
fn drag(session: &mut Session, from: Square, to: Square) {
    let press = session.layout().square_rect(from).center();
    let release = session.layout().square_rect(to).center();
    session.handle_event(InputEvent::MouseDown(press));
    session.handle_event(InputEvent::MouseUp(release));
}

fn temp_pgn(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "chess_duel_scenario_{}_{}.pgn",
        name,
        std::process::id()
    ));
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn human_opens_and_engine_answers() {
    let mut engine = ScriptedEngine::new(&["e7e5"]);
    let mut session = new_session(GameBoard::new(), Color::White);

    drag(&mut session, Square::E2, Square::E4);
    assert_eq!(session.phase(), Phase::AwaitingEngineMove);

    let reply = session.engine_turn(&mut engine, MOVE_TIME).unwrap().unwrap();
    assert_eq!(reply.to_string(), "Black played: e5");
    assert_eq!(engine.requests, [MOVE_TIME]);

    assert_eq!(session.board().moves().len(), 2);
    assert_eq!(session.phase(), Phase::AwaitingHumanClick);
    assert!(!session.is_over());
    assert_eq!(session.result(), None);
    assert_eq!(session.finish(), GameResult::Undetermined);

    // Not the engine's turn any more
    assert!(session.engine_turn(&mut engine, MOVE_TIME).unwrap().is_none());
    assert_eq!(engine.requests.len(), 1);
}

#[test]
fn engine_moves_first_when_human_is_black() {
    let mut engine = ScriptedEngine::new(&["d2d4"]);
    let mut session = new_session(GameBoard::new(), Color::Black);

    // Clicking during the engine's turn changes nothing
    drag(&mut session, Square::E7, Square::E5);
    assert!(session.board().moves().is_empty());

    session.engine_turn(&mut engine, MOVE_TIME).unwrap();
    drag(&mut session, Square::D7, Square::D5);

    assert_eq!(session.board().san_moves(), ["d4", "d5"]);
    assert_eq!(session.phase(), Phase::AwaitingEngineMove);
}

#[test]
fn mating_move_ends_game_and_is_saved() {
    let path = temp_pgn("mate");
    let archive = PgnArchive::new(&path);
    // An earlier game already in the file
    archive
        .save_game(&GameBoard::new(), Color::Black, "Old Engine", GameResult::Undetermined)
        .unwrap();

    let mut engine = ScriptedEngine::new(&[]);
    let board =
        GameBoard::from_fen("rnbqkbnr/ppppp2p/5p2/6p1/3PP3/8/PPP2PPP/RNBQKBNR w KQkq - 0 3")
            .unwrap();
    let mut session = new_session(board, Color::White);

    drag(&mut session, Square::D1, Square::H5);
    assert!(session.is_over());
    assert!(session.engine_turn(&mut engine, MOVE_TIME).unwrap().is_none());
    assert!(engine.requests.is_empty());

    let result = session.finish();
    assert_eq!(result, GameResult::WhiteWins);

    let count = archive
        .save_game(session.board(), session.human(), engine.name(), result)
        .unwrap();
    assert_eq!(count, 2);

    let games = archive.load().unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].white(), Some("Old Engine"));
    let saved = &games[1];
    assert_eq!(saved.result(), Some("1-0"));
    assert_eq!(saved.white(), Some("Human"));
    assert_eq!(saved.black(), Some("Scripted 1.0"));
    assert_eq!(saved.moves, ["Qh5#"]);
    assert_eq!(saved.header("SetUp"), Some("1"));

    fs::remove_file(&path).unwrap();
}

#[test]
fn human_black_delivers_mate() {
    let board =
        GameBoard::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
            .unwrap();
    let mut session = new_session(board, Color::Black);

    drag(&mut session, Square::D8, Square::H4);
    assert!(session.is_over());
    assert_eq!(session.finish(), GameResult::BlackWins);
}

#[test]
fn fools_mate_by_engine() {
    let mut engine = ScriptedEngine::new(&["e7e5", "d8h4"]);
    let mut session = new_session(GameBoard::new(), Color::White);

    drag(&mut session, Square::F2, Square::F3);
    session.engine_turn(&mut engine, MOVE_TIME).unwrap();
    drag(&mut session, Square::G2, Square::G4);
    let mate = session.engine_turn(&mut engine, MOVE_TIME).unwrap().unwrap();

    assert_eq!(mate.san, "Qh4#");
    assert!(session.is_over());
    assert_eq!(session.result(), None);
    assert_eq!(session.finish(), GameResult::BlackWins);
}

#[test]
fn repetition_stops_the_game_as_a_draw() {
    let mut engine = ScriptedEngine::new(&["g8f6", "f6g8", "g8f6", "f6g8"]);
    let mut session = new_session(GameBoard::new(), Color::White);

    for _ in 0..2 {
        drag(&mut session, Square::G1, Square::F3);
        session.engine_turn(&mut engine, MOVE_TIME).unwrap();
        if session.is_over() {
            break;
        }
        drag(&mut session, Square::F3, Square::G1);
        session.engine_turn(&mut engine, MOVE_TIME).unwrap();
    }

    // After Nf3 Nf6 Ng1 Ng8 Nf3 Nf6 Ng1, Black can claim with Ng8
    assert!(session.is_over());
    assert_eq!(session.board().moves().len(), 7);
    assert_eq!(session.result(), Some(GameResult::Draw));
    assert_eq!(session.finish(), GameResult::Draw);
}

#[test]
fn engine_failure_propagates() {
    let mut engine = ScriptedEngine::new(&[]);
    let mut session = new_session(GameBoard::new(), Color::Black);
    assert!(session.engine_turn(&mut engine, MOVE_TIME).is_err());
    assert!(session.board().moves().is_empty());

    engine.quit().unwrap();
    assert!(engine.quit);
}
