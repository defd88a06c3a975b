//! Turn coordination between the human at the board and the engine
//!
//! A `Session` owns the board and the selected square. The GUI feeds it input
//! events and gives it the engine once per tick; everything else (selection,
//! legality, draw detection, when the game is over) is decided here.

use std::fmt;
use std::time::Duration;

use shakmaty::{Color, Move, Square};
use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::error::Result;
use crate::geometry::{BoardLayout, Point};
use crate::result::{classify, draw_claim, GameResult};
use crate::rules::{GameBoard, Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingHumanClick,
    HumanSquareSelected,
    AwaitingEngineMove,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseDown(Point),
    MouseUp(Point),
    CloseRequested,
}

/// A move that was applied to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub side: Color,
    pub san: String,
}

impl fmt::Display for PlayedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Color::White => "White",
            Color::Black => "Black",
        };
        write!(f, "{} played: {}", side, self.san)
    }
}

pub struct Session {
    board: GameBoard,
    human: Color,
    layout: BoardLayout,
    selected: Option<Square>,
    phase: Phase,
    /// Set by a draw claim; otherwise decided by `classify` at the end
    result: Option<GameResult>,
}

impl Session {
    pub fn new(board: GameBoard, human: Color, layout: BoardLayout) -> Self {
        let mut session = Session {
            board,
            human,
            layout,
            selected: None,
            phase: Phase::AwaitingHumanClick,
            result: None,
        };
        session.check_game_over();
        session
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Result recorded during play, if a draw was claimed
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_human_turn(&self) -> bool {
        self.board.turn() == self.human
    }

    /// Applies one input event. Returns the human's move if one was made.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<PlayedMove> {
        if self.is_over() {
            return None;
        }

        match event {
            InputEvent::CloseRequested => {
                info!("Window closed, ending the game");
                self.selected = None;
                self.phase = Phase::GameOver;
                None
            }
            InputEvent::MouseDown(_) | InputEvent::MouseUp(_) if !self.is_human_turn() => None,
            InputEvent::MouseDown(p) => {
                self.selected = self.layout.square_at(p);
                self.check_game_over();
                None
            }
            InputEvent::MouseUp(p) => {
                let from = self.selected.take();
                let to = self.layout.square_at(p);

                let played = match (from, to) {
                    (Some(from), Some(to)) => match self.board.find_move(from, to) {
                        Some(mv) => match self.commit(mv) {
                            Ok(played) => Some(played),
                            Err(e) => {
                                warn!("Could not play {}{}: {}", from, to, e);
                                None
                            }
                        },
                        None => {
                            debug!("No legal move {}{}, ignoring", from, to);
                            None
                        }
                    },
                    _ => None,
                };

                self.check_game_over();
                played
            }
        }
    }

    /// Lets the engine move if it is its turn.
    ///
    /// Blocks for up to the engine's time budget.
    pub fn engine_turn<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        limit: Duration,
    ) -> Result<Option<PlayedMove>> {
        if self.phase != Phase::AwaitingEngineMove {
            return Ok(None);
        }

        let mv = engine.best_move(&self.board, limit)?;
        let played = self.commit(mv)?;
        Ok(Some(played))
    }

    /// Runs the draw check and works out whose turn it is.
    ///
    /// A claimable draw records `1/2-1/2`. Mate, stalemate and dead positions
    /// end the game without recording anything, leaving it to [`Session::finish`].
    pub fn check_game_over(&mut self) {
        if self.is_over() {
            return;
        }

        if let Some(result) = draw_claim(&self.board) {
            info!("Draw can be claimed, game over ({})", result);
            self.result = Some(result);
            self.selected = None;
            self.phase = Phase::GameOver;
        } else if self.board.is_game_over() {
            info!("No play left on the board, game over");
            self.selected = None;
            self.phase = Phase::GameOver;
        } else if !self.is_human_turn() {
            self.phase = Phase::AwaitingEngineMove;
        } else if self.selected.is_some() {
            self.phase = Phase::HumanSquareSelected;
        } else {
            self.phase = Phase::AwaitingHumanClick;
        }
    }

    /// Final result: the recorded one, or the classifier's verdict on the board
    pub fn finish(&self) -> GameResult {
        self.result.unwrap_or_else(|| classify(&self.board))
    }

    fn commit(&mut self, mv: Move) -> Result<PlayedMove> {
        let side = self.board.turn();
        let san = self.board.san(mv)?;
        self.board.push(mv)?;

        let played = PlayedMove { side, san };
        info!("{}", played);
        self.check_game_over();
        Ok(played)
    }
}
