//! UCI engine process
//!
//! Spawns the engine as a subprocess and talks UCI over its standard streams.
//! Engine output is read on a helper thread and handed over through a channel,
//! so every wait here has a deadline.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use shakmaty::Move;
use tracing::{debug, info, warn};

use super::analysis::SearchReport;
use super::{Engine, EngineError};
use crate::config::EngineConfig;
use crate::rules::{uci_string, GameBoard};

/// How long `quit` waits for a clean exit before killing the process
const EXIT_WAIT: Duration = Duration::from_millis(200);

pub struct UciEngine {
    /// The child process
    process: Child,
    /// Stdin for sending commands
    stdin: ChildStdin,
    /// Lines the reader thread took off the engine's stdout
    lines: Receiver<String>,
    /// Name from `id name`, or the executable name
    name: String,
    /// Extra wait past the requested move time
    grace: Duration,
    closed: bool,
}

impl UciEngine {
    /// Starts the engine and completes the UCI handshake.
    ///
    /// # Example
    /// ```ignore
    /// let engine = UciEngine::spawn(&EngineConfig::default())?;
    /// println!("playing against {}", engine.name());
    /// ```
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut process = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn(format!("{}: {}", config.path.display(), e)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdin".into()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdout".into()))?;

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("uci-reader".into())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;

        let fallback_name = config
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Engine".to_string());

        let mut engine = UciEngine {
            process,
            stdin,
            lines: rx,
            name: fallback_name,
            grace: config.grace(),
            closed: false,
        };

        engine.init_uci(config.handshake_timeout())?;
        info!("Engine '{}' ready", engine.name);

        Ok(engine)
    }

    /// Sends a command to the engine
    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!("uci > {}", cmd);
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads one line, giving up at `deadline`
    fn read_line(&mut self, deadline: Instant, waiting_for: &str) -> Result<String, EngineError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match self.lines.recv_timeout(remaining) {
            Ok(line) => {
                let line = line.trim().to_string();
                debug!("uci < {}", line);
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout {
                waiting_for: waiting_for.to_string(),
                after: remaining,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Closed),
        }
    }

    /// Reads lines until one starts with `expected`
    fn read_until(
        &mut self,
        expected: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, EngineError> {
        let deadline = Instant::now() + timeout;
        let mut lines = Vec::new();
        loop {
            let line = self.read_line(deadline, expected)?;
            let done = line.starts_with(expected);
            lines.push(line);
            if done {
                break;
            }
        }
        Ok(lines)
    }

    fn init_uci(&mut self, timeout: Duration) -> Result<(), EngineError> {
        self.send("uci")?;
        for line in self.read_until("uciok", timeout)? {
            if let Some(name) = line.strip_prefix("id name ") {
                self.name = name.trim().to_string();
            }
        }

        self.send("ucinewgame")?;
        self.send("isready")?;
        self.read_until("readyok", timeout)?;
        Ok(())
    }

    /// Sets the position to search
    ///
    /// # Arguments
    /// * `fen` - FEN string, or None for starting position
    /// * `moves` - Moves in UCI notation played from that position
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> Result<(), EngineError> {
        let pos_str = match fen {
            Some(f) => format!("position fen {}", f),
            None => "position startpos".to_string(),
        };

        let cmd = if moves.is_empty() {
            pos_str
        } else {
            format!("{} moves {}", pos_str, moves.join(" "))
        };

        self.send(&cmd)
    }

    /// Searches the current position for `movetime`.
    ///
    /// If no `bestmove` arrives within `movetime` plus the grace period the
    /// engine is told to `stop`; after one more grace period the search fails
    /// with [`EngineError::Timeout`].
    pub fn search(&mut self, movetime: Duration) -> Result<SearchReport, EngineError> {
        self.send(&format!("go movetime {}", movetime.as_millis()))?;

        let mut report = SearchReport::new(String::new());
        let mut deadline = Instant::now() + movetime + self.grace;
        let mut stopped = false;

        loop {
            let line = match self.read_line(deadline, "bestmove") {
                Ok(line) => line,
                Err(EngineError::Timeout { .. }) if !stopped => {
                    warn!("Engine overran its {:?} budget, sending stop", movetime);
                    self.send("stop")?;
                    stopped = true;
                    deadline = Instant::now() + self.grace;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if line.starts_with("bestmove") {
                // "bestmove e2e4 ponder e7e5"
                match line.split_whitespace().nth(1) {
                    Some("(none)") | None => {
                        return Err(EngineError::Protocol(format!("no move in '{}'", line)))
                    }
                    Some(mv) => report.best_move = mv.to_string(),
                }
                break;
            } else if line.starts_with("info") {
                report.absorb_info(&line);
            }
        }

        Ok(report)
    }
}

impl Engine for UciEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn best_move(&mut self, board: &GameBoard, limit: Duration) -> Result<Move, EngineError> {
        let fen = board.start_fen();
        self.set_position(fen.as_deref(), &board.uci_moves())?;

        let report = self.search(limit)?;
        if let Some(eval) = report.evaluation {
            debug!(
                "{} chose {} (depth {}, {}, {} nodes)",
                self.name, report.best_move, report.depth, eval, report.nodes
            );
        }

        board
            .legal_moves()
            .into_iter()
            .find(|m| uci_string(*m) == report.best_move)
            .ok_or_else(|| {
                EngineError::Protocol(format!("illegal best move '{}'", report.best_move))
            })
    }

    /// Asks the engine to exit, killing it if it does not
    fn quit(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let sent = self.send("quit");

        let deadline = Instant::now() + EXIT_WAIT;
        while Instant::now() < deadline {
            if self.process.try_wait()?.is_some() {
                return sent;
            }
            thread::sleep(Duration::from_millis(10));
        }

        warn!("Engine did not exit after quit, killing it");
        let _ = self.process.kill();
        self.process.wait()?;
        sent
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
