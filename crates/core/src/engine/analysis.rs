//! What the engine reported while searching

use std::fmt;

/// Position evaluation from the engine's point of view (side to move)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Centipawn score
    Centipawns(i32),
    /// Forced mate in this many moves (negative = getting mated)
    Mate(i32),
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => {
                let score = *cp as f32 / 100.0;
                if score >= 0.0 {
                    write!(f, "+{:.2}", score)
                } else {
                    write!(f, "{:.2}", score)
                }
            }
            Evaluation::Mate(moves) => write!(f, "M{}", moves),
        }
    }
}

/// Result of one `go` request
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Best move in UCI notation (e.g., "e2e4")
    pub best_move: String,
    /// Last score seen in an `info` line
    pub evaluation: Option<Evaluation>,
    /// Deepest depth seen in an `info` line
    pub depth: u8,
    pub nodes: u64,
}

impl SearchReport {
    pub fn new(best_move: String) -> Self {
        Self {
            best_move,
            evaluation: None,
            depth: 0,
            nodes: 0,
        }
    }

    /// Folds one `info ...` line into the report
    pub fn absorb_info(&mut self, line: &str) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let mut i = 0;

        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    if let Some(depth) = parts.get(i + 1).and_then(|d| d.parse().ok()) {
                        self.depth = depth;
                    }
                    i += 2;
                }
                "nodes" => {
                    if let Some(nodes) = parts.get(i + 1).and_then(|n| n.parse().ok()) {
                        self.nodes = nodes;
                    }
                    i += 2;
                }
                "score" => {
                    let value = parts.get(i + 2).and_then(|v| v.parse::<i32>().ok());
                    match (parts.get(i + 1).copied(), value) {
                        (Some("cp"), Some(cp)) => {
                            self.evaluation = Some(Evaluation::Centipawns(cp))
                        }
                        (Some("mate"), Some(m)) => self.evaluation = Some(Evaluation::Mate(m)),
                        _ => {}
                    }
                    i += 3;
                }
                // Everything after "pv" is the line itself
                "pv" => break,
                _ => i += 1,
            }
        }
    }
}
