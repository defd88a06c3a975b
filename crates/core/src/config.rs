//! Runtime configuration
//!
//! Everything has a default, so the file is optional. A `chess_duel.toml` in
//! the working directory overrides individual keys:
//!
//! ```toml
//! pgn_path = "games/mine.pgn"
//!
//! [engine]
//! path = "/usr/games/stockfish"
//! move_time_ms = 1000
//!
//! [display]
//! fps = 30
//! dark_square = [120, 90, 60]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::geometry::{BoardLayout, Orientation};

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "chess_duel.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    /// PGN file finished games are appended to
    pub pgn_path: PathBuf,
    /// Directory holding the twelve piece sprites
    pub resource_dir: PathBuf,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            pgn_path: PathBuf::from("game.pgn"),
            resource_dir: PathBuf::from("Resources"),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Reads `path`, or returns the defaults when it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable, looked up on `PATH` when not absolute
    pub path: PathBuf,
    pub args: Vec<String>,
    /// Thinking time per engine move
    pub move_time_ms: u64,
    /// Extra wait past the move time before `stop` is sent, and again after it
    pub grace_ms: u64,
    pub handshake_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            args: Vec::new(),
            move_time_ms: 2000,
            grace_ms: 1000,
            handshake_timeout_ms: 10_000,
        }
    }
}

impl EngineConfig {
    pub fn move_time(&self) -> Duration {
        Duration::from_millis(self.move_time_ms)
    }

    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

/// An RGB triple, written `[r, g, b]` in TOML
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Side of the 8x8 grid in pixels
    pub board_size: u32,
    pub border_width: u32,
    pub fps: u32,
    pub light_square: Rgb,
    pub dark_square: Rgb,
    pub border_color: Rgb,
    pub label_color: Rgb,
    pub label_size: u16,
    pub highlight: Rgb,
    pub highlight_width: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            board_size: 800,
            border_width: 50,
            fps: 10,
            light_square: Rgb(218, 233, 242),
            dark_square: Rgb(110, 153, 192),
            border_color: Rgb(0, 100, 0),
            label_color: Rgb(218, 233, 242),
            label_size: 36,
            highlight: Rgb(0, 255, 0),
            highlight_width: 5.0,
        }
    }
}

impl DisplayConfig {
    pub fn layout(&self, orientation: Orientation) -> BoardLayout {
        BoardLayout::new(
            self.board_size as f32,
            self.border_width as f32,
            orientation,
        )
    }

    /// Duration of one tick at the configured frame rate
    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}
