//! Piece images

use std::collections::HashMap;
use std::path::Path;

use macroquad::texture::{load_texture, FilterMode, Texture2D};
use shakmaty::{Color, Piece, Role};
use tracing::info;

use crate::error::AppError;

/// `wp.png`, `bk.png`, ...
pub fn file_name(piece: Piece) -> String {
    let color = match piece.color {
        Color::White => 'w',
        Color::Black => 'b',
    };
    format!("{}{}.png", color, piece.role.char())
}

pub struct SpriteSet {
    textures: HashMap<Piece, Texture2D>,
}

impl SpriteSet {
    /// Loads all twelve sprites from `dir`. Any missing or unreadable file is an error.
    pub async fn load(dir: &Path) -> Result<Self, AppError> {
        let mut textures = HashMap::new();

        for color in Color::ALL {
            for role in Role::ALL {
                let piece = Piece { color, role };
                let path = dir.join(file_name(piece));
                let texture = load_texture(&path.to_string_lossy())
                    .await
                    .map_err(|e| AppError::Sprite {
                        path: path.clone(),
                        reason: format!("{:?}", e),
                    })?;
                texture.set_filter(FilterMode::Linear);
                textures.insert(piece, texture);
            }
        }

        info!("Loaded {} piece sprites from {}", textures.len(), dir.display());
        Ok(Self { textures })
    }

    pub fn get(&self, piece: Piece) -> Option<&Texture2D> {
        self.textures.get(&piece)
    }
}
