//! On-disk storage for finished games

mod archive;

pub use archive::{game_record, PgnArchive, HUMAN_NAME};
