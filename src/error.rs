//! Error types
//!
//! Asset loading is the only fallible path in the game. Everything else
//! (input, movement, collisions) has no error states.

use thiserror::Error;

/// Failure while resolving, fetching or decoding an asset
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset `{id}` is not in the manifest")]
    Unknown { id: String },

    #[error("failed to fetch `{url}`: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to read asset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse `{id}`: {reason}")]
    Parse { id: String, reason: String },

    #[error("sprite atlas `{atlas}` has no frame or animation `{frame}`")]
    MissingFrame { atlas: String, frame: String },

    #[error("asset `{id}` is not loaded")]
    NotLoaded { id: String },
}

/// Errors surfaced by the scene sequence
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Asset(#[from] AssetError),
}
