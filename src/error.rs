//! Error types shared across the window and frame layers.

use std::path::PathBuf;

use crate::window::WindowHandle;

/// Failures while locating or measuring the game window.
///
/// Neither variant is fatal: automators keep polling and retry on the next tick.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// No visible window title contains the query.
    #[error("no visible window title contains \"{query}\"")]
    NotFound { query: String },
    /// The handle no longer refers to a live window.
    #[error("window {handle} is no longer valid")]
    Invalid { handle: WindowHandle },
}

/// Failures while loading the frame database.
#[derive(Debug, thiserror::Error)]
pub enum FrameDbError {
    #[error("failed to read frame database {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse frame database: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate frame id \"{0}\"")]
    DuplicateId(String),
    #[error("invalid frame \"{frame}\": {reason}")]
    Invalid { frame: String, reason: String },
}
