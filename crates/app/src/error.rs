//! Runner error types.

use std::path::PathBuf;

use orchestration::{BusError, Message};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to read seed file {}: {source}", .path.display())]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed: {0}")]
    SeedFormat(#[from] serde_json::Error),

    /// The dispatch failed; `log` shows how far it got.
    #[error("dispatch failed: {source}")]
    Dispatch {
        #[source]
        source: BusError,
        log: Vec<Message>,
    },
}

/// Result type alias for runner operations.
pub type Result<T> = std::result::Result<T, AppError>;
