use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by host-facing helpers. The search itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("FEN error: {0}")]
    Fen(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
