/// Error type shared by the persistence and configuration layers.
///
/// Scan and metadata failures never reach this type: they are absorbed
/// where they happen (omitted field, empty subtree) and only logged.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed folder tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("no folder loaded to save")]
    NoTree,
}

impl BrowserError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BrowserError>;
