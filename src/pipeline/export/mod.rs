pub mod record;
pub mod summary;

pub use record::*;
pub use summary::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid record file {path}: {reason}")]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("Output folder is not a directory: {0}")]
    NotADirectory(PathBuf),
}
