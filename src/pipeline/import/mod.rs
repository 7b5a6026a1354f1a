pub mod format;
pub mod identity;
pub mod naming;

pub use format::*;
pub use identity::*;
pub use naming::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input folder not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Invalid filename pattern: {0}")]
    InvalidPattern(String),

    #[error("Filename pattern is missing capture group '{0}'")]
    MissingCaptureGroup(String),
}
