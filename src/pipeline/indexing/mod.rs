pub mod elastic;
pub mod loader;
pub mod types;

pub use elastic::*;
pub use loader::*;
pub use types::*;

use thiserror::Error;

use crate::pipeline::export::ExportError;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Search service not reachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Search service error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    ResponseParsing(String),

    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}
