//! Errors raised at the edges of the reconciler (loading states and events)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwinError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
