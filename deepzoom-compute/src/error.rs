//! Render error types.

use deepzoom_core::CoreError;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Invalid render request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Render cancelled")]
    Cancelled,

    #[error("A render worker panicked")]
    WorkerPanicked,
}
