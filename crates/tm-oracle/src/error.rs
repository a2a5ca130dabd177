//! Error types for text generation.

use std::time::Duration;

use thiserror::Error;

/// Result type for generation calls.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Why a generation call produced nothing usable.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The call did not finish within its bound.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response could not be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The generated narrative failed validation.
    #[error("invalid narrative: {0}")]
    InvalidNarrative(#[from] tm_core::CoreError),

    /// The response contained no text.
    #[error("empty response")]
    Empty,
}

impl GenerationError {
    /// In-fiction description shown to the player instead of the raw error.
    pub fn carrier_message(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "LINE TIMEOUT - REMOTE HOST NOT RESPONDING",
            Self::Transport(_) => "NO CARRIER",
            Self::Status { status: 429, .. } => "REMOTE HOST BUSY",
            Self::Status { .. } => "REMOTE HOST REJECTED REQUEST",
            Self::Malformed(_) | Self::InvalidNarrative(_) => "DATA CORRUPTED IN TRANSIT",
            Self::Empty => "NO DATA RECEIVED",
        }
    }

    /// Full synthetic response used when a command cannot be answered.
    pub fn connection_error_response(&self) -> String {
        format!(
            "CONNECTION ERROR: {}\nRetrying connection...",
            self.carrier_message()
        )
    }
}
