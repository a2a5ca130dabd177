//! Error types for the core model.

use thiserror::Error;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while validating narrative content.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The narrative JSON could not be decoded.
    #[error("narrative is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required narrative field was blank.
    #[error("narrative field is empty: {0}")]
    MissingField(&'static str),

    /// A clue or task id that markers cannot name.
    #[error("clue id {0:?} must be letters, digits, or underscores")]
    InvalidClueId(String),

    /// Two clues or tasks share an identifier.
    #[error("duplicate clue id: {0}")]
    DuplicateClueId(String),

    /// A clue or task names a reveal phase outside 1-4.
    #[error("clue {id} has reveal phase {phase}, expected 1-4")]
    RevealPhaseOutOfRange {
        /// The offending clue id.
        id: String,
        /// The reveal phase it declared.
        phase: u8,
    },
}
