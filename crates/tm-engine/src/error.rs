//! Error types for the turn engine.

use thiserror::Error;
use tm_core::SessionId;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors the engine cannot recover from in-fiction.
///
/// Generation failures never show up here; they are replaced by fallbacks.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Persisting or listing sessions failed.
    #[error("{0}")]
    Store(#[from] tm_store::StoreError),

    /// No readable session with this id.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
}
