//! Core types for Terminal Mystery.
//!
//! This crate holds the passive session model and the pure rules that act on
//! it: the turn-driven phase table, the response marker protocol, and the
//! bounded conversation context used to build prompts. Nothing here touches
//! the network or the filesystem.

/// Error types used throughout the crate.
pub mod error;
/// Conversation log and prompt context window.
pub mod history;
/// Out-of-band markers embedded in generated responses.
pub mod marker;
/// The mystery narrative, its clues and tasks.
pub mod narrative;
/// Narrative phases derived from the turn count.
pub mod phase;
/// Persistent state of one playthrough.
pub mod session;

/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export history types.
pub use history::{ConversationTurn, History};
/// Re-export marker types.
pub use marker::{AppliedMarkers, Marker, MarkerKind, MarkerScan};
/// Re-export narrative types.
pub use narrative::{ClueKind, ClueOrTask, Narrative};
/// Re-export phase types.
pub use phase::{Phase, PhaseTransition};
/// Re-export session types.
pub use session::{Session, SessionId};
