//! Generation contract for Terminal Mystery.
//!
//! The game talks to a generative text service through the [`TextService`]
//! trait: one prompt in, one text out, or a [`GenerationError`]. On top of that
//! seam, [`Narrator`] builds the prompts for narratives, hostnames, and player
//! commands and validates what comes back. Fallback policy is left to the
//! caller.
//!
//! [`GeminiClient`] is the production service; [`Deadline`] bounds any service
//! with a timeout.

pub mod deadline;
pub mod error;
pub mod gemini;
pub mod narrator;
pub mod prompt;
pub mod service;

pub use deadline::Deadline;
pub use error::{GenerationError, GenerationResult};
pub use gemini::GeminiClient;
pub use narrator::Narrator;
pub use service::{Purpose, TextService};
