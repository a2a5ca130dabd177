//! Turn engine for Terminal Mystery.
//!
//! [`Engine`] owns the text service and the session store and runs one player
//! command at a time against a session passed in by the caller: advance the
//! turn, generate a reply, apply its markers, record the turn, and autosave on
//! a fixed cadence. Generation failures are replaced by fallbacks here, so a
//! turn always completes.

pub mod engine;
pub mod error;
pub mod menu;

pub use engine::{AUTOSAVE_INTERVAL, Engine, TurnOutcome};
pub use error::{EngineError, EngineResult};
pub use menu::{MenuAction, MenuOutcome};
