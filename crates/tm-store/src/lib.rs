//! Persistence for Terminal Mystery.
//!
//! [`SessionStore`] keeps one JSON record per session in the saves directory,
//! always replacing a record whole. [`GameConfig`] is the TOML key-value record
//! holding the credential, model names, and saves location.

pub mod config;
pub mod error;
pub mod store;

pub use config::GameConfig;
pub use error::{ConfigError, ConfigResult, StoreError, StoreResult};
pub use store::SessionStore;
