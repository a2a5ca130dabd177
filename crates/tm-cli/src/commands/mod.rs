pub mod delete;
pub mod list;
pub mod play;
pub mod show;

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use tm_store::{GameConfig, SessionStore};

/// Open the saves directory without requiring a credential.
fn open_store(config: Option<&Path>) -> Result<SessionStore, String> {
    let path = GameConfig::locate(config);
    let config = GameConfig::load_or_default(&path).map_err(|e| e.to_string())?;
    SessionStore::open(config.saves_path()).map_err(|e| e.to_string())
}

/// `yyyy-mm-dd HH:MM` in local time.
fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
