use std::path::Path;

use colored::Colorize;
use tm_core::SessionId;

pub fn run(config: Option<&Path>, id: &str) -> Result<(), String> {
    let store = super::open_store(config)?;
    let id = SessionId::new(id);

    if store.delete(&id).map_err(|e| e.to_string())? {
        println!("  {} session {id}", "Deleted".bold());
    } else {
        println!("  No saved session with id {id}.");
    }
    Ok(())
}
