use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(config: Option<&Path>) -> Result<(), String> {
    let store = super::open_store(config)?;
    let sessions = store.list_all().map_err(|e| e.to_string())?;

    if sessions.is_empty() {
        println!("  No saved sessions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Turn", "Phase", "Clues", "Last played"]);

    for s in &sessions {
        let clues = format!(
            "{}/{}",
            s.discovered_clues().len(),
            s.narrative().count(tm_core::ClueKind::Clue)
        );
        table.add_row(vec![
            s.id().to_string(),
            s.name.clone(),
            s.turn_count().to_string(),
            s.phase().to_string(),
            clues,
            super::local_time(s.last_played_at),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} sessions", sessions.len());

    Ok(())
}
