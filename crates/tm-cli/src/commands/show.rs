use std::path::Path;

use colored::Colorize;
use tm_core::marker::strip_markers;
use tm_core::{ClueKind, SessionId};

pub fn run(config: Option<&Path>, id: &str) -> Result<(), String> {
    let store = super::open_store(config)?;
    let session = store
        .load(&SessionId::new(id))
        .ok_or_else(|| format!("session not found: {id}"))?;
    let narrative = session.narrative();

    println!("  {} ({})", session.name.bold(), session.id());
    println!("  Host:         {}", session.hostname);
    println!("  Organization: {}", narrative.organization_name);
    println!("  Plot:         {}", narrative.plot_type);
    println!(
        "  Progress:     turn {}, {} phase",
        session.turn_count(),
        session.phase()
    );
    println!(
        "  Clues:        {}/{}",
        session.discovered_clues().len(),
        narrative.count(ClueKind::Clue)
    );
    println!(
        "  Tasks:        {}/{}",
        session.completed_tasks().len(),
        narrative.count(ClueKind::Task)
    );
    println!("  Directory:    {}", session.current_directory());
    println!("  Last played:  {}", super::local_time(session.last_played_at));

    if session.history().is_empty() {
        println!();
        println!("  No commands yet.");
        return Ok(());
    }

    println!();
    println!("  {}", "Transcript".bold());
    for turn in session.history().turns() {
        println!();
        println!("  [{}] > {}", turn.turn_number, turn.user_input);
        for line in strip_markers(&turn.system_response).lines() {
            println!("      {line}");
        }
    }

    Ok(())
}
