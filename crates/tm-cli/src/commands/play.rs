use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use tm_core::Session;
use tm_engine::menu::is_menu_command;
use tm_engine::{Engine, MenuAction, MenuOutcome};
use tm_oracle::{Deadline, GeminiClient};
use tm_store::{ConfigError, GameConfig, SessionStore};

use crate::render;

/// Sessions offered for resuming in the main menu.
const MAX_RESUMABLE: usize = 5;

type GameEngine = Engine<Deadline<GeminiClient>>;

/// How a game loop ended.
enum Exit {
    MainMenu,
    EndOfInput,
}

pub fn run(config: Option<&Path>) -> Result<(), String> {
    let path = GameConfig::locate(config);
    let config = match GameConfig::load(&path) {
        Ok(config) => config,
        Err(ConfigError::NotConfigured { path }) => {
            render::config_help(&path);
            return Err(format!("not configured: set api_key in {}", path.display()));
        }
        Err(e) => return Err(e.to_string()),
    };

    let engine = build_engine(&config)?;
    tracing::info!(saves = %engine.store().dir().display(), "starting");

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(mut session) = main_menu(&engine, &mut input)? else {
            break;
        };
        if let Exit::EndOfInput = play_session(&engine, &mut session, &mut input)? {
            break;
        }
    }

    println!("{}", "NO CARRIER".green());
    Ok(())
}

fn build_engine(config: &GameConfig) -> Result<GameEngine, String> {
    let client = GeminiClient::new(
        config.api_key.trim(),
        &config.narrative_model,
        &config.command_model,
        config.timeout(),
    )
    .map_err(|e| format!("failed to start text service: {e}"))?;
    let store = SessionStore::open(config.saves_path()).map_err(|e| e.to_string())?;
    Ok(Engine::new(Deadline::new(client, config.timeout()), store))
}

/// Show the main menu until the player picks a session or leaves.
fn main_menu(engine: &GameEngine, input: &mut impl BufRead) -> Result<Option<Session>, String> {
    loop {
        let mut sessions = engine
            .recent_sessions(MAX_RESUMABLE)
            .map_err(|e| e.to_string())?;

        println!();
        println!("{}", "=== TERMINAL MYSTERY ===".green().bold());
        println!();
        println!("  [N] NEW SESSION");
        for (i, s) in sessions.iter().enumerate() {
            println!(
                "  [{}] RESUME: {} (Turn {}, {})",
                i + 1,
                s.name,
                s.turn_count(),
                super::local_time(s.last_played_at)
            );
        }
        println!("  [E] EXIT");
        println!();

        let Some(choice) = ask("SELECT> ", input)? else {
            return Ok(None);
        };
        let choice = choice.trim().to_ascii_lowercase();

        match choice.as_str() {
            "n" | "new" => return new_session(engine, input).map(Some),
            "e" | "exit" | "q" | "quit" => return Ok(None),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=sessions.len()).contains(&n) => {
                    return Ok(Some(sessions.swap_remove(n - 1)));
                }
                _ => println!("{}", "INVALID SELECTION".red()),
            },
        }
    }
}

fn new_session(engine: &GameEngine, input: &mut impl BufRead) -> Result<Session, String> {
    let name = ask("SESSION NAME (enter for default)> ", input)?.unwrap_or_default();
    println!("{}", "DIALING REMOTE HOST...".green());
    println!("{}", "ESTABLISHING CONNECTION...".green());
    engine
        .new_session(Some(&name))
        .map_err(|e| format!("failed to create session: {e}"))
}

/// Run commands against the session until the player leaves.
fn play_session(
    engine: &GameEngine,
    session: &mut Session,
    input: &mut impl BufRead,
) -> Result<Exit, String> {
    render::welcome(session);

    loop {
        let Some(line) = ask(&render::prompt(session), input)? else {
            engine.save(session).map_err(|e| e.to_string())?;
            return Ok(Exit::EndOfInput);
        };

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        if is_menu_command(command) {
            if let MenuOutcome::Leave = game_menu(engine, session, input)? {
                return Ok(Exit::MainMenu);
            }
            continue;
        }

        println!("{}", "PROCESSING...".dimmed());
        let outcome = engine
            .process_turn(session, command)
            .map_err(|e| format!("failed to save session: {e}"))?;

        if let Some(t) = outcome.transition {
            render::phase_banner(t);
        }
        render::response(&outcome.display);
        if outcome.autosaved {
            println!("{}\n", "[session autosaved]".dimmed());
        }
    }
}

fn game_menu(
    engine: &GameEngine,
    session: &mut Session,
    input: &mut impl BufRead,
) -> Result<MenuOutcome, String> {
    println!();
    println!("{}", "--- GAME MENU ---".cyan());
    println!("  [S] Save");
    println!("  [R] Return to terminal");
    println!("  [Q] Save and quit to main menu");
    println!("  [X] Quit without saving");

    let choice = ask("CHOICE> ", input)?.unwrap_or_default();
    let action = MenuAction::parse(&choice);
    let outcome = engine
        .handle_menu(session, action)
        .map_err(|e| e.to_string())?;

    match action {
        MenuAction::Save => println!("{}\n", "SESSION SAVED".bright_green()),
        MenuAction::SaveAndQuit => println!("{}", "SESSION SAVED. DISCONNECTING...".bright_green()),
        MenuAction::QuitWithoutSaving => println!("{}", "DISCONNECTING...".yellow()),
        MenuAction::Return => println!(),
    }
    Ok(outcome)
}

/// Print a prompt and read one line. `None` at end of input.
fn ask(prompt: &str, input: &mut impl BufRead) -> Result<Option<String>, String> {
    print!("{prompt}");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(line)),
        Err(e) => Err(e.to_string()),
    }
}
