//! Terminal rendering.

use std::path::Path;

use colored::Colorize;
use tm_core::{Phase, PhaseTransition, Session};

/// How a line of terminal output is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Alert,
    Success,
    Classified,
    Rule,
    Plain,
}

impl LineStyle {
    pub fn of(line: &str) -> Self {
        let has = |words: &[&str]| words.iter().any(|w| line.contains(w));
        if has(&["ERROR", "DENIED", "WARNING"]) {
            Self::Alert
        } else if has(&["ACCESS GRANTED", "SUCCESS", "DECRYPTED"]) {
            Self::Success
        } else if has(&["CLASSIFIED", "TOP SECRET", "EYES ONLY"]) {
            Self::Classified
        } else if [">>>", "---", "==="].iter().any(|p| line.starts_with(p)) {
            Self::Rule
        } else {
            Self::Plain
        }
    }

    fn paint(self, line: &str) -> String {
        match self {
            Self::Alert => line.red().to_string(),
            Self::Success => line.bright_green().bold().to_string(),
            Self::Classified => line.yellow().bold().to_string(),
            Self::Rule => line.cyan().to_string(),
            Self::Plain => line.green().to_string(),
        }
    }
}

/// Print a terminal reply, one colored line at a time.
pub fn response(text: &str) {
    for line in text.lines() {
        println!("{}", LineStyle::of(line).paint(line));
    }
    println!();
}

/// The shell prompt for the session, without a newline.
pub fn prompt(session: &Session) -> String {
    session.shell_prompt().bright_green().bold().to_string()
}

/// Headline shown when a phase begins.
pub fn phase_headline(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Discovery => None,
        Phase::Investigation => Some("DEEPER ACCESS DETECTED - INVESTIGATION PHASE"),
        Phase::Revelation => Some("CRITICAL DATA EXPOSED - REVELATION PHASE"),
        Phase::Dilemma => Some("DECISION POINT REACHED - DILEMMA PHASE"),
        Phase::Conclusion => Some("FINAL SEQUENCE INITIATED - CONCLUSION PHASE"),
    }
}

/// Announce a phase transition.
pub fn phase_banner(transition: PhaseTransition) {
    if let Some(headline) = phase_headline(transition.to) {
        let rule = "=".repeat(headline.len() + 8);
        println!("{}", rule.yellow());
        println!("{}", format!("    {headline}    ").yellow().bold());
        println!("{}\n", rule.yellow());
    }
}

/// Greeting printed when a session connects.
pub fn welcome(session: &Session) {
    println!();
    println!("{}", format!("CONNECTED TO {}", session.hostname).bright_green().bold());
    println!("{}", format!("PROPERTY OF {}", session.narrative().organization_name).green());
    println!("{}", "UNAUTHORIZED ACCESS IS PROHIBITED".red());
    println!(
        "{}",
        format!(
            "Turn {} | Phase {} | Type !menu for options",
            session.turn_count(),
            session.phase()
        )
        .dimmed()
    );
    println!();
}

/// Explain how to configure the game.
pub fn config_help(path: &Path) {
    let lines = [
        "CONFIGURATION REQUIRED".to_string(),
        String::new(),
        format!("Edit {}", path.display()),
        "and set api_key to your Gemini API key.".to_string(),
    ];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width + 2));
    eprintln!("{}", border.yellow());
    for line in &lines {
        eprintln!("{}", format!("| {line:<width$} |").yellow());
    }
    eprintln!("{}", border.yellow());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_styles() {
        assert_eq!(LineStyle::of("ERROR 404: FILE NOT FOUND"), LineStyle::Alert);
        assert_eq!(LineStyle::of("ACCESS DENIED"), LineStyle::Alert);
        assert_eq!(LineStyle::of("*** ACCESS GRANTED ***"), LineStyle::Success);
        assert_eq!(LineStyle::of("FILE DECRYPTED"), LineStyle::Success);
        assert_eq!(LineStyle::of("TOP SECRET // NOFORN"), LineStyle::Classified);
        assert_eq!(LineStyle::of("--- END OF FILE ---"), LineStyle::Rule);
        assert_eq!(LineStyle::of(">>> loading"), LineStyle::Rule);
        assert_eq!(LineStyle::of("drwxr-xr-x  secure"), LineStyle::Plain);
    }

    #[test]
    fn alert_wins_over_classified() {
        assert_eq!(LineStyle::of("CLASSIFIED: ACCESS DENIED"), LineStyle::Alert);
    }

    #[test]
    fn every_later_phase_has_a_headline() {
        assert!(phase_headline(Phase::Discovery).is_none());
        for phase in &Phase::ALL[1..] {
            assert!(phase_headline(*phase).is_some());
        }
    }
}
