//! Prompt construction.

use tm_core::history::CONTEXT_WINDOW;
use tm_core::{Phase, Session};

/// Plot themes a new narrative is drawn from.
pub const PLOT_THEMES: [&str; 15] = [
    "Government military defense system (like WarGames WOPR)",
    "Secret UFO/UAP research program",
    "Deep state conspiracy network",
    "International crime syndicate operations",
    "Dark web black market platform",
    "Illuminati shadow organization",
    "Corporate espionage ring",
    "High-frequency trading manipulation scheme",
    "Covert surveillance dragnet program",
    "Bioweapons research facility",
    "AI consciousness experiment gone wrong",
    "Time-travel research project",
    "Parallel dimension communication array",
    "Mind control MKUltra successor program",
    "Nuclear launch failsafe system",
];

/// What the terminal should be doing in each phase.
pub fn phase_guidance(phase: Phase) -> &'static str {
    match phase {
        Phase::Discovery => {
            "Initial exploration - let player discover basic system structure, hint at something hidden"
        }
        Phase::Investigation => {
            "Deeper investigation - reveal connections, encrypted files, restricted areas"
        }
        Phase::Revelation => "Major reveals - uncover the true purpose, shocking discoveries",
        Phase::Dilemma => {
            "Present the ethical choice - player must decide what to do with this knowledge"
        }
        Phase::Conclusion => "Dramatic finale - consequences of choice, final revelations",
    }
}

/// Prompt asking for a complete narrative as JSON.
pub fn narrative_prompt(theme: &str) -> String {
    format!(
        r#"You are a creative writer designing a text adventure game narrative. Generate a unique, compelling mystery story for a game where the player has discovered a mysterious computer terminal connected to the internet or via dial-up modem.

Selected plot theme: {theme}

Create a detailed narrative with the following JSON structure. Be creative and specific. The story should feel authentic to the 1980s-1990s era of computing with appropriate technical details.

Return ONLY valid JSON with this exact structure:
{{
    "plotType": "{theme}",
    "organizationName": "A mysterious organization name (e.g., NEXUS-7, ECHELON, PROMETHEUS)",
    "systemPurpose": "What this computer system is used for (2-3 sentences)",
    "backstory": "The history of this system and why it exists (3-4 sentences)",
    "secretToUncover": "The main secret the player will discover (2-3 sentences)",
    "ethicalDilemma": "A moral choice the player must make near the end (2-3 sentences)",
    "keyCharacters": ["Character 1 with role", "Character 2 with role", "Character 3 with role"],
    "cluesAndTasks": [
        {{"id": "c1", "type": "clue", "description": "First clue", "triggerCommand": "ls or dir command", "revealPhase": 1}},
        {{"id": "t1", "type": "task", "description": "First task", "triggerCommand": "cat or type command on a file", "revealPhase": 1}},
        {{"id": "c2", "type": "clue", "description": "Second clue", "triggerCommand": "read a specific file", "revealPhase": 2}},
        {{"id": "t2", "type": "task", "description": "Second task", "triggerCommand": "access a subdirectory", "revealPhase": 2}},
        {{"id": "c3", "type": "clue", "description": "Third clue leading to revelation", "triggerCommand": "decrypt or access restricted area", "revealPhase": 3}},
        {{"id": "t3", "type": "task", "description": "Critical task", "triggerCommand": "execute a program or script", "revealPhase": 3}},
        {{"id": "c4", "type": "clue", "description": "Final revelation clue", "triggerCommand": "access top secret file", "revealPhase": 4}}
    ],
    "dramaticReveal": "The shocking truth revealed at the climax (2-3 sentences)"
}}

Use short unique ids without spaces. revealPhase must be between 1 and 4. Make the clues and tasks feel like authentic terminal commands, with realistic file names and directory structures."#
    )
}

/// Prompt asking for a single hostname.
pub fn hostname_prompt(organization: &str) -> String {
    format!(
        r#"Generate a single mysterious computer hostname for an organization called "{organization}".
The hostname should feel like it's from the 1980s/1990s era.
Examples: WOPR, NEXUS-PRIME, ECHELON-7, MJ12-NODE3, ZODIAC-MAIN

Return ONLY the hostname, nothing else. No quotes, no explanation."#
    )
}

/// Prompt asking the terminal to answer one player command.
pub fn command_prompt(session: &Session, input: &str) -> String {
    let narrative = session.narrative();
    let phase = session.phase();

    let available: Vec<String> = narrative
        .available_in(phase)
        .iter()
        .map(|c| {
            format!(
                "- [{}] id={}: {} (trigger: {})",
                c.kind, c.id, c.description, c.trigger
            )
        })
        .collect();
    let available = if available.is_empty() {
        "- none".to_string()
    } else {
        available.join("\n")
    };

    let finale = match phase {
        Phase::Dilemma => format!(
            "\nThe player has reached the Dilemma phase. Present the ethical choice: {}\n",
            narrative.ethical_dilemma
        ),
        Phase::Conclusion => format!(
            "\nThe player has reached the Conclusion phase. Build to the dramatic reveal: {}\n",
            narrative.dramatic_reveal
        ),
        _ => String::new(),
    };

    format!(
        r#"You are simulating a mysterious 1980s/1990s computer terminal for a text adventure game. The player has discovered this system and is exploring it.

NARRATIVE CONTEXT:
- Organization: {org}
- System Purpose: {purpose}
- Backstory: {backstory}
- Secret to uncover: {secret}

CURRENT STATE:
- Hostname: {host}
- Current Directory: {dir}
- Username: {user}
- Turn: {turn}/50+
- Phase: {phase} ({guidance})
- Clues discovered: {clues}
- Tasks completed: {tasks}

AVAILABLE CLUES/TASKS TO REVEAL THIS PHASE:
{available}

RECENT CONVERSATION HISTORY:
{history}

PLAYER'S COMMAND: {input}
{finale}
INSTRUCTIONS:
1. Respond as if you ARE the terminal system. Use authentic retro terminal aesthetics.
2. Interpret the player's intent even if the command isn't perfectly formatted (accept both bash and DOS style commands).
3. If the command relates to an available clue/task trigger, reveal it naturally through the terminal output.
4. Maintain immersion - errors should feel like real system errors, discoveries should feel earned.
5. Keep responses concise but atmospheric. Use ASCII art sparingly.

MARKERS (each on its own line at the end, never inside other text):
[CLUE_DISCOVERED: <id>] when a clue above is revealed
[TASK_COMPLETED: <id>] when a task above is completed
[CD: <new path>] when the current directory changes

Respond only with the terminal output. Do not break character."#,
        org = narrative.organization_name,
        purpose = narrative.system_purpose,
        backstory = narrative.backstory,
        secret = narrative.secret,
        host = session.hostname,
        dir = session.current_directory(),
        user = session.username,
        turn = session.turn_count(),
        guidance = phase_guidance(phase),
        clues = session.discovered_clues().len(),
        tasks = session.completed_tasks().len(),
        history = session.history().context(CONTEXT_WINDOW),
    )
}

/// The JSON object inside a reply that may be wrapped in prose or fences.
pub fn extract_json(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::Narrative;

    fn session() -> Session {
        Session::new("t", Narrative::fallback(), "WOPR")
    }

    #[test]
    fn extract_from_code_fence() {
        let text = "Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```\n";
        assert_eq!(extract_json(text), "{\"a\": {\"b\": 1}}");
        assert_eq!(extract_json("no json"), "no json");
    }

    #[test]
    fn narrative_prompt_embeds_theme() {
        let p = narrative_prompt(PLOT_THEMES[1]);
        assert!(p.contains("Selected plot theme: Secret UFO/UAP research program"));
        assert!(p.contains("\"plotType\": \"Secret UFO/UAP research program\""));
    }

    #[test]
    fn command_prompt_for_fresh_session() {
        let p = command_prompt(&session(), "ls");
        assert!(p.contains("- Organization: PROMETHEUS-X"));
        assert!(p.contains("- Hostname: WOPR"));
        assert!(p.contains("- Phase: Discovery (Initial exploration"));
        assert!(p.contains("id=c1: System manifest file (trigger: ls)"));
        assert!(!p.contains("id=c2"));
        assert!(p.contains("No previous commands."));
        assert!(p.contains("PLAYER'S COMMAND: ls"));
        assert!(!p.contains("ethical choice:"));
    }

    #[test]
    fn command_prompt_includes_history_and_hides_found_clues() {
        let mut s = session();
        s.advance_turn();
        s.record_turn("ls", "README.TXT");
        s.discover_clue("c1");
        let p = command_prompt(&s, "cat README.TXT");
        assert!(p.contains("User: ls\nSystem: README.TXT"));
        assert!(!p.contains("id=c1"));
        assert!(p.contains("- Clues discovered: 1"));
    }

    #[test]
    fn dilemma_phase_presents_choice() {
        let mut s = session();
        while s.phase() != Phase::Dilemma {
            s.advance_turn();
            s.record_turn("x", "y");
        }
        let p = command_prompt(&s, "help");
        assert!(p.contains("Present the ethical choice: You can either expose"));
    }
}
