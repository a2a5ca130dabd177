//! Prompt-level operations over a [`TextService`].

use rand::seq::IndexedRandom;
use tm_core::{Narrative, Session};

use crate::error::{GenerationError, GenerationResult};
use crate::prompt::{self, PLOT_THEMES};
use crate::service::{Purpose, TextService};

/// Shown when the service answers a command with nothing but whitespace.
pub const EMPTY_RESPONSE: &str = "SYSTEM ERROR: Response unavailable.";

/// Builds prompts, calls the service, and checks what comes back.
///
/// A `Narrator` never substitutes fallbacks itself; every failure is returned
/// so the caller can decide.
#[derive(Debug, Clone)]
pub struct Narrator<S> {
    service: S,
}

impl<S: TextService> Narrator<S> {
    /// Wrap a text service.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Generate a narrative around a randomly chosen plot theme.
    pub fn generate_narrative(&self) -> GenerationResult<Narrative> {
        let theme = PLOT_THEMES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(PLOT_THEMES[0]);
        self.generate_narrative_with_theme(theme)
    }

    /// Generate a narrative for a specific plot theme.
    pub fn generate_narrative_with_theme(&self, theme: &str) -> GenerationResult<Narrative> {
        tracing::info!(theme, "generating narrative");
        let reply = self
            .service
            .generate(Purpose::Narrative, &prompt::narrative_prompt(theme))?;
        let mut narrative = Narrative::from_json(prompt::extract_json(&reply)).map_err(|e| {
            tracing::warn!(error = %e, "narrative reply rejected");
            GenerationError::from(e)
        })?;
        if narrative.plot_type.trim().is_empty() {
            narrative.plot_type = theme.to_string();
        }
        Ok(narrative)
    }

    /// Generate a hostname for the organization.
    pub fn generate_hostname(&self, organization: &str) -> GenerationResult<String> {
        let reply = self
            .service
            .generate(Purpose::Narrative, &prompt::hostname_prompt(organization))?;
        normalize_hostname(&reply).ok_or(GenerationError::Empty)
    }

    /// Answer one player command in the context of the session.
    ///
    /// The reply is returned raw, markers included.
    pub fn process_command(&self, session: &Session, input: &str) -> GenerationResult<String> {
        let reply = self
            .service
            .generate(Purpose::Command, &prompt::command_prompt(session, input))?;
        if reply.trim().is_empty() {
            return Ok(EMPTY_RESPONSE.to_string());
        }
        Ok(reply)
    }
}

/// Uppercase, strip quotes, and hyphenate a generated hostname.
///
/// Only the first non-empty line is used. Returns `None` if nothing is left.
pub fn normalize_hostname(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;
    let name = line
        .trim_matches(|c| matches!(c, '"' | '\'' | '`'))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_uppercase();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned replies and records the prompts it was given.
    struct Scripted {
        replies: RefCell<VecDeque<GenerationResult<String>>>,
        prompts: RefCell<Vec<(Purpose, String)>>,
    }

    impl Scripted {
        fn new(replies: Vec<GenerationResult<String>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextService for Scripted {
        fn generate(&self, purpose: Purpose, prompt: &str) -> GenerationResult<String> {
            self.prompts.borrow_mut().push((purpose, prompt.to_string()));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(GenerationError::Empty))
        }
    }

    fn ok(s: &str) -> GenerationResult<String> {
        Ok(s.to_string())
    }

    const GENERATED: &str = r#"```json
{
  "organizationName": "ECHELON",
  "systemPurpose": "Signals collection.",
  "secretToUncover": "Everyone is listened to.",
  "keyCharacters": ["Agent Gray"],
  "cluesAndTasks": [
    {"id": "c1", "type": "clue", "description": "Intercept log", "triggerCommand": "ls", "revealPhase": 1},
    {"type": "task", "description": "Decode", "triggerCommand": "decode", "revealPhase": 2}
  ]
}
```"#;

    #[test]
    fn narrative_from_fenced_reply() {
        let narrator = Narrator::new(Scripted::new(vec![ok(GENERATED)]));
        let n = narrator
            .generate_narrative_with_theme("Covert surveillance dragnet program")
            .unwrap();
        assert_eq!(n.organization_name, "ECHELON");
        assert_eq!(n.plot_type, "Covert surveillance dragnet program");
        assert_eq!(n.clues_and_tasks.len(), 2);
        // missing id gets a short generated one
        assert_eq!(n.clues_and_tasks[1].id.len(), 6);

        let prompts = narrator.service().prompts.borrow();
        assert_eq!(prompts[0].0, Purpose::Narrative);
    }

    #[test]
    fn random_theme_is_from_list() {
        let narrator = Narrator::new(Scripted::new(vec![ok(GENERATED)]));
        let n = narrator.generate_narrative().unwrap();
        assert!(PLOT_THEMES.contains(&n.plot_type.as_str()));
    }

    #[test]
    fn invalid_narrative_is_an_error() {
        let narrator = Narrator::new(Scripted::new(vec![ok(r#"{"organizationName": ""}"#)]));
        assert!(matches!(
            narrator.generate_narrative_with_theme("x"),
            Err(GenerationError::InvalidNarrative(_))
        ));
    }

    #[test]
    fn service_error_passes_through() {
        let narrator = Narrator::new(Scripted::new(vec![Err(GenerationError::Transport(
            "refused".into(),
        ))]));
        assert!(matches!(
            narrator.generate_narrative(),
            Err(GenerationError::Transport(_))
        ));
    }

    #[test]
    fn hostname_is_normalized() {
        let narrator = Narrator::new(Scripted::new(vec![ok("  \"nexus prime\"\n")]));
        assert_eq!(narrator.generate_hostname("NEXUS").unwrap(), "NEXUS-PRIME");
        assert!(narrator.service().prompts.borrow()[0]
            .1
            .contains("organization called \"NEXUS\""));
    }

    #[test]
    fn blank_hostname_is_empty_error() {
        let narrator = Narrator::new(Scripted::new(vec![ok("  \n ")]));
        assert!(matches!(
            narrator.generate_hostname("X"),
            Err(GenerationError::Empty)
        ));
    }

    #[test]
    fn normalize_cases() {
        assert_eq!(normalize_hostname("wopr").as_deref(), Some("WOPR"));
        assert_eq!(normalize_hostname("mj12 node3\nextra").as_deref(), Some("MJ12-NODE3"));
        assert_eq!(normalize_hostname("\"\""), None);
    }

    #[test]
    fn command_reply_is_raw() {
        let session = Session::new("t", Narrative::fallback(), "WOPR");
        let narrator = Narrator::new(Scripted::new(vec![ok("README.TXT\n[CLUE_DISCOVERED: c1]")]));
        let reply = narrator.process_command(&session, "ls").unwrap();
        assert_eq!(reply, "README.TXT\n[CLUE_DISCOVERED: c1]");

        let prompts = narrator.service().prompts.borrow();
        assert_eq!(prompts[0].0, Purpose::Command);
        assert!(prompts[0].1.contains("PLAYER'S COMMAND: ls"));
    }

    #[test]
    fn blank_command_reply_is_replaced() {
        let session = Session::new("t", Narrative::fallback(), "WOPR");
        let narrator = Narrator::new(Scripted::new(vec![ok("   \n")]));
        assert_eq!(
            narrator.process_command(&session, "ls").unwrap(),
            EMPTY_RESPONSE
        );
    }
}
