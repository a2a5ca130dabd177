//! Persistent state of one playthrough.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::{ConversationTurn, History};
use crate::narrative::Narrative;
use crate::phase::{Phase, PhaseTransition};

/// Stable identifier of a session; also its record key on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh 8-character identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string()[..8].to_string())
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory a new session starts in.
pub const ROOT_DIRECTORY: &str = "/";

/// Username the player is logged in as.
pub const DEFAULT_USERNAME: &str = "guest";

/// The complete state of one playthrough.
///
/// The turn count, phase, and history move together: [`Session::advance_turn`]
/// bumps the count and re-derives the phase, [`Session::record_turn`] appends
/// the matching history entry. Clue and task sets only grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    id: SessionId,
    /// Display name chosen by the player.
    pub name: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last saved.
    pub last_played_at: DateTime<Utc>,
    turn_count: u32,
    narrative: Narrative,
    #[serde(rename = "conversationHistory")]
    history: History,
    #[serde(rename = "discoveredClues")]
    discovered_clues: BTreeSet<String>,
    completed_tasks: BTreeSet<String>,
    #[serde(rename = "currentPhase")]
    phase: Phase,
    /// Hostname of the fictional system.
    #[serde(rename = "systemHostname")]
    pub hostname: String,
    current_directory: String,
    /// Username shown in the shell prompt.
    pub username: String,
}

impl Default for Session {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::generate(),
            name: String::new(),
            created_at: now,
            last_played_at: now,
            turn_count: 0,
            narrative: Narrative::default(),
            history: History::new(),
            discovered_clues: BTreeSet::new(),
            completed_tasks: BTreeSet::new(),
            phase: Phase::Discovery,
            hostname: String::new(),
            current_directory: ROOT_DIRECTORY.to_string(),
            username: DEFAULT_USERNAME.to_string(),
        }
    }
}

impl Session {
    /// Start a fresh session at turn 0.
    pub fn new(name: impl Into<String>, narrative: Narrative, hostname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            narrative,
            hostname: hostname.into(),
            ..Self::default()
        }
    }

    /// The session identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Replace the identifier with a fresh one.
    ///
    /// Only meaningful before the session is first persisted, when the store
    /// detects an id collision.
    pub fn regenerate_id(&mut self) {
        self.id = SessionId::generate();
    }

    /// Number of processed commands.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The narrative.
    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    /// The conversation history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Ids recorded as discovered clues.
    pub fn discovered_clues(&self) -> &BTreeSet<String> {
        &self.discovered_clues
    }

    /// Ids recorded as completed tasks.
    pub fn completed_tasks(&self) -> &BTreeSet<String> {
        &self.completed_tasks
    }

    /// Current working directory on the fictional system.
    pub fn current_directory(&self) -> &str {
        &self.current_directory
    }

    /// Count one more processed command and re-derive the phase.
    ///
    /// Returns the transition if the phase changed.
    pub fn advance_turn(&mut self) -> Option<PhaseTransition> {
        self.turn_count = self.turn_count.saturating_add(1);
        let transition = PhaseTransition::detect(self.phase, self.turn_count);
        if let Some(t) = transition {
            self.phase = t.to;
        }
        transition
    }

    /// Append the history entry for the current turn.
    pub fn record_turn(
        &mut self,
        user_input: impl Into<String>,
        system_response: impl Into<String>,
    ) -> &ConversationTurn {
        self.history.append(ConversationTurn {
            turn_number: self.turn_count,
            user_input: user_input.into(),
            system_response: system_response.into(),
            timestamp: Utc::now(),
        });
        // just appended
        &self.history.turns()[self.history.len() - 1]
    }

    /// Record a clue as discovered. Returns false if it already was.
    ///
    /// Ids unknown to the narrative are still recorded.
    pub fn discover_clue(&mut self, id: &str) -> bool {
        if !self.discovered_clues.insert(id.to_string()) {
            return false;
        }
        self.narrative.mark_discovered(id);
        true
    }

    /// Record a task as completed. Returns false if it already was.
    ///
    /// Ids unknown to the narrative are still recorded.
    pub fn complete_task(&mut self, id: &str) -> bool {
        if !self.completed_tasks.insert(id.to_string()) {
            return false;
        }
        self.narrative.mark_discovered(id);
        true
    }

    /// Move to another directory. The path is taken verbatim.
    pub fn change_directory(&mut self, path: impl Into<String>) {
        self.current_directory = path.into();
    }

    /// Stamp the session as played now.
    pub fn touch(&mut self) {
        self.last_played_at = Utc::now();
    }

    /// The shell prompt, e.g. `guest@WOPR:/$ `.
    pub fn shell_prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.username, self.hostname, self.current_directory
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("test", Narrative::fallback(), "WOPR")
    }

    #[test]
    fn fresh_session() {
        let s = session();
        assert_eq!(s.id().as_str().len(), 8);
        assert_eq!(s.turn_count(), 0);
        assert_eq!(s.phase(), Phase::Discovery);
        assert!(s.history().is_empty());
        assert_eq!(s.current_directory(), "/");
        assert_eq!(s.username, "guest");
        assert_eq!(s.shell_prompt(), "guest@WOPR:/$ ");
    }

    #[test]
    fn turns_keep_history_in_step() {
        let mut s = session();
        for i in 1..=3 {
            assert!(s.advance_turn().is_none());
            let t = s.record_turn(format!("cmd{i}"), "ok");
            assert_eq!(t.turn_number, i);
        }
        assert_eq!(s.turn_count() as usize, s.history().len());
    }

    #[test]
    fn transition_fires_once() {
        let mut s = session();
        let mut transitions = Vec::new();
        for _ in 0..50 {
            if let Some(t) = s.advance_turn() {
                transitions.push((s.turn_count(), t.to));
            }
        }
        assert_eq!(
            transitions,
            vec![
                (16, Phase::Investigation),
                (31, Phase::Revelation),
                (41, Phase::Dilemma),
                (49, Phase::Conclusion),
            ]
        );
    }

    #[test]
    fn discover_known_clue() {
        let mut s = session();
        assert!(s.discover_clue("c1"));
        assert!(!s.discover_clue("c1"));
        assert!(s.narrative().find("c1").unwrap().discovered);
        assert_eq!(s.discovered_clues().len(), 1);
    }

    #[test]
    fn unknown_ids_are_recorded_without_touching_narrative() {
        let mut s = session();
        let before = s.narrative().clone();
        assert!(s.discover_clue("zz9"));
        assert!(s.complete_task("qq1"));
        assert_eq!(s.narrative(), &before);
        assert!(s.discovered_clues().contains("zz9"));
        assert!(s.completed_tasks().contains("qq1"));
    }

    #[test]
    fn complete_task_flags_entry() {
        let mut s = session();
        assert!(s.complete_task("t1"));
        assert!(s.narrative().find("t1").unwrap().discovered);
    }

    #[test]
    fn json_round_trip() {
        let mut s = session();
        s.advance_turn();
        s.record_turn("ls", "README.TXT");
        s.discover_clue("c1");
        s.change_directory("/secure");
        let json = serde_json::to_string_pretty(&s).unwrap();
        assert!(json.contains("\"systemHostname\": \"WOPR\""));
        assert!(json.contains("\"currentPhase\": \"Discovery\""));
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn missing_keys_default() {
        let back: Session = serde_json::from_str(r#"{"id": "abcd1234", "name": "old"}"#).unwrap();
        assert_eq!(back.id().as_str(), "abcd1234");
        assert_eq!(back.current_directory(), "/");
        assert_eq!(back.username, "guest");
        assert_eq!(back.turn_count(), 0);
    }
}
