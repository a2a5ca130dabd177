//! The mystery behind a session.
//!
//! A [`Narrative`] is produced once per session, either by the text service or
//! from the built-in fallback. After creation only the `discovered` flags of its
//! clues and tasks change.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::marker::is_identifier;
use crate::phase::Phase;

/// Whether an entry is something to find or something to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueKind {
    /// A piece of information the player can discover.
    Clue,
    /// An action the player can complete.
    Task,
}

impl fmt::Display for ClueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clue => f.write_str("clue"),
            Self::Task => f.write_str("task"),
        }
    }
}

/// A unit of narrative content revealable during a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueOrTask {
    /// Identifier, unique within the narrative.
    #[serde(default = "generate_clue_id")]
    pub id: String,
    /// Clue or task.
    #[serde(rename = "type")]
    pub kind: ClueKind,
    /// What the player finds or does.
    #[serde(default)]
    pub description: String,
    /// Advisory hint of the command that reveals it.
    #[serde(default, rename = "triggerCommand")]
    pub trigger: String,
    /// Phase number (1-4) from which it may be revealed.
    #[serde(default = "default_reveal_phase")]
    pub reveal_phase: u8,
    /// Set once the player finds or completes it. Never cleared.
    #[serde(default, rename = "isDiscovered")]
    pub discovered: bool,
}

fn generate_clue_id() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

fn default_reveal_phase() -> u8 {
    1
}

impl ClueOrTask {
    /// Create an undiscovered entry.
    pub fn new(
        id: impl Into<String>,
        kind: ClueKind,
        description: impl Into<String>,
        trigger: impl Into<String>,
        reveal_phase: u8,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            description: description.into(),
            trigger: trigger.into(),
            reveal_phase,
            discovered: false,
        }
    }

    /// Whether this entry may surface during `phase`.
    pub fn available_in(&self, phase: Phase) -> bool {
        !self.discovered && self.reveal_phase <= phase.number()
    }
}

/// The generated mystery: organization, secret, cast, and clues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Narrative {
    /// Plot theme label.
    pub plot_type: String,
    /// Name of the organization running the system.
    pub organization_name: String,
    /// What the system is used for.
    pub system_purpose: String,
    /// History of the system.
    pub backstory: String,
    /// The main secret to uncover.
    #[serde(rename = "secretToUncover")]
    pub secret: String,
    /// The moral choice presented near the end.
    pub ethical_dilemma: String,
    /// Short descriptions of the key characters.
    pub key_characters: Vec<String>,
    /// Ordered clues and tasks.
    pub clues_and_tasks: Vec<ClueOrTask>,
    /// The truth revealed at the climax.
    pub dramatic_reveal: String,
}

impl Narrative {
    /// Decode a narrative from JSON and validate it.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let narrative: Self = serde_json::from_str(json)?;
        narrative.validate()?;
        Ok(narrative)
    }

    /// Check the structural rules a usable narrative must satisfy.
    pub fn validate(&self) -> CoreResult<()> {
        if self.organization_name.trim().is_empty() {
            return Err(CoreError::MissingField("organizationName"));
        }
        let mut seen = HashSet::new();
        for clue in &self.clues_and_tasks {
            if !is_identifier(&clue.id) {
                return Err(CoreError::InvalidClueId(clue.id.clone()));
            }
            if !(1..=4).contains(&clue.reveal_phase) {
                return Err(CoreError::RevealPhaseOutOfRange {
                    id: clue.id.clone(),
                    phase: clue.reveal_phase,
                });
            }
            if !seen.insert(clue.id.as_str()) {
                return Err(CoreError::DuplicateClueId(clue.id.clone()));
            }
        }
        Ok(())
    }

    /// Look up a clue or task by id.
    pub fn find(&self, id: &str) -> Option<&ClueOrTask> {
        self.clues_and_tasks.iter().find(|c| c.id == id)
    }

    /// Flag the entry with this id as discovered. Returns false for unknown ids.
    pub fn mark_discovered(&mut self, id: &str) -> bool {
        match self.clues_and_tasks.iter_mut().find(|c| c.id == id) {
            Some(clue) => {
                clue.discovered = true;
                true
            }
            None => false,
        }
    }

    /// Entries that are still hidden and may surface in `phase`.
    pub fn available_in(&self, phase: Phase) -> Vec<&ClueOrTask> {
        self.clues_and_tasks
            .iter()
            .filter(|c| c.available_in(phase))
            .collect()
    }

    /// Number of entries of one kind.
    pub fn count(&self, kind: ClueKind) -> usize {
        self.clues_and_tasks.iter().filter(|c| c.kind == kind).count()
    }

    /// The built-in narrative used when generation fails.
    pub fn fallback() -> Self {
        Self {
            plot_type: "Classified research and monitoring system".to_string(),
            organization_name: "PROMETHEUS-X".to_string(),
            system_purpose:
                "A classified research and monitoring system with unknown objectives.".to_string(),
            backstory: "This system was established in 1983 under a classified directive. \
                        Its true purpose has been hidden from public records."
                .to_string(),
            secret: "The system is collecting and analyzing data on a massive scale \
                     for purposes unknown to most operators."
                .to_string(),
            ethical_dilemma: "You can either expose the system to the public, potentially \
                              causing chaos, or destroy the evidence and walk away."
                .to_string(),
            key_characters: vec![
                "Dr. Sarah Chen - Lead Researcher".to_string(),
                "Colonel James Webb - Military Liaison".to_string(),
                "ORACLE - The AI assistant".to_string(),
            ],
            clues_and_tasks: vec![
                ClueOrTask::new("c1", ClueKind::Clue, "System manifest file", "ls", 1),
                ClueOrTask::new("t1", ClueKind::Task, "Read the welcome message", "cat welcome.txt", 1),
                ClueOrTask::new("c2", ClueKind::Clue, "Encrypted communications", "cd /secure", 2),
                ClueOrTask::new("t2", ClueKind::Task, "Access personnel files", "cat personnel.dat", 2),
                ClueOrTask::new(
                    "c3",
                    ClueKind::Clue,
                    "The truth about the project",
                    "decrypt classified.enc",
                    3,
                ),
                ClueOrTask::new("t3", ClueKind::Task, "Run the analysis program", "./analyze", 3),
                ClueOrTask::new("c4", ClueKind::Clue, "Final revelation", "cat EYES_ONLY.txt", 4),
            ],
            dramatic_reveal: "The system has been monitoring you all along. You are not the \
                              first to discover this terminal - you are being tested."
                .to_string(),
        }
    }
}
