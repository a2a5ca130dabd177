//! Conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of recent turns rendered into the prompt context.
pub const CONTEXT_WINDOW: usize = 10;

/// Context text used when no command has been processed yet.
pub const NO_PREVIOUS_COMMANDS: &str = "No previous commands.";

/// One processed command and the raw response it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    /// 1-based turn number.
    pub turn_number: u32,
    /// What the player typed.
    pub user_input: String,
    /// Response text as generated, markers included.
    pub system_response: String,
    /// When the turn was processed.
    pub timestamp: DateTime<Utc>,
}

/// Append-only log of conversation turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    turns: Vec<ConversationTurn>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turn has been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The last `window` turns, oldest first.
    pub fn recent(&self, window: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(window);
        &self.turns[start..]
    }

    /// Render the last `window` turns as alternating user/system lines.
    ///
    /// Returns [`NO_PREVIOUS_COMMANDS`] when the history is empty, so prompt
    /// builders can embed the result without checking.
    pub fn context(&self, window: usize) -> String {
        let recent = self.recent(window);
        if recent.is_empty() {
            return NO_PREVIOUS_COMMANDS.to_string();
        }
        recent
            .iter()
            .map(|t| format!("User: {}\nSystem: {}", t.user_input, t.system_response))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
