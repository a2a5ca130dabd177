//! Narrative phases.
//!
//! A session moves through five ordered phases as its turn count grows. The
//! phase is never chosen directly: it is looked up from a fixed boundary table,
//! so the stored phase can always be re-derived from the turn count.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five ordered narrative stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Initial exploration of the system.
    #[default]
    Discovery,
    /// Deeper digging: connections, encrypted files, restricted areas.
    Investigation,
    /// The true purpose of the system comes out.
    Revelation,
    /// The player faces the ethical choice.
    Dilemma,
    /// The finale and its consequences.
    Conclusion,
}

/// First turn of each phase, in ascending order.
const BOUNDARIES: [(u32, Phase); 5] = [
    (0, Phase::Discovery),
    (16, Phase::Investigation),
    (31, Phase::Revelation),
    (41, Phase::Dilemma),
    (49, Phase::Conclusion),
];

impl Phase {
    /// All phases in order.
    pub const ALL: [Phase; 5] = [
        Phase::Discovery,
        Phase::Investigation,
        Phase::Revelation,
        Phase::Dilemma,
        Phase::Conclusion,
    ];

    /// The phase a session is in after `turn_count` processed commands.
    pub fn for_turn(turn_count: u32) -> Self {
        BOUNDARIES
            .iter()
            .rev()
            .find(|(start, _)| turn_count >= *start)
            .map(|(_, phase)| *phase)
            .unwrap_or_default()
    }

    /// 1-based ordinal, comparable with a clue's reveal phase.
    pub fn number(self) -> u8 {
        match self {
            Self::Discovery => 1,
            Self::Investigation => 2,
            Self::Revelation => 3,
            Self::Dilemma => 4,
            Self::Conclusion => 5,
        }
    }

    /// The turn on which this phase begins.
    pub fn first_turn(self) -> u32 {
        BOUNDARIES
            .iter()
            .find(|(_, phase)| *phase == self)
            .map(|(start, _)| *start)
            .unwrap_or(0)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Discovery => "Discovery",
            Self::Investigation => "Investigation",
            Self::Revelation => "Revelation",
            Self::Dilemma => "Dilemma",
            Self::Conclusion => "Conclusion",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A change of phase observed after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Phase before the turn.
    pub from: Phase,
    /// Phase after the turn.
    pub to: Phase,
}

impl PhaseTransition {
    /// Compare a stored phase with the one the turn count implies.
    pub fn detect(stored: Phase, turn_count: u32) -> Option<Self> {
        let to = Phase::for_turn(turn_count);
        (to != stored).then_some(Self { from: stored, to })
    }
}
