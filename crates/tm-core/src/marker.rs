//! Response marker protocol.
//!
//! Generated responses may carry out-of-band directives on their own lines:
//!
//! ```text
//! [CLUE_DISCOVERED: <id>]
//! [TASK_COMPLETED: <id>]
//! [CD: <path>]
//! ```
//!
//! [`MarkerScan::parse`] tokenizes a response once, producing both the
//! structured markers and the display text. Every line holding one of the
//! three tags is removed, even when the value is malformed; only well-formed
//! values become markers. Only the first marker of each kind is applied; later
//! ones are still hidden.

use std::fmt;

use crate::session::Session;

/// The three directive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `[CLUE_DISCOVERED: <id>]`
    ClueDiscovered,
    /// `[TASK_COMPLETED: <id>]`
    TaskCompleted,
    /// `[CD: <path>]`
    ChangeDirectory,
}

impl MarkerKind {
    /// All kinds, in application order.
    pub const ALL: [MarkerKind; 3] = [
        MarkerKind::ClueDiscovered,
        MarkerKind::TaskCompleted,
        MarkerKind::ChangeDirectory,
    ];

    /// Tag name between `[` and `:`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::ClueDiscovered => "CLUE_DISCOVERED",
            Self::TaskCompleted => "TASK_COMPLETED",
            Self::ChangeDirectory => "CD",
        }
    }

    /// Whether the value is an identifier token rather than free path text.
    fn takes_identifier(self) -> bool {
        !matches!(self, Self::ChangeDirectory)
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A well-formed marker found in a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Which directive.
    pub kind: MarkerKind,
    /// Clue/task id or directory path, trimmed.
    pub value: String,
    /// 0-based index of the line holding the marker.
    pub line: usize,
}

/// Result of tokenizing one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerScan {
    markers: Vec<Marker>,
    display: String,
}

/// State changes actually made by [`MarkerScan::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedMarkers {
    /// Clue newly recorded as discovered.
    pub clue: Option<String>,
    /// Task newly recorded as completed.
    pub task: Option<String>,
    /// New current directory.
    pub directory: Option<String>,
}

impl AppliedMarkers {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.clue.is_none() && self.task.is_none() && self.directory.is_none()
    }
}

impl MarkerScan {
    /// Tokenize a raw response.
    pub fn parse(response: &str) -> Self {
        let mut markers = Vec::new();
        let mut shown = Vec::new();

        for (index, line) in response.split('\n').enumerate() {
            let (found, tagged) = scan_line(line, index);
            markers.extend(found);
            if !tagged {
                shown.push(line);
            }
        }

        Self {
            markers,
            display: shown.join("\n"),
        }
    }

    /// Every well-formed marker, in order of appearance.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The first marker of a kind; the only one that is honored.
    pub fn first(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.kind == kind)
    }

    /// Response text with all marker lines removed.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Apply the first marker of each kind to the session.
    ///
    /// Re-applying the same scan changes nothing: discovered clues and
    /// completed tasks are skipped, and the directory is already set.
    pub fn apply(&self, session: &mut Session) -> AppliedMarkers {
        let mut applied = AppliedMarkers::default();

        if let Some(m) = self.first(MarkerKind::ClueDiscovered)
            && session.discover_clue(&m.value)
        {
            applied.clue = Some(m.value.clone());
        }

        if let Some(m) = self.first(MarkerKind::TaskCompleted)
            && session.complete_task(&m.value)
        {
            applied.task = Some(m.value.clone());
        }

        if let Some(m) = self.first(MarkerKind::ChangeDirectory)
            && session.current_directory() != m.value
        {
            session.change_directory(m.value.clone());
            applied.directory = Some(m.value.clone());
        }

        applied
    }
}

/// Remove marker lines from a response without applying anything.
pub fn strip_markers(response: &str) -> String {
    MarkerScan::parse(response).display
}

/// Markers on one line, and whether the line carries any tag at all.
///
/// A line holding `[TAG:` is hidden even when its value is unusable; only
/// well-formed values become markers.
fn scan_line(line: &str, index: usize) -> (Vec<Marker>, bool) {
    let mut found = Vec::new();
    let mut tagged = false;
    for (start, _) in line.match_indices('[') {
        let rest = &line[start + 1..];
        let Some((kind, body)) = MarkerKind::ALL
            .into_iter()
            .find_map(|kind| Some((kind, rest.strip_prefix(kind.tag())?.strip_prefix(':')?)))
        else {
            continue;
        };
        tagged = true;
        if let Some(value) = marker_value(kind, body) {
            found.push(Marker {
                kind,
                value,
                line: index,
            });
        }
    }
    (found, tagged)
}

/// The value of `body` (the text after `TAG:`) up to the closing `]`, if valid.
fn marker_value(kind: MarkerKind, body: &str) -> Option<String> {
    let (value, _) = body.split_once(']')?;
    let value = value.trim();
    let valid = if kind.takes_identifier() {
        is_identifier(value)
    } else {
        !value.is_empty()
    };
    valid.then(|| value.to_string())
}

/// Whether `value` can be named by a clue or task marker.
pub(crate) fn is_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_alphanumeric() || c == '_')
}
