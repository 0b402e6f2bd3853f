//! The ordered dialogue script.

use serde::{Deserialize, Serialize};

use super::{DialogueLine, LineMarker};
use crate::error::ScriptError;

/// An immutable, non-empty, ordered list of dialogue lines.
///
/// Line order is narrative order: lines play strictly in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    lines: Vec<DialogueLine>,
}

/// On-disk shape of a script file.
#[derive(Debug, Deserialize)]
struct ScriptFile {
    lines: Vec<DialogueLine>,
}

impl Script {
    /// Build a script from lines in narrative order.
    pub fn new(lines: impl IntoIterator<Item = DialogueLine>) -> Result<Self, ScriptError> {
        let lines: Vec<_> = lines.into_iter().map(DialogueLine::normalized).collect();
        if lines.is_empty() {
            return Err(ScriptError::Empty);
        }
        Ok(Self { lines })
    }

    /// Parse a script from TOML (`[[lines]]` tables with `speaker`, `text`, `marker`).
    pub fn from_toml_str(source: &str) -> Result<Self, ScriptError> {
        let file: ScriptFile = toml::from_str(source)?;
        Self::new(file.lines)
    }

    /// Construct from lines already known to be non-empty.
    pub(crate) fn from_static(lines: Vec<DialogueLine>) -> Self {
        debug_assert!(!lines.is_empty());
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// A constructed script always has at least one line.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DialogueLine> {
        self.lines.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index == self.last_index()
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    /// Index of the first line carrying `marker`.
    pub fn position_of(&self, marker: LineMarker) -> Option<usize> {
        self.lines.iter().position(|line| line.marker == marker)
    }
}
