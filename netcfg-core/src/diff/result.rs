use serde::Serialize;

/// A single diff outcome for one configuration line.
///
/// Line numbers are 1-based and refer to the side the line comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DiffEntry {
    /// Line present on both sides.
    Identical { line: usize, text: String },
    /// Line only in the running (left) text.
    Removed { line: usize, text: String },
    /// Line only in the candidate (right) text.
    Added { line: usize, text: String },
}

impl DiffEntry {
    pub fn text(&self) -> &str {
        match self {
            DiffEntry::Identical { text, .. }
            | DiffEntry::Removed { text, .. }
            | DiffEntry::Added { text, .. } => text,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, DiffEntry::Identical { .. })
    }
}
