use crate::diff::result::DiffEntry;

/// Format diff entries as unified-style text (`+`, `-` and ` ` prefixes).
pub fn format_text(entries: &[DiffEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            DiffEntry::Identical { text, .. } => lines.push(format!("  {text}")),
            DiffEntry::Removed { text, .. } => lines.push(format!("- {text}")),
            DiffEntry::Added { text, .. } => lines.push(format!("+ {text}")),
        }
    }
    lines.join("\n")
}

/// Format a simple summary of diff counts.
pub fn format_summary(entries: &[DiffEntry]) -> String {
    let mut identical = 0;
    let mut added = 0;
    let mut removed = 0;

    for entry in entries {
        match entry {
            DiffEntry::Identical { .. } => identical += 1,
            DiffEntry::Added { .. } => added += 1,
            DiffEntry::Removed { .. } => removed += 1,
        }
    }

    format!("identical={identical} added={added} removed={removed}")
}
