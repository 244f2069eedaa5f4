use serde::Serialize;

use crate::diff::result::DiffEntry;

/// Change counts followed by the changed lines.
#[derive(Debug, Serialize)]
struct DiffReport<'a> {
    added: usize,
    removed: usize,
    changes: Vec<&'a DiffEntry>,
}

/// Format diff entries as a JSON report. Identical rows are counted out of
/// `changes`.
pub fn format_json(entries: &[DiffEntry]) -> Result<String, serde_json::Error> {
    let changes: Vec<&DiffEntry> = entries.iter().filter(|entry| entry.is_change()).collect();
    let added = changes
        .iter()
        .filter(|entry| matches!(entry, DiffEntry::Added { .. }))
        .count();
    let report = DiffReport {
        added,
        removed: changes.len() - added,
        changes,
    };
    serde_json::to_string_pretty(&report)
}
