//! Dry-run and push of compiled text.

use std::fs;
use std::io;
use std::path::PathBuf;

use netcfg_core::{diff, DiffEntry};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PushError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub comment: String,
}

/// Loads candidate text onto a target.
pub trait ConfigPusher {
    /// Text currently loaded; empty when nothing is.
    fn running(&self) -> Result<String, PushError>;
    fn push(&self, text: &str) -> Result<PushOutcome, PushError>;
}

/// Target backed by a plain file.
#[derive(Debug, Clone)]
pub struct FilePusher {
    path: PathBuf,
}

impl FilePusher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigPusher for FilePusher {
    fn running(&self) -> Result<String, PushError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(PushError::Read {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    fn push(&self, text: &str) -> Result<PushOutcome, PushError> {
        let mut content = text.to_string();
        if !content.ends_with('\n') {
            content.push('\n');
        }
        fs::write(&self.path, content).map_err(|source| PushError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(PushOutcome {
            comment: format!("written to {}", self.path.display()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyResult {
    /// `None` for a dry run.
    pub applied: Option<bool>,
    pub diff: Vec<DiffEntry>,
    pub comment: String,
    pub loaded: String,
}

/// Diff `text` against the target and push it when `commit` is set.
///
/// A commit with no changes leaves the target alone and reports
/// `applied: Some(false)`.
pub fn apply(text: &str, pusher: &dyn ConfigPusher, commit: bool) -> Result<ApplyResult, PushError> {
    let running = pusher.running()?;
    let entries = diff(&running, text);
    debug!(changes = entries.len(), "candidate diffed against target");

    let (applied, comment) = if !commit {
        (None, "dry run".to_string())
    } else if entries.is_empty() {
        (Some(false), "no changes".to_string())
    } else {
        let outcome = pusher.push(text)?;
        info!(comment = %outcome.comment, "candidate pushed");
        (Some(true), outcome.comment)
    };

    Ok(ApplyResult {
        applied,
        diff: entries,
        comment,
        loaded: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_reports_diff_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("candidate.cfg");
        let result = apply("a\nb", &FilePusher::new(&target), false).expect("apply");

        assert_eq!(result.applied, None);
        assert_eq!(result.diff.len(), 2);
        assert!(!target.exists());
    }

    #[test]
    fn commit_writes_then_settles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pusher = FilePusher::new(dir.path().join("candidate.cfg"));

        let first = apply("a\nb", &pusher, true).expect("apply");
        assert_eq!(first.applied, Some(true));
        assert_eq!(pusher.running().expect("read"), "a\nb\n");

        let second = apply("a\nb", &pusher, true).expect("apply");
        assert_eq!(second.applied, Some(false));
        assert!(second.diff.is_empty());
        assert_eq!(second.comment, "no changes");
    }
}
