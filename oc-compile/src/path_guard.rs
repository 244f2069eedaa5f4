use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write compiled text over one of the files it was compiled from.
pub fn ensure_output_not_input(output: &Path, inputs: &[&Path]) -> Result<()> {
    let target = comparable(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;

    for input in inputs {
        let source = comparable(input)
            .with_context(|| format!("failed to resolve input path {}", input.display()))?;
        if target == source {
            bail!(
                "refusing to overwrite input: output {} is the same file as {}",
                output.display(),
                input.display()
            );
        }
    }
    Ok(())
}

fn comparable(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not on disk yet: anchor to the working directory, `..` left unresolved.
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().context("current_dir")?.join(path))
}
