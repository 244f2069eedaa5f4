use anyhow::{bail, Result};
use oc_compile::report::render_findings;
use oc_compile::xref::reference_findings;

use crate::cli::{CheckArgs, OutputFormat};
use crate::settings;

pub fn run_check(args: CheckArgs) -> Result<()> {
    let document = settings::load_document(&args.document)?;
    let findings = reference_findings(&document);

    match args.format {
        OutputFormat::Text => println!("{}", render_findings(&findings)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&findings)?),
    }

    if !findings.is_empty() {
        bail!("check failed: {} errors", findings.len());
    }
    Ok(())
}
