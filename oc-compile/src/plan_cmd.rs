use anyhow::{Context, Result};
use oc_compile::plan_removal;
use oc_compile::report::render_plan;

use crate::cli::{OutputFormat, PlanArgs};
use crate::settings;

pub fn run_plan_removal(args: PlanArgs) -> Result<()> {
    let store = settings::load_store(args.store.as_deref())?;
    let document = settings::load_document(&args.document)?;
    let device = settings::load_device(Some(&args.device))?;
    let rules = settings::resolve_safeguards(args.safeguards.as_deref(), store.as_ref())?;

    let plan = plan_removal(device.as_ref(), &document, &rules)
        .with_context(|| format!("failed to plan removals from {}", args.device.display()))?;

    match args.format {
        OutputFormat::Text => println!("{}", render_plan(&plan)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}
