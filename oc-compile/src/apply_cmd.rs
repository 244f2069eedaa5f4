use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use oc_compile::apply::{apply, FilePusher};
use oc_compile::render::{BuiltinRenderer, TeraRenderer, TemplateRenderer};
use oc_compile::report::{render_diff, render_plan, render_summary};
use oc_compile::{CompileRequest, Compiler};

use crate::cli::{ApplyArgs, OutputFormat};
use crate::path_guard::ensure_output_not_input;
use crate::settings;

pub fn run_apply(args: ApplyArgs) -> Result<()> {
    let store = settings::load_store(args.store.as_deref())?;
    let vendor = settings::resolve_vendor(args.vendor, store.as_ref())?;
    let document = settings::load_document(&args.document)?;
    let device = settings::load_device(args.device.as_deref())?;

    let mut request = CompileRequest::new(document, vendor);
    request.vrf = settings::resolve_vrf(args.vrf, store.as_ref());
    request.remove_extras = args.remove_extras;
    if args.remove_extras {
        if args.device.is_none() {
            bail!("--remove-extras needs --device to know what is installed");
        }
        request.safeguards =
            settings::resolve_safeguards(args.safeguards.as_deref(), store.as_ref())?;
    }

    let renderer: Box<dyn TemplateRenderer> = match &args.templates {
        Some(dir) => Box::new(
            TeraRenderer::from_dir(dir)
                .with_context(|| format!("failed to load templates from {}", dir.display()))?,
        ),
        None => Box::new(BuiltinRenderer),
    };

    let compiled = Compiler::new(device.as_ref(), renderer.as_ref())
        .compile(&request)
        .with_context(|| format!("failed to compile {}", args.document.display()))?;

    let inputs: Vec<&Path> = std::iter::once(args.document.as_path())
        .chain(args.device.as_deref())
        .chain(args.store.as_deref())
        .chain(args.safeguards.as_deref())
        .collect();

    if let Some(target) = &args.target {
        ensure_output_not_input(target, &inputs)?;

        let result = apply(&compiled.text, &FilePusher::new(target), args.commit)
            .with_context(|| format!("failed to apply to {}", target.display()))?;
        match args.format {
            OutputFormat::Text => {
                if !result.diff.is_empty() {
                    println!("{}", render_diff(&result.diff));
                }
                println!("{}", render_summary(&result.diff));
                let applied = match result.applied {
                    Some(true) => "true",
                    Some(false) => "false",
                    None => "dry-run",
                };
                println!("result applied={applied} comment={}", result.comment);
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        }
        return Ok(());
    }

    if let Some(output) = &args.output {
        ensure_output_not_input(output, &inputs)?;
        fs::write(output, format!("{}\n", compiled.text))
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    match args.format {
        OutputFormat::Text => {
            if args.output.is_none() {
                println!("{}", compiled.text);
            }
            if let Some(plan) = &compiled.plan {
                eprintln!("{}", render_plan(plan));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&compiled)?),
    }
    Ok(())
}
