//! The compilation pipeline.
//!
//! ```text
//! document ─► xref::validate ─► global AS ─► policy usage (JunOS)
//!          ─► existing objects (FRR) ─► generators ─► removal plan
//!          ─► assemble ─► render
//! ```
//!
//! Device state is read at most once per kind. Any [`CompileError`] aborts the
//! run before text is produced.

use std::collections::BTreeSet;
use std::net::IpAddr;

use netcfg_core::model::{Document, SafeguardRule};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::afi_policy::PolicyUsage;
use crate::assemble::{assemble, Sections};
use crate::collab::DeviceStateReader;
use crate::error::CompileError;
use crate::generate::{generator_for, GenContext};
use crate::render::TemplateRenderer;
use crate::safeguard::{plan_removals, RemovalPlan};
use crate::vendor::Vendor;
use crate::xref;

/// Reconcile the declared AS with the one the device reports.
///
/// # Errors
///
/// [`CompileError::ConfigMismatch`] when both are known and differ, or when
/// neither is known and the dialect needs an AS.
pub fn resolve_global_as(
    declared: Option<u32>,
    current: Option<u32>,
    vendor: Vendor,
) -> Result<Option<u32>, CompileError> {
    match (declared, current) {
        (Some(declared), Some(current)) if declared != current => {
            Err(CompileError::ConfigMismatch(format!(
                "declared AS {declared} but device runs AS {current}"
            )))
        }
        (None, None) if vendor.requires_global_as() => Err(CompileError::ConfigMismatch(
            format!("no AS declared and none configured on the device ({vendor})"),
        )),
        _ => Ok(declared.or(current)),
    }
}

/// Everything one compilation needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub document: Document,
    pub vendor: Vendor,
    pub remove_extras: bool,
    pub safeguards: Vec<SafeguardRule>,
    pub vrf: String,
}

impl CompileRequest {
    pub fn new(document: Document, vendor: Vendor) -> Self {
        Self {
            document,
            vendor,
            remove_extras: false,
            safeguards: Vec::new(),
            vrf: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compiled {
    pub text: String,
    pub asn: Option<u32>,
    /// Present only when extra sessions were considered for removal.
    pub plan: Option<RemovalPlan>,
}

/// Compiler with its device and template collaborators injected.
pub struct Compiler<'a> {
    device: &'a dyn DeviceStateReader,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> Compiler<'a> {
    pub fn new(device: &'a dyn DeviceStateReader, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { device, renderer }
    }

    pub fn compile(&self, request: &CompileRequest) -> Result<Compiled, CompileError> {
        let doc = &request.document;
        let vendor = request.vendor;
        xref::validate(doc)?;

        let declared = doc.bgp.as_ref().and_then(|bgp| bgp.global.asn);
        let asn = if doc.bgp.is_some() || request.remove_extras {
            resolve_global_as(declared, self.current_as(&request.vrf), vendor)?
        } else {
            declared
        };

        let policies = doc
            .routing_policy
            .as_ref()
            .map(|policy| policy.policy_definitions.as_slice())
            .unwrap_or(&[]);
        let usage = match vendor {
            Vendor::JunosLike => PolicyUsage::scan(doc.bgp.as_ref(), policies)?,
            _ => PolicyUsage::default(),
        };

        let existing = if vendor.is_diff_aware() {
            match self.device.existing_named_objects() {
                Ok(objects) => Some(objects),
                Err(e) => {
                    warn!(error = %e, "installed objects unknown, deleting before every definition");
                    None
                }
            }
        } else {
            None
        };

        let ctx = GenContext::new(vendor, doc, asn, &request.vrf, &usage, existing.as_ref());
        let generator = generator_for(vendor);
        let mut sections = Sections::default();

        if let Some(bgp) = &doc.bgp {
            sections.global = generator.global(&ctx, &bgp.global);
            for pg in &bgp.peer_groups {
                sections.peer_groups.push(generator.peer_group(&ctx, pg)?);
            }
            for neighbor in &bgp.neighbors {
                sections.neighbors.push(generator.neighbor(&ctx, neighbor)?);
            }
        }

        let plan = if request.remove_extras {
            let plan = plan_removal(self.device, doc, &request.safeguards)?;
            sections.removals = plan
                .remove
                .iter()
                .map(|neighbor| generator.neighbor_removal(&ctx, neighbor))
                .collect();
            Some(plan)
        } else {
            None
        };

        if let Some(policy) = &doc.routing_policy {
            let sets = &policy.defined_sets;
            sections.community_sets = sets
                .community_sets
                .iter()
                .map(|set| generator.community_set(&ctx, set))
                .collect();
            sections.prefix_sets = sets
                .prefix_sets
                .iter()
                .map(|set| generator.prefix_set(&ctx, set))
                .collect::<Result<_, _>>()?;
            sections.policies = policy
                .policy_definitions
                .iter()
                .map(|definition| generator.policy(&ctx, definition))
                .collect::<Result<_, _>>()?;
        }

        let render_ctx = assemble(vendor, asn, &request.vrf, sections);
        let text = self.renderer.render(vendor.name(), &render_ctx)?;
        debug!(vendor = %vendor, lines = text.lines().count(), "compiled");
        Ok(Compiled { text, asn, plan })
    }

    /// The device's AS; an unreadable value is treated as unknown.
    fn current_as(&self, vrf: &str) -> Option<u32> {
        self.device.global_as(vrf).unwrap_or_else(|e| {
            warn!(error = %e, vrf, "could not read configured AS");
            None
        })
    }
}

/// Plan removal of installed sessions the document no longer declares.
///
/// # Errors
///
/// [`CompileError::DeviceState`] when the installed neighbors cannot be read.
pub fn plan_removal(
    device: &dyn DeviceStateReader,
    doc: &Document,
    rules: &[SafeguardRule],
) -> Result<RemovalPlan, CompileError> {
    let installed = device.neighbors()?;
    let wanted: BTreeSet<IpAddr> = doc
        .bgp
        .iter()
        .flat_map(|bgp| &bgp.neighbors)
        .map(|neighbor| neighbor.neighbor_address)
        .collect();
    let plan = plan_removals(&installed, &wanted, rules);
    info!(
        remove = plan.remove.len(),
        keep = plan.keep.len(),
        "removal plan ready"
    );
    Ok(plan)
}
