//! Cross-reference and uniqueness validation.
//!
//! Runs before any command text is produced:
//! - **Defined-set references**: every prefix-set named by a statement
//!   condition and every community-set named by a condition or a
//!   `set-community` action must be declared.
//! - **Uniqueness**: neighbor addresses, peer-group names, set names,
//!   policy names, and statement sequences within a policy.
//! - **Family bindings**: every policy bound inside a peer-group or neighbor
//!   address family must be declared.
//! - **Prefix entries**: each entry must match its set's family and carry a
//!   well-formed mask-length range.
//!
//! Lookups are flat and exact: names are compared as written.

use std::collections::BTreeSet;

use netcfg_core::model::{
    BgpAsset, DefinedSets, Document, PolicyDefinition, PrefixSet, PrefixSetMode,
};
use serde::Serialize;

use crate::error::CompileError;
use crate::range::parse_bounds;

/// One validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XrefFinding {
    pub code: &'static str,
    pub message: String,
    #[serde(skip)]
    problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Problem {
    Missing {
        kind: &'static str,
        name: String,
        referrer: String,
    },
    Invalid(String),
    Range {
        range: String,
        prefix: String,
        reason: String,
    },
}

impl XrefFinding {
    fn missing(kind: &'static str, name: &str, referrer: String) -> Self {
        Self {
            code: "missing_reference",
            message: format!("{referrer} references {kind} '{name}' that does not exist"),
            problem: Problem::Missing {
                kind,
                name: name.to_string(),
                referrer,
            },
        }
    }

    fn duplicate(what: String) -> Self {
        Self {
            code: "duplicate_declaration",
            message: what.clone(),
            problem: Problem::Invalid(what),
        }
    }

    fn family_mismatch(what: String) -> Self {
        Self {
            code: "prefix_family_mismatch",
            message: what.clone(),
            problem: Problem::Invalid(what),
        }
    }

    fn range(set: &str, error: CompileError) -> Self {
        let message = format!("prefix-set '{set}': {error}");
        let problem = match error {
            CompileError::RangeValidation {
                range,
                prefix,
                reason,
            } => Problem::Range {
                range,
                prefix,
                reason,
            },
            other => Problem::Invalid(other.to_string()),
        };
        Self {
            code: "invalid_range",
            message,
            problem,
        }
    }

    /// Convert into the fatal error that stops compilation.
    pub fn into_error(self) -> CompileError {
        match self.problem {
            Problem::Missing {
                kind,
                name,
                referrer,
            } => CompileError::MissingReference {
                kind,
                name,
                referrer,
            },
            Problem::Invalid(what) => CompileError::InvalidDeclaration(what),
            Problem::Range {
                range,
                prefix,
                reason,
            } => CompileError::RangeValidation {
                range,
                prefix,
                reason,
            },
        }
    }
}

/// Collect every reference and uniqueness problem in the document.
///
/// References are reported first, in policy then statement order, followed by
/// duplicate declarations and then prefix entry problems.
pub fn reference_findings(doc: &Document) -> Vec<XrefFinding> {
    let mut out = Vec::new();
    if let Some(policy) = &doc.routing_policy {
        for definition in &policy.policy_definitions {
            out.extend(statement_reference_findings(
                definition,
                &policy.defined_sets,
            ));
        }
    }
    out.extend(binding_findings(doc));
    out.extend(duplicate_findings(doc));
    if let Some(policy) = &doc.routing_policy {
        for set in &policy.defined_sets.prefix_sets {
            out.extend(prefix_entry_findings(set));
        }
    }
    out
}

/// Fail with the first problem found, if any.
pub fn validate(doc: &Document) -> Result<(), CompileError> {
    match reference_findings(doc).into_iter().next() {
        Some(finding) => Err(finding.into_error()),
        None => Ok(()),
    }
}

fn statement_reference_findings(
    definition: &PolicyDefinition,
    sets: &DefinedSets,
) -> Vec<XrefFinding> {
    let mut out = Vec::new();
    for statement in &definition.statements {
        let referrer = format!(
            "policy '{}' statement {}",
            definition.name, statement.sequence
        );
        if let Some(name) = &statement.conditions.match_prefix_set {
            if sets.prefix_set(name).is_none() {
                out.push(XrefFinding::missing("prefix-set", name, referrer.clone()));
            }
        }
        if let Some(name) = &statement.conditions.community_set {
            if sets.community_set(name).is_none() {
                out.push(XrefFinding::missing("community-set", name, referrer.clone()));
            }
        }
        if let Some(action) = &statement.actions.set_community {
            if sets.community_set(&action.community_set).is_none() {
                out.push(XrefFinding::missing(
                    "community-set",
                    &action.community_set,
                    referrer.clone(),
                ));
            }
        }
    }
    out
}

fn binding_findings(doc: &Document) -> Vec<XrefFinding> {
    let Some(bgp) = &doc.bgp else {
        return Vec::new();
    };
    let declared: BTreeSet<&str> = doc
        .routing_policy
        .iter()
        .flat_map(|policy| &policy.policy_definitions)
        .map(|definition| definition.name.as_str())
        .collect();

    let assets = bgp
        .peer_groups
        .iter()
        .map(|pg| (format!("peer-group '{}'", pg.peer_group_name), pg as &dyn BgpAsset))
        .chain(
            bgp.neighbors
                .iter()
                .map(|n| (format!("neighbor {}", n.neighbor_address), n as &dyn BgpAsset)),
        );

    let mut out = Vec::new();
    for (owner, asset) in assets {
        for afi in asset.afi_safis() {
            for name in afi.apply_policy.names() {
                if !declared.contains(name) {
                    out.push(XrefFinding::missing(
                        "policy",
                        name,
                        format!("{owner} {}", afi.afi_safi_name),
                    ));
                }
            }
        }
    }
    out
}

fn duplicate_findings(doc: &Document) -> Vec<XrefFinding> {
    let mut out = Vec::new();
    if let Some(bgp) = &doc.bgp {
        out.extend(
            first_duplicates(bgp.peer_groups.iter().map(|pg| pg.peer_group_name.clone()))
                .map(|name| XrefFinding::duplicate(format!("peer-group '{name}' declared twice"))),
        );
        out.extend(
            first_duplicates(bgp.neighbors.iter().map(|n| n.neighbor_address.to_string()))
                .map(|addr| XrefFinding::duplicate(format!("neighbor {addr} declared twice"))),
        );
    }
    if let Some(policy) = &doc.routing_policy {
        let sets = &policy.defined_sets;
        out.extend(
            first_duplicates(sets.prefix_sets.iter().map(|s| s.name.clone()))
                .map(|name| XrefFinding::duplicate(format!("prefix-set '{name}' declared twice"))),
        );
        out.extend(
            first_duplicates(sets.community_sets.iter().map(|s| s.community_set_name.clone()))
                .map(|name| {
                    XrefFinding::duplicate(format!("community-set '{name}' declared twice"))
                }),
        );
        out.extend(
            first_duplicates(policy.policy_definitions.iter().map(|p| p.name.clone()))
                .map(|name| XrefFinding::duplicate(format!("policy '{name}' declared twice"))),
        );
        for definition in &policy.policy_definitions {
            out.extend(
                first_duplicates(definition.statements.iter().map(|s| s.sequence.to_string()))
                    .map(|seq| {
                        XrefFinding::duplicate(format!(
                            "policy '{}' uses statement sequence {seq} twice",
                            definition.name
                        ))
                    }),
            );
        }
    }
    out
}

fn prefix_entry_findings(set: &PrefixSet) -> Vec<XrefFinding> {
    let mut out = Vec::new();
    for entry in &set.prefixes {
        let is_v6 = entry.ip_prefix.addr().is_ipv6();
        let mismatch = match set.mode {
            PrefixSetMode::Ipv4 => is_v6,
            PrefixSetMode::Ipv6 => !is_v6,
            PrefixSetMode::Mixed => false,
        };
        if mismatch {
            out.push(XrefFinding::family_mismatch(format!(
                "prefix-set '{}' entry {} does not match the set mode",
                set.name, entry.ip_prefix
            )));
        }
        if entry.masklength_range != "exact" {
            if let Err(e) = parse_bounds(&entry.masklength_range, &entry.ip_prefix) {
                out.push(XrefFinding::range(&set.name, e));
            }
        }
    }
    out
}

/// Names that appear more than once, each reported once, in first-repeat order.
fn first_duplicates(names: impl Iterator<Item = String>) -> impl Iterator<Item = String> {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut out = Vec::new();
    for name in names {
        if !seen.insert(name.clone()) && reported.insert(name.clone()) {
            out.push(name);
        }
    }
    out.into_iter()
}
