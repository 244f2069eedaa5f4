//! Per-family policy variants for JunOS.
//!
//! JunOS binds import/export policies to a group or neighbor, not to an
//! address family. To honor family-scoped bindings, each policy referenced
//! inside an `afi-safis` entry is duplicated into a variant whose terms all
//! start with `from family inet|inet6`, and the family binding points at the
//! variant instead of the original.

use std::collections::{BTreeMap, BTreeSet};

use netcfg_core::model::{AfiSafiName, Bgp, BgpAsset, PolicyDefinition};

use crate::error::CompileError;

/// Which families each policy is referenced from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyUsage {
    families: BTreeMap<String, BTreeSet<AfiSafiName>>,
}

/// A policy to emit: the original (`afi == None`) or a family variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyVariant<'a> {
    pub afi: Option<AfiSafiName>,
    pub definition: &'a PolicyDefinition,
}

impl PolicyVariant<'_> {
    pub fn name(&self) -> String {
        match self.afi {
            Some(afi) => variant_name(&self.definition.name, afi),
            None => self.definition.name.clone(),
        }
    }
}

/// Name of the family variant of `policy`.
pub fn variant_name(policy: &str, afi: AfiSafiName) -> String {
    format!("AUTOGENERATED::{policy}::{afi}")
}

impl PolicyUsage {
    /// Scan peer-group and neighbor family bindings.
    ///
    /// Every declared policy gets an (initially empty) entry; a family-level
    /// reference to a policy that is not declared is an error.
    pub fn scan(bgp: Option<&Bgp>, policies: &[PolicyDefinition]) -> Result<Self, CompileError> {
        let mut families: BTreeMap<String, BTreeSet<AfiSafiName>> = policies
            .iter()
            .map(|p| (p.name.clone(), BTreeSet::new()))
            .collect();

        let Some(bgp) = bgp else {
            return Ok(Self { families });
        };

        let assets = bgp
            .peer_groups
            .iter()
            .map(|pg| (format!("peer-group '{}'", pg.peer_group_name), pg as &dyn BgpAsset))
            .chain(
                bgp.neighbors
                    .iter()
                    .map(|n| (format!("neighbor {}", n.neighbor_address), n as &dyn BgpAsset)),
            );

        for (referrer, asset) in assets {
            for afi in asset.afi_safis() {
                for name in afi.apply_policy.names() {
                    let Some(used) = families.get_mut(name) else {
                        return Err(CompileError::MissingReference {
                            kind: "policy",
                            name: name.to_string(),
                            referrer: format!("{referrer} {}", afi.afi_safi_name),
                        });
                    };
                    used.insert(afi.afi_safi_name);
                }
            }
        }

        Ok(Self { families })
    }

    /// Families in which `policy` is referenced.
    pub fn families(&self, policy: &str) -> impl Iterator<Item = AfiSafiName> + '_ {
        self.families
            .get(policy)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// The original policy followed by one variant per family it is used in.
    pub fn variants<'a>(&self, definition: &'a PolicyDefinition) -> Vec<PolicyVariant<'a>> {
        std::iter::once(None)
            .chain(self.families(&definition.name).map(Some))
            .map(|afi| PolicyVariant { afi, definition })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcfg_core::parse;

    #[test]
    fn ipv4_only_usage_yields_one_variant() {
        let doc = parse(
            br#"{"bgp": {"neighbors": [{"neighbor-address": "192.0.2.1", "peer-group": "PG",
                    "afi-safis": [{"afi-safi-name": "IPV4_UNICAST",
                        "apply-policy": {"import-policy": ["RM-IN"]}}]}]},
                 "routing-policy": {"policy-definitions": [
                    {"name": "RM-IN"}, {"name": "RM-UNUSED"}]}}"#,
        )
        .expect("document");
        let policies = &doc.routing_policy.as_ref().expect("policy").policy_definitions;
        let usage = PolicyUsage::scan(doc.bgp.as_ref(), policies).expect("scan");

        let names: Vec<String> = usage.variants(&policies[0]).iter().map(|v| v.name()).collect();
        assert_eq!(
            names,
            vec![
                "RM-IN".to_string(),
                "AUTOGENERATED::RM-IN::IPV4_UNICAST".to_string()
            ]
        );
        assert_eq!(usage.variants(&policies[1]).len(), 1);
    }

    #[test]
    fn peer_group_bindings_are_scanned() {
        let doc = parse(
            br#"{"bgp": {"peer-groups": [{"peer-group-name": "PG",
                    "afi-safis": [
                        {"afi-safi-name": "IPV4_UNICAST", "apply-policy": {"export-policy": ["RM"]}},
                        {"afi-safi-name": "IPV6_UNICAST", "apply-policy": {"export-policy": ["RM"]}}]}]},
                 "routing-policy": {"policy-definitions": [{"name": "RM"}]}}"#,
        )
        .expect("document");
        let policies = &doc.routing_policy.as_ref().expect("policy").policy_definitions;
        let usage = PolicyUsage::scan(doc.bgp.as_ref(), policies).expect("scan");

        assert_eq!(
            usage.families("RM").collect::<Vec<_>>(),
            vec![AfiSafiName::Ipv4Unicast, AfiSafiName::Ipv6Unicast]
        );
    }

    #[test]
    fn family_reference_to_unknown_policy_fails() {
        let doc = parse(
            br#"{"bgp": {"neighbors": [{"neighbor-address": "192.0.2.1",
                    "afi-safis": [{"afi-safi-name": "IPV6_UNICAST",
                        "apply-policy": {"import-policy": ["RM-GHOST"]}}]}]}}"#,
        )
        .expect("document");
        let err = PolicyUsage::scan(doc.bgp.as_ref(), &[]).expect_err("unknown policy");
        assert!(matches!(err, CompileError::MissingReference { name, .. } if name == "RM-GHOST"));
    }
}
