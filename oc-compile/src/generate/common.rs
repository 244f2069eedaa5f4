use std::collections::BTreeMap;

use netcfg_core::model::{AfiSafiName, ApplyPolicy, BgpAsset, DefinedSets, Document, PeerGroup};
use netcfg_core::ExistingNamedObjects;

use crate::afi_policy::{variant_name, PolicyUsage};
use crate::existing::{is_installed, ObjectKind};
use crate::vendor::Vendor;

/// Command lines scoped to one address family, per family.
///
/// Built by chaining [`FamilyBlocks::with`]; never edited in place once handed
/// to the assembler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyBlocks {
    blocks: BTreeMap<AfiSafiName, Vec<String>>,
}

impl FamilyBlocks {
    /// Append `lines` to the block of `afi`.
    pub fn with(mut self, afi: AfiSafiName, lines: Vec<String>) -> Self {
        if !lines.is_empty() {
            self.blocks.entry(afi).or_default().extend(lines);
        }
        self
    }

    pub fn get(&self, afi: AfiSafiName) -> &[String] {
        self.blocks.get(&afi).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Output of a session-level generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetCommands {
    pub lines: Vec<String>,
    pub families: FamilyBlocks,
}

/// Everything a generator may consult besides the entity itself.
#[derive(Debug, Clone)]
pub struct GenContext<'a> {
    pub vendor: Vendor,
    pub asn: Option<u32>,
    pub vrf: &'a str,
    pub external_distance: u8,
    pub internal_distance: u8,
    pub peer_groups: &'a [PeerGroup],
    pub defined_sets: &'a DefinedSets,
    pub usage: &'a PolicyUsage,
    /// Installed objects on a diff-aware device. `None` means unknown, so
    /// every definition is preceded by its delete.
    pub existing: Option<&'a ExistingNamedObjects>,
}

static NO_SETS: DefinedSets = DefinedSets {
    prefix_sets: Vec::new(),
    community_sets: Vec::new(),
};

impl<'a> GenContext<'a> {
    pub fn new(
        vendor: Vendor,
        doc: &'a Document,
        asn: Option<u32>,
        vrf: &'a str,
        usage: &'a PolicyUsage,
        existing: Option<&'a ExistingNamedObjects>,
    ) -> Self {
        let (default_external, default_internal) = vendor.default_distances();
        let distance = doc
            .bgp
            .as_ref()
            .map(|bgp| bgp.global.default_route_distance)
            .unwrap_or_default();
        Self {
            vendor,
            asn,
            vrf,
            external_distance: distance.external_route_distance.unwrap_or(default_external),
            internal_distance: distance.internal_route_distance.unwrap_or(default_internal),
            peer_groups: doc
                .bgp
                .as_ref()
                .map(|bgp| bgp.peer_groups.as_slice())
                .unwrap_or(&[]),
            defined_sets: doc
                .routing_policy
                .as_ref()
                .map(|policy| &policy.defined_sets)
                .unwrap_or(&NO_SETS),
            usage,
            existing,
        }
    }

    pub fn peer_group(&self, name: &str) -> Option<&'a PeerGroup> {
        self.peer_groups.iter().find(|pg| pg.peer_group_name == name)
    }

    /// Distance for a session: external unless the peer shares the local AS.
    ///
    /// `None` when neither a local AS nor the global AS is known.
    pub fn preference(&self, peer_as: Option<u32>, local_as: Option<u32>) -> Option<u8> {
        let local = local_as.or(self.asn)?;
        if peer_as == Some(local) {
            Some(self.internal_distance)
        } else {
            Some(self.external_distance)
        }
    }

    /// Whether a definition must be preceded by its delete.
    pub fn should_delete(&self, kind: ObjectKind, name: &str) -> bool {
        match self.existing {
            Some(objects) if self.vendor.is_diff_aware() => is_installed(objects, kind, name),
            _ => true,
        }
    }

    /// JunOS BGP configuration path for the active VRF.
    pub fn junos_path(&self) -> String {
        if self.vrf.is_empty() {
            "protocols bgp".to_string()
        } else {
            format!("routing-instances {} protocols bgp", self.vrf)
        }
    }
}

/// Import and export policy names bound inside a family, with fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyPolicies {
    pub import: Vec<String>,
    pub export: Vec<String>,
}

impl FamilyPolicies {
    /// The family's own bindings, each side falling back to the asset level.
    pub fn resolve(asset: &dyn BgpAsset, afi: AfiSafiName) -> Self {
        let family = asset.afi_safi(afi).map(|a| &a.apply_policy);
        let pick = |own: Option<&Vec<String>>, fallback: &Vec<String>| match own {
            Some(names) if !names.is_empty() => names.clone(),
            _ => fallback.clone(),
        };
        let asset_level = asset.apply_policy();
        Self {
            import: pick(family.map(|p| &p.import_policy), &asset_level.import_policy),
            export: pick(family.map(|p| &p.export_policy), &asset_level.export_policy),
        }
    }

    /// JunOS flavor: family-level names become family variants, asset-level
    /// fallbacks stay plain.
    pub fn resolve_variants(asset: &dyn BgpAsset, afi: AfiSafiName) -> Self {
        let family = asset.afi_safi(afi).map(|a| &a.apply_policy);
        let asset_level = asset.apply_policy();
        let pick = |own: Option<&Vec<String>>, fallback: &Vec<String>| -> Vec<String> {
            match own {
                Some(names) if !names.is_empty() => {
                    names.iter().map(|name| variant_name(name, afi)).collect()
                }
                _ => fallback.clone(),
            }
        };
        Self {
            import: pick(family.map(|p| &p.import_policy), &asset_level.import_policy),
            export: pick(family.map(|p| &p.export_policy), &asset_level.export_policy),
        }
    }
}

/// First policy of a binding list. Route-map dialects accept a single name.
pub fn single_route_map<'p>(names: &'p [String], owner: &str, direction: &str) -> Option<&'p str> {
    if names.len() > 1 {
        tracing::warn!(
            owner,
            direction,
            ignored = names.len() - 1,
            "route-map dialect binds one policy per direction; extra policies ignored"
        );
    }
    names.first().map(String::as_str)
}

/// Asset-level import/export as single route-map names.
pub fn asset_route_maps<'p>(
    policy: &'p ApplyPolicy,
    owner: &str,
) -> (Option<&'p str>, Option<&'p str>) {
    (
        single_route_map(&policy.import_policy, owner, "in"),
        single_route_map(&policy.export_policy, owner, "out"),
    )
}

/// `set` when the value is present, `delete` otherwise.
pub fn junos_set_or_delete(base: &str, attribute: &str, value: Option<String>) -> String {
    match value {
        Some(value) => format!("set {base} {attribute} {value}"),
        None => format!("delete {base} {attribute}"),
    }
}
