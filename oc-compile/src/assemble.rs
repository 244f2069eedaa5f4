//! Ordering generated commands into a renderable context.

use netcfg_core::model::AfiSafiName;
use serde::Serialize;

use crate::generate::AssetCommands;
use crate::vendor::Vendor;

/// Generator output, grouped by asset kind, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    pub global: AssetCommands,
    pub peer_groups: Vec<AssetCommands>,
    pub neighbors: Vec<AssetCommands>,
    pub removals: Vec<Vec<String>>,
    pub community_sets: Vec<Vec<String>>,
    pub prefix_sets: Vec<Vec<String>>,
    pub policies: Vec<Vec<String>>,
}

/// Lines scoped to one address family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilySection {
    pub name: String,
    pub alias: String,
    pub lines: Vec<String>,
}

/// What a template sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub vendor: String,
    pub asn: Option<u32>,
    pub vrf: String,
    /// Session lines: global, peer-groups, neighbors, removals.
    pub router: Vec<String>,
    pub families: Vec<FamilySection>,
    /// Top-level lines: community-sets, prefix-sets, policies.
    pub policy: Vec<String>,
}

impl RenderContext {
    pub fn has_router_content(&self) -> bool {
        !self.router.is_empty() || !self.families.is_empty()
    }
}

pub fn assemble(vendor: Vendor, asn: Option<u32>, vrf: &str, sections: Sections) -> RenderContext {
    let assets: Vec<&AssetCommands> = std::iter::once(&sections.global)
        .chain(&sections.peer_groups)
        .chain(&sections.neighbors)
        .collect();

    let families = AfiSafiName::ALL
        .into_iter()
        .filter_map(|afi| {
            let lines: Vec<String> = assets
                .iter()
                .flat_map(|asset| asset.families.get(afi).iter().cloned())
                .collect();
            (!lines.is_empty()).then(|| FamilySection {
                name: afi.as_str().to_string(),
                alias: vendor.afi_alias(afi).to_string(),
                lines,
            })
        })
        .collect();

    let router = assets
        .iter()
        .flat_map(|asset| asset.lines.iter().cloned())
        .chain(sections.removals.into_iter().flatten())
        .collect();

    let policy = sections
        .community_sets
        .into_iter()
        .chain(sections.prefix_sets)
        .chain(sections.policies)
        .flatten()
        .collect();

    RenderContext {
        vendor: vendor.name().to_string(),
        asn,
        vrf: vrf.to_string(),
        router,
        families,
        policy,
    }
}
