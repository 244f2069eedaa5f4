use netcfg_core::model::{
    AfiSafiName, BgpAsset, CommunitySet, GlobalConfig, Neighbor, PeerGroup, PolicyDefinition,
    PrefixSet,
};
use netcfg_core::InstalledNeighbor;

use super::common::{asset_route_maps, single_route_map, AssetCommands, FamilyBlocks, GenContext};
use super::route_map::{prefix_list_lines, route_map_lines};
use super::{require_remote_as, Generator};
use crate::error::CompileError;

const STATEMENT_INDENT: &str = "   ";
const DEFAULT_MAXIMUM_PATHS: u16 = 128;

/// EOS-style generator. Lines are relative to the `router bgp` stanza.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiscoGenerator;

impl Generator for CiscoGenerator {
    fn global(&self, ctx: &GenContext<'_>, global: &GlobalConfig) -> AssetCommands {
        let mut lines = vec![
            "no bgp default ipv4-unicast".to_string(),
            "bgp bestpath as-path multipath-relax".to_string(),
        ];
        lines.push(match global.router_id {
            Some(id) => format!("bgp router-id {id}"),
            None => "no bgp router-id".to_string(),
        });
        lines.push(format!(
            "distance bgp {} {} {}",
            ctx.external_distance, ctx.internal_distance, ctx.internal_distance
        ));

        let restart = global.graceful_restart.filter(|gr| gr.enabled);
        lines.push(match restart {
            Some(_) => "graceful-restart".to_string(),
            None => "no graceful-restart".to_string(),
        });
        lines.push(match restart.and_then(|gr| gr.restart_time) {
            Some(time) => format!("graceful-restart restart-time {time}"),
            None => "no graceful-restart restart-time".to_string(),
        });

        let multipath = &global.use_multiple_paths;
        lines.push(if multipath.enabled {
            let paths = multipath
                .ebgp_maximum_paths
                .max(multipath.ibgp_maximum_paths)
                .unwrap_or(DEFAULT_MAXIMUM_PATHS);
            format!("maximum-paths {paths} ecmp {paths}")
        } else {
            "no maximum-paths".to_string()
        });

        AssetCommands {
            lines,
            families: FamilyBlocks::default(),
        }
    }

    fn peer_group(
        &self,
        _ctx: &GenContext<'_>,
        pg: &PeerGroup,
    ) -> Result<AssetCommands, CompileError> {
        let g = &pg.peer_group_name;
        let mut lines = vec![format!("neighbor {g} peer group")];
        lines.push(match pg.local_as {
            Some(local) => format!("neighbor {g} local-as {local}"),
            None => format!("default neighbor {g} local-as"),
        });
        if let Some(peer) = pg.peer_as {
            lines.push(format!("neighbor {g} remote-as {peer}"));
        }
        lines.push(match pg.description() {
            Some(text) => format!("neighbor {g} description {text}"),
            None => format!("default neighbor {g} description"),
        });
        lines.extend(session_tail(g, pg));

        Ok(AssetCommands {
            lines,
            families: family_route_maps(g, pg, |_| Vec::new()),
        })
    }

    fn neighbor(
        &self,
        ctx: &GenContext<'_>,
        neighbor: &Neighbor,
    ) -> Result<AssetCommands, CompileError> {
        require_remote_as(neighbor)?;
        let a = neighbor.neighbor_address.to_string();

        let mut lines = Vec::new();
        if let Some(peer) = neighbor.peer_as {
            lines.push(format!("neighbor {a} remote-as {peer}"));
        }
        lines.push(match neighbor.local_as.filter(|local| Some(*local) != ctx.asn) {
            Some(local) => format!("neighbor {a} local-as {local} no-prepend replace-as"),
            None => format!("default neighbor {a} local-as"),
        });
        lines.push(if neighbor.enabled {
            format!("default neighbor {a} shutdown")
        } else {
            format!("neighbor {a} shutdown")
        });
        if let Some(group) = neighbor.peer_group() {
            lines.push(format!("neighbor {a} peer-group {group}"));
        }
        lines.push(match neighbor.description() {
            Some(text) => format!("neighbor {a} description {text}"),
            None => format!("default neighbor {a} description"),
        });
        lines.push(match neighbor.auth_password() {
            Some(secret) => format!("neighbor {a} password 7 {secret}"),
            None => format!("default neighbor {a} password"),
        });
        lines.extend(session_tail(&a, neighbor));

        let families = family_route_maps(&a, neighbor, |afi| {
            let verb = if neighbor.is_active(afi) { "" } else { "no " };
            vec![format!("{verb}neighbor {a} activate")]
        });
        Ok(AssetCommands { lines, families })
    }

    fn neighbor_removal(&self, _ctx: &GenContext<'_>, neighbor: &InstalledNeighbor) -> Vec<String> {
        vec![format!("no neighbor {}", neighbor.remote_address)]
    }

    fn community_set(&self, _ctx: &GenContext<'_>, set: &CommunitySet) -> Vec<String> {
        let name = &set.community_set_name;
        std::iter::once(format!("no ip community-list {name}"))
            .chain(
                set.members
                    .iter()
                    .map(|member| format!("ip community-list {name} permit {member}")),
            )
            .collect()
    }

    fn prefix_set(&self, ctx: &GenContext<'_>, set: &PrefixSet) -> Result<Vec<String>, CompileError> {
        prefix_list_lines(ctx, set)
    }

    fn policy(
        &self,
        ctx: &GenContext<'_>,
        policy: &PolicyDefinition,
    ) -> Result<Vec<String>, CompileError> {
        route_map_lines(ctx, policy, STATEMENT_INDENT)
    }
}

/// Asset-level route-maps, prefix limit and community sending.
fn session_tail(name: &str, asset: &dyn BgpAsset) -> Vec<String> {
    let (import, export) = asset_route_maps(asset.apply_policy(), name);
    let mut lines = vec![
        route_map_line(name, import, "in"),
        route_map_line(name, export, "out"),
    ];
    lines.push(match asset.prefix_limit() {
        Some(limit) => format!("neighbor {name} maximum-routes {limit}"),
        None => format!("default neighbor {name} maximum-routes"),
    });
    lines.push(format!("neighbor {name} send-community"));
    lines
}

fn route_map_line(name: &str, route_map: Option<&str>, direction: &str) -> String {
    match route_map {
        Some(route_map) => format!("neighbor {name} route-map {route_map} {direction}"),
        None => format!("default neighbor {name} route-map {direction}"),
    }
}

/// Both families, with `prefix` lines first and then the family's own route-maps.
fn family_route_maps(
    name: &str,
    asset: &dyn BgpAsset,
    prefix: impl Fn(AfiSafiName) -> Vec<String>,
) -> FamilyBlocks {
    AfiSafiName::ALL
        .into_iter()
        .fold(FamilyBlocks::default(), |blocks, afi| {
            let own = asset.afi_safi(afi).map(|a| &a.apply_policy);
            let import = own.and_then(|p| single_route_map(&p.import_policy, name, "in"));
            let export = own.and_then(|p| single_route_map(&p.export_policy, name, "out"));

            let mut lines = prefix(afi);
            lines.push(route_map_line(name, import, "in"));
            lines.push(route_map_line(name, export, "out"));
            blocks.with(afi, lines)
        })
}
