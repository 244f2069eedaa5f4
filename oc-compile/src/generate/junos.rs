use netcfg_core::model::{
    AfiSafiName, BgpAsset, CommunityMethod, CommunitySet, GlobalConfig, Neighbor, PeerGroup,
    PolicyDefinition, PolicyResult, PrefixSet,
};
use netcfg_core::InstalledNeighbor;
use tracing::warn;

use super::common::{junos_set_or_delete, AssetCommands, FamilyBlocks, FamilyPolicies, GenContext};
use super::Generator;
use crate::error::CompileError;
use crate::range::convert_range;

/// JunOS generator. Every line is a full `set`/`delete`/`activate` statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct JunosGenerator;

impl Generator for JunosGenerator {
    fn global(&self, ctx: &GenContext<'_>, global: &GlobalConfig) -> AssetCommands {
        let path = ctx.junos_path();
        let mut lines = vec![format!("set {path} multipath multiple-as")];
        if let Some(restart) = global.graceful_restart {
            if restart.enabled {
                lines.push(format!("set {path} graceful-restart"));
                lines.push(junos_set_or_delete(
                    &path,
                    "graceful-restart restart-time",
                    restart.restart_time.map(|t| t.to_string()),
                ));
            } else {
                lines.push(format!("delete {path} graceful-restart"));
            }
        }
        AssetCommands {
            lines,
            families: FamilyBlocks::default(),
        }
    }

    fn peer_group(
        &self,
        ctx: &GenContext<'_>,
        pg: &PeerGroup,
    ) -> Result<AssetCommands, CompileError> {
        let base = format!("{} group {}", ctx.junos_path(), pg.peer_group_name);
        let mut lines = vec![junos_set_or_delete(
            &base,
            "local-as",
            pg.local_as.map(|asn| asn.to_string()),
        )];
        if let Some(peer) = pg.peer_as {
            lines.push(format!("set {base} peer-as {peer}"));
        }
        lines.push(junos_set_or_delete(
            &base,
            "preference",
            ctx.preference(pg.peer_as, pg.local_as).map(|d| d.to_string()),
        ));
        lines.push(junos_set_or_delete(
            &base,
            "description",
            pg.description().map(quote),
        ));
        for (attribute, names) in [
            ("import", &pg.apply_policy.import_policy),
            ("export", &pg.apply_policy.export_policy),
        ] {
            lines.push(format!("delete {base} {attribute}"));
            if !names.is_empty() {
                lines.push(format!("set {base} {attribute} {}", policy_list(names)));
            }
        }

        Ok(AssetCommands {
            lines,
            families: family_blocks(ctx, &base, pg),
        })
    }

    fn neighbor(
        &self,
        ctx: &GenContext<'_>,
        neighbor: &Neighbor,
    ) -> Result<AssetCommands, CompileError> {
        let Some(group) = neighbor.peer_group() else {
            return Err(CompileError::InvalidDeclaration(format!(
                "neighbor {} must belong to a peer-group on JunOS",
                neighbor.neighbor_address
            )));
        };
        let group_base = format!("{} group {group}", ctx.junos_path());
        let base = format!("{group_base} neighbor {}", neighbor.neighbor_address);
        let peer_as = neighbor
            .peer_as
            .or_else(|| ctx.peer_group(group).and_then(|pg| pg.peer_as));

        let mut lines = Vec::new();
        if let Some(peer) = neighbor.peer_as {
            lines.push(format!("set {base} peer-as {peer}"));
        }
        lines.push(junos_set_or_delete(
            &base,
            "local-as",
            neighbor
                .local_as
                .filter(|local| Some(*local) != ctx.asn)
                .map(|asn| asn.to_string()),
        ));
        if let Some(distance) = ctx.preference(peer_as, neighbor.local_as) {
            lines.push(format!("set {group_base} preference {distance}"));
        }
        lines.push(junos_set_or_delete(
            &base,
            "description",
            neighbor.description().map(quote),
        ));
        lines.push(junos_set_or_delete(
            &base,
            "authentication-key",
            neighbor.auth_password().map(ToString::to_string),
        ));
        lines.push(if neighbor.enabled {
            format!("activate {base}")
        } else {
            format!("deactivate {base}")
        });
        lines.push(format!("delete {base} import"));
        lines.push(format!("delete {base} export"));

        Ok(AssetCommands {
            lines,
            families: family_blocks(ctx, &base, neighbor),
        })
    }

    fn neighbor_removal(&self, ctx: &GenContext<'_>, neighbor: &InstalledNeighbor) -> Vec<String> {
        match neighbor.peer_group.as_deref().filter(|g| !g.is_empty()) {
            Some(group) => vec![format!(
                "delete {} group {group} neighbor {}",
                ctx.junos_path(),
                neighbor.remote_address
            )],
            None => {
                warn!(
                    neighbor = %neighbor.remote_address,
                    "cannot remove a JunOS neighbor without a peer-group; skipped"
                );
                Vec::new()
            }
        }
    }

    fn community_set(&self, _ctx: &GenContext<'_>, set: &CommunitySet) -> Vec<String> {
        let base = format!("policy-options community {}", set.community_set_name);
        let mut lines = vec![format!("delete {base}")];
        if !set.members.is_empty() {
            lines.push(format!("set {base} members [ {} ]", set.members.join(" ")));
        }
        lines
    }

    fn prefix_set(&self, ctx: &GenContext<'_>, set: &PrefixSet) -> Result<Vec<String>, CompileError> {
        let base = format!("policy-options route-filter-list {}", set.name);
        let mut lines = vec![format!("delete {base}")];
        for entry in &set.prefixes {
            let range = convert_range(
                ctx.vendor.range_dialect(),
                &entry.masklength_range,
                &entry.ip_prefix,
            )?;
            lines.push(format!("set {base} {} {range}", entry.ip_prefix));
        }
        Ok(lines)
    }

    fn policy(
        &self,
        ctx: &GenContext<'_>,
        policy: &PolicyDefinition,
    ) -> Result<Vec<String>, CompileError> {
        let mut lines = Vec::new();
        for variant in ctx.usage.variants(policy) {
            let base = format!("policy-options policy-statement {}", variant.name());
            lines.push(format!("delete {base}"));
            for statement in &policy.statements {
                let term = format!("set {base} term {}", statement.sequence);
                if let Some(afi) = variant.afi {
                    lines.push(format!("{term} from family {}", ctx.vendor.afi_alias(afi)));
                }
                if let Some(name) = &statement.conditions.match_prefix_set {
                    lines.push(format!("{term} from route-filter-list {name}"));
                }
                if let Some(name) = &statement.conditions.community_set {
                    lines.push(format!("{term} from community {name}"));
                }

                let actions = &statement.actions;
                if let Some(pref) = actions.set_local_pref {
                    lines.push(format!("{term} then local-preference {pref}"));
                }
                if let Some(med) = actions.set_med {
                    lines.push(format!("{term} then metric {med}"));
                }
                if let Some(next_hop) = actions.set_next_hop {
                    lines.push(format!("{term} then next-hop {next_hop}"));
                }
                if let Some(prepend) = actions.set_as_path_prepend {
                    let path =
                        vec![prepend.asn.to_string(); usize::from(prepend.repeat_n)].join(" ");
                    lines.push(format!("{term} then as-path-prepend \"{path}\""));
                }
                if let Some(action) = &actions.set_community {
                    let verb = match action.method {
                        CommunityMethod::Add => "add",
                        CommunityMethod::Remove => "delete",
                        CommunityMethod::Replace => "set",
                    };
                    lines.push(format!(
                        "{term} then community {verb} {}",
                        action.community_set
                    ));
                }
                match actions.policy_result {
                    Some(PolicyResult::AcceptRoute) => lines.push(format!("{term} then accept")),
                    Some(PolicyResult::RejectRoute) => lines.push(format!("{term} then reject")),
                    None => {}
                }
            }
        }
        Ok(lines)
    }
}

fn quote(text: &str) -> String {
    format!("\"{text}\"")
}

fn policy_list(names: &[String]) -> String {
    format!("[{}]", names.join(" "))
}

/// Family statements for a group (`base` = `... group G`) or neighbor.
fn family_blocks(ctx: &GenContext<'_>, base: &str, asset: &dyn BgpAsset) -> FamilyBlocks {
    AfiSafiName::ALL
        .into_iter()
        .fold(FamilyBlocks::default(), |blocks, afi| {
            let family = format!("{base} family {} unicast", ctx.vendor.afi_alias(afi));
            let lines = match asset.afi_safi(afi) {
                Some(params) if params.enabled => {
                    let mut lines = vec![format!("set {family}")];
                    lines.push(match params.max_prefixes() {
                        Some(limit) => format!("set {family} prefix-limit maximum {limit}"),
                        None => format!("delete {family} prefix-limit"),
                    });
                    let policies = FamilyPolicies::resolve_variants(asset, afi);
                    if !policies.import.is_empty() {
                        lines.push(format!("set {base} import {}", policy_list(&policies.import)));
                    }
                    if !policies.export.is_empty() {
                        lines.push(format!("set {base} export {}", policy_list(&policies.export)));
                    }
                    lines
                }
                _ => vec![format!("delete {family}")],
            };
            blocks.with(afi, lines)
        })
}
