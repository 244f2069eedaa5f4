use netcfg_core::model::{
    AfiSafiName, BgpAsset, CommunitySet, GlobalConfig, Neighbor, PeerGroup, PolicyDefinition,
    PrefixSet,
};
use netcfg_core::InstalledNeighbor;

use super::common::{single_route_map, AssetCommands, FamilyBlocks, FamilyPolicies, GenContext};
use super::route_map::{prefix_list_lines, route_map_lines};
use super::{require_remote_as, Generator};
use crate::error::CompileError;
use crate::existing::ObjectKind;

const STATEMENT_INDENT: &str = " ";

/// FRR generator. Lines are relative to `router bgp`; family lines to
/// `address-family`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrrGenerator;

impl Generator for FrrGenerator {
    fn global(&self, ctx: &GenContext<'_>, global: &GlobalConfig) -> AssetCommands {
        let mut lines = vec![
            "bgp log-neighbor-changes".to_string(),
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
        let negate = if restart.is_some() { "" } else { "no " };
        lines.push(format!("{negate}bgp graceful-restart"));
        lines.push(format!("{negate}bgp graceful-restart preserve-fw-state"));
        lines.push(match restart.and_then(|gr| gr.restart_time) {
            Some(time) => format!("bgp graceful-restart restart-time {time}"),
            None => "no bgp graceful-restart restart-time".to_string(),
        });

        let multipath = &global.use_multiple_paths;
        let enabled = |paths: Option<u16>| paths.filter(|_| multipath.enabled);
        let family_lines = vec![
            match enabled(multipath.ebgp_maximum_paths) {
                Some(paths) => format!("maximum-paths {paths}"),
                None => "no maximum-paths".to_string(),
            },
            match enabled(multipath.ibgp_maximum_paths) {
                Some(paths) => format!("maximum-paths ibgp {paths}"),
                None => "no maximum-paths ibgp".to_string(),
            },
        ];
        let families = AfiSafiName::ALL
            .into_iter()
            .fold(FamilyBlocks::default(), |blocks, afi| {
                blocks.with(afi, family_lines.clone())
            });

        AssetCommands { lines, families }
    }

    fn peer_group(
        &self,
        _ctx: &GenContext<'_>,
        pg: &PeerGroup,
    ) -> Result<AssetCommands, CompileError> {
        let g = &pg.peer_group_name;
        let mut lines = vec![format!("neighbor {g} peer-group")];
        lines.push(match pg.local_as {
            Some(local) => format!("neighbor {g} local-as {local}"),
            None => format!("no neighbor {g} local-as"),
        });
        if let Some(peer) = pg.peer_as {
            lines.push(format!("neighbor {g} remote-as {peer}"));
        }
        lines.push(match pg.description() {
            Some(text) => format!("neighbor {g} description {text}"),
            None => format!("no neighbor {g} description"),
        });

        let families = AfiSafiName::ALL
            .into_iter()
            .fold(FamilyBlocks::default(), |blocks, afi| {
                let mut block = family_policy_lines(g, pg, afi);
                block.push(format!("neighbor {g} send-community"));
                blocks.with(afi, block)
            });
        Ok(AssetCommands { lines, families })
    }

    fn neighbor(
        &self,
        ctx: &GenContext<'_>,
        neighbor: &Neighbor,
    ) -> Result<AssetCommands, CompileError> {
        require_remote_as(neighbor)?;
        let a = neighbor.neighbor_address.to_string();
        let group = neighbor.peer_group();
        let group_as = group
            .and_then(|name| ctx.peer_group(name))
            .and_then(|pg| pg.peer_as);

        let mut lines = Vec::new();
        if let Some(group) = group {
            lines.push(format!("neighbor {a} peer-group {group}"));
        }
        if let Some(peer) = neighbor.peer_as {
            if group.is_none() || group_as != Some(peer) {
                lines.push(format!("neighbor {a} remote-as {peer}"));
            }
        }
        lines.push(match neighbor.local_as.filter(|local| Some(*local) != ctx.asn) {
            Some(local) => format!("neighbor {a} local-as {local}"),
            None => format!("no neighbor {a} local-as"),
        });
        lines.push(match neighbor.description() {
            Some(text) => format!("neighbor {a} description {text}"),
            None => format!("no neighbor {a} description"),
        });
        lines.push(match neighbor.auth_password() {
            Some(secret) => format!("neighbor {a} password {secret}"),
            None => format!("no neighbor {a} password"),
        });
        lines.push(match neighbor.delay_open_timer {
            Some(timer) => format!("neighbor {a} timers delayopen {timer}"),
            None => format!("no neighbor {a} timers delayopen"),
        });
        lines.push(if neighbor.enabled {
            format!("no neighbor {a} shutdown")
        } else {
            format!("neighbor {a} shutdown")
        });

        let families = AfiSafiName::ALL
            .into_iter()
            .fold(FamilyBlocks::default(), |blocks, afi| {
                let negate = if neighbor.is_active(afi) { "" } else { "no " };
                let mut block = family_policy_lines(&a, neighbor, afi);
                block.push(format!("{negate}neighbor {a} activate"));
                block.push(format!("{negate}neighbor {a} soft-reconfiguration inbound"));
                block.push(format!("{negate}neighbor {a} send-community"));
                blocks.with(afi, block)
            });
        Ok(AssetCommands { lines, families })
    }

    fn neighbor_removal(&self, _ctx: &GenContext<'_>, neighbor: &InstalledNeighbor) -> Vec<String> {
        vec![format!("no neighbor {}", neighbor.remote_address)]
    }

    fn community_set(&self, ctx: &GenContext<'_>, set: &CommunitySet) -> Vec<String> {
        let name = &set.community_set_name;
        let mut lines = Vec::new();
        if ctx.should_delete(ObjectKind::CommunityList, name) {
            lines.push(format!("no bgp community-list expanded {name}"));
        }
        lines.extend(
            set.members
                .iter()
                .map(|member| format!("bgp community-list expanded {name} permit {member}")),
        );
        lines
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

/// Route-maps (family binding, else asset fallback) and the family prefix limit.
fn family_policy_lines(name: &str, asset: &dyn BgpAsset, afi: AfiSafiName) -> Vec<String> {
    let policies = FamilyPolicies::resolve(asset, afi);
    let route_map = |names: &[String], direction: &str| {
        match single_route_map(names, name, direction) {
            Some(route_map) => format!("neighbor {name} route-map {route_map} {direction}"),
            None => format!("no neighbor {name} route-map * {direction}"),
        }
    };

    vec![
        route_map(policies.import.as_slice(), "in"),
        route_map(policies.export.as_slice(), "out"),
        match asset.afi_safi(afi).and_then(|params| params.max_prefixes()) {
            Some(limit) => format!("neighbor {name} maximum-prefix {limit}"),
            None => format!("no neighbor {name} maximum-prefix"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::afi_policy::PolicyUsage;
    use crate::vendor::Vendor;
    use netcfg_core::{parse, Document, ExistingNamedObjects};
    use pretty_assertions::assert_eq;

    fn doc(json: &str) -> Document {
        parse(json.as_bytes()).expect("document")
    }

    #[test]
    fn global_lines_and_families() {
        let doc = doc(r#"{"bgp": {"global": {"as": 65000,
            "default-route-distance": {"external-route-distance": 30},
            "use-multiple-paths": {"enabled": true, "ebgp-maximum-paths": 8}}}}"#);
        let usage = PolicyUsage::default();
        let ctx = GenContext::new(Vendor::FrrLike, &doc, Some(65000), "", &usage, None);

        let out = FrrGenerator.global(&ctx, &doc.bgp.as_ref().expect("bgp").global);
        assert_eq!(
            out.lines,
            vec![
                "bgp log-neighbor-changes",
                "bgp bestpath as-path multipath-relax",
                "no bgp router-id",
                "distance bgp 30 200 200",
                "no bgp graceful-restart",
                "no bgp graceful-restart preserve-fw-state",
                "no bgp graceful-restart restart-time",
            ]
        );
        assert_eq!(
            out.families.get(AfiSafiName::Ipv6Unicast).to_vec(),
            vec!["maximum-paths 8", "no maximum-paths ibgp"]
        );
    }

    #[test]
    fn neighbor_inherits_remote_as_from_peer_group() {
        let doc = doc(r#"{"bgp": {
            "peer-groups": [{"peer-group-name": "PG", "peer-as": 65100}],
            "neighbors": [
                {"neighbor-address": "192.0.2.1", "peer-group": "PG", "peer-as": 65100,
                 "delay-open-timer": 10, "afi-safis": [{"afi-safi-name": "IPV4_UNICAST"}]},
                {"neighbor-address": "192.0.2.2", "peer-group": "PG", "peer-as": 65200}]}}"#);
        let usage = PolicyUsage::default();
        let ctx = GenContext::new(Vendor::FrrLike, &doc, Some(65000), "", &usage, None);
        let neighbors = &doc.bgp.as_ref().expect("bgp").neighbors;

        let first = FrrGenerator.neighbor(&ctx, &neighbors[0]).expect("neighbor");
        assert_eq!(
            first.lines,
            vec![
                "neighbor 192.0.2.1 peer-group PG",
                "no neighbor 192.0.2.1 local-as",
                "no neighbor 192.0.2.1 description",
                "no neighbor 192.0.2.1 password",
                "neighbor 192.0.2.1 timers delayopen 10",
                "no neighbor 192.0.2.1 shutdown",
            ]
        );
        assert_eq!(
            first.families.get(AfiSafiName::Ipv4Unicast).to_vec(),
            vec![
                "no neighbor 192.0.2.1 route-map * in",
                "no neighbor 192.0.2.1 route-map * out",
                "no neighbor 192.0.2.1 maximum-prefix",
                "neighbor 192.0.2.1 activate",
                "neighbor 192.0.2.1 soft-reconfiguration inbound",
                "neighbor 192.0.2.1 send-community",
            ]
        );
        assert_eq!(
            first.families.get(AfiSafiName::Ipv6Unicast)[3],
            "no neighbor 192.0.2.1 activate"
        );

        let second = FrrGenerator.neighbor(&ctx, &neighbors[1]).expect("neighbor");
        assert_eq!(second.lines[1], "neighbor 192.0.2.2 remote-as 65200");
    }

    #[test]
    fn peer_group_family_falls_back_to_asset_policy() {
        let doc = doc(r#"{"bgp": {"peer-groups": [{"peer-group-name": "PG", "local-as": 65001,
            "apply-policy": {"import-policy": ["RM-IN"]},
            "afi-safis": [{"afi-safi-name": "IPV4_UNICAST", "prefix-limit": 50,
                "apply-policy": {"import-policy": ["RM-V4-IN"]}}]}]}}"#);
        let usage = PolicyUsage::default();
        let ctx = GenContext::new(Vendor::FrrLike, &doc, Some(65000), "", &usage, None);
        let pg = &doc.bgp.as_ref().expect("bgp").peer_groups[0];

        let out = FrrGenerator.peer_group(&ctx, pg).expect("peer group");
        assert_eq!(
            out.lines,
            vec![
                "neighbor PG peer-group",
                "neighbor PG local-as 65001",
                "no neighbor PG description",
            ]
        );
        assert_eq!(
            out.families.get(AfiSafiName::Ipv4Unicast).to_vec(),
            vec![
                "neighbor PG route-map RM-V4-IN in",
                "no neighbor PG route-map * out",
                "neighbor PG maximum-prefix 50",
                "neighbor PG send-community",
            ]
        );
        assert_eq!(
            out.families.get(AfiSafiName::Ipv6Unicast)[0],
            "neighbor PG route-map RM-IN in"
        );
    }

    #[test]
    fn deletes_only_installed_objects() {
        let doc = doc(r#"{"routing-policy": {
            "defined-sets": {
                "prefix-sets": [{"name": "PFX", "mode": "IPV6", "prefixes": [
                    {"ip-prefix": "2001:db8::/32", "masklength-range": "48..64"}]}],
                "community-sets": [{"community-set-name": "CS", "members": ["65000:1"]}]},
            "policy-definitions": [{"name": "RM", "statements": [
                {"sequence": 10, "conditions": {"match-prefix-set": "PFX"},
                 "actions": {"policy-result": "ACCEPT_ROUTE",
                             "set-next-hop": "2001:db8::1",
                             "set-community": {"method": "REPLACE", "community-set": "CS"}}}]}]}}"#);
        let usage = PolicyUsage::default();
        let mut installed = ExistingNamedObjects::default();
        installed.route_maps.insert("RM".to_string());
        installed.ipv4_prefix_lists.insert("PFX".to_string());
        let ctx = GenContext::new(Vendor::FrrLike, &doc, Some(65000), "", &usage, Some(&installed));
        let policy = doc.routing_policy.as_ref().expect("policy");

        assert_eq!(
            FrrGenerator
                .prefix_set(&ctx, &policy.defined_sets.prefix_sets[0])
                .expect("prefix set"),
            vec!["ipv6 prefix-list PFX seq 10 permit 2001:db8::/32 ge 48 le 64"]
        );
        assert_eq!(
            FrrGenerator.community_set(&ctx, &policy.defined_sets.community_sets[0]),
            vec!["bgp community-list expanded CS permit 65000:1"]
        );
        assert_eq!(
            FrrGenerator
                .policy(&ctx, &policy.policy_definitions[0])
                .expect("policy"),
            vec![
                "no route-map RM",
                "route-map RM permit 10",
                " match ipv6 address prefix-list PFX",
                " set ipv6 next-hop 2001:db8::1",
                " set community 65000:1",
            ]
        );
    }
}
