//! Prefix-list and route-map lines shared by the EOS and FRR dialects.

use netcfg_core::model::{CommunityMethod, PolicyDefinition, PolicyResult, PrefixSet, PrefixSetMode};

use super::common::GenContext;
use crate::error::CompileError;
use crate::existing::ObjectKind;
use crate::range::convert_range;

pub(super) fn prefix_list_lines(
    ctx: &GenContext<'_>,
    set: &PrefixSet,
) -> Result<Vec<String>, CompileError> {
    let (v4, v6) = match set.mode {
        PrefixSetMode::Ipv4 => (true, false),
        PrefixSetMode::Ipv6 => (false, true),
        PrefixSetMode::Mixed => (true, true),
    };

    let mut out = Vec::new();
    if v4 && ctx.should_delete(ObjectKind::Ipv4PrefixList, &set.name) {
        out.push(format!("no ip prefix-list {}", set.name));
    }
    if v6 && ctx.should_delete(ObjectKind::Ipv6PrefixList, &set.name) {
        out.push(format!("no ipv6 prefix-list {}", set.name));
    }

    for (idx, entry) in set.prefixes.iter().enumerate() {
        let keyword = if entry.ip_prefix.addr().is_ipv6() {
            "ipv6"
        } else {
            "ip"
        };
        let range = convert_range(
            ctx.vendor.range_dialect(),
            &entry.masklength_range,
            &entry.ip_prefix,
        )?;
        let mut line = format!(
            "{keyword} prefix-list {} seq {} permit {}",
            set.name,
            (idx + 1) * 10,
            entry.ip_prefix
        );
        if !range.is_empty() {
            line.push(' ');
            line.push_str(&range);
        }
        out.push(line);
    }
    Ok(out)
}

pub(super) fn route_map_lines(
    ctx: &GenContext<'_>,
    policy: &PolicyDefinition,
    indent: &str,
) -> Result<Vec<String>, CompileError> {
    let mut out = Vec::new();
    if ctx.should_delete(ObjectKind::RouteMap, &policy.name) {
        out.push(format!("no route-map {}", policy.name));
    }

    for statement in &policy.statements {
        let referrer = || format!("route-map {} {}", policy.name, statement.sequence);
        let verb = match statement.actions.policy_result {
            Some(PolicyResult::RejectRoute) => "deny",
            Some(PolicyResult::AcceptRoute) | None => "permit",
        };
        out.push(format!(
            "route-map {} {verb} {}",
            policy.name, statement.sequence
        ));

        if let Some(name) = &statement.conditions.match_prefix_set {
            let set = ctx
                .defined_sets
                .prefix_set(name)
                .ok_or_else(|| CompileError::MissingReference {
                    kind: "prefix-set",
                    name: name.clone(),
                    referrer: referrer(),
                })?;
            let family = if set.matches_ipv6() { "ipv6" } else { "ip" };
            out.push(format!("{indent}match {family} address prefix-list {name}"));
        }
        if let Some(name) = &statement.conditions.community_set {
            out.push(format!("{indent}match community {name}"));
        }

        let actions = &statement.actions;
        if let Some(pref) = actions.set_local_pref {
            out.push(format!("{indent}set local-preference {pref}"));
        }
        if let Some(med) = actions.set_med {
            out.push(format!("{indent}set metric {med}"));
        }
        if let Some(next_hop) = actions.set_next_hop {
            let family = if next_hop.is_ipv6() { "ipv6" } else { "ip" };
            out.push(format!("{indent}set {family} next-hop {next_hop}"));
        }
        if let Some(prepend) = actions.set_as_path_prepend {
            let path = vec![prepend.asn.to_string(); usize::from(prepend.repeat_n)].join(" ");
            out.push(format!("{indent}set as-path prepend {path}"));
        }
        if let Some(action) = &actions.set_community {
            let set = ctx
                .defined_sets
                .community_set(&action.community_set)
                .ok_or_else(|| CompileError::MissingReference {
                    kind: "community-set",
                    name: action.community_set.clone(),
                    referrer: referrer(),
                })?;
            let members = set.members.join(" ");
            match action.method {
                CommunityMethod::Add if !members.is_empty() => {
                    out.push(format!("{indent}set community {members} additive"));
                }
                CommunityMethod::Add => {}
                CommunityMethod::Replace if members.is_empty() => {
                    out.push(format!("{indent}set community none"));
                }
                CommunityMethod::Replace => out.push(format!("{indent}set community {members}")),
                CommunityMethod::Remove => {
                    out.push(format!("{indent}set comm-list {} delete", set.community_set_name));
                }
            }
        }
        if actions.policy_result.is_none() {
            out.push(format!("{indent}on-match next"));
        }
    }
    Ok(out)
}
