//! Installed named-object discovery for diff-aware dialects.

use netcfg_core::ExistingNamedObjects;
use regex_lite::Regex;

/// Kind of named policy object a delete line targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Ipv4PrefixList,
    Ipv6PrefixList,
    CommunityList,
    RouteMap,
}

const PATTERNS: [(ObjectKind, &str); 4] = [
    (ObjectKind::Ipv4PrefixList, r"^ip prefix-list (\S+)\s"),
    (ObjectKind::Ipv6PrefixList, r"^ipv6 prefix-list (\S+)\s"),
    (
        ObjectKind::CommunityList,
        r"^bgp community-list (?:(?:standard|expanded) )?(\S+)\s",
    ),
    (ObjectKind::RouteMap, r"^route-map (\S+) (?:permit|deny) \d+"),
];

/// Extract installed prefix-list, community-list and route-map names from an
/// FRR running configuration.
pub fn resolve_existing_objects(running_config: &str) -> ExistingNamedObjects {
    let matchers: Vec<(ObjectKind, Regex)> = PATTERNS
        .iter()
        .filter_map(|(kind, pattern)| Regex::new(pattern).ok().map(|re| (*kind, re)))
        .collect();

    let mut objects = ExistingNamedObjects::default();
    for line in running_config.lines() {
        for (kind, re) in &matchers {
            let Some(name) = re.captures(line).and_then(|caps| caps.get(1)) else {
                continue;
            };
            let name = name.as_str().to_string();
            match kind {
                ObjectKind::Ipv4PrefixList => objects.ipv4_prefix_lists.insert(name),
                ObjectKind::Ipv6PrefixList => objects.ipv6_prefix_lists.insert(name),
                ObjectKind::CommunityList => objects.community_lists.insert(name),
                ObjectKind::RouteMap => objects.route_maps.insert(name),
            };
        }
    }
    objects
}

/// Whether an object of this kind and name is currently installed.
pub fn is_installed(objects: &ExistingNamedObjects, kind: ObjectKind, name: &str) -> bool {
    match kind {
        ObjectKind::Ipv4PrefixList => objects.ipv4_prefix_lists.contains(name),
        ObjectKind::Ipv6PrefixList => objects.ipv6_prefix_lists.contains(name),
        ObjectKind::CommunityList => objects.community_lists.contains(name),
        ObjectKind::RouteMap => objects.route_maps.contains(name),
    }
}
