//! Declarative BGP and routing-policy model.
//!
//! The document layout follows openconfig naming (`peer-group-name`,
//! `apply-policy`, `afi-safis`, ...) but is flattened: the `config`/`state`
//! containers of the YANG tree are folded into their parent object. Every type
//! here is an immutable snapshot; nothing downstream mutates it.

use std::fmt::{self, Display, Formatter};
use std::net::{IpAddr, Ipv4Addr};

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// Top-level declarative document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Document {
    #[serde(default)]
    pub bgp: Option<Bgp>,
    #[serde(default)]
    pub routing_policy: Option<RoutingPolicy>,
}

/// The `bgp` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Bgp {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub peer_groups: Vec<PeerGroup>,
    #[serde(default)]
    pub neighbors: Vec<Neighbor>,
}

impl Bgp {
    /// Look up a declared peer-group by name.
    pub fn peer_group(&self, name: &str) -> Option<&PeerGroup> {
        self.peer_groups.iter().find(|pg| pg.peer_group_name == name)
    }
}

/// Global BGP settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    #[serde(rename = "as", default)]
    pub asn: Option<u32>,
    #[serde(default)]
    pub router_id: Option<Ipv4Addr>,
    #[serde(default)]
    pub default_route_distance: RouteDistance,
    #[serde(default)]
    pub graceful_restart: Option<GracefulRestart>,
    #[serde(default)]
    pub use_multiple_paths: MultiPath,
}

/// Administrative distances for eBGP and iBGP learned routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RouteDistance {
    #[serde(default)]
    pub external_route_distance: Option<u8>,
    #[serde(default)]
    pub internal_route_distance: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GracefulRestart {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub restart_time: Option<u16>,
}

/// ECMP settings. Path counts are per session type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MultiPath {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub ebgp_maximum_paths: Option<u16>,
    #[serde(default)]
    pub ibgp_maximum_paths: Option<u16>,
}

/// Import/export policy bindings, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApplyPolicy {
    #[serde(default)]
    pub import_policy: Vec<String>,
    #[serde(default)]
    pub export_policy: Vec<String>,
}

impl ApplyPolicy {
    pub fn is_empty(&self) -> bool {
        self.import_policy.is_empty() && self.export_policy.is_empty()
    }

    /// Import then export policy names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.import_policy
            .iter()
            .chain(self.export_policy.iter())
            .map(String::as_str)
    }
}

/// Supported address families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfiSafiName {
    Ipv4Unicast,
    Ipv6Unicast,
}

impl AfiSafiName {
    /// Every family, in the order generators emit them.
    pub const ALL: [AfiSafiName; 2] = [AfiSafiName::Ipv4Unicast, AfiSafiName::Ipv6Unicast];

    /// Openconfig identifier, also used as the variant tag of duplicated policies.
    pub fn as_str(self) -> &'static str {
        match self {
            AfiSafiName::Ipv4Unicast => "IPV4_UNICAST",
            AfiSafiName::Ipv6Unicast => "IPV6_UNICAST",
        }
    }

    pub fn is_ipv6(self) -> bool {
        matches!(self, AfiSafiName::Ipv6Unicast)
    }
}

impl Display for AfiSafiName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-family parameters of a peer-group or neighbor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AfiSafi {
    pub afi_safi_name: AfiSafiName,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub prefix_limit: Option<u32>,
    #[serde(default)]
    pub apply_policy: ApplyPolicy,
}

impl AfiSafi {
    /// Configured prefix limit; `0` means unset.
    pub fn max_prefixes(&self) -> Option<u32> {
        self.prefix_limit.filter(|limit| *limit > 0)
    }
}

/// Shared view over peer-groups and neighbors.
pub trait BgpAsset {
    fn apply_policy(&self) -> &ApplyPolicy;
    fn afi_safis(&self) -> &[AfiSafi];

    fn afi_safi(&self, name: AfiSafiName) -> Option<&AfiSafi> {
        self.afi_safis().iter().find(|a| a.afi_safi_name == name)
    }

    /// True when the family is declared and enabled.
    fn is_active(&self, name: AfiSafiName) -> bool {
        self.afi_safi(name).is_some_and(|a| a.enabled)
    }

    /// Session-wide prefix limit: the last declared family carrying one wins.
    fn prefix_limit(&self) -> Option<u32> {
        self.afi_safis()
            .iter()
            .filter_map(AfiSafi::max_prefixes)
            .last()
    }
}

/// A named template of BGP session parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PeerGroup {
    pub peer_group_name: String,
    #[serde(default)]
    pub local_as: Option<u32>,
    #[serde(default)]
    pub peer_as: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub apply_policy: ApplyPolicy,
    #[serde(default)]
    pub afi_safis: Vec<AfiSafi>,
}

impl PeerGroup {
    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }
}

impl BgpAsset for PeerGroup {
    fn apply_policy(&self) -> &ApplyPolicy {
        &self.apply_policy
    }

    fn afi_safis(&self) -> &[AfiSafi] {
        &self.afi_safis
    }
}

/// A declared BGP session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Neighbor {
    pub neighbor_address: IpAddr,
    #[serde(default)]
    pub peer_group: Option<String>,
    #[serde(default)]
    pub local_as: Option<u32>,
    #[serde(default)]
    pub peer_as: Option<u32>,
    #[serde(default)]
    pub auth_password: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `false` keeps the session configured but administratively down.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub apply_policy: ApplyPolicy,
    #[serde(default)]
    pub afi_safis: Vec<AfiSafi>,
    #[serde(default)]
    pub delay_open_timer: Option<u16>,
}

impl Neighbor {
    pub fn peer_group(&self) -> Option<&str> {
        non_empty(&self.peer_group)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    pub fn auth_password(&self) -> Option<&str> {
        non_empty(&self.auth_password)
    }
}

impl BgpAsset for Neighbor {
    fn apply_policy(&self) -> &ApplyPolicy {
        &self.apply_policy
    }

    fn afi_safis(&self) -> &[AfiSafi] {
        &self.afi_safis
    }
}

/// The `routing-policy` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoutingPolicy {
    #[serde(default)]
    pub defined_sets: DefinedSets,
    #[serde(default)]
    pub policy_definitions: Vec<PolicyDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefinedSets {
    #[serde(default)]
    pub prefix_sets: Vec<PrefixSet>,
    #[serde(default)]
    pub community_sets: Vec<CommunitySet>,
}

impl DefinedSets {
    pub fn prefix_set(&self, name: &str) -> Option<&PrefixSet> {
        self.prefix_sets.iter().find(|set| set.name == name)
    }

    pub fn community_set(&self, name: &str) -> Option<&CommunitySet> {
        self.community_sets
            .iter()
            .find(|set| set.community_set_name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrefixSetMode {
    Ipv4,
    Ipv6,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrefixSet {
    pub name: String,
    pub mode: PrefixSetMode,
    #[serde(default)]
    pub prefixes: Vec<PrefixEntry>,
}

impl PrefixSet {
    /// Whether route-map matches against this set use the IPv6 keyword.
    ///
    /// Mixed sets follow their first entry, defaulting to IPv4 when empty.
    pub fn matches_ipv6(&self) -> bool {
        match self.mode {
            PrefixSetMode::Ipv4 => false,
            PrefixSetMode::Ipv6 => true,
            PrefixSetMode::Mixed => self
                .prefixes
                .first()
                .is_some_and(|entry| matches!(entry.ip_prefix, IpNet::V6(_))),
        }
    }
}

/// One prefix-set entry. `masklength-range` is `exact` or `start..end`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PrefixEntry {
    pub ip_prefix: IpNet,
    #[serde(default = "default_exact")]
    pub masklength_range: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommunitySet {
    pub community_set_name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PolicyDefinition {
    pub name: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// One numbered rule of a policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Statement {
    pub sequence: u32,
    #[serde(default)]
    pub conditions: Conditions,
    #[serde(default)]
    pub actions: Actions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Conditions {
    #[serde(default)]
    pub match_prefix_set: Option<String>,
    #[serde(default)]
    pub community_set: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Actions {
    #[serde(default)]
    pub policy_result: Option<PolicyResult>,
    #[serde(default)]
    pub set_local_pref: Option<u32>,
    #[serde(default)]
    pub set_med: Option<u32>,
    #[serde(default)]
    pub set_next_hop: Option<IpAddr>,
    #[serde(default)]
    pub set_as_path_prepend: Option<AsPathPrepend>,
    #[serde(default)]
    pub set_community: Option<SetCommunity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyResult {
    AcceptRoute,
    RejectRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AsPathPrepend {
    pub asn: u32,
    #[serde(default = "default_repeat")]
    pub repeat_n: u8,
}

/// Community modification referencing a declared community-set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SetCommunity {
    pub method: CommunityMethod,
    pub community_set: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunityMethod {
    Add,
    Remove,
    Replace,
}

/// Which installed-neighbor attribute a safeguard rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeguardField {
    PeerGroup,
    Description,
}

/// User-defined constraint on automatic session removal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SafeguardRule {
    pub field: SafeguardField,
    pub contains: String,
    pub minimum_up: usize,
    #[serde(default)]
    pub remove_down_only: bool,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn default_true() -> bool {
    true
}

fn default_exact() -> String {
    "exact".to_string()
}

fn default_repeat() -> u8 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn afi(name: AfiSafiName, limit: Option<u32>) -> AfiSafi {
        AfiSafi {
            afi_safi_name: name,
            enabled: true,
            prefix_limit: limit,
            apply_policy: ApplyPolicy::default(),
        }
    }

    #[test]
    fn prefix_limit_ignores_zero_and_keeps_last_declared() {
        let pg = PeerGroup {
            peer_group_name: "PG".to_string(),
            local_as: None,
            peer_as: None,
            description: None,
            apply_policy: ApplyPolicy::default(),
            afi_safis: vec![
                afi(AfiSafiName::Ipv4Unicast, Some(1000)),
                afi(AfiSafiName::Ipv6Unicast, Some(0)),
            ],
        };
        assert_eq!(pg.prefix_limit(), Some(1000));
        assert!(pg.is_active(AfiSafiName::Ipv4Unicast));
        assert!(pg.afi_safi(AfiSafiName::Ipv6Unicast).is_some());
    }

    #[test]
    fn mixed_prefix_set_follows_first_entry() {
        let set = PrefixSet {
            name: "PFX".to_string(),
            mode: PrefixSetMode::Mixed,
            prefixes: vec![PrefixEntry {
                ip_prefix: "2001:db8::/32".parse().expect("prefix"),
                masklength_range: "exact".to_string(),
            }],
        };
        assert!(set.matches_ipv6());
    }

    #[test]
    fn empty_description_reads_as_absent() {
        let pg = PeerGroup {
            peer_group_name: "PG".to_string(),
            local_as: None,
            peer_as: Some(65000),
            description: Some(String::new()),
            apply_policy: ApplyPolicy::default(),
            afi_safis: Vec::new(),
        };
        assert_eq!(pg.description(), None);
    }
}
