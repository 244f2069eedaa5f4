use netcfg_core::parse;
use oc_compile::collab::NoDevice;
use oc_compile::render::BuiltinRenderer;
use oc_compile::{CompileRequest, Compiler, Vendor};
use pretty_assertions::assert_eq;

const DOCUMENT: &str = r#"{
    "bgp": {
        "global": {"as": 65000},
        "neighbors": [{"neighbor-address": "192.0.2.1", "peer-as": 65100,
                       "afi-safis": [{"afi-safi-name": "IPV4_UNICAST"}]}]
    },
    "routing-policy": {"defined-sets": {"community-sets": [
        {"community-set-name": "CS", "members": ["65000:1"]}]}}
}"#;

fn compile(vendor: Vendor) -> String {
    let doc = parse(DOCUMENT.as_bytes()).expect("document");
    Compiler::new(&NoDevice, &BuiltinRenderer)
        .compile(&CompileRequest::new(doc, vendor))
        .expect("compile")
        .text
}

#[test]
fn eos_full_output() {
    let expected = "\
router bgp 65000
   no bgp default ipv4-unicast
   bgp bestpath as-path multipath-relax
   no bgp router-id
   distance bgp 20 200 200
   no graceful-restart
   no graceful-restart restart-time
   no maximum-paths
   neighbor 192.0.2.1 remote-as 65100
   default neighbor 192.0.2.1 local-as
   default neighbor 192.0.2.1 shutdown
   default neighbor 192.0.2.1 description
   default neighbor 192.0.2.1 password
   default neighbor 192.0.2.1 route-map in
   default neighbor 192.0.2.1 route-map out
   default neighbor 192.0.2.1 maximum-routes
   neighbor 192.0.2.1 send-community
   address-family ipv4
      neighbor 192.0.2.1 activate
      default neighbor 192.0.2.1 route-map in
      default neighbor 192.0.2.1 route-map out
   address-family ipv6
      no neighbor 192.0.2.1 activate
      default neighbor 192.0.2.1 route-map in
      default neighbor 192.0.2.1 route-map out
no ip community-list CS
ip community-list CS permit 65000:1";
    assert_eq!(compile(Vendor::CiscoLike), expected);
}

#[test]
fn sonic_full_output() {
    let expected = "\
router bgp 65000
 bgp log-neighbor-changes
 bgp bestpath as-path multipath-relax
 no bgp router-id
 distance bgp 20 200 200
 no bgp graceful-restart
 no bgp graceful-restart preserve-fw-state
 no bgp graceful-restart restart-time
 neighbor 192.0.2.1 remote-as 65100
 no neighbor 192.0.2.1 local-as
 no neighbor 192.0.2.1 description
 no neighbor 192.0.2.1 password
 no neighbor 192.0.2.1 timers delayopen
 no neighbor 192.0.2.1 shutdown
 address-family ipv4 unicast
  no maximum-paths
  no maximum-paths ibgp
  no neighbor 192.0.2.1 route-map * in
  no neighbor 192.0.2.1 route-map * out
  no neighbor 192.0.2.1 maximum-prefix
  neighbor 192.0.2.1 activate
  neighbor 192.0.2.1 soft-reconfiguration inbound
  neighbor 192.0.2.1 send-community
 exit-address-family
 address-family ipv6 unicast
  no maximum-paths
  no maximum-paths ibgp
  no neighbor 192.0.2.1 route-map * in
  no neighbor 192.0.2.1 route-map * out
  no neighbor 192.0.2.1 maximum-prefix
  no neighbor 192.0.2.1 activate
  no neighbor 192.0.2.1 soft-reconfiguration inbound
  no neighbor 192.0.2.1 send-community
 exit-address-family
exit
bgp community-list expanded CS permit 65000:1";
    assert_eq!(compile(Vendor::FrrLike), expected);
}

#[test]
fn junos_rejects_neighbor_without_group() {
    let doc = parse(DOCUMENT.as_bytes()).expect("document");
    let err = Compiler::new(&NoDevice, &BuiltinRenderer)
        .compile(&CompileRequest::new(doc, Vendor::JunosLike))
        .unwrap_err();
    assert!(err.to_string().contains("must belong to a peer-group"));
}
