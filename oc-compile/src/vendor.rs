//! Per-dialect static tables.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use netcfg_core::model::AfiSafiName;

use crate::error::CompileError;

/// Target command dialect, selected once per compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Incremental CLI with atomic object replace (Arista EOS).
    CiscoLike,
    /// Transactional `set`/`delete` CLI (Juniper JunOS).
    JunosLike,
    /// FRR as shipped by SONiC; named objects are edited in place.
    FrrLike,
}

/// Mask-length range syntax family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDialect {
    /// `ge N le M`
    CiscoLike,
    /// `prefix-length-range /N-/M`
    Junos,
}

impl Vendor {
    /// Canonical identifier; also the builtin template name.
    pub fn name(self) -> &'static str {
        match self {
            Vendor::CiscoLike => "eos",
            Vendor::JunosLike => "junos",
            Vendor::FrrLike => "sonic",
        }
    }

    /// Keyword naming an address family inside this dialect.
    pub fn afi_alias(self, afi: AfiSafiName) -> &'static str {
        match (self, afi) {
            (Vendor::CiscoLike, AfiSafiName::Ipv4Unicast) => "ipv4",
            (Vendor::CiscoLike, AfiSafiName::Ipv6Unicast) => "ipv6",
            (Vendor::JunosLike, AfiSafiName::Ipv4Unicast) => "inet",
            (Vendor::JunosLike, AfiSafiName::Ipv6Unicast) => "inet6",
            (Vendor::FrrLike, AfiSafiName::Ipv4Unicast) => "ipv4 unicast",
            (Vendor::FrrLike, AfiSafiName::Ipv6Unicast) => "ipv6 unicast",
        }
    }

    /// Default (external, internal) administrative distances.
    pub fn default_distances(self) -> (u8, u8) {
        match self {
            Vendor::CiscoLike | Vendor::FrrLike => (20, 200),
            Vendor::JunosLike => (20, 170),
        }
    }

    pub fn range_dialect(self) -> RangeDialect {
        match self {
            Vendor::JunosLike => RangeDialect::Junos,
            Vendor::CiscoLike | Vendor::FrrLike => RangeDialect::CiscoLike,
        }
    }

    /// True when named objects cannot be replaced atomically and deletes
    /// must be driven by what is installed.
    pub fn is_diff_aware(self) -> bool {
        matches!(self, Vendor::FrrLike)
    }

    /// JunOS configures the AS outside the BGP stanza, so it can compile without one.
    pub fn requires_global_as(self) -> bool {
        !matches!(self, Vendor::JunosLike)
    }
}

impl FromStr for Vendor {
    type Err = CompileError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "eos" | "cisco" | "ios" => Ok(Vendor::CiscoLike),
            "junos" | "juniper" => Ok(Vendor::JunosLike),
            "sonic" | "frr" => Ok(Vendor::FrrLike),
            _ => Err(CompileError::UnsupportedVendor(value.to_string())),
        }
    }
}

impl Display for Vendor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("EOS".parse::<Vendor>().ok(), Some(Vendor::CiscoLike));
        assert_eq!("junos".parse::<Vendor>().ok(), Some(Vendor::JunosLike));
        assert_eq!(" frr ".parse::<Vendor>().ok(), Some(Vendor::FrrLike));
    }

    #[test]
    fn unknown_vendor_is_rejected() {
        let err = "nxos".parse::<Vendor>().expect_err("nxos is not supported");
        assert!(matches!(err, CompileError::UnsupportedVendor(name) if name == "nxos"));
    }

    #[test]
    fn only_frr_is_diff_aware() {
        assert!(Vendor::FrrLike.is_diff_aware());
        assert!(!Vendor::CiscoLike.is_diff_aware());
        assert!(!Vendor::JunosLike.is_diff_aware());
        assert_eq!(Vendor::JunosLike.default_distances(), (20, 170));
    }

    #[test]
    fn range_syntax_per_dialect() {
        assert_eq!(Vendor::JunosLike.range_dialect(), RangeDialect::Junos);
        assert_eq!(Vendor::CiscoLike.range_dialect(), RangeDialect::CiscoLike);
        assert_eq!(Vendor::FrrLike.range_dialect(), RangeDialect::CiscoLike);
    }
}
