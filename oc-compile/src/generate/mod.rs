//! Per-dialect command generators.
//!
//! Each generator maps one declared entity, plus the shared [`GenContext`], to
//! an ordered list of command lines. Generators are pure: the same entity and
//! context always produce the same lines in the same order.
//!
//! - [`cisco`]: EOS-style incremental CLI, objects replaced by `no` + redefine
//! - [`junos`]: flat `set`/`delete` statements with per-family policy variants
//! - [`frr`]: FRR CLI, deletes only objects already installed
//!
//! Session-level generators return [`AssetCommands`]: the lines for the
//! session itself plus [`FamilyBlocks`] placed later by the assembler.

pub mod cisco;
pub mod common;
pub mod frr;
pub mod junos;
mod route_map;

use netcfg_core::model::{
    CommunitySet, GlobalConfig, Neighbor, PeerGroup, PolicyDefinition, PrefixSet,
};
use netcfg_core::InstalledNeighbor;

pub use common::{AssetCommands, FamilyBlocks, GenContext};

use crate::error::CompileError;
use crate::vendor::Vendor;

/// One method per declared asset kind.
pub trait Generator {
    fn global(&self, ctx: &GenContext<'_>, global: &GlobalConfig) -> AssetCommands;
    fn peer_group(&self, ctx: &GenContext<'_>, pg: &PeerGroup)
        -> Result<AssetCommands, CompileError>;
    fn neighbor(&self, ctx: &GenContext<'_>, neighbor: &Neighbor)
        -> Result<AssetCommands, CompileError>;
    fn neighbor_removal(&self, ctx: &GenContext<'_>, neighbor: &InstalledNeighbor) -> Vec<String>;
    fn community_set(&self, ctx: &GenContext<'_>, set: &CommunitySet) -> Vec<String>;
    fn prefix_set(&self, ctx: &GenContext<'_>, set: &PrefixSet) -> Result<Vec<String>, CompileError>;
    fn policy(
        &self,
        ctx: &GenContext<'_>,
        policy: &PolicyDefinition,
    ) -> Result<Vec<String>, CompileError>;
}

/// Generator for the selected dialect.
pub fn generator_for(vendor: Vendor) -> Box<dyn Generator> {
    match vendor {
        Vendor::CiscoLike => Box::new(cisco::CiscoGenerator),
        Vendor::JunosLike => Box::new(junos::JunosGenerator),
        Vendor::FrrLike => Box::new(frr::FrrGenerator),
    }
}

/// A neighbor must name its remote AS directly or through a peer-group.
pub(crate) fn require_remote_as(neighbor: &Neighbor) -> Result<(), CompileError> {
    if neighbor.peer_as.is_none() && neighbor.peer_group().is_none() {
        return Err(CompileError::InvalidDeclaration(format!(
            "neighbor {} has neither peer-as nor peer-group",
            neighbor.neighbor_address
        )));
    }
    Ok(())
}
