//! Compile declarative BGP and routing-policy intent into vendor CLI commands.
//!
//! A single [`netcfg_core::Document`] describes the desired BGP global
//! settings, peer-groups, neighbors, prefix-sets, community-sets and policy
//! statements. This library turns it into the ordered command text a device of
//! the chosen dialect needs, and decides which undeclared sessions can be torn
//! down without breaking redundancy.
//!
//! # Architecture
//!
//! ## Dialects
//!
//! - [`vendor`]: the supported dialects and their static tables (family
//!   keywords, default distances, range syntax, diff awareness)
//! - [`range`]: mask-length range conversion and bounds checking
//!
//! ## Validation
//!
//! - [`xref`]: set references, uniqueness and prefix-entry checks
//! - [`afi_policy`]: per-family policy usage and JunOS policy variants
//! - [`existing`]: installed object names parsed from an FRR running config
//!
//! ## Generation
//!
//! - [`generate`]: one generator per dialect, one method per asset kind
//! - [`assemble`]: ordering of generated lines into a render context
//! - [`render`]: builtin dialect layouts and user Tera templates
//! - [`compile`]: the end-to-end pipeline and global AS reconciliation
//!
//! ## Device interaction
//!
//! - [`collab`]: device-state readers and configuration stores
//! - [`safeguard`]: removal planning under minimum-up rules
//! - [`apply`]: dry-run diff and push of compiled text
//!
//! ## Reporting
//!
//! - [`report`]: colored terminal output for diffs, plans and findings
//!
//! # Workflow
//!
//! ```text
//! parse ─► Compiler::compile ─► apply (dry run or commit)
//!                │
//!                └─► plan_removal (when extra sessions are to be removed)
//! ```
//!
//! Every failure is a [`CompileError`]; nothing is emitted on error.

pub mod afi_policy;
pub mod apply;
pub mod assemble;
pub mod collab;
pub mod compile;
pub mod error;
pub mod existing;
pub mod generate;
pub mod range;
pub mod render;
pub mod report;
pub mod safeguard;
pub mod vendor;
pub mod xref;

pub use compile::{plan_removal, resolve_global_as, CompileRequest, Compiled, Compiler};
pub use error::CompileError;
pub use vendor::Vendor;
