use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use oc_compile::Vendor;

#[derive(Parser, Debug)]
#[command(name = "oc-compile")]
#[command(about = "Compile declarative BGP intent into vendor CLI commands")]
pub struct Cli {
    /// Log decisions at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compile a document and optionally diff or push it to a target.
    Apply(ApplyArgs),
    /// Show which undeclared sessions may be removed.
    PlanRemoval(PlanArgs),
    /// Validate a document without generating commands.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Intent document (.json or .toml).
    pub document: PathBuf,
    /// Command dialect. Falls back to the store's `vendor` key.
    #[arg(long, value_enum)]
    pub vendor: Option<VendorArg>,
    /// Device snapshot (JSON) describing what is installed.
    #[arg(long)]
    pub device: Option<PathBuf>,
    /// Settings store (TOML) supplying `vrf`, `vendor` and `[[safeguards]]`.
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// VRF name; overrides the store.
    #[arg(long)]
    pub vrf: Option<String>,
    /// Safeguard rules file (TOML with `[[safeguards]]`); overrides the store.
    #[arg(long)]
    pub safeguards: Option<PathBuf>,
    /// Remove installed sessions the document no longer declares.
    #[arg(long)]
    pub remove_extras: bool,
    /// Directory of `<vendor>.tera` templates replacing the builtin layouts.
    #[arg(long)]
    pub templates: Option<PathBuf>,
    /// Write the compiled text to this file.
    #[arg(short, long, conflicts_with = "target")]
    pub output: Option<PathBuf>,
    /// Target file to diff against (and write with --commit).
    #[arg(long)]
    pub target: Option<PathBuf>,
    /// Push to --target instead of a dry run.
    #[arg(long, requires = "target")]
    pub commit: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Intent document (.json or .toml).
    pub document: PathBuf,
    /// Device snapshot (JSON) listing installed neighbors.
    #[arg(long)]
    pub device: PathBuf,
    /// Settings store (TOML) supplying `[[safeguards]]`.
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// Safeguard rules file; overrides the store.
    #[arg(long)]
    pub safeguards: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Intent document (.json or .toml).
    pub document: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum VendorArg {
    Eos,
    Junos,
    Sonic,
}

impl From<VendorArg> for Vendor {
    fn from(arg: VendorArg) -> Self {
        match arg {
            VendorArg::Eos => Vendor::CiscoLike,
            VendorArg::Junos => Vendor::JunosLike,
            VendorArg::Sonic => Vendor::FrrLike,
        }
    }
}
