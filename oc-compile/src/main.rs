use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

mod apply_cmd;
mod check_cmd;
mod cli;
mod path_guard;
mod plan_cmd;
mod settings;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Apply(args) => apply_cmd::run_apply(args),
        Command::PlanRemoval(args) => plan_cmd::run_plan_removal(args),
        Command::Check(args) => check_cmd::run_check(args),
    }
}

/// Logs go to stderr so stdout carries only command text or JSON.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
