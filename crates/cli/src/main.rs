//! uvcctl - UVC control inspection CLI
//!
//! Loads a recorded unit topology, runs control discovery over it and
//! answers the same queries the V4L2 control ioctls would.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;
mod topology;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::*;
use crate::error::CliError;
use crate::topology::Topology;

#[derive(Parser)]
#[command(name = "uvcctl")]
#[command(about = "UVC control inspection CLI - discover, enumerate and describe camera controls")]
#[command(version)]
#[command(long_about = "
uvcctl runs UVC control discovery over a recorded unit topology (JSON or
YAML) and reports the resulting V4L2 controls: ids, names, types, bounds,
menu entries and auto/manual gating.

Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Unit topology file (.json, .yaml or .yml)
    #[arg(short, long, global = true, env = "UVCCTL_TOPOLOGY")]
    topology: Option<PathBuf>,

    /// Open the device with control access disabled
    #[arg(long, global = true)]
    deny_access: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unit inspection commands
    #[command(subcommand)]
    Unit(UnitCommands),

    /// Control query commands
    #[command(subcommand)]
    Ctrl(CtrlCommands),

    /// Print the built-in control catalog
    Catalog {
        /// List physical controls instead of V4L2 mappings
        #[arg(long)]
        physical: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("uvcctl={log_level},uvc_ctrl={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn load_topology(cli: &Cli) -> Result<Topology> {
    let path = cli.topology.as_deref().ok_or_else(|| {
        CliError::TopologyNotFound("no topology given (use --topology or UVCCTL_TOPOLOGY)".into())
    })?;
    Topology::load(path)
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Unit(cmd) => commands::unit::execute(cmd, &load_topology(cli)?, cli.json),
        Commands::Ctrl(cmd) => {
            commands::ctrl::execute(cmd, &load_topology(cli)?, cli.deny_access, cli.json)
        }
        Commands::Catalog { physical } => commands::catalog::execute(*physical, cli.json),
    }
}
