// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wmctl: talk to sway or i3 over the IPC socket.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod color;
mod commands;
mod exit_error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wmctl_client::{ClientConfig, CommandChannel};

use crate::commands::ipc::{RawArgs, RunArgs};
use crate::commands::monitor::MonitorArgs;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

/// Log filter, e.g. `WMCTL_LOG=wmctl_client=debug`.
const LOG_ENV: &str = "WMCTL_LOG";

#[derive(Parser)]
#[command(
    name = "wmctl",
    version,
    about = "Control sway or i3 through its IPC socket",
    styles = color::styles()
)]
struct Cli {
    /// Socket path [default: $SWAYSOCK, then $I3SOCK]
    #[arg(long, short = 's', global = true, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a window manager command
    Run(RunArgs),
    /// Send any message type and print the JSON reply
    Raw(RawArgs),
    /// Print the layout tree
    Tree,
    /// List application views
    Views,
    /// Show the focused view
    Focused,
    /// Print events as they arrive
    Monitor(MonitorArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.downcast_ref::<ExitError>().map_or(1, |e| e.code);
        eprintln!("error: {err:#}");
        std::process::exit(code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::resolve(cli.socket.as_deref()).map_err(ExitError::from)?;
    let format = cli.format;

    // monitor opens its own event connection
    let command = match cli.command {
        Commands::Monitor(args) => return commands::monitor::handle(args, &config, format).await,
        command => command,
    };

    let mut channel = CommandChannel::connect(&config).await.map_err(ExitError::from)?;
    let result = match command {
        Commands::Run(args) => commands::ipc::run(args, &mut channel, format).await,
        Commands::Raw(args) => commands::ipc::raw(args, &mut channel).await,
        Commands::Tree => commands::query::tree(&mut channel, format).await,
        Commands::Views => commands::query::views(&mut channel, format).await,
        Commands::Focused => commands::query::focused(&mut channel, format).await,
        Commands::Monitor(_) => Ok(()),
    };
    channel.close().await;
    result
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
