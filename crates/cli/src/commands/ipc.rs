// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `run` and `raw`: send a message, print the reply

use anyhow::Result;
use clap::Args;
use std::io::Read;
use wmctl_client::CommandChannel;
use wmctl_wire::CommandType;

use crate::exit_error::ExitError;
use crate::output::{format_outcomes, print_json, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Command to run, e.g. `workspace 2` or `[app_id=foot] focus`
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

#[derive(Args)]
pub struct RawArgs {
    /// Message type by name (`get_tree`, `GET_TREE`, `get-tree`)
    #[arg(value_name = "TYPE")]
    pub message_type: CommandType,

    /// Payload sent verbatim; `-` reads it from stdin
    #[arg(value_name = "PAYLOAD")]
    pub payload: Option<String>,
}

pub async fn run(args: RunArgs, channel: &mut CommandChannel, format: OutputFormat) -> Result<()> {
    let command = args.command.join(" ");
    let outcomes = channel.run_command(&command).await.map_err(ExitError::from)?;
    match format {
        OutputFormat::Text => println!("{}", format_outcomes(&outcomes)),
        OutputFormat::Json => print_json(&outcomes)?,
    }
    Ok(())
}

/// The reply is printed as JSON whatever the output format.
pub async fn raw(args: RawArgs, channel: &mut CommandChannel) -> Result<()> {
    let payload = match args.payload.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(payload) => payload.to_string(),
        None => String::new(),
    };

    let reply = channel.run(args.message_type, &payload).await.map_err(ExitError::from)?;
    print_json(&reply)
}
