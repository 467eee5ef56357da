// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tree`, `views` and `focused`

use anyhow::Result;
use serde_json::Value;
use wmctl_client::CommandChannel;
use wmctl_core::Node;

use crate::exit_error::ExitError;
use crate::output::{format_node, format_tree, format_views, print_json, tree_json, OutputFormat};

pub async fn tree(channel: &mut CommandChannel, format: OutputFormat) -> Result<()> {
    let tree = channel.get_tree().await.map_err(ExitError::from)?;
    match format {
        OutputFormat::Text => println!("{}", format_tree(&tree)),
        OutputFormat::Json => print_json(&tree_json(&tree))?,
    }
    Ok(())
}

pub async fn views(channel: &mut CommandChannel, format: OutputFormat) -> Result<()> {
    let views = channel.list_views().await.map_err(ExitError::from)?;
    match format {
        OutputFormat::Text => {
            if !views.is_empty() {
                println!("{}", format_views(&views));
            }
        }
        OutputFormat::Json => print_json(&views.iter().map(Node::to_json).collect::<Vec<Value>>())?,
    }
    Ok(())
}

/// Exits with status 1 when no view has focus.
pub async fn focused(channel: &mut CommandChannel, format: OutputFormat) -> Result<()> {
    let Some(view) = channel.get_focused_view().await.map_err(ExitError::from)? else {
        return Err(ExitError::new(1, "no view has focus").into());
    };
    match format {
        OutputFormat::Text => println!("{}", format_node(&view)),
        OutputFormat::Json => print_json(&view.to_json())?,
    }
    Ok(())
}
