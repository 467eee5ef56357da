// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Convenience lookups built on `get_tree` / `get_outputs`.
//!
//! Each call fetches a fresh tree; nothing is cached between calls.

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;
use wmctl_core::{Node, NodeType, Output, Tree};

use crate::command::CommandChannel;
use crate::error::Error;

/// What [`CommandChannel::show_desktop`] will do to a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopPlan {
    /// Minimize when any view is visible, restore when all are minimized.
    pub minimize: bool,
    pub views: Vec<i64>,
    pub command: String,
}

impl<S> CommandChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn list_views(&mut self) -> Result<Vec<Node>, Error> {
        let tree = self.get_tree().await?;
        Ok(tree.views().into_iter().cloned().collect())
    }

    pub async fn get_view(&mut self, id: i64) -> Result<Option<Node>, Error> {
        let tree = self.get_tree().await?;
        Ok(tree.find_by_id(id).cloned())
    }

    /// The focused node if it is a view; `None` when e.g. an empty workspace has focus.
    pub async fn get_focused_view(&mut self) -> Result<Option<Node>, Error> {
        let tree = self.get_tree().await?;
        Ok(tree.find_focused().filter(|node| node.is_view()).cloned())
    }

    /// Output node with the given container id.
    pub async fn get_output(&mut self, id: i64) -> Result<Option<Node>, Error> {
        let tree = self.get_tree().await?;
        Ok(tree
            .filter_by_type(NodeType::Output)
            .into_iter()
            .find(|node| node.id == id)
            .cloned())
    }

    pub async fn get_focused_output(&mut self) -> Result<Option<Node>, Error> {
        let tree = self.get_tree().await?;
        Ok(tree.focused_output().cloned())
    }

    /// Output by connector name, e.g. `DP-1`.
    pub async fn get_output_by_name(&mut self, name: &str) -> Result<Option<Output>, Error> {
        let outputs = self.get_outputs().await?;
        Ok(outputs.into_iter().find(|output| output.name == name))
    }

    /// Toggle minimization of every view on the output's current workspace.
    ///
    /// Returns the plan that was run, or `None` if there was nothing to do.
    pub async fn show_desktop(&mut self, output_id: i64) -> Result<Option<DesktopPlan>, Error> {
        let tree = self.get_tree().await?;
        let Some(plan) = plan_show_desktop(&tree, output_id) else {
            return Ok(None);
        };
        self.run_command(&plan.command).await?;
        Ok(Some(plan))
    }
}

/// Build the minimize/restore command for the output's current workspace.
pub fn plan_show_desktop(tree: &Tree, output_id: i64) -> Option<DesktopPlan> {
    let Some(output) = tree
        .filter_by_type(NodeType::Output)
        .into_iter()
        .find(|node| node.id == output_id)
    else {
        debug!(output_id, "output not found");
        return None;
    };

    let Some(workspace) = current_workspace(tree, output) else {
        debug!(output_id, "output has no current workspace");
        return None;
    };

    let views: Vec<&Node> = tree
        .children_of(workspace)
        .filter(|node| matches!(node.node_type, NodeType::Con | NodeType::FloatingCon))
        .collect();
    if views.is_empty() {
        debug!(workspace = workspace.id, "no views on workspace");
        return None;
    }

    let minimize = !views.iter().all(|view| is_minimized(view));
    let action = if minimize { "enable" } else { "disable" };
    let command = views
        .iter()
        .map(|view| format!("{} minimize {action}", criteria(view)))
        .collect::<Vec<_>>()
        .join("; ");

    Some(DesktopPlan { minimize, views: views.iter().map(|view| view.id).collect(), command })
}

/// The output's `current_workspace`, matched by name or by container id.
fn current_workspace<'a>(tree: &'a Tree, output: &'a Node) -> Option<&'a Node> {
    let current = output.raw.get("current_workspace")?;
    tree.children_of(output).find(|node| {
        node.node_type == NodeType::Workspace
            && match current {
                Value::String(name) => node.name.as_deref() == Some(name.as_str()),
                Value::Number(id) => id.as_i64() == Some(node.id),
                _ => false,
            }
    })
}

fn is_minimized(view: &Node) -> bool {
    view.raw.get("minimized").and_then(Value::as_bool).unwrap_or(false)
}

/// xwayland views are addressed by X11 window id, native ones by container id.
fn criteria(view: &Node) -> String {
    match view.window {
        Some(window) if view.is_xwayland() => format!("[id={window}]"),
        _ => format!("[con_id={}]", view.id),
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
