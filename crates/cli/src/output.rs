// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text and JSON rendering for command results.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Value};
use wmctl_core::{CommandOutcome, Event, Node, NodeIndex, NodeKind, Tree};

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per outcome: `ok` or the manager's error text.
pub fn format_outcomes(outcomes: &[CommandOutcome]) -> String {
    outcomes
        .iter()
        .map(|outcome| match (outcome.success, &outcome.error) {
            (true, _) => "ok".to_string(),
            (false, Some(error)) => color::failure(&format!("error: {error}")),
            (false, None) => color::failure("error"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary line for a single node, e.g. `#4 con "foot" [foot] *`.
pub fn format_node(node: &Node) -> String {
    let label = format!("#{} {}", node.id, node_type_name(node));
    let mut line = match node.kind() {
        NodeKind::Output | NodeKind::Workspace => color::header(&label),
        _ => color::context(&label),
    };
    if let Some(name) = &node.name {
        line.push_str(&format!(" {name:?}"));
    }
    match (&node.app_id, node.window) {
        (Some(app_id), _) => line.push_str(&format!(" [{app_id}]")),
        (None, Some(window)) => line.push_str(&format!(" [x11 {window}]")),
        (None, None) => {}
    }
    if node.focused {
        line.push_str(" *");
    }
    line
}

/// The whole tree, indented two spaces per level.
pub fn format_tree(tree: &Tree) -> String {
    tree.iter()
        .map(|node| {
            let depth = tree.ancestors(node).count();
            format!("{}{}", "  ".repeat(depth), format_node(node))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The tree as nested JSON, children under `nodes` and `floating_nodes` as received.
pub fn tree_json(tree: &Tree) -> Value {
    node_json(tree, tree.root())
}

fn node_json(tree: &Tree, node: &Node) -> Value {
    let mut value = node.to_json();
    if let Value::Object(map) = &mut value {
        map.insert("nodes".to_string(), children_json(tree, node.tiling_children()));
        map.insert("floating_nodes".to_string(), children_json(tree, node.floating_children()));
    }
    value
}

fn children_json(tree: &Tree, indices: &[NodeIndex]) -> Value {
    Value::Array(indices.iter().filter_map(|i| tree.node(*i)).map(|child| node_json(tree, child)).collect())
}

/// Tab-separated `id app_id pid name` rows.
pub fn format_views(views: &[Node]) -> String {
    views
        .iter()
        .map(|view| {
            format!(
                "{}\t{}\t{}\t{}",
                view.id,
                view.app_id.as_deref().unwrap_or("-"),
                view.pid.map(|pid| pid.to_string()).unwrap_or_else(|| "-".to_string()),
                view.name.as_deref().unwrap_or(""),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short one-line description of an event.
pub fn format_event(event: &Event) -> String {
    let category = color::header(event.event_type().name());
    let detail = match event {
        Event::Workspace(ev) => {
            let name = ev.current.as_ref().and_then(|c| c.get("name")).and_then(Value::as_str);
            match name {
                Some(name) => format!("{} {name:?}", variant_name(&ev.change)),
                None => variant_name(&ev.change),
            }
        }
        Event::Window(ev) => {
            let id = ev.container.get("id").and_then(Value::as_i64).unwrap_or_default();
            match ev.container.get("name").and_then(Value::as_str) {
                Some(name) => format!("{} #{id} {name:?}", variant_name(&ev.change)),
                None => format!("{} #{id}", variant_name(&ev.change)),
            }
        }
        Event::Output(ev) => ev.change.clone(),
        Event::Mode(ev) => ev.change.clone(),
        Event::BarconfigUpdate(bar) => bar.id.clone(),
        Event::Binding(ev) => format!("{} {}", ev.change, ev.binding.command),
        Event::Shutdown(ev) => ev.change.clone(),
        Event::Tick(ev) if ev.first => "first".to_string(),
        Event::Tick(ev) => format!("{:?}", ev.payload),
        Event::BarStateUpdate(ev) => {
            format!("{} visible_by_modifier={}", ev.id, ev.visible_by_modifier)
        }
        Event::Input(ev) => format!("{} {}", ev.change, ev.input.identifier),
    };
    format!("{category} {detail}")
}

/// `{"type": <category>, "payload": <event>}`.
pub fn event_json(event: &Event) -> serde_json::Result<Value> {
    let payload = match event {
        Event::Workspace(ev) => serde_json::to_value(ev)?,
        Event::Output(ev) => serde_json::to_value(ev)?,
        Event::Mode(ev) => serde_json::to_value(ev)?,
        Event::Window(ev) => serde_json::to_value(ev)?,
        Event::BarconfigUpdate(ev) => serde_json::to_value(ev)?,
        Event::Binding(ev) => serde_json::to_value(ev)?,
        Event::Shutdown(ev) => serde_json::to_value(ev)?,
        Event::Tick(ev) => serde_json::to_value(ev)?,
        Event::BarStateUpdate(ev) => serde_json::to_value(ev)?,
        Event::Input(ev) => serde_json::to_value(ev)?,
    };
    Ok(json!({ "type": event.event_type().name(), "payload": payload }))
}

fn node_type_name(node: &Node) -> String {
    variant_name(&node.node_type)
}

/// The serde name of a unit variant, e.g. `floating_con`.
fn variant_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(name)) => name,
        _ => "unknown".to_string(),
    }
}
