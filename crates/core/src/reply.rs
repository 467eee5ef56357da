// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed reply payloads for the query commands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tree::Rect;

/// Result of one command in a `run_command` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the manager could not parse the command at all.
    #[serde(default)]
    pub parse_error: bool,
}

/// Acknowledgement returned by `subscribe`, `send_tick` and `sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Success {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub id: Option<i64>,
    pub num: i32,
    pub name: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub current_workspace: Option<String>,
    #[serde(default)]
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub human_readable: String,
    #[serde(default)]
    pub loaded_config_file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub vendor: i64,
    #[serde(default)]
    pub product: i64,
    #[serde(rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub xkb_active_layout_name: Option<String>,
    #[serde(default)]
    pub xkb_layout_names: Vec<String>,
    #[serde(default)]
    pub libinput: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub name: String,
    #[serde(default)]
    pub capabilities: i64,
    /// Id of the focused node, 0 when nothing is focused.
    #[serde(default)]
    pub focus: i64,
    #[serde(default)]
    pub devices: Vec<Input>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub config: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingState {
    pub name: String,
}

/// Bar configuration; fields beyond the common ones are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarConfig {
    pub id: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub position: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[path = "reply_tests.rs"]
mod tests;
