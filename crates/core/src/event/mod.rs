// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event payloads pushed by the manager after a subscription.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wmctl_wire::{EventType, Frame, MessageType, ProtocolError};

use crate::reply::{BarConfig, Input};
use crate::tree::Tree;

/// A decoded event, one variant per category.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Workspace(Box<WorkspaceEvent>),
    Output(OutputEvent),
    Mode(ModeEvent),
    Window(Box<WindowEvent>),
    BarconfigUpdate(Box<BarConfig>),
    Binding(BindingEvent),
    Shutdown(ShutdownEvent),
    Tick(TickEvent),
    BarStateUpdate(BarStateUpdateEvent),
    Input(Box<InputEvent>),
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Workspace(_) => EventType::Workspace,
            Event::Output(_) => EventType::Output,
            Event::Mode(_) => EventType::Mode,
            Event::Window(_) => EventType::Window,
            Event::BarconfigUpdate(_) => EventType::BarconfigUpdate,
            Event::Binding(_) => EventType::Binding,
            Event::Shutdown(_) => EventType::Shutdown,
            Event::Tick(_) => EventType::Tick,
            Event::BarStateUpdate(_) => EventType::BarStateUpdate,
            Event::Input(_) => EventType::Input,
        }
    }

    /// Decode the payload of an event frame of the given category.
    pub fn from_payload(event_type: EventType, payload: &str) -> Result<Self, ProtocolError> {
        let event = match event_type {
            EventType::Workspace => Event::Workspace(Box::new(serde_json::from_str(payload)?)),
            EventType::Output => Event::Output(serde_json::from_str(payload)?),
            EventType::Mode => Event::Mode(serde_json::from_str(payload)?),
            EventType::Window => Event::Window(Box::new(serde_json::from_str(payload)?)),
            EventType::BarconfigUpdate => {
                Event::BarconfigUpdate(Box::new(serde_json::from_str(payload)?))
            }
            EventType::Binding => Event::Binding(serde_json::from_str(payload)?),
            EventType::Shutdown => Event::Shutdown(serde_json::from_str(payload)?),
            EventType::Tick => Event::Tick(serde_json::from_str(payload)?),
            EventType::BarStateUpdate => Event::BarStateUpdate(serde_json::from_str(payload)?),
            EventType::Input => Event::Input(Box::new(serde_json::from_str(payload)?)),
        };
        Ok(event)
    }

    /// Decode an event frame; reply frames are rejected.
    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        match frame.message_type {
            MessageType::Event(ty) => Self::from_payload(ty, &frame.payload),
            MessageType::Command(_) => Err(ProtocolError::Malformed(format!(
                "{} frame is not an event",
                frame.message_type
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceChange {
    Init,
    Empty,
    Focus,
    Move,
    Rename,
    Urgent,
    Reload,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceEvent {
    pub change: WorkspaceChange,
    #[serde(default)]
    pub current: Option<Value>,
    #[serde(default)]
    pub old: Option<Value>,
}

impl WorkspaceEvent {
    /// Parse the `current` workspace node, if the event carries one.
    pub fn current_tree(&self) -> Result<Option<Tree>, ProtocolError> {
        optional_tree(&self.current)
    }

    pub fn old_tree(&self) -> Result<Option<Tree>, ProtocolError> {
        optional_tree(&self.old)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowChange {
    New,
    Close,
    Focus,
    Title,
    FullscreenMode,
    Move,
    Floating,
    Urgent,
    Mark,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEvent {
    pub change: WindowChange,
    pub container: Value,
}

impl WindowEvent {
    pub fn container_tree(&self) -> Result<Tree, ProtocolError> {
        Tree::from_value(self.container.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeEvent {
    pub change: String,
    #[serde(default)]
    pub pango_markup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingInfo {
    pub command: String,
    #[serde(default)]
    pub event_state_mask: Vec<String>,
    #[serde(default)]
    pub input_code: i64,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub input_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEvent {
    pub change: String,
    pub binding: BindingInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownEvent {
    pub change: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    /// True for the synthetic tick sent right after subscribing.
    pub first: bool,
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarStateUpdateEvent {
    pub id: String,
    pub visible_by_modifier: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub change: String,
    pub input: Input,
}

fn optional_tree(value: &Option<Value>) -> Result<Option<Tree>, ProtocolError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Tree::from_value(value.clone()).map(Some),
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
