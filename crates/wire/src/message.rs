// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message type tags carried in the frame header.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// High bit of the raw type field marking an unsolicited event frame.
pub const EVENT_BIT: u32 = 0x8000_0000;

/// Commands a client may send. The reply carries the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    RunCommand,
    GetWorkspaces,
    Subscribe,
    GetOutputs,
    GetTree,
    GetMarks,
    GetBarConfig,
    GetVersion,
    GetBindingModes,
    GetConfig,
    SendTick,
    Sync,
    GetBindingState,
    GetInputs,
    GetSeats,
}

impl CommandType {
    pub const ALL: [CommandType; 15] = [
        CommandType::RunCommand,
        CommandType::GetWorkspaces,
        CommandType::Subscribe,
        CommandType::GetOutputs,
        CommandType::GetTree,
        CommandType::GetMarks,
        CommandType::GetBarConfig,
        CommandType::GetVersion,
        CommandType::GetBindingModes,
        CommandType::GetConfig,
        CommandType::SendTick,
        CommandType::Sync,
        CommandType::GetBindingState,
        CommandType::GetInputs,
        CommandType::GetSeats,
    ];

    /// Raw value on the wire.
    pub fn code(self) -> u32 {
        match self {
            CommandType::RunCommand => 0,
            CommandType::GetWorkspaces => 1,
            CommandType::Subscribe => 2,
            CommandType::GetOutputs => 3,
            CommandType::GetTree => 4,
            CommandType::GetMarks => 5,
            CommandType::GetBarConfig => 6,
            CommandType::GetVersion => 7,
            CommandType::GetBindingModes => 8,
            CommandType::GetConfig => 9,
            CommandType::SendTick => 10,
            CommandType::Sync => 11,
            CommandType::GetBindingState => 12,
            CommandType::GetInputs => 100,
            CommandType::GetSeats => 101,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandType::RunCommand => "run_command",
            CommandType::GetWorkspaces => "get_workspaces",
            CommandType::Subscribe => "subscribe",
            CommandType::GetOutputs => "get_outputs",
            CommandType::GetTree => "get_tree",
            CommandType::GetMarks => "get_marks",
            CommandType::GetBarConfig => "get_bar_config",
            CommandType::GetVersion => "get_version",
            CommandType::GetBindingModes => "get_binding_modes",
            CommandType::GetConfig => "get_config",
            CommandType::SendTick => "send_tick",
            CommandType::Sync => "sync",
            CommandType::GetBindingState => "get_binding_state",
            CommandType::GetInputs => "get_inputs",
            CommandType::GetSeats => "get_seats",
        }
    }

    /// Whether repeating the command leaves the manager's state unchanged.
    ///
    /// Non-idempotent commands must never be resent after an ambiguous failure.
    pub fn is_idempotent(self) -> bool {
        !matches!(self, CommandType::RunCommand | CommandType::SendTick | CommandType::Subscribe)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandType {
    type Err = ProtocolError;

    /// Accepts `get_tree`, `GET_TREE` and `get-tree`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == normalized)
            .ok_or_else(|| ProtocolError::Malformed(format!("unknown command type `{s}`")))
    }
}

/// Event categories a subscriber can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Workspace,
    Output,
    Mode,
    Window,
    BarconfigUpdate,
    Binding,
    Shutdown,
    Tick,
    BarStateUpdate,
    Input,
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        EventType::Workspace,
        EventType::Output,
        EventType::Mode,
        EventType::Window,
        EventType::BarconfigUpdate,
        EventType::Binding,
        EventType::Shutdown,
        EventType::Tick,
        EventType::BarStateUpdate,
        EventType::Input,
    ];

    /// Raw value on the wire without the event bit.
    pub fn code(self) -> u32 {
        match self {
            EventType::Workspace => 0,
            EventType::Output => 1,
            EventType::Mode => 2,
            EventType::Window => 3,
            EventType::BarconfigUpdate => 4,
            EventType::Binding => 5,
            EventType::Shutdown => 6,
            EventType::Tick => 7,
            EventType::BarStateUpdate => 0x14,
            EventType::Input => 0x15,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.code() == code)
    }

    /// Name used in subscribe payloads.
    pub fn name(self) -> &'static str {
        match self {
            EventType::Workspace => "workspace",
            EventType::Output => "output",
            EventType::Mode => "mode",
            EventType::Window => "window",
            EventType::BarconfigUpdate => "barconfig_update",
            EventType::Binding => "binding",
            EventType::Shutdown => "shutdown",
            EventType::Tick => "tick",
            EventType::BarStateUpdate => "bar_state_update",
            EventType::Input => "input",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == normalized)
            .ok_or_else(|| ProtocolError::Malformed(format!("unknown event category `{s}`")))
    }
}

/// Type tag of a frame: a command (or its reply), or an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Command(CommandType),
    Event(EventType),
}

impl MessageType {
    pub fn to_raw(self) -> u32 {
        match self {
            MessageType::Command(ty) => ty.code(),
            MessageType::Event(ty) => EVENT_BIT | ty.code(),
        }
    }

    pub fn from_raw(raw: u32) -> Result<Self, ProtocolError> {
        let parsed = if raw & EVENT_BIT != 0 {
            EventType::from_code(raw & !EVENT_BIT).map(MessageType::Event)
        } else {
            CommandType::from_code(raw).map(MessageType::Command)
        };
        parsed.ok_or(ProtocolError::UnknownMessageType(raw))
    }

    pub fn is_event(self) -> bool {
        matches!(self, MessageType::Event(_))
    }
}

impl From<CommandType> for MessageType {
    fn from(ty: CommandType) -> Self {
        MessageType::Command(ty)
    }
}

impl From<EventType> for MessageType {
    fn from(ty: EventType) -> Self {
        MessageType::Event(ty)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Command(ty) => write!(f, "{ty}"),
            MessageType::Event(ty) => write!(f, "event:{ty}"),
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
