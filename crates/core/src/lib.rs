// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wmctl-core: layout tree, reply and event types for the window manager IPC

pub mod event;
pub mod reply;
pub mod tree;

pub use event::{
    BarStateUpdateEvent, BindingEvent, BindingInfo, Event, InputEvent, ModeEvent, OutputEvent,
    ShutdownEvent, TickEvent, WindowChange, WindowEvent, WorkspaceChange, WorkspaceEvent,
};
pub use reply::{
    BarConfig, BindingState, CommandOutcome, Config, Input, Output, Seat, Success, Version,
    Workspace,
};
pub use tree::{Node, NodeIndex, NodeKind, NodeType, Rect, Tree};
