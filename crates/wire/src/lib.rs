// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Framing for the window manager IPC protocol.
//!
//! Wire format: `"i3-ipc"` magic + payload length (u32 LE) + message type
//! (u32 LE) + UTF-8 payload (JSON for replies and events). Event frames set the high bit of the type.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod message;
mod wire;

pub use message::{CommandType, EventType, MessageType, EVENT_BIT};
pub use wire::{decode, decode_bytes, decode_header, encode, read_frame, write_frame};
pub use wire::{Frame, Header, ProtocolError, DEFAULT_MAX_PAYLOAD, HEADER_LEN, MAGIC};
