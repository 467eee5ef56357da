// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the window manager IPC socket.
//!
//! Commands and events travel on separate connections: a [`CommandChannel`]
//! for request/reply exchanges and an [`EventSubscriber`] for the event
//! stream, so neither can stall the other.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod command;
mod config;
pub mod env;
mod error;
mod query;
mod subscriber;
mod transport;


pub use command::CommandChannel;
pub use config::ClientConfig;
pub use error::Error;
pub use query::{plan_show_desktop, DesktopPlan};
pub use subscriber::{EventStream, EventSubscriber, SubscriberState};
pub use transport::{ConnectionState, Transport};
