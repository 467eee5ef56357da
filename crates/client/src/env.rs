// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the client crate.

use std::path::PathBuf;
use std::time::Duration;

/// Variables consulted for the socket path, in priority order.
pub const SOCKET_VARS: [&str; 2] = ["SWAYSOCK", "I3SOCK"];

pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve the IPC socket path: SWAYSOCK > I3SOCK
pub fn socket_path() -> Option<PathBuf> {
    SOCKET_VARS
        .iter()
        .filter_map(std::env::var_os)
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Reply timeout (`WMCTL_IPC_TIMEOUT_MS`, default 5s, `0` disables)
pub fn ipc_timeout() -> Option<Duration> {
    match std::env::var("WMCTL_IPC_TIMEOUT_MS").ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(0) => None,
        Some(ms) => Some(Duration::from_millis(ms)),
        None => Some(DEFAULT_REPLY_TIMEOUT),
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
