// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying the process exit code.
//!
//! Commands return `ExitError` instead of exiting, so `main()` owns process
//! termination.

use std::fmt;

use wmctl_client::Error;

/// The manager rejected a command.
pub const EXIT_COMMAND_FAILED: i32 = 2;
/// No socket could be found or reached.
pub const EXIT_NO_CONNECTION: i32 = 3;
/// The connection broke or the manager spoke nonsense.
pub const EXIT_PROTOCOL: i32 = 4;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<Error> for ExitError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::Command { .. } => EXIT_COMMAND_FAILED,
            Error::NoSocket | Error::Connect { .. } => EXIT_NO_CONNECTION,
            Error::Protocol(_)
            | Error::ConnectionClosed
            | Error::Timeout
            | Error::NotSubscribed
            | Error::AlreadySubscribed
            | Error::Task(_) => EXIT_PROTOCOL,
        };
        Self::new(code, err.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
