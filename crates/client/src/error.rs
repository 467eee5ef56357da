// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client error taxonomy.

use std::path::PathBuf;

use thiserror::Error;
use wmctl_wire::ProtocolError;

/// Errors from client operations.
///
/// `Command` is the only recoverable variant: the manager rejected a command
/// and the connection stays usable. Everything else leaves the connection
/// closed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no IPC socket found: set SWAYSOCK or I3SOCK, or pass a socket path")]
    NoSocket,

    #[error("cannot connect to {}: {source}", path.display())]
    Connect { path: PathBuf, source: std::io::Error },

    #[error("Protocol error: {0}")]
    Protocol(ProtocolError),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout waiting for reply")]
    Timeout,

    #[error("command failed: {message}")]
    Command { message: String, parse_error: bool },

    #[error("subscriber is not subscribed")]
    NotSubscribed,

    #[error("subscriber already subscribed")]
    AlreadySubscribed,

    #[error("event task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether the connection that produced this error can still be used.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Command { .. } | Error::NotSubscribed | Error::AlreadySubscribed)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::ConnectionClosed => Error::ConnectionClosed,
            ProtocolError::Timeout => Error::Timeout,
            other => Error::Protocol(other),
        }
    }
}
