// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection settings shared by the command and event channels.

use std::path::{Path, PathBuf};
use std::time::Duration;

use wmctl_wire::DEFAULT_MAX_PAYLOAD;

use crate::env;
use crate::error::Error;
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub socket_path: PathBuf,
    /// How long a command waits for its reply. `None` waits forever.
    pub reply_timeout: Option<Duration>,
    /// Largest inbound payload accepted before the connection is dropped.
    pub max_payload: usize,
}

impl ClientConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            reply_timeout: Some(env::DEFAULT_REPLY_TIMEOUT),
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Build from the environment, with `socket_path` overriding discovery.
    pub fn resolve(socket_path: Option<&Path>) -> Result<Self, Error> {
        let path = match socket_path {
            Some(path) => path.to_path_buf(),
            None => env::socket_path().ok_or(Error::NoSocket)?,
        };
        Ok(Self::new(path).with_reply_timeout(env::ipc_timeout()))
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::resolve(None)
    }

    pub fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Open a fresh connection to the configured socket.
    pub async fn connect(&self) -> Result<Transport, Error> {
        Ok(Transport::connect(&self.socket_path).await?.with_max_payload(self.max_payload))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
