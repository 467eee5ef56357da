// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command/reply exchanges on a dedicated connection.
//!
//! One command is in flight at a time (`&mut self`). Replies carry the
//! command's own type; event frames seen while waiting are discarded with a
//! warning, since a command connection never subscribes. A reply of any other
//! command type is a protocol violation and closes the connection.
//!
//! Nothing is ever resent. A timeout closes the connection, because the
//! half-read reply would leave the stream misaligned and a non-idempotent
//! command (e.g. `run_command`) may already have taken effect.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;
use tracing::{debug, warn};
use wmctl_core::{
    BarConfig, BindingState, CommandOutcome, Config, Input, Output, Seat, Tree, Version,
    Workspace,
};
use wmctl_wire::{CommandType, Frame, MessageType, ProtocolError};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::transport::{ConnectionState, Transport};

#[derive(Debug)]
pub struct CommandChannel<S = UnixStream> {
    transport: Transport<S>,
    reply_timeout: Option<std::time::Duration>,
}

impl CommandChannel<UnixStream> {
    pub async fn connect(config: &ClientConfig) -> Result<Self, Error> {
        let transport = config.connect().await?;
        Ok(Self::new(transport).with_reply_timeout(config.reply_timeout))
    }
}

impl<S> CommandChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a transport. No reply timeout until one is set.
    pub fn new(transport: Transport<S>) -> Self {
        Self { transport, reply_timeout: None }
    }

    pub fn with_reply_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }

    pub async fn close(&mut self) {
        self.transport.close().await;
    }

    /// Send a command and return its parsed JSON reply.
    ///
    /// A reply reporting `"success": false` (as an object, or any element of
    /// an array) becomes `Error::Command` and leaves the connection open.
    pub async fn run(&mut self, command: CommandType, payload: &str) -> Result<Value, Error> {
        let frame = self.exchange(command, payload).await?;
        let reply: Value = self.parse(&frame).await?;
        check_success(&reply)?;
        Ok(reply)
    }

    /// Run one or more `;`/`,` separated commands.
    pub async fn run_command(&mut self, command: &str) -> Result<Vec<CommandOutcome>, Error> {
        let reply = self.run(CommandType::RunCommand, command).await?;
        self.convert(reply).await
    }

    pub async fn get_tree(&mut self) -> Result<Tree, Error> {
        let frame = self.exchange(CommandType::GetTree, "").await?;
        match Tree::parse_layout(&frame.payload) {
            Ok(tree) => Ok(tree),
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn get_workspaces(&mut self) -> Result<Vec<Workspace>, Error> {
        self.query(CommandType::GetWorkspaces, "").await
    }

    pub async fn get_outputs(&mut self) -> Result<Vec<Output>, Error> {
        self.query(CommandType::GetOutputs, "").await
    }

    pub async fn get_inputs(&mut self) -> Result<Vec<Input>, Error> {
        self.query(CommandType::GetInputs, "").await
    }

    pub async fn get_seats(&mut self) -> Result<Vec<Seat>, Error> {
        self.query(CommandType::GetSeats, "").await
    }

    pub async fn get_marks(&mut self) -> Result<Vec<String>, Error> {
        self.query(CommandType::GetMarks, "").await
    }

    pub async fn get_bar_ids(&mut self) -> Result<Vec<String>, Error> {
        self.query(CommandType::GetBarConfig, "").await
    }

    pub async fn get_bar_config(&mut self, id: &str) -> Result<BarConfig, Error> {
        self.query(CommandType::GetBarConfig, id).await
    }

    pub async fn get_version(&mut self) -> Result<Version, Error> {
        self.query(CommandType::GetVersion, "").await
    }

    pub async fn get_binding_modes(&mut self) -> Result<Vec<String>, Error> {
        self.query(CommandType::GetBindingModes, "").await
    }

    pub async fn get_binding_state(&mut self) -> Result<BindingState, Error> {
        self.query(CommandType::GetBindingState, "").await
    }

    pub async fn get_config(&mut self) -> Result<Config, Error> {
        self.query(CommandType::GetConfig, "").await
    }

    /// Broadcast a tick event carrying `payload` to tick subscribers.
    pub async fn send_tick(&mut self, payload: &str) -> Result<(), Error> {
        self.run(CommandType::SendTick, payload).await.map(drop)
    }

    pub async fn sync(&mut self) -> Result<(), Error> {
        self.run(CommandType::Sync, "").await.map(drop)
    }

    async fn query<T: DeserializeOwned>(
        &mut self,
        command: CommandType,
        payload: &str,
    ) -> Result<T, Error> {
        let reply = self.run(command, payload).await?;
        self.convert(reply).await
    }

    async fn convert<T: DeserializeOwned>(&mut self, reply: Value) -> Result<T, Error> {
        match serde_json::from_value(reply) {
            Ok(value) => Ok(value),
            Err(e) => Err(self.fail(e.into()).await),
        }
    }

    async fn parse(&mut self, frame: &Frame) -> Result<Value, Error> {
        if frame.payload.is_empty() {
            let e = ProtocolError::Malformed(format!("empty {} reply", frame.message_type));
            return Err(self.fail(e).await);
        }
        match frame.json() {
            Ok(value) => Ok(value),
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// Send `command` and wait for the reply of the same type.
    async fn exchange(&mut self, command: CommandType, payload: &str) -> Result<Frame, Error> {
        debug!(%command, len = payload.len(), "sending command");
        self.transport.send_frame(&Frame::new(command, payload)).await?;

        let expected = MessageType::Command(command);
        let Some(limit) = self.reply_timeout else {
            return self.await_reply(expected).await;
        };
        let outcome = tokio::time::timeout(limit, self.await_reply(expected)).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                warn!(%command, ?limit, "no reply before timeout, closing connection");
                self.transport.close().await;
                Err(Error::Timeout)
            }
        }
    }

    async fn await_reply(&mut self, expected: MessageType) -> Result<Frame, Error> {
        loop {
            let frame = self.transport.recv_frame().await?;
            match frame.message_type {
                found if found == expected => return Ok(frame),
                MessageType::Event(event) => {
                    warn!(%event, "discarding event frame on command connection");
                }
                found => {
                    return Err(self.fail(ProtocolError::UnexpectedReply { expected, found }).await);
                }
            }
        }
    }

    /// Protocol errors are fatal to the connection.
    async fn fail(&mut self, e: ProtocolError) -> Error {
        warn!(error = %e, "protocol error on command connection");
        self.transport.close().await;
        Error::from(e)
    }
}

/// Map a `"success": false` reply to `Error::Command`.
fn check_success(reply: &Value) -> Result<(), Error> {
    let failed = match reply {
        Value::Array(items) => items.iter().find(|item| is_failure(item)),
        Value::Object(_) if is_failure(reply) => Some(reply),
        _ => None,
    };
    match failed {
        Some(item) => Err(Error::Command {
            message: item
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("command failed")
                .to_string(),
            parse_error: item.get("parse_error").and_then(Value::as_bool).unwrap_or(false),
        }),
        None => Ok(()),
    }
}

fn is_failure(item: &Value) -> bool {
    item.get("success").and_then(Value::as_bool) == Some(false)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
