// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One framed connection to the manager's IPC socket.
//!
//! A `Transport` is driven by exactly one owner through `&mut self`; sharing
//! one across tasks needs external synchronization and is the caller's
//! problem. Any I/O or framing failure closes the transport for good, since
//! the byte stream can no longer be trusted to be aligned on a frame boundary.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, info};
use wmctl_wire::{read_frame, write_frame, Frame, ProtocolError, DEFAULT_MAX_PAYLOAD};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    /// Closed explicitly, by the peer, or after an unrecoverable error.
    Closed,
}

#[derive(Debug)]
pub struct Transport<S = UnixStream> {
    stream: S,
    state: ConnectionState,
    max_payload: usize,
}

impl Transport<UnixStream> {
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path)
            .await
            .map_err(|source| Error::Connect { path: path.to_path_buf(), source })?;
        info!(path = %path.display(), "connected to IPC socket");
        Ok(Self::new(stream))
    }
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self { stream, state: ConnectionState::Connected, max_payload: DEFAULT_MAX_PAYLOAD }
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Write a whole frame; short writes are retried until done.
    pub async fn send_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        self.ensure_open()?;
        let result = write_frame(&mut self.stream, frame).await;
        self.track(result)
    }

    /// Read the next whole frame, however the bytes are chunked on arrival.
    ///
    /// Returns `Error::ConnectionClosed` once the peer hangs up.
    pub async fn recv_frame(&mut self) -> Result<Frame, Error> {
        self.ensure_open()?;
        let result = read_frame(&mut self.stream, self.max_payload).await;
        self.track(result)
    }

    /// Shut down the write half and refuse further I/O. Idempotent.
    pub async fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::Closed;
        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "shutdown after close failed");
        }
        debug!("transport closed");
    }

    fn ensure_open(&self) -> Result<(), Error> {
        match self.state {
            ConnectionState::Connected => Ok(()),
            ConnectionState::Closed => Err(Error::ConnectionClosed),
        }
    }

    fn track<T>(&mut self, result: Result<T, ProtocolError>) -> Result<T, Error> {
        result.map_err(|e| {
            if !matches!(e, ProtocolError::ConnectionClosed) {
                debug!(error = %e, "closing transport after error");
            }
            self.state = ConnectionState::Closed;
            Error::from(e)
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
