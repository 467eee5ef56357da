// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event subscription on a dedicated connection.
//!
//! `Idle → Subscribed → Streaming → Closed`. Events are handed out strictly
//! in wire order. Frames outside the subscribed categories are logged and
//! skipped; a shutdown event is always delivered.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info, warn};
use wmctl_core::{Event, Success};
use wmctl_wire::{CommandType, EventType, Frame, MessageType, ProtocolError};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    Idle,
    Subscribed,
    Streaming,
    Closed,
}

#[derive(Debug)]
pub struct EventSubscriber<S = UnixStream> {
    transport: Transport<S>,
    state: SubscriberState,
    categories: Vec<EventType>,
}

impl EventSubscriber<UnixStream> {
    /// Open a fresh connection reserved for events.
    pub async fn connect(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self::new(config.connect().await?))
    }
}

impl<S> EventSubscriber<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(transport: Transport<S>) -> Self {
        Self { transport, state: SubscriberState::Idle, categories: Vec::new() }
    }

    pub fn state(&self) -> SubscriberState {
        self.state
    }

    pub fn categories(&self) -> &[EventType] {
        &self.categories
    }

    /// Send the subscribe command and wait for its acknowledgement.
    ///
    /// A rejected subscription is a protocol error and closes the connection.
    pub async fn subscribe(&mut self, categories: &[EventType]) -> Result<(), Error> {
        match self.state {
            SubscriberState::Idle => {}
            SubscriberState::Closed => return Err(Error::ConnectionClosed),
            SubscriberState::Subscribed | SubscriberState::Streaming => {
                return Err(Error::AlreadySubscribed)
            }
        }

        let payload = serde_json::to_string(categories).map_err(ProtocolError::from)?;
        debug!(%payload, "subscribing");
        let result = self.handshake(&payload).await;
        match result {
            Ok(()) => {
                self.categories = categories.to_vec();
                self.state = SubscriberState::Subscribed;
                info!(categories = %payload, "subscribed to events");
                Ok(())
            }
            Err(e) => {
                self.close().await;
                Err(e)
            }
        }
    }

    async fn handshake(&mut self, payload: &str) -> Result<(), Error> {
        self.transport.send_frame(&Frame::new(CommandType::Subscribe, payload)).await?;

        let reply = self.transport.recv_frame().await?;
        let expected = MessageType::Command(CommandType::Subscribe);
        if reply.message_type != expected {
            return Err(ProtocolError::UnexpectedReply { expected, found: reply.message_type }.into());
        }

        let ack: Success = reply.json()?;
        if !ack.success {
            let reason = ack.error.unwrap_or_else(|| "subscription rejected".to_string());
            return Err(ProtocolError::Malformed(format!("subscribe {payload}: {reason}")).into());
        }
        Ok(())
    }

    /// Wait for the next event.
    ///
    /// `Ok(None)` means the stream has ended (peer closed or subscriber
    /// closed); it keeps returning `None` afterwards.
    pub async fn next_event(&mut self) -> Result<Option<Event>, Error> {
        match self.state {
            SubscriberState::Idle => return Err(Error::NotSubscribed),
            SubscriberState::Closed => return Ok(None),
            SubscriberState::Subscribed | SubscriberState::Streaming => {}
        }
        self.state = SubscriberState::Streaming;

        loop {
            let frame = match self.transport.recv_frame().await {
                Ok(frame) => frame,
                Err(Error::ConnectionClosed) => {
                    info!("event stream ended by peer");
                    self.state = SubscriberState::Closed;
                    return Ok(None);
                }
                Err(e) => {
                    self.state = SubscriberState::Closed;
                    return Err(e);
                }
            };

            match frame.message_type {
                MessageType::Event(ty) if self.accepts(ty) => {
                    return match Event::from_payload(ty, &frame.payload) {
                        Ok(event) => Ok(Some(event)),
                        Err(e) => {
                            self.close().await;
                            Err(e.into())
                        }
                    };
                }
                other => warn!(message_type = %other, "ignoring frame outside subscription"),
            }
        }
    }

    /// Like [`next_event`](Self::next_event), but gives up as soon as
    /// `cancel` fires, closing the connection.
    pub async fn next_event_or_cancel(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<Event>, Error> {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            next = self.next_event() => Some(next),
        };
        match next {
            Some(next) => next,
            None => {
                debug!("event stream cancelled");
                self.close().await;
                Ok(None)
            }
        }
    }

    pub async fn close(&mut self) {
        self.state = SubscriberState::Closed;
        self.transport.close().await;
    }

    fn accepts(&self, ty: EventType) -> bool {
        ty == EventType::Shutdown || self.categories.contains(&ty)
    }
}

impl<S> EventSubscriber<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Move the read loop onto its own task, handing events out through a
    /// bounded channel of `buffer` slots.
    ///
    /// Dropping the returned stream cancels the loop.
    pub fn spawn(self, buffer: usize) -> EventStream {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.pump(tx, cancel.clone()));
        EventStream { rx, cancel: cancel.clone(), task, _guard: cancel.drop_guard() }
    }

    async fn pump(mut self, tx: mpsc::Sender<Event>, cancel: CancellationToken) -> Result<(), Error> {
        loop {
            let event = match self.next_event_or_cancel(&cancel).await {
                Ok(Some(event)) => event,
                Ok(None) => return Ok(()),
                Err(e) => {
                    error!(error = %e, "event stream failed");
                    return Err(e);
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                sent = tx.send(event) => {
                    if sent.is_err() {
                        debug!("event consumer dropped");
                        break;
                    }
                }
            }
        }
        self.close().await;
        Ok(())
    }
}

/// Handle to a spawned event loop.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Event>,
    cancel: CancellationToken,
    task: JoinHandle<Result<(), Error>>,
    _guard: DropGuard,
}

impl EventStream {
    /// Next event, or `None` once the loop has finished.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Stop the loop and close its connection.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the loop to finish and return how it ended.
    ///
    /// Undelivered events are dropped. Call [`cancel`](Self::cancel) first to
    /// stop a live stream.
    pub async fn join(self) -> Result<(), Error> {
        let EventStream { rx, task, _guard, .. } = self;
        drop(rx);
        let result = task.await?;
        drop(_guard);
        result
    }
}

#[cfg(test)]
#[path = "subscriber_tests.rs"]
mod tests;
