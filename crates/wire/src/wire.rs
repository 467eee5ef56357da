// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame encoding and decoding.
//!
//! Header layout: `"i3-ipc"` magic, payload length (u32 LE), message type (u32 LE).

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::MessageType;

pub const MAGIC: [u8; 6] = *b"i3-ipc";
pub const HEADER_LEN: usize = 14;

/// Largest inbound payload accepted unless a transport overrides it.
pub const DEFAULT_MAX_PAYLOAD: usize = 64 * 1024 * 1024;

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("bad magic: expected \"i3-ipc\", found {found:02x?}")]
    BadMagic { found: [u8; 6] },

    #[error("payload of {len} bytes exceeds limit of {max} bytes")]
    Oversize { len: usize, max: usize },

    #[error("payload length mismatch: header declares {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("unknown message type {0:#010x}")]
    UnknownMessageType(u32),

    #[error("unexpected {found} frame while waiting for {expected} reply")]
    UnexpectedReply { expected: MessageType, found: MessageType },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::Malformed(e.to_string())
    }
}

/// Decoded fixed-size header. The magic has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub payload_len: u32,
    pub message_type: u32,
}

/// One complete message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub message_type: MessageType,
    pub payload: String,
}

impl Frame {
    pub fn new(message_type: impl Into<MessageType>, payload: impl Into<String>) -> Self {
        Self { message_type: message_type.into(), payload: payload.into() }
    }

    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self.message_type, self.payload.as_bytes())
    }

    /// Deserialize the payload into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// Encode a message into its wire representation.
pub fn encode(message_type: MessageType, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::Oversize { len: payload.len(), max: u32::MAX as usize })?;

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(&message_type.to_raw().to_le_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Validate the magic and split out the length and type fields.
pub fn decode_header(bytes: &[u8; HEADER_LEN]) -> Result<Header, ProtocolError> {
    let mut found = [0u8; 6];
    found.copy_from_slice(&bytes[..6]);
    if found != MAGIC {
        return Err(ProtocolError::BadMagic { found });
    }

    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[6..10]);
    let payload_len = u32::from_le_bytes(word);
    word.copy_from_slice(&bytes[10..14]);
    let message_type = u32::from_le_bytes(word);

    Ok(Header { payload_len, message_type })
}

/// Build a frame from a validated header and its payload bytes.
///
/// The payload must be UTF-8. Command payloads such as `workspace 2` are
/// plain text, so JSON is left to whoever interprets the reply or event.
pub fn decode(header: Header, payload: Vec<u8>) -> Result<Frame, ProtocolError> {
    let expected = header.payload_len as usize;
    if payload.len() != expected {
        return Err(ProtocolError::LengthMismatch { expected, actual: payload.len() });
    }

    let message_type = MessageType::from_raw(header.message_type)?;
    let payload = String::from_utf8(payload)
        .map_err(|e| ProtocolError::Malformed(format!("invalid UTF-8: {e}")))?;

    Ok(Frame { message_type, payload })
}

/// Decode a complete frame held in one buffer.
pub fn decode_bytes(bytes: &[u8]) -> Result<Frame, ProtocolError> {
    let header_bytes: &[u8; HEADER_LEN] = bytes
        .get(..HEADER_LEN)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(ProtocolError::LengthMismatch { expected: HEADER_LEN, actual: bytes.len() })?;
    let header = decode_header(header_bytes)?;
    decode(header, bytes[HEADER_LEN..].to_vec())
}

/// Read one frame, looping over short reads until it is complete.
///
/// The magic is checked before the length field is trusted, and the length
/// is checked against `max_payload` before anything is allocated.
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    max_payload: usize,
) -> Result<Frame, ProtocolError> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await.map_err(read_error)?;
    let header = decode_header(&header)?;

    let len = header.payload_len as usize;
    if len > max_payload {
        return Err(ProtocolError::Oversize { len, max: max_payload });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await.map_err(read_error)?;

    let frame = decode(header, payload)?;
    tracing::trace!(message_type = %frame.message_type, len, "read frame");
    Ok(frame)
}

/// Write one frame and flush it.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    frame: &Frame,
) -> Result<(), ProtocolError> {
    let bytes = frame.encode()?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    tracing::trace!(message_type = %frame.message_type, len = frame.payload.len(), "wrote frame");
    Ok(())
}

fn read_error(e: std::io::Error) -> ProtocolError {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof
        | std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::BrokenPipe => ProtocolError::ConnectionClosed,
        _ => ProtocolError::Io(e),
    }
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
