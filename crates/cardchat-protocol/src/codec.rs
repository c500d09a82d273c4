//! Decoding and encoding of [`Message`]s.
//!
//! The free functions [`decode`] and [`encode`] are the whole contract:
//! JSON text in, typed message out, and back. [`Codec`] wraps the same
//! logic behind a trait so connection handlers can hold "something that
//! turns frames into messages" without caring about the format, and
//! [`JsonCodec`] adds a frame size limit on top.
//!
//! Everything here is a pure function of its input. Codecs hold only
//! their immutable config and can be shared freely between tasks.

use serde_json::Value;

use crate::{Message, ProtocolError};

/// Parses one JSON message.
///
/// # Errors
/// - `MalformedInput` if `text` is not JSON. The discriminant is never
///   looked at in that case.
/// - `UnknownMessageType` if `type` is missing or unrecognised.
/// - `InvalidMessage` if the body does not match the kind's schema.
pub fn decode(text: &str) -> Result<Message, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(ProtocolError::MalformedInput)?;
    finish_decode(value, text.len())
}

/// Like [`decode`], for a raw transport frame.
///
/// Bytes that are not valid UTF-8 are reported as `MalformedInput`.
pub fn decode_slice(data: &[u8]) -> Result<Message, ProtocolError> {
    let value: Value =
        serde_json::from_slice(data).map_err(ProtocolError::MalformedInput)?;
    finish_decode(value, data.len())
}

fn finish_decode(value: Value, len: usize) -> Result<Message, ProtocolError> {
    match Message::from_value(value) {
        Ok(message) => {
            tracing::trace!(kind = %message.kind(), bytes = len, "decoded message");
            Ok(message)
        }
        Err(e) => {
            tracing::debug!(error = %e, bytes = len, "rejected message");
            Err(e)
        }
    }
}

/// Serializes a message to compact JSON text.
///
/// Absent optional fields are left out, so `decode(&encode(m)?)` gives
/// back `m`.
///
/// # Errors
/// Returns `ProtocolError::Encode` only if serde_json fails, which does not
/// happen for the types in this crate.
pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    let text = serde_json::to_string(message).map_err(ProtocolError::Encode)?;
    tracing::trace!(kind = %message.kind(), bytes = text.len(), "encoded message");
    Ok(text)
}

/// Serializes a message to a JSON value, for callers that embed it in a
/// larger document.
pub fn encode_value(message: &Message) -> Result<Value, ProtocolError> {
    serde_json::to_value(message).map_err(ProtocolError::Encode)
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Converts between transport frames and [`Message`]s.
///
/// `Send + Sync + 'static` so one codec can live in shared server state
/// and be used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into a frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes a frame into a message.
    ///
    /// # Errors
    /// Any decode error from [`decode`], plus whatever limits the codec
    /// enforces itself.
    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError>;
}

/// Settings for [`JsonCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Frames longer than this are rejected before parsing.
    ///
    /// Default: 8 MiB. `TEXT` may carry inline image data, so this is
    /// deliberately generous.
    pub max_message_bytes: usize,

    /// Pretty-print encoded output. Useful when logging frames.
    ///
    /// Default: `false`.
    pub pretty: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: 8 * 1024 * 1024,
            pretty: false,
        }
    }
}

/// A [`Codec`] for the JSON wire format.
///
/// ```rust
/// use cardchat_protocol::{Codec, JsonCodec, JoinRoomMessage, Message};
///
/// let codec = JsonCodec::default();
///
/// let msg = Message::JoinRoom(JoinRoomMessage {
///     nickname: "Alice".into(),
///     room_id: "abc123".into(),
/// });
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    config: CodecConfig,
}

impl JsonCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl Codec for JsonCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError> {
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(message)
        } else {
            serde_json::to_vec(message)
        }
        .map_err(ProtocolError::Encode)?;
        tracing::trace!(kind = %message.kind(), bytes = bytes.len(), "encoded frame");
        Ok(bytes)
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        let limit = self.config.max_message_bytes;
        if data.len() > limit {
            tracing::debug!(size = data.len(), limit, "rejected oversized frame");
            return Err(ProtocolError::TooLarge {
                size: data.len(),
                limit,
            });
        }
        decode_slice(data)
    }
}
