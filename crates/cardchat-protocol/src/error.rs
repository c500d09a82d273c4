//! Error types for the protocol layer.
//!
//! Every failure the decoder can produce is a [`ProtocolError`] variant.
//! Semantic problems ("that rule does not exist", "nickname already taken")
//! are not protocol errors: the room manager and rule engine report those
//! with their own `ERROR` / `SYSTEM` messages.

use crate::MessageKind;

/// Errors that can occur while decoding or encoding a message.
///
/// The variants are ordered by the decode step that produces them:
/// parsing, discriminant lookup, then field checks.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The input is not well-formed JSON (or not valid UTF-8).
    ///
    /// Produced before the discriminant is ever looked at.
    #[error("malformed input: {0}")]
    MalformedInput(serde_json::Error),

    /// The `type` field is missing, is not a string, or names no known
    /// message kind.
    ///
    /// Holds the offending value when there was one. A non-string `type`
    /// is rendered as its JSON text.
    #[error(
        "unknown message type: {}",
        .0.as_deref().unwrap_or("<missing>")
    )]
    UnknownMessageType(Option<String>),

    /// The discriminant is known but the body does not match the schema
    /// for that kind: a required field is missing or has the wrong type.
    #[error("invalid {kind} message: {source}")]
    InvalidMessage {
        kind: MessageKind,
        #[source]
        source: serde_json::Error,
    },

    /// The frame exceeds the codec's configured size limit.
    #[error("message of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    /// Serialization failed. Well-typed messages never hit this; it exists
    /// so encoding follows the same `Result` convention as decoding.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),
}

impl ProtocolError {
    /// Returns `true` if the input could not be parsed at all.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput(_))
    }

    /// Returns `true` if the discriminant was missing or unrecognised.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnknownMessageType(_))
    }

    /// The message kind the error relates to, when the discriminant was
    /// recognised before failing.
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            Self::InvalidMessage { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
