//! Message discriminants.
//!
//! [`MessageKind`] is the fieldless mirror of [`Message`](crate::Message):
//! one value per `type` string the protocol knows. The decoder resolves the
//! discriminant to a `MessageKind` first and only then looks at the body,
//! so this module is the single place where an unknown `type` is rejected.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which peer is expected to send a given message kind.
///
/// Informational only: the decoder accepts every kind from either side.
/// The server's connection handler decides whether a client may send it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
    /// Either peer may send it (`TEXT`, `KEEP_ALIVE`).
    Both,
}

impl Direction {
    /// Returns `true` if a client is expected to send this kind.
    pub fn from_client(self) -> bool {
        matches!(self, Self::ClientToServer | Self::Both)
    }

    /// Returns `true` if the server is expected to send this kind.
    pub fn from_server(self) -> bool {
        matches!(self, Self::ServerToClient | Self::Both)
    }
}

// ---------------------------------------------------------------------------
// MessageKind
// ---------------------------------------------------------------------------

/// Every discriminant of the current schema revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Text,
    NewRule,
    JoinRoom,
    CreateRoom,
    LeaveRoom,
    RoomCreated,
    RoomState,
    ServerState,
    ValidateTextResponse,
    Error,
    System,
    LanguageData,
    KeepAlive,
    ProfileImgChange,
    ClientLanguageChange,
    WordPrediction,
}

impl MessageKind {
    /// All kinds, in schema order.
    pub const ALL: [MessageKind; 16] = [
        Self::Text,
        Self::NewRule,
        Self::JoinRoom,
        Self::CreateRoom,
        Self::LeaveRoom,
        Self::RoomCreated,
        Self::RoomState,
        Self::ServerState,
        Self::ValidateTextResponse,
        Self::Error,
        Self::System,
        Self::LanguageData,
        Self::KeepAlive,
        Self::ProfileImgChange,
        Self::ClientLanguageChange,
        Self::WordPrediction,
    ];

    /// The wire value of the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::NewRule => "NEW_RULE",
            Self::JoinRoom => "JOIN_ROOM",
            Self::CreateRoom => "CREATE_ROOM",
            Self::LeaveRoom => "LEAVE_ROOM",
            Self::RoomCreated => "ROOM_CREATED",
            Self::RoomState => "ROOM_STATE",
            Self::ServerState => "SERVER_STATE",
            Self::ValidateTextResponse => "VALIDATE_TEXT_RESPONSE",
            Self::Error => "ERROR",
            Self::System => "SYSTEM",
            Self::LanguageData => "LANGUAGE_DATA",
            Self::KeepAlive => "KEEP_ALIVE",
            Self::ProfileImgChange => "PROFILE_IMG_CHANGE",
            Self::ClientLanguageChange => "CLIENT_LANGUAGE_CHANGE",
            Self::WordPrediction => "WORD_PREDICTION",
        }
    }

    /// Which peer sends this kind.
    pub fn direction(self) -> Direction {
        match self {
            Self::Text | Self::KeepAlive => Direction::Both,
            Self::NewRule
            | Self::JoinRoom
            | Self::CreateRoom
            | Self::LeaveRoom
            | Self::ProfileImgChange
            | Self::ClientLanguageChange => Direction::ClientToServer,
            Self::RoomCreated
            | Self::RoomState
            | Self::ServerState
            | Self::ValidateTextResponse
            | Self::Error
            | Self::System
            | Self::LanguageData
            | Self::WordPrediction => Direction::ServerToClient,
        }
    }

    /// Reads the `type` field of a parsed JSON value.
    ///
    /// # Errors
    /// Returns `ProtocolError::UnknownMessageType` if the value has no
    /// `type` field (including when it is not an object), if `type` is not
    /// a string, or if the string names no known kind.
    pub fn of(value: &Value) -> Result<Self, ProtocolError> {
        match value.get("type") {
            None => Err(ProtocolError::UnknownMessageType(None)),
            Some(Value::String(tag)) => tag.parse(),
            Some(other) => {
                Err(ProtocolError::UnknownMessageType(Some(other.to_string())))
            }
        }
    }
}

impl FromStr for MessageKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownMessageType(Some(s.to_owned())))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
