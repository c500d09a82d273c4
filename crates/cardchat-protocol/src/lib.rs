//! Wire protocol for cardchat.
//!
//! This crate defines the messages clients and server exchange, and turns
//! JSON text into those messages and back:
//!
//! - **Schema** ([`Message`] and one struct per kind, plus the shared
//!   [`Card`], [`User`], [`RoomParameters`], [`UiVariables`] types).
//! - **Kinds** ([`MessageKind`], [`Direction`]): the `type` discriminants.
//! - **Codec** ([`decode`], [`encode`], the [`Codec`] trait, [`JsonCodec`]).
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw frames) and the room
//! manager / rule engine. It knows nothing about connections, rooms or
//! rules. It checks that a message has the shape its `type` demands and
//! leaves every semantic check to its callers.
//!
//! ```text
//! Transport (frames) → Protocol (Message) → Room manager / rule engine
//! ```
//!
//! Only the current schema revision is accepted. Revisions only ever add
//! kinds and optional fields, so an older peer's messages decode as long
//! as they carry every field that is required today.

mod codec;
mod error;
mod kind;
mod message;
mod model;

pub use codec::{
    Codec, CodecConfig, JsonCodec, decode, decode_slice, encode, encode_value,
};
pub use error::ProtocolError;
pub use kind::{Direction, MessageKind};
pub use message::{
    ClientLanguageChangeMessage, CreateRoomMessage, ErrorMessage,
    JoinRoomMessage, LanguageDataMessage, Message, NewRuleMessage,
    ProfileImgChangeMessage, RoomCreatedMessage, RoomStateMessage,
    ServerStateMessage, SystemMessage, TextMessage,
    ValidateTextResponseMessage, WordPredictionMessage,
};
pub use model::{
    AudioContent, Card, RoomParameters, RuleParameterType, RuleParameters,
    Severity, TemplateValues, UiVariables, User,
};
