//! The message schema: one struct per payload-carrying kind, and the
//! [`Message`] sum type that ties them to their `type` discriminant.
//!
//! ```text
//! {"type":"JOIN_ROOM","nickname":"Alice","roomId":"abc123"}
//!  └── discriminant ──┘└──────── JoinRoomMessage ────────┘
//! ```
//!
//! Serialization is derived: `#[serde(tag = "type")]` writes the
//! discriminant next to the variant's own fields. Deserialization is not
//! derived. It goes through [`Message::from_value`], which resolves the
//! discriminant to a [`MessageKind`] first and then decodes the body with
//! the variant's schema, so the three failure modes (bad JSON, bad `type`,
//! bad body) come out as distinct [`ProtocolError`] variants.

use std::collections::BTreeMap;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    AudioContent, Card, RoomParameters, RuleParameters, Severity,
    TemplateValues, UiVariables, User,
};
use crate::{Direction, MessageKind, ProtocolError};

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// `TEXT`: a chat line, sent by clients and relayed by the server.
///
/// With `validate_only` set the server checks the text against the enabled
/// rules and answers with `VALIDATE_TEXT_RESPONSE` instead of relaying it.
/// The sender fields, `timestamp` and `markdown` are filled in by the server
/// when it relays the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessage {
    pub text_content: String,
    /// Image URL, empty when there is no image.
    pub image_content: String,
    pub audio_content: AudioContent,
    pub validate_only: bool,
    /// Server-rendered markdown body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    /// Identifier of the thread this message replies in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<String>,
}

impl TextMessage {
    /// A plain text line: no image, no audio, not a validation request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text_content: text.into(),
            image_content: String::new(),
            audio_content: AudioContent::default(),
            validate_only: false,
            markdown: None,
            sender_nickname: None,
            sender_id: None,
            timestamp: None,
            thread: None,
        }
    }
}

/// `VALIDATE_TEXT_RESPONSE`: the answer to a `TEXT` with `validateOnly`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTextResponseMessage {
    pub valid: bool,
    /// Translation codes of the rules the text breaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<Vec<String>>,
}

/// `WORD_PREDICTION`: a completion suggestion for the current input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPredictionMessage {
    pub prediction: String,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// `NEW_RULE`: the client plays a card from its hand with the given
/// parameter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRuleMessage {
    pub rule_name: String,
    pub rule_parameters: RuleParameters,
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// `JOIN_ROOM`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomMessage {
    pub nickname: String,
    pub room_id: String,
}

/// `CREATE_ROOM`. Without `params` the room manager uses its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RoomParameters>,
}

/// `ROOM_CREATED`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCreatedMessage {
    pub room_id: String,
}

/// `ROOM_STATE`: the full room snapshot from the receiving player's point
/// of view (`user_id`, `nickname` and `hand` are theirs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateMessage {
    pub users: Vec<User>,
    pub turn_user_id: String,
    /// Milliseconds since the Unix epoch.
    pub turn_end_time: u64,
    /// Seconds.
    pub turn_length: u32,
    pub enabled_rules: Vec<Card>,
    pub hand: Vec<Card>,
    pub user_id: String,
    pub nickname: String,
    pub playable_cards_left: u32,
    pub variables: UiVariables,
}

/// `SERVER_STATE`: what the lobby needs before a room exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStateMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_room_parameters: Option<RoomParameters>,
    pub available_cards: Vec<Card>,
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// `ERROR`: a translation code plus optional template values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<TemplateValues>,
}

impl ErrorMessage {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            message: code.into(),
            values: None,
        }
    }

    /// Adds a template value, creating the map on first use.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// `SYSTEM`: a server notice shown in the chat stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMessage {
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<TemplateValues>,
}

impl SystemMessage {
    pub fn new(code: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: code.into(),
            severity,
            values: None,
        }
    }

    /// Adds a template value, creating the map on first use.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Client settings / localisation
// ---------------------------------------------------------------------------

/// `LANGUAGE_DATA`: translations keyed by locale, then by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDataMessage {
    pub messages: BTreeMap<String, BTreeMap<String, String>>,
}

/// `PROFILE_IMG_CHANGE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImgChangeMessage {
    pub profile_img: String,
}

/// `CLIENT_LANGUAGE_CHANGE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLanguageChangeMessage {
    pub language: String,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Every message that travels between client and server.
///
/// Variant names map to the wire discriminant in SCREAMING_SNAKE_CASE
/// (`NewRule` is `"NEW_RULE"`), matching [`MessageKind::as_str`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Text(TextMessage),
    NewRule(NewRuleMessage),
    JoinRoom(JoinRoomMessage),
    CreateRoom(CreateRoomMessage),
    LeaveRoom,
    RoomCreated(RoomCreatedMessage),
    RoomState(RoomStateMessage),
    ServerState(ServerStateMessage),
    ValidateTextResponse(ValidateTextResponseMessage),
    Error(ErrorMessage),
    System(SystemMessage),
    LanguageData(LanguageDataMessage),
    KeepAlive,
    ProfileImgChange(ProfileImgChangeMessage),
    ClientLanguageChange(ClientLanguageChangeMessage),
    WordPrediction(WordPredictionMessage),
}

impl Message {
    /// Builds a message from an already-parsed JSON value.
    ///
    /// Fields the variant does not declare are ignored. Optional fields
    /// that are absent stay `None`.
    ///
    /// # Errors
    /// - `UnknownMessageType` if `type` is missing or unrecognised.
    /// - `InvalidMessage` if a required field is missing or any field has
    ///   the wrong type.
    pub fn from_value(value: Value) -> Result<Self, ProtocolError> {
        let kind = MessageKind::of(&value)?;

        // One arm per kind: adding a kind without a decoder is a compile
        // error here.
        let message = match kind {
            MessageKind::Text => Self::Text(body(kind, value)?),
            MessageKind::NewRule => Self::NewRule(body(kind, value)?),
            MessageKind::JoinRoom => Self::JoinRoom(body(kind, value)?),
            MessageKind::CreateRoom => Self::CreateRoom(body(kind, value)?),
            MessageKind::LeaveRoom => Self::LeaveRoom,
            MessageKind::RoomCreated => Self::RoomCreated(body(kind, value)?),
            MessageKind::RoomState => Self::RoomState(body(kind, value)?),
            MessageKind::ServerState => Self::ServerState(body(kind, value)?),
            MessageKind::ValidateTextResponse => {
                Self::ValidateTextResponse(body(kind, value)?)
            }
            MessageKind::Error => Self::Error(body(kind, value)?),
            MessageKind::System => Self::System(body(kind, value)?),
            MessageKind::LanguageData => Self::LanguageData(body(kind, value)?),
            MessageKind::KeepAlive => Self::KeepAlive,
            MessageKind::ProfileImgChange => {
                Self::ProfileImgChange(body(kind, value)?)
            }
            MessageKind::ClientLanguageChange => {
                Self::ClientLanguageChange(body(kind, value)?)
            }
            MessageKind::WordPrediction => Self::WordPrediction(body(kind, value)?),
        };
        Ok(message)
    }

    /// The discriminant of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text(_) => MessageKind::Text,
            Self::NewRule(_) => MessageKind::NewRule,
            Self::JoinRoom(_) => MessageKind::JoinRoom,
            Self::CreateRoom(_) => MessageKind::CreateRoom,
            Self::LeaveRoom => MessageKind::LeaveRoom,
            Self::RoomCreated(_) => MessageKind::RoomCreated,
            Self::RoomState(_) => MessageKind::RoomState,
            Self::ServerState(_) => MessageKind::ServerState,
            Self::ValidateTextResponse(_) => MessageKind::ValidateTextResponse,
            Self::Error(_) => MessageKind::Error,
            Self::System(_) => MessageKind::System,
            Self::LanguageData(_) => MessageKind::LanguageData,
            Self::KeepAlive => MessageKind::KeepAlive,
            Self::ProfileImgChange(_) => MessageKind::ProfileImgChange,
            Self::ClientLanguageChange(_) => MessageKind::ClientLanguageChange,
            Self::WordPrediction(_) => MessageKind::WordPrediction,
        }
    }

    /// Which peer is expected to send this message.
    pub fn direction(&self) -> Direction {
        self.kind().direction()
    }
}

/// Decodes the body of a message whose kind is already known.
fn body<T: DeserializeOwned>(kind: MessageKind, value: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value)
        .map_err(|source| ProtocolError::InvalidMessage { kind, source })
}

/// Routes through [`Message::from_value`] so that embedding a `Message` in
/// another serde type gets the same checks as [`decode`](crate::decode).
impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

impl From<TextMessage> for Message {
    fn from(msg: TextMessage) -> Self {
        Self::Text(msg)
    }
}

impl From<NewRuleMessage> for Message {
    fn from(msg: NewRuleMessage) -> Self {
        Self::NewRule(msg)
    }
}

impl From<JoinRoomMessage> for Message {
    fn from(msg: JoinRoomMessage) -> Self {
        Self::JoinRoom(msg)
    }
}

impl From<CreateRoomMessage> for Message {
    fn from(msg: CreateRoomMessage) -> Self {
        Self::CreateRoom(msg)
    }
}

impl From<RoomCreatedMessage> for Message {
    fn from(msg: RoomCreatedMessage) -> Self {
        Self::RoomCreated(msg)
    }
}

impl From<RoomStateMessage> for Message {
    fn from(msg: RoomStateMessage) -> Self {
        Self::RoomState(msg)
    }
}

impl From<ServerStateMessage> for Message {
    fn from(msg: ServerStateMessage) -> Self {
        Self::ServerState(msg)
    }
}

impl From<ValidateTextResponseMessage> for Message {
    fn from(msg: ValidateTextResponseMessage) -> Self {
        Self::ValidateTextResponse(msg)
    }
}

impl From<ErrorMessage> for Message {
    fn from(msg: ErrorMessage) -> Self {
        Self::Error(msg)
    }
}

impl From<SystemMessage> for Message {
    fn from(msg: SystemMessage) -> Self {
        Self::System(msg)
    }
}

impl From<LanguageDataMessage> for Message {
    fn from(msg: LanguageDataMessage) -> Self {
        Self::LanguageData(msg)
    }
}

impl From<ProfileImgChangeMessage> for Message {
    fn from(msg: ProfileImgChangeMessage) -> Self {
        Self::ProfileImgChange(msg)
    }
}

impl From<ClientLanguageChangeMessage> for Message {
    fn from(msg: ClientLanguageChangeMessage) -> Self {
        Self::ClientLanguageChange(msg)
    }
}

impl From<WordPredictionMessage> for Message {
    fn from(msg: WordPredictionMessage) -> Self {
        Self::WordPrediction(msg)
    }
}

#[cfg(test)]
mod tests {
    //! Wire-shape tests. The client bundle reads these exact field names,
    //! so each test pins the JSON a variant produces or accepts.

    use super::*;
    use serde_json::json;

    fn to_json(msg: &Message) -> Value {
        serde_json::to_value(msg).unwrap()
    }

    // =====================================================================
    // Discriminant placement
    // =====================================================================

    #[test]
    fn test_serialized_type_matches_kind_for_every_unit_and_simple_variant() {
        let samples: Vec<Message> = vec![
            Message::LeaveRoom,
            Message::KeepAlive,
            CreateRoomMessage::default().into(),
            ErrorMessage::new("room.notFound").into(),
            WordPredictionMessage { prediction: "hello".into() }.into(),
        ];
        for msg in samples {
            assert_eq!(to_json(&msg)["type"], msg.kind().as_str());
        }
    }

    #[test]
    fn test_unit_variants_serialize_as_bare_type() {
        assert_eq!(to_json(&Message::LeaveRoom), json!({ "type": "LEAVE_ROOM" }));
        assert_eq!(to_json(&Message::KeepAlive), json!({ "type": "KEEP_ALIVE" }));
    }

    // =====================================================================
    // TEXT
    // =====================================================================

    #[test]
    fn test_text_json_format() {
        let mut text = TextMessage::new("hi");
        text.sender_nickname = Some("Bob".into());
        let json = to_json(&text.into());

        assert_eq!(json["type"], "TEXT");
        assert_eq!(json["textContent"], "hi");
        assert_eq!(json["imageContent"], "");
        assert_eq!(json["audioContent"], json!({ "url": "", "length": 0 }));
        assert_eq!(json["validateOnly"], false);
        assert_eq!(json["senderNickname"], "Bob");
    }

    #[test]
    fn test_text_omits_absent_optionals() {
        let json = to_json(&TextMessage::new("hi").into());
        for field in ["markdown", "senderNickname", "senderId", "timestamp", "thread"] {
            assert!(json.get(field).is_none(), "{field} should be omitted");
        }
    }

    #[test]
    fn test_text_missing_required_field_is_invalid() {
        let err = Message::from_value(json!({ "type": "TEXT", "textContent": "hi" }))
            .unwrap_err();
        assert_eq!(err.kind(), Some(MessageKind::Text));
    }

    // =====================================================================
    // NEW_RULE
    // =====================================================================

    #[test]
    fn test_new_rule_parameters_stay_untyped() {
        let msg = Message::from_value(json!({
            "type": "NEW_RULE",
            "ruleName": "banWord",
            "ruleParameters": { "word": "cat", "target": "u2", "count": 2 }
        }))
        .unwrap();

        let Message::NewRule(rule) = msg else {
            panic!("expected NewRule");
        };
        assert_eq!(rule.rule_name, "banWord");
        assert_eq!(rule.rule_parameters["word"], "cat");
        assert_eq!(rule.rule_parameters["count"], 2);
    }

    #[test]
    fn test_new_rule_wrong_field_type_is_invalid() {
        let err = Message::from_value(json!({
            "type": "NEW_RULE",
            "ruleName": 12,
            "ruleParameters": {}
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidMessage { kind: MessageKind::NewRule, .. }
        ));
    }

    // =====================================================================
    // Rooms
    // =====================================================================

    #[test]
    fn test_create_room_with_params() {
        let msg = Message::from_value(json!({
            "type": "CREATE_ROOM",
            "params": { "turnLength": 45, "startingHandSize": 5 }
        }))
        .unwrap();

        let Message::CreateRoom(create) = msg else {
            panic!("expected CreateRoom");
        };
        let params = create.params.unwrap();
        assert_eq!(params.turn_length, Some(45));
        assert_eq!(params.starting_hand_size, Some(5));
        assert_eq!(params.starting_rules, None);
    }

    #[test]
    fn test_room_state_json_format() {
        let state = RoomStateMessage {
            users: vec![User {
                id: "u1".into(),
                nickname: "Alice".into(),
                profile_img: Some("cat.png".into()),
            }],
            turn_user_id: "u1".into(),
            turn_end_time: 1_700_000_000_000,
            turn_length: 60,
            enabled_rules: vec![],
            hand: vec![],
            user_id: "u1".into(),
            nickname: "Alice".into(),
            playable_cards_left: 1,
            variables: UiVariables::default(),
        };
        let json = to_json(&state.into());

        assert_eq!(json["type"], "ROOM_STATE");
        assert_eq!(json["users"][0]["profileImg"], "cat.png");
        assert_eq!(json["turnUserId"], "u1");
        assert_eq!(json["turnEndTime"], 1_700_000_000_000u64);
        assert_eq!(json["playableCardsLeft"], 1);
        assert!(json["variables"].is_object());
    }

    #[test]
    fn test_server_state_default_parameters_optional() {
        let msg = Message::from_value(json!({
            "type": "SERVER_STATE",
            "availableCards": []
        }))
        .unwrap();
        assert_eq!(
            msg,
            Message::ServerState(ServerStateMessage {
                default_room_parameters: None,
                available_cards: vec![],
            })
        );
    }

    // =====================================================================
    // Notices
    // =====================================================================

    #[test]
    fn test_error_with_values() {
        let msg: Message = ErrorMessage::new("rule.notFound")
            .with_value("rule", "banWord")
            .into();
        let json = to_json(&msg);
        assert_eq!(json["message"], "rule.notFound");
        assert_eq!(json["values"], json!({ "rule": "banWord" }));
    }

    #[test]
    fn test_system_json_format() {
        let msg: Message = SystemMessage::new("user.joined", Severity::Info)
            .with_value("nickname", "Alice")
            .into();
        let json = to_json(&msg);
        assert_eq!(json["type"], "SYSTEM");
        assert_eq!(json["severity"], "info");
        assert_eq!(json["values"]["nickname"], "Alice");
    }

    #[test]
    fn test_system_unknown_severity_is_invalid() {
        let err = Message::from_value(json!({
            "type": "SYSTEM",
            "message": "x",
            "severity": "fatal"
        }))
        .unwrap_err();
        assert_eq!(err.kind(), Some(MessageKind::System));
    }

    #[test]
    fn test_validate_text_response_reasons() {
        let msg = Message::from_value(json!({
            "type": "VALIDATE_TEXT_RESPONSE",
            "valid": false,
            "invalidReason": ["rule.banWord.violated"]
        }))
        .unwrap();
        let Message::ValidateTextResponse(resp) = msg else {
            panic!("expected ValidateTextResponse");
        };
        assert!(!resp.valid);
        assert_eq!(resp.invalid_reason.unwrap(), vec!["rule.banWord.violated"]);
    }

    // =====================================================================
    // Settings / localisation
    // =====================================================================

    #[test]
    fn test_language_data_nested_maps() {
        let msg = Message::from_value(json!({
            "type": "LANGUAGE_DATA",
            "messages": {
                "en": { "room.notFound": "Room not found" },
                "fr": { "room.notFound": "Salle introuvable" }
            }
        }))
        .unwrap();
        let Message::LanguageData(data) = msg else {
            panic!("expected LanguageData");
        };
        assert_eq!(data.messages["fr"]["room.notFound"], "Salle introuvable");
    }

    #[test]
    fn test_profile_img_change_field_name() {
        let msg: Message = ProfileImgChangeMessage { profile_img: "dog.png".into() }.into();
        assert_eq!(
            to_json(&msg),
            json!({ "type": "PROFILE_IMG_CHANGE", "profileImg": "dog.png" })
        );
    }

    // =====================================================================
    // Dispatch
    // =====================================================================

    #[test]
    fn test_extra_fields_are_ignored() {
        let msg = Message::from_value(json!({
            "type": "CLIENT_LANGUAGE_CHANGE",
            "language": "de",
            "clientVersion": "9.9"
        }))
        .unwrap();
        assert_eq!(
            msg,
            Message::ClientLanguageChange(ClientLanguageChangeMessage { language: "de".into() })
        );
    }

    #[test]
    fn test_unit_variants_ignore_body() {
        let msg = Message::from_value(json!({ "type": "KEEP_ALIVE", "n": 1 })).unwrap();
        assert_eq!(msg, Message::KeepAlive);
    }

    #[test]
    fn test_deserialize_impl_uses_dispatch() {
        let msg: Message =
            serde_json::from_str(r#"{"type":"ROOM_CREATED","roomId":"r1"}"#).unwrap();
        assert_eq!(msg, Message::RoomCreated(RoomCreatedMessage { room_id: "r1".into() }));

        let err = serde_json::from_str::<Message>(r#"{"type":"NOPE"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown message type: NOPE"));
    }

    #[test]
    fn test_message_embeds_in_other_serde_types() {
        let batch: Vec<Message> =
            serde_json::from_str(r#"[{"type":"KEEP_ALIVE"},{"type":"LEAVE_ROOM"}]"#).unwrap();
        assert_eq!(batch, vec![Message::KeepAlive, Message::LeaveRoom]);
    }

    #[test]
    fn test_direction_follows_kind() {
        assert_eq!(Message::KeepAlive.direction(), Direction::Both);
        assert_eq!(
            Message::from(JoinRoomMessage {
                nickname: "A".into(),
                room_id: "r".into()
            })
            .direction(),
            Direction::ClientToServer
        );
    }
}
