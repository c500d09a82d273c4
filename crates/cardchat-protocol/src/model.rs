//! Building blocks shared by several message kinds: cards, users, room
//! settings and the UI flags the server pushes to clients.
//!
//! All wire names are camelCase. Optional fields are `Option`s that are
//! left out of the JSON entirely when `None`, so an absent field survives a
//! decode/encode round trip as absent rather than turning into `null`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current values of a card's parameters, keyed by parameter name.
///
/// The value type per key is decided by the rule definition, which the
/// protocol does not know, so values stay as raw JSON.
pub type RuleParameters = BTreeMap<String, Value>;

/// Substitution values for a translated message template, keyed by
/// placeholder name.
pub type TemplateValues = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// RuleParameterType
// ---------------------------------------------------------------------------

/// The declared type of one rule parameter.
///
/// On the wire this is either a string (`""`, `"player"`, `"number"`) or an
/// array of allowed string values. Any other string is rejected at decode
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParameterType", into = "RawParameterType")]
pub enum RuleParameterType {
    /// No parameter (`""`).
    Empty,
    /// A user identifier.
    Player,
    /// An integer.
    Number,
    /// One of a fixed set of strings.
    Choice(Vec<String>),
}

impl RuleParameterType {
    /// Returns `true` unless this is the empty type.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Wire shape of [`RuleParameterType`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawParameterType {
    Named(String),
    Choice(Vec<String>),
}

impl TryFrom<RawParameterType> for RuleParameterType {
    type Error = String;

    fn try_from(raw: RawParameterType) -> Result<Self, Self::Error> {
        match raw {
            RawParameterType::Named(name) => match name.as_str() {
                "" => Ok(Self::Empty),
                "player" => Ok(Self::Player),
                "number" => Ok(Self::Number),
                other => Err(format!("unknown rule parameter type `{other}`")),
            },
            RawParameterType::Choice(values) => Ok(Self::Choice(values)),
        }
    }
}

impl From<RuleParameterType> for RawParameterType {
    fn from(ty: RuleParameterType) -> Self {
        match ty {
            RuleParameterType::Empty => Self::Named(String::new()),
            RuleParameterType::Player => Self::Named("player".into()),
            RuleParameterType::Number => Self::Named("number".into()),
            RuleParameterType::Choice(values) => Self::Choice(values),
        }
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// A rule instance, either held in a player's hand or enabled in play.
///
/// `name` and `description` are translation codes, resolved by the client.
/// A card in hand carries an empty `parameters` map; an enabled card has
/// it filled in. Callers keep that convention, the type does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,
    pub description: String,
    pub rule_name: String,
    pub parameter_types: BTreeMap<String, RuleParameterType>,
    pub parameters: RuleParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<TemplateValues>,
}

impl Card {
    /// Returns `true` if any declared parameter needs a value before the
    /// card can be enabled.
    pub fn takes_parameters(&self) -> bool {
        self.parameter_types.values().any(RuleParameterType::takes_value)
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A participant as seen by other players in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
}

// ---------------------------------------------------------------------------
// RoomParameters
// ---------------------------------------------------------------------------

/// Room settings requested at creation time or advertised as defaults.
///
/// Every field is optional. Whatever is left out is filled in by the room
/// manager, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomParameters {
    /// Turn length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_hand_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_drawn_per_turn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards_played_per_turn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hand_size: Option<u32>,
    /// Number of copies of each rule in the deck, keyed by rule name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_deck: Option<BTreeMap<String, u32>>,
    /// Cards enabled when the game starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_rules: Option<Vec<Card>>,
}

// ---------------------------------------------------------------------------
// UiVariables
// ---------------------------------------------------------------------------

/// Client UI behaviour mandated by the server for the current room.
///
/// Cards toggle these (e.g. a rule that forbids backspace), so they arrive
/// with every `ROOM_STATE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiVariables {
    pub image_messages: bool,
    pub audio_messages: bool,
    pub emoji_picker: bool,
    pub thread_replies: bool,
    pub disable_backspace: bool,
    pub word_suggestions: bool,
    /// Minimum height of the message input, in text rows.
    pub minimum_input_height: u32,
}

// ---------------------------------------------------------------------------
// AudioContent / Severity
// ---------------------------------------------------------------------------

/// An audio clip attached to a text message. An empty `url` means none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioContent {
    pub url: String,
    /// Clip length in seconds.
    pub length: u32,
}

impl AudioContent {
    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

/// How prominently a client should show a `SYSTEM` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}
