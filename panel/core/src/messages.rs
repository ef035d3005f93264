//! Chat Messages
//!
//! The message shapes exchanged with the agent transport. Inbound events arrive
//! as loosely-typed JSON; this module folds every content part into a closed
//! [`ContentPart`] union so the rest of the crate can match exhaustively.
//!
//! # Wire Shape
//!
//! ```text
//! { "id": "...", "author": "...", "timestamp": 1715600000.5,
//!   "content": { "role": "model", "parts": [ { "text": "..." }, ... ] } }
//! ```
//!
//! Parts are accepted with either camelCase (`functionCall`) or snake_case
//! (`function_call`) keys. Serialization always writes snake_case.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Prefix marking locally synthesized (not yet confirmed) message ids
pub const PROVISIONAL_ID_PREFIX: &str = "temp-";

/// Author and role used for locally originated messages
pub const USER_AUTHOR: &str = "user";

/// Message identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Id for an optimistic echo created at `unix_millis`
    #[must_use]
    pub fn provisional(unix_millis: u64) -> Self {
        Self(format!("{PROVISIONAL_ID_PREFIX}{unix_millis}"))
    }

    /// Whether this id was minted locally rather than by the transport
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_ID_PREFIX)
    }

    /// Borrow the raw id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content type hints for message rendering
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Plain text content
    #[default]
    Plain,
    /// Markdown-formatted content
    Markdown,
}

/// A single conversation message as delivered by the transport
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Transport-assigned id, or a provisional `temp-` id for optimistic echoes
    pub id: MessageId,
    /// Message body
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: MessageContent,
    /// Who produced the message (`"user"` or an agent name)
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    /// Unix timestamp in seconds (fractional)
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: f64,
}

impl Message {
    /// Build the optimistic echo for an outbound user submission
    ///
    /// The text part carries the text as typed; it is only included when
    /// the trimmed text is non-empty.
    #[must_use]
    pub fn optimistic(text: &str, attachments: &[FileAttachment], unix_millis: u64) -> Self {
        let mut parts = Vec::with_capacity(attachments.len() + 1);
        if !text.trim().is_empty() {
            parts.push(ContentPart::Text(text.to_string()));
        }
        parts.extend(attachments.iter().map(ContentPart::from));

        #[allow(clippy::cast_precision_loss)]
        let timestamp = unix_millis as f64 / 1000.0;

        Self {
            id: MessageId::provisional(unix_millis),
            content: MessageContent::new(parts, USER_AUTHOR),
            author: USER_AUTHOR.to_string(),
            timestamp,
        }
    }

    /// Content parts, if the payload carried a usable parts array
    #[must_use]
    pub fn parts(&self) -> Option<&[ContentPart]> {
        self.content.parts.as_deref()
    }
}

/// The `content` envelope of a message
///
/// Parts as they arrived on the wire are kept next to their typed form, so a
/// diagnostic dump shows exactly what the transport sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireContent", into = "WireContent")]
pub struct MessageContent {
    /// Content parts; `None` when the payload had no parts array at all
    pub parts: Option<Vec<ContentPart>>,
    /// Role reported by the transport (`"user"`, `"model"`, ...)
    pub role: String,
    raw_parts: Option<Vec<Value>>,
}

impl MessageContent {
    /// Content built locally from typed parts
    #[must_use]
    pub fn new(parts: Vec<ContentPart>, role: impl Into<String>) -> Self {
        Self {
            parts: Some(parts),
            role: role.into(),
            raw_parts: None,
        }
    }

    /// Parts in wire form: verbatim when received, re-encoded when built locally
    #[must_use]
    pub fn wire_parts(&self) -> Vec<Value> {
        match (&self.raw_parts, &self.parts) {
            (Some(raw), _) => raw.clone(),
            (None, Some(parts)) => parts.iter().map(ContentPart::to_value).collect(),
            (None, None) => Vec::new(),
        }
    }
}

/// Serde shape of [`MessageContent`]
#[derive(Serialize, Deserialize)]
struct WireContent {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Value::is_null"
    )]
    parts: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    role: String,
}

/// Anything other than an array leaves the parts unset instead of failing.
impl From<WireContent> for MessageContent {
    fn from(wire: WireContent) -> Self {
        let raw_parts = match wire.parts {
            Value::Array(items) => Some(items),
            _ => None,
        };
        let parts = raw_parts
            .as_ref()
            .map(|items| items.iter().cloned().map(ContentPart::from_value).collect());
        Self {
            parts,
            role: wire.role,
            raw_parts,
        }
    }
}

impl From<MessageContent> for WireContent {
    fn from(content: MessageContent) -> Self {
        let parts = if content.raw_parts.is_some() || content.parts.is_some() {
            Value::Array(content.wire_parts())
        } else {
            Value::Null
        };
        Self {
            parts,
            role: content.role,
        }
    }
}

/// Explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One unit of message content
#[derive(Clone, Debug, PartialEq)]
pub enum ContentPart {
    /// Plain text
    Text(String),
    /// Inline binary attachment
    InlineData(InlineData),
    /// Tool/function invocation requested by the agent
    FunctionCall(FunctionCall),
    /// Result of a tool/function invocation
    FunctionResponse(FunctionResponse),
    /// A part whose shape matches none of the known variants, kept verbatim
    Unrecognized(Value),
}

impl ContentPart {
    /// Classify a raw JSON part
    ///
    /// Function calls win over responses, which win over attachments, which
    /// win over text, so a part carrying several keys is read the same way
    /// every time.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = &value else {
            return Self::Unrecognized(value);
        };

        if let Some(call) = field(map, "functionCall", "function_call") {
            return Self::FunctionCall(FunctionCall::from_value(call));
        }
        if let Some(response) = field(map, "functionResponse", "function_response") {
            return Self::FunctionResponse(FunctionResponse::from_value(response));
        }
        if let Some(data) = field(map, "inlineData", "inline_data") {
            if let Some(inline) = InlineData::from_value(data) {
                return Self::InlineData(inline);
            }
        }
        if let Some(Value::String(text)) = map.get("text") {
            return Self::Text(text.clone());
        }

        Self::Unrecognized(value)
    }

    /// Wire representation of this part
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => json!({ "text": text }),
            Self::InlineData(data) => json!({ "inline_data": data.to_value() }),
            Self::FunctionCall(call) => json!({ "function_call": call.to_value() }),
            Self::FunctionResponse(response) => {
                json!({ "function_response": response.to_value() })
            }
            Self::Unrecognized(value) => value.clone(),
        }
    }

    /// Non-empty text carried by this part
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl Serialize for ContentPart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl From<&FileAttachment> for ContentPart {
    fn from(file: &FileAttachment) -> Self {
        Self::InlineData(InlineData {
            data: file.data.clone(),
            mime_type: file.content_type.clone(),
            filename: Some(file.filename.clone()),
        })
    }
}

/// Inline attachment part
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineData {
    /// Base64 payload
    pub data: String,
    /// MIME type of the payload
    pub mime_type: String,
    /// Original filename, from the part's metadata
    pub filename: Option<String>,
}

impl InlineData {
    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            data: string_field(map, "data").unwrap_or_default(),
            mime_type: field(map, "mimeType", "mime_type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            filename: map
                .get("metadata")
                .and_then(|m| m.get("filename"))
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("data".into(), Value::String(self.data.clone()));
        map.insert("mime_type".into(), Value::String(self.mime_type.clone()));
        if let Some(filename) = &self.filename {
            map.insert("metadata".into(), json!({ "filename": filename }));
        }
        Value::Object(map)
    }
}

/// Function/tool invocation part
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionCall {
    /// Call identifier
    pub id: Option<String>,
    /// Function name
    pub name: Option<String>,
    /// Call arguments
    pub args: Map<String, Value>,
}

impl FunctionCall {
    fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            id: map.get("id").and_then(scalar_text),
            name: map.get("name").and_then(scalar_text),
            args: map
                .get("args")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".into(), Value::String(id.clone()));
        }
        if let Some(name) = &self.name {
            map.insert("name".into(), Value::String(name.clone()));
        }
        map.insert("args".into(), Value::Object(self.args.clone()));
        Value::Object(map)
    }
}

/// Function/tool response part
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionResponse {
    /// Call identifier this responds to
    pub id: Option<String>,
    /// Function name
    pub name: Option<String>,
    /// Free-form response payload (an empty object when absent)
    pub response: Value,
}

impl Default for FunctionResponse {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            response: Value::Object(Map::new()),
        }
    }
}

impl FunctionResponse {
    fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let response = match map.get("response") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(response) => response.clone(),
        };
        Self {
            id: map.get("id").and_then(scalar_text),
            name: map.get("name").and_then(scalar_text),
            response,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".into(), Value::String(id.clone()));
        }
        if let Some(name) = &self.name {
            map.insert("name".into(), Value::String(name.clone()));
        }
        map.insert("response".into(), self.response.clone());
        Value::Object(map)
    }

    /// The `status` field of the response, if it is a string
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.response.get("status").and_then(Value::as_str)
    }

    /// Whether the response reports a failed call
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status() == Some("error")
    }
}

/// Outbound file attachment handed to the transport
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Base64 payload
    pub data: String,
    /// MIME type
    pub content_type: String,
    /// Original filename
    pub filename: String,
}

fn field<'a>(map: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    map.get(camel)
        .filter(|v| !v.is_null())
        .or_else(|| map.get(snake).filter(|v| !v.is_null()))
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Text form of a scalar, treating empty strings, zero and `false` as absent.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
