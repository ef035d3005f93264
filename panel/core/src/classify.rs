//! Content Classification
//!
//! Turns one [`Message`] into something a surface can show: a titled card for
//! text, tool calls and tool results, or a bare diagnostic string when the
//! content cannot be read.
//!
//! Parts are inspected in priority order:
//!
//! 1. any function-call part
//! 2. any function-response part
//! 3. a single text part
//! 4. all text parts, joined by a blank line
//! 5. a pretty-printed dump of the parts
//!
//! Classification is pure and never fails; unreadable payloads degrade to
//! text.

use serde::Serialize;
use serde_json::Value;

use crate::messages::{ContentPart, FunctionCall, FunctionResponse, Message};

/// Shown when a message has no parts
pub const EMPTY_CONTENT: &str = "Empty content";

/// Shown when even the diagnostic dump fails
pub const UNINTERPRETABLE_CONTENT: &str = "Unable to interpret message content";

/// Title for plain text messages
pub const MESSAGE_TITLE: &str = "Message";

/// Glyph leading every function-call title
pub const CALL_GLYPH: &str = "📞";

/// Glyph for successful function responses
pub const SUCCESS_GLYPH: &str = "✅";

/// Glyph for failed function responses
pub const ERROR_GLYPH: &str = "❌";

/// What a classified message represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Plain text from the user or the agent
    Text,
    /// The agent invoking a tool
    FunctionCall,
    /// A tool's result
    FunctionResponse,
}

impl ContentKind {
    /// Tool cards start collapsed and can be expanded
    #[must_use]
    pub fn is_collapsible(self) -> bool {
        matches!(self, Self::FunctionCall | Self::FunctionResponse)
    }
}

/// A displayable title/body pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassifiedContent {
    /// Message author
    pub author: String,
    /// Card title
    pub title: String,
    /// Card body
    pub content: String,
    /// What the card represents
    pub kind: ContentKind,
}

/// Result of classifying a message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageText {
    /// A titled card
    Classified(ClassifiedContent),
    /// A diagnostic string (empty or unreadable content)
    Raw(String),
}

impl MessageText {
    /// The text a surface should render as the message body
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Classified(card) => &card.content,
            Self::Raw(text) => text,
        }
    }

    /// Card title, if this is a card
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Classified(card) => Some(&card.title),
            Self::Raw(_) => None,
        }
    }

    /// Card kind, if this is a card
    #[must_use]
    pub fn kind(&self) -> Option<ContentKind> {
        match self {
            Self::Classified(card) => Some(card.kind),
            Self::Raw(_) => None,
        }
    }
}

/// Classify a message for display
#[must_use]
pub fn classify(message: &Message) -> MessageText {
    let Some(parts) = message.parts().filter(|parts| !parts.is_empty()) else {
        return MessageText::Raw(EMPTY_CONTENT.to_string());
    };
    let author = &message.author;

    let call = parts.iter().find_map(|part| match part {
        ContentPart::FunctionCall(call) => Some(call),
        _ => None,
    });
    if let Some(call) = call {
        return MessageText::Classified(describe_call(author, call));
    }

    let response = parts.iter().find_map(|part| match part {
        ContentPart::FunctionResponse(response) => Some(response),
        _ => None,
    });
    if let Some(response) = response {
        return MessageText::Classified(describe_response(author, response));
    }

    if let [single] = parts {
        if let Some(text) = single.text() {
            return MessageText::Classified(text_card(author, text.to_string()));
        }
    }

    let texts: Vec<&str> = parts.iter().filter_map(ContentPart::text).collect();
    if !texts.is_empty() {
        return MessageText::Classified(text_card(author, texts.join("\n\n")));
    }

    MessageText::Raw(dump_parts(&message.content.wire_parts()))
}

fn text_card(author: &str, content: String) -> ClassifiedContent {
    ClassifiedContent {
        author: author.to_string(),
        title: MESSAGE_TITLE.to_string(),
        content,
        kind: ContentKind::Text,
    }
}

fn describe_call(author: &str, call: &FunctionCall) -> ClassifiedContent {
    let name = call.name.as_deref().unwrap_or("unknown");
    let id = call.id.as_deref().unwrap_or("no-id");
    let args = if call.args.is_empty() {
        "{}".to_string()
    } else {
        format!("\n{}", pretty(&Value::Object(call.args.clone())))
    };

    ClassifiedContent {
        author: author.to_string(),
        title: format!("{CALL_GLYPH} Function call: {name}"),
        content: format!("ID: {id}\nArgs: {args}"),
        kind: ContentKind::FunctionCall,
    }
}

fn describe_response(author: &str, response: &FunctionResponse) -> ClassifiedContent {
    let name = response.name.as_deref().unwrap_or("unknown");
    let id = response.id.as_deref().unwrap_or("no-id");
    let glyph = if response.is_error() {
        ERROR_GLYPH
    } else {
        SUCCESS_GLYPH
    };

    ClassifiedContent {
        author: author.to_string(),
        title: format!("{glyph} Function response: {name}"),
        content: format!("ID: {id}\n{}", response_result(response)),
        kind: ContentKind::FunctionResponse,
    }
}

fn response_result(response: &FunctionResponse) -> String {
    let body = &response.response;

    if response.is_error() {
        let message = body
            .get("error_message")
            .and_then(display_text)
            .unwrap_or_else(|| "Unknown error".to_string());
        return format!("Error: {message}");
    }

    if let Some(report) = body.get("report").and_then(display_text) {
        return format!("Result: {report}");
    }

    let first_text = body
        .get("result")
        .and_then(|result| result.get("content"))
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|first| first.get("text"))
        .and_then(display_text);
    if let Some(text) = first_text {
        return match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => format!("Result: \n{}", pretty(&parsed)),
            Err(_) => format!("Result: {text}"),
        };
    }

    format!("Result:\n{}", pretty(body))
}

fn dump_parts(parts: &[Value]) -> String {
    match serde_json::to_string_pretty(parts) {
        Ok(dump) => dump.replace("\\n", "\n"),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to dump message parts");
            UNINTERPRETABLE_CONTENT.to_string()
        }
    }
}

/// Two-space indented JSON.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Text for a value that counts as present: non-empty strings, non-zero
/// numbers, `true`, and any array or object.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessageContent, MessageId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn message(parts: Value) -> Message {
        serde_json::from_value(json!({
            "id": "evt-1",
            "author": "agent",
            "timestamp": 1.0,
            "content": { "role": "model", "parts": parts }
        }))
        .unwrap()
    }

    fn card(text: MessageText) -> ClassifiedContent {
        match text {
            MessageText::Classified(card) => card,
            MessageText::Raw(raw) => panic!("expected a card, got {raw:?}"),
        }
    }

    #[test]
    fn test_single_text() {
        let result = classify(&message(json!([{"text": "hello"}])));
        assert_eq!(
            result,
            MessageText::Classified(ClassifiedContent {
                author: "agent".into(),
                title: "Message".into(),
                content: "hello".into(),
                kind: ContentKind::Text,
            })
        );
    }

    #[test]
    fn test_missing_parts_is_empty_content() {
        let msg = Message {
            id: MessageId::from("x"),
            content: MessageContent::default(),
            author: "agent".into(),
            timestamp: 0.0,
        };
        assert_eq!(classify(&msg), MessageText::Raw("Empty content".into()));
        assert_eq!(
            classify(&message(json!([]))),
            MessageText::Raw("Empty content".into())
        );
    }

    #[test]
    fn test_function_call() {
        let result = card(classify(&message(json!([
            {"function_call": {"name": "search", "id": "1", "args": {"q": "x"}}}
        ]))));

        assert!(result.title.starts_with(CALL_GLYPH));
        assert!(result.title.contains("search"));
        assert!(result.content.contains("ID: 1"));
        assert_eq!(result.content, "ID: 1\nArgs: \n{\n  \"q\": \"x\"\n}");
        assert_eq!(result.kind, ContentKind::FunctionCall);
    }

    #[test]
    fn test_function_call_defaults() {
        let result = card(classify(&message(json!([{"functionCall": {}}]))));
        assert_eq!(result.title, "📞 Function call: unknown");
        assert_eq!(result.content, "ID: no-id\nArgs: {}");
    }

    #[test]
    fn test_function_call_wins_over_text() {
        let result = card(classify(&message(json!([
            {"text": "let me look that up"},
            {"functionCall": {"name": "lookup", "id": "c9", "args": {}}}
        ]))));
        assert_eq!(result.kind, ContentKind::FunctionCall);
    }

    #[test]
    fn test_args_round_trip_through_pretty_print() {
        let args = json!({"q": "x", "limit": 10, "filters": {"lang": ["en", "pt"]}});
        let result = card(classify(&message(json!([
            {"function_call": {"name": "search", "id": "1", "args": args.clone()}}
        ]))));
        let printed = result.content.split_once("Args: \n").unwrap().1;
        let reparsed: Value = serde_json::from_str(printed).unwrap();
        assert_eq!(reparsed, args);
    }

    #[test]
    fn test_error_response_uses_error_glyph() {
        let result = card(classify(&message(json!([
            {"function_response": {
                "name": "fetch",
                "id": "7",
                "response": {"status": "error", "error_message": "timeout", "report": "ignored"}
            }}
        ]))));
        assert_eq!(result.title, "❌ Function response: fetch");
        assert_eq!(result.content, "ID: 7\nError: timeout");
    }

    #[test]
    fn test_error_response_without_message() {
        let result = card(classify(&message(json!([
            {"function_response": {"name": "fetch", "response": {"status": "error"}}}
        ]))));
        assert_eq!(result.content, "ID: no-id\nError: Unknown error");
    }

    #[test]
    fn test_response_report() {
        let result = card(classify(&message(json!([
            {"functionResponse": {"name": "weather", "id": "2", "response": {"status": "success", "report": "Sunny"}}}
        ]))));
        assert_eq!(result.title, "✅ Function response: weather");
        assert_eq!(result.content, "ID: 2\nResult: Sunny");
    }

    #[test]
    fn test_response_nested_json_text() {
        let result = card(classify(&message(json!([
            {"function_response": {"name": "mcp", "id": "3", "response": {
                "result": {"content": [{"type": "text", "text": "{\"a\":1}"}]}
            }}}
        ]))));
        assert_eq!(result.content, "ID: 3\nResult: \n{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_response_nested_plain_text() {
        let result = card(classify(&message(json!([
            {"function_response": {"name": "mcp", "id": "3", "response": {
                "result": {"content": [{"text": "not json"}]}
            }}}
        ]))));
        assert_eq!(result.content, "ID: 3\nResult: not json");
    }

    #[test]
    fn test_response_falls_back_to_whole_object() {
        let result = card(classify(&message(json!([
            {"function_response": {"name": "mcp", "id": "4", "response": {
                "result": {"content": []}
            }}}
        ]))));
        assert_eq!(
            result.content,
            "ID: 4\nResult:\n{\n  \"result\": {\n    \"content\": []\n  }\n}"
        );

        let result = card(classify(&message(json!([
            {"function_response": {"name": "noop", "id": "5"}}
        ]))));
        assert_eq!(result.content, "ID: 5\nResult:\n{}");
    }

    #[test]
    fn test_multiple_text_parts_joined() {
        let result = card(classify(&message(json!([
            {"text": "first"},
            {"text": ""},
            {"inline_data": {"data": "AAA=", "mime_type": "image/png"}},
            {"text": "second"}
        ]))));
        assert_eq!(result.title, "Message");
        assert_eq!(result.content, "first\n\nsecond");
    }

    #[test]
    fn test_attachment_only_dumps_parts() {
        let result = classify(&message(json!([
            {"inline_data": {"data": "AAA=", "mime_type": "image/png", "metadata": {"filename": "a.png"}}}
        ])));
        let MessageText::Raw(dump) = result else {
            panic!("expected diagnostic dump");
        };
        let reparsed: Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(reparsed[0]["inline_data"]["metadata"]["filename"], "a.png");
    }

    #[test]
    fn test_dump_keeps_wire_keys() {
        let parts = json!([
            {"inlineData": {"mimeType": "image/png", "displayName": "scan.png"}}
        ]);
        let MessageText::Raw(dump) = classify(&message(parts.clone())) else {
            panic!("expected diagnostic dump");
        };
        let reparsed: Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(reparsed, parts);
    }

    #[test]
    fn test_dump_unescapes_newlines() {
        let result = classify(&message(json!([{"note": "line1\nline2"}])));
        assert!(result.body().contains("line1\nline2"));
        assert_eq!(result.title(), None);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let msg = message(json!([
            {"function_response": {"name": "x", "response": {"result": {"content": [{"text": "[1,2]"}]}}}}
        ]));
        assert_eq!(classify(&msg), classify(&msg));
    }

    #[test]
    fn test_collapsible_kinds() {
        assert!(ContentKind::FunctionCall.is_collapsible());
        assert!(ContentKind::FunctionResponse.is_collapsible());
        assert!(!ContentKind::Text.is_collapsible());
    }
}
