// @zen-component: RELAY-ChatModels
//
//! Wire models for the upstream chat API.
//!
//! Responses are deserialized leniently: every field is optional, unknown
//! fields are ignored and a field of an unexpected shape reads as absent
//! instead of failing its whole message, because API revisions disagree on
//! where the assistant text lives. [`ChatResponse::from_value`] flattens the known envelopes into
//! a plain list of [`Message`]s.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One turn of the outbound request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMessage {
    pub role: String,
    pub content: String,
}

/// Outbound chat request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<RequestMessage>,
}

impl ChatRequest {
    /// Builds a request with a single system turn followed by the user prompt.
    pub fn new(model: &str, system_prompt: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                RequestMessage {
                    role: "system".into(),
                    content: system_prompt.to_string(),
                },
                RequestMessage {
                    role: "user".into(),
                    content: prompt.to_string(),
                },
            ],
        }
    }
}

/// A block's `text` field: either the string itself or an object holding it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Annotated { value: String },
    /// Any other shape (citation spans, numbers, ...). Never reply text.
    Other(Value),
}

/// One unit of a message payload. Blocks nest through `content`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentBlock {
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextField>,
    /// Only an array counts as nested blocks; a string `content` (tool
    /// results) reads as absent.
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub content: Option<Vec<ContentBlock>>,
}

impl ContentBlock {
    /// Block with a plain `text` string.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(TextField::Plain(text.into())),
            ..Self::default()
        }
    }

    /// Block that only wraps further blocks.
    pub fn nested(content: Vec<ContentBlock>) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }
}

/// Message payload. Older API revisions send a bare string.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Blocks(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: MessageContent,
}

impl Message {
    pub fn assistant(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Some("assistant".into()),
            content: MessageContent::Blocks(blocks),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_blocks<'de, D>(deserializer: D) -> Result<Option<Vec<ContentBlock>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(blocks_from(Value::deserialize(deserializer)?))
}

fn lenient_content<'de, D>(deserializer: D) -> Result<MessageContent, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => MessageContent::Text(text),
        other => blocks_from(other)
            .map(MessageContent::Blocks)
            .unwrap_or_default(),
    })
}

/// Array elements that are not block objects are skipped.
fn blocks_from(value: Value) -> Option<Vec<ContentBlock>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    }
}

/// The reply payload as a flat, ordered list of messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    pub messages: Vec<Message>,
}

impl ChatResponse {
    /// Normalises any known response envelope into a message list.
    ///
    /// | Shape                              | Source                 |
    /// |------------------------------------|------------------------|
    /// | `{"message": {...}}`               | Cohere v2 chat         |
    /// | `{"messages": [...]}`              | message-list responses |
    /// | `{"output": [...]}`                | responses-style APIs   |
    /// | `{"choices": [{"message": ...}]}`  | chat completions       |
    /// | `[...]`                            | bare message array     |
    ///
    /// Elements that are not messages are skipped; anything else yields an
    /// empty response.
    pub fn from_value(value: Value) -> Self {
        let candidates: Vec<Value> = match value {
            Value::Array(items) => items,
            Value::Object(mut obj) => {
                if let Some(message) = obj.remove("message") {
                    vec![message]
                } else if let Some(Value::Array(items)) = obj.remove("messages") {
                    items
                } else if let Some(Value::Array(items)) = obj.remove("output") {
                    items
                } else if let Some(Value::Array(choices)) = obj.remove("choices") {
                    choices
                        .into_iter()
                        .filter_map(|mut choice| choice.get_mut("message").map(Value::take))
                        .collect()
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        };

        let messages = candidates
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|m| serde_json::from_value(m).ok())
            .collect();

        Self { messages }
    }
}

impl From<Vec<Message>> for ChatResponse {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}
