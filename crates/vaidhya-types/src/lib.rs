//! Core types and structures for vaidhya
//!
//! This crate provides the transcript model shared by the chat client, the
//! browser widget and the terminal front-end, plus the JSON envelopes spoken
//! with the conversational backend.

use serde::{Deserialize, Deserializer, Serialize};

pub mod protocol;

pub use protocol::*;

// ============================================================================
// Constants
// ============================================================================

/// Backend base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable selecting the backend base URL
pub const API_URL_ENV: &str = "VAIDHYA_API_URL";

/// Storage key holding the persisted session identifier
pub const SESSION_STORAGE_KEY: &str = "medical_bot_session_id";

/// Prefix of every generated session identifier
pub const SESSION_ID_PREFIX: &str = "session_";

pub const CHAT_PATH: &str = "/api/chat";
pub const RESET_PATH: &str = "/api/reset";
pub const HEALTH_PATH: &str = "/health";

// ============================================================================
// Message Types
// ============================================================================

/// Who produced a transcript entry
///
/// `System` is reserved for notices generated by the client itself; the
/// backend never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    System,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
            Sender::System => "system",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a bot turn, carried through from the backend's `type` field
///
/// The backend emits more kinds than the four the client styles explicitly
/// (`emergency`, `booking_confirmed`, `date_selection`, ...). Those are kept
/// verbatim in `Other` so they survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    #[default]
    Message,
    Question,
    Summary,
    Error,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Message => "message",
            MessageKind::Question => "question",
            MessageKind::Summary => "summary",
            MessageKind::Error => "error",
            MessageKind::Other(kind) => kind,
        }
    }

    /// Whether the backend flagged this turn as a medical emergency
    pub fn is_emergency(&self) -> bool {
        matches!(self, MessageKind::Other(kind) if kind == "emergency")
    }
}

impl From<&str> for MessageKind {
    fn from(s: &str) -> Self {
        match s {
            "message" => MessageKind::Message,
            "question" => MessageKind::Question,
            "summary" => MessageKind::Summary,
            "error" => MessageKind::Error,
            other => MessageKind::Other(other.to_string()),
        }
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        MessageKind::from(s.as_str())
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quick-reply button: `text` is the label, `value` is what gets sent back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub text: String,
    pub value: String,
}

impl QuickReply {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

/// Helper function to deserialize a list that may be missing or null
pub fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One bot turn as described by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(deserialize_with = "deserialize_vec_or_null", default)]
    pub buttons: Vec<QuickReply>,
}

impl StructuredReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: None,
            buttons: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<QuickReply>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Immutable transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Distinct within one view; assigned in creation order
    pub id: u64,
    pub sender: Sender,
    /// Display text; `\n` is a line break, not markup
    pub text: String,
    pub kind: MessageKind,
    #[serde(default)]
    pub buttons: Vec<QuickReply>,
    /// Formatted once when the entry is created
    pub timestamp: String,
}

impl Message {
    pub fn has_buttons(&self) -> bool {
        !self.buttons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_message_kind_conversion() {
        assert_eq!(MessageKind::from("question"), MessageKind::Question);
        assert_eq!(MessageKind::from("summary"), MessageKind::Summary);
        assert_eq!(
            MessageKind::from("booking_confirmed"),
            MessageKind::Other("booking_confirmed".to_string())
        );
        assert_eq!(MessageKind::from("date_selection").as_str(), "date_selection");
    }

    #[test]
    fn test_emergency_kind() {
        assert!(MessageKind::from("emergency").is_emergency());
        assert!(!MessageKind::Error.is_emergency());
    }

    #[test]
    fn test_reply_defaults() {
        let reply: StructuredReply = serde_json::from_value(json!({ "text": "Hi!" })).unwrap();
        assert_eq!(reply.kind, None);
        assert!(reply.buttons.is_empty());

        let reply: StructuredReply =
            serde_json::from_value(json!({ "text": "Hi!", "type": "message", "buttons": null }))
                .unwrap();
        assert_eq!(reply.kind, Some(MessageKind::Message));
        assert!(reply.buttons.is_empty());
    }

    #[test]
    fn test_reply_with_buttons_and_unknown_kind() {
        let reply: StructuredReply = serde_json::from_value(json!({
            "text": "Pick a date",
            "type": "date_selection",
            "buttons": [
                { "text": "Mon 12", "value": "1" },
                { "text": "Tue 13", "value": "2" }
            ]
        }))
        .unwrap();

        assert_eq!(reply.kind, Some(MessageKind::Other("date_selection".to_string())));
        assert_eq!(reply.buttons[1], QuickReply::new("Tue 13", "2"));

        let back = serde_json::to_value(&reply).unwrap();
        assert_eq!(back["type"], "date_selection");
    }

    #[test]
    fn test_reply_requires_text() {
        let result = serde_json::from_value::<StructuredReply>(json!({ "type": "message" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_sender_serialization() {
        assert_eq!(serde_json::to_value(Sender::Bot).unwrap(), json!("bot"));
        assert_eq!(Sender::System.to_string(), "system");
    }
}
