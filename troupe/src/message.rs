//! Message types for the session transcript.
//!
//! Messages follow the chat completion convention of role plus content. Group
//! chat engines additionally attach the sending agent's `name` so observers
//! can attribute a message to a specific roster member; one-on-one exchanges
//! may omit it, in which case display falls back to the recipient.

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message providing instructions.
    System,
    /// Message from the human/operator side.
    User,
    /// Message produced by an agent.
    Assistant,
}

impl MessageRole {
    /// Get the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Conversation role.
    pub role: MessageRole,
    /// Name of the sending agent, when the engine attaches one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Message text. Vision scenarios embed image references inline
    /// (`<img https://...>`); parsing them is the engine's concern.
    pub content: String,
}

impl Message {
    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            name: None,
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            name: None,
            content: content.into(),
        }
    }

    /// Create an assistant message without sender attribution.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            name: None,
            content: content.into(),
        }
    }

    /// Create an assistant message attributed to a named agent.
    #[must_use]
    pub fn from_agent(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            name: Some(name.into()),
            content: content.into(),
        }
    }

    /// Sender name, if the engine attached one.
    #[must_use]
    pub fn sender_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_agent_carries_name() {
        let msg = Message::from_agent("Writer", "Once upon a time.");
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.sender_name(), Some("Writer"));
    }

    #[test]
    fn user_message_has_no_name() {
        let msg = Message::user("Tell me a joke.");
        assert_eq!(msg.sender_name(), None);
        assert_eq!(msg.role.as_str(), "user");
    }

    #[test]
    fn serializes_without_null_name() {
        let msg = Message::assistant("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("name"));
    }
}
