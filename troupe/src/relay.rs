//! Message relay: forwards emitted messages to a chat display.
//!
//! The relay is an observer that reads the last message of the history and
//! sends one display bubble per message. It never overrides the engine's
//! reply logic. Senders without an avatar mapping are not an error; they
//! render under a fallback avatar so an unexpected roster name degrades to an
//! "unknown" bubble instead of killing the session.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::AgentSpec;
use crate::message::Message;
use crate::observer::{ChatObserver, ReplyDecision};

/// One rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    /// Display name the bubble is attributed to.
    pub user: String,
    /// Avatar glyph for the sender.
    pub avatar: String,
    /// Message text.
    pub content: String,
}

/// Sink for rendered bubbles; the UI toolkit's widget sits behind this.
pub trait ChatDisplay: Send + Sync {
    /// Render one bubble.
    fn send(&self, bubble: ChatBubble);
}

/// Mapping from agent display name to avatar glyph.
#[derive(Debug, Clone)]
pub struct AvatarMap {
    avatars: HashMap<String, String>,
    fallback: String,
}

impl AvatarMap {
    /// Avatar used for senders with no mapping.
    pub const DEFAULT_FALLBACK: &'static str = "❓";

    /// Empty map with the default fallback avatar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            avatars: HashMap::new(),
            fallback: Self::DEFAULT_FALLBACK.to_string(),
        }
    }

    /// Replace the fallback avatar.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Assign an avatar to a display name.
    #[must_use]
    pub fn assign(mut self, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        self.avatars.insert(name.into(), avatar.into());
        self
    }

    /// Avatar for `name`, if mapped.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.avatars.get(name).map(String::as_str)
    }

    /// Avatar for `name`, falling back for unmapped senders.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &str {
        self.get(name).unwrap_or(&self.fallback)
    }
}

impl Default for AvatarMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Into<String>, A: Into<String>> FromIterator<(N, A)> for AvatarMap {
    fn from_iter<I: IntoIterator<Item = (N, A)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, avatar) in iter {
            map = map.assign(name, avatar);
        }
        map
    }
}

/// Observer that forwards every emitted message to a [`ChatDisplay`].
#[derive(Clone)]
pub struct MessageRelay {
    avatars: AvatarMap,
    display: Arc<dyn ChatDisplay>,
}

impl MessageRelay {
    /// Relay into `display`, attributing bubbles via `avatars`.
    #[must_use]
    pub fn new(avatars: AvatarMap, display: Arc<dyn ChatDisplay>) -> Self {
        Self { avatars, display }
    }

    /// The avatar mapping.
    #[must_use]
    pub fn avatars(&self) -> &AvatarMap {
        &self.avatars
    }
}

impl fmt::Debug for MessageRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRelay")
            .field("avatars", &self.avatars)
            .field("display", &"..")
            .finish()
    }
}

#[async_trait]
impl ChatObserver for MessageRelay {
    /// Display the last message of the history: under the sender's own name
    /// when the message carries one, otherwise under the recipient's
    /// identity. Always lets the engine proceed.
    async fn on_message(
        &self,
        recipient: &AgentSpec,
        history: &[Message],
        _sender: &str,
    ) -> ReplyDecision {
        let Some(last) = history.last() else {
            return ReplyDecision::Pass;
        };

        let user = last.sender_name().unwrap_or_else(|| recipient.name());
        self.display.send(ChatBubble {
            user: user.to_string(),
            avatar: self.avatars.resolve(user).to_string(),
            content: last.content.clone(),
        });

        ReplyDecision::Pass
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::profile::{ConversationProfile, ProfileOverrides};
    use crate::registry::{ModelEntry, ModelRegistry};
    use crate::sentinel::Sentinel;
    use std::sync::Mutex;
    use url::Url;

    /// Display that records bubbles for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingDisplay {
        bubbles: Mutex<Vec<ChatBubble>>,
    }

    impl RecordingDisplay {
        pub(crate) fn bubbles(&self) -> Vec<ChatBubble> {
            self.bubbles.lock().unwrap().clone()
        }
    }

    impl ChatDisplay for RecordingDisplay {
        fn send(&self, bubble: ChatBubble) {
            self.bubbles.lock().unwrap().push(bubble);
        }
    }

    fn profile() -> std::sync::Arc<ConversationProfile> {
        let registry: ModelRegistry = [ModelEntry::local(
            "mistral",
            "mistral",
            Url::parse("http://0.0.0.0:59991").unwrap(),
        )]
        .into_iter()
        .collect();
        std::sync::Arc::new(
            registry
                .build_profile("mistral", ProfileOverrides::none())
                .unwrap(),
        )
    }

    fn avatars() -> AvatarMap {
        [("UserProxy", "👨‍💼"), ("Writer", "👩‍💻")]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn named_sender_displays_under_own_avatar() {
        let display = Arc::new(RecordingDisplay::default());
        let relay = MessageRelay::new(avatars(), Arc::clone(&display) as Arc<dyn ChatDisplay>);
        let recipient = AgentSpec::proxy("UserProxy", profile(), Sentinel::terminate());

        let history = vec![
            Message::user("Tell me a story."),
            Message::from_agent("Writer", "Once upon a time."),
        ];
        let decision = relay.on_message(&recipient, &history, "Writer").await;

        assert!(decision.is_pass());
        let bubbles = display.bubbles();
        assert_eq!(bubbles.len(), 1);
        assert_eq!(bubbles[0].user, "Writer");
        assert_eq!(bubbles[0].avatar, "👩‍💻");
        assert_eq!(bubbles[0].content, "Once upon a time.");
    }

    #[tokio::test]
    async fn anonymous_message_falls_back_to_recipient() {
        let display = Arc::new(RecordingDisplay::default());
        let relay = MessageRelay::new(avatars(), Arc::clone(&display) as Arc<dyn ChatDisplay>);
        let recipient = AgentSpec::proxy("UserProxy", profile(), Sentinel::terminate());

        let history = vec![Message::assistant("Here you go.")];
        relay.on_message(&recipient, &history, "Writer").await;

        let bubbles = display.bubbles();
        assert_eq!(bubbles[0].user, "UserProxy");
        assert_eq!(bubbles[0].avatar, "👨‍💼");
    }

    #[tokio::test]
    async fn unmapped_sender_renders_with_fallback_avatar() {
        let display = Arc::new(RecordingDisplay::default());
        let relay = MessageRelay::new(avatars(), Arc::clone(&display) as Arc<dyn ChatDisplay>);
        let recipient = AgentSpec::proxy("UserProxy", profile(), Sentinel::terminate());

        let history = vec![Message::from_agent("Stranger", "hello")];
        relay.on_message(&recipient, &history, "Stranger").await;

        let bubbles = display.bubbles();
        assert_eq!(bubbles[0].user, "Stranger");
        assert_eq!(bubbles[0].avatar, AvatarMap::DEFAULT_FALLBACK);
    }

    #[tokio::test]
    async fn empty_history_displays_nothing() {
        let display = Arc::new(RecordingDisplay::default());
        let relay = MessageRelay::new(avatars(), Arc::clone(&display) as Arc<dyn ChatDisplay>);
        let recipient = AgentSpec::proxy("UserProxy", profile(), Sentinel::terminate());

        let decision = relay.on_message(&recipient, &[], "Writer").await;
        assert!(decision.is_pass());
        assert!(display.bubbles().is_empty());
    }
}
