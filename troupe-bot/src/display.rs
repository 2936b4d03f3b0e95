//! Terminal chat display.
//!
//! Renders one line per bubble. This is the `ChatDisplay` seam's only
//! in-tree implementation; a widget-based UI would swap in here without
//! touching the relay.

use troupe::prelude::*;

/// Display that prints bubbles to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDisplay;

impl ChatDisplay for TerminalDisplay {
    fn send(&self, bubble: ChatBubble) {
        println!("{} {}: {}", bubble.avatar, bubble.user, bubble.content);
    }
}

/// Bubble for the session-level cost summary.
#[must_use]
pub fn accountant_bubble(avatar: &str, result: &SessionResult) -> ChatBubble {
    ChatBubble {
        user: "Accountant".to_string(),
        avatar: avatar.to_string(),
        content: summarize_cost(result.cost()),
    }
}

/// Bubble for system notices such as the greeting.
#[must_use]
pub fn system_bubble(content: impl Into<String>) -> ChatBubble {
    ChatBubble {
        user: "System".to_string(),
        avatar: "💬".to_string(),
        content: content.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accountant_bubble_formats_total() {
        let result = SessionResult::new(
            vec![Message::user("hi")],
            vec![
                CostEntry::new("mistral", 1.5),
                CostEntry::new("codellama", 2.25),
            ],
            TerminationReason::Sentinel,
        );

        let bubble = accountant_bubble("🤑", &result);
        assert_eq!(bubble.user, "Accountant");
        assert_eq!(bubble.content, "$3.75");
    }
}
