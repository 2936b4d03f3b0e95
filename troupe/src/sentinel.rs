//! Termination sentinel convention.
//!
//! A session ends when an agent's final message, with trailing whitespace
//! stripped, ends with the exact sentinel string. The opening message of every
//! session is decorated with an instruction telling agents to emit the
//! sentinel once gratitude phrases appear, so the exchange does not spiral
//! into mutual thanks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed keyword whose presence as a message suffix signals completion.
///
/// All predicate and decoration logic takes the sentinel explicitly; nothing
/// here captures per-session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sentinel(String);

impl Sentinel {
    /// Plain keyword used by the one-on-one scripts.
    pub const TERMINATE: &'static str = "TERMINATE";
    /// Bracketed keyword used by the group-chat scripts, harder to emit by
    /// accident in prose.
    pub const TERMINATE_BRACKETED: &'static str = "[TERMINATE]";

    /// Create a sentinel from an arbitrary keyword.
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self(keyword.into())
    }

    /// The plain `TERMINATE` sentinel.
    #[must_use]
    pub fn terminate() -> Self {
        Self(Self::TERMINATE.to_string())
    }

    /// The bracketed `[TERMINATE]` sentinel.
    #[must_use]
    pub fn bracketed() -> Self {
        Self(Self::TERMINATE_BRACKETED.to_string())
    }

    /// The sentinel keyword.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Termination predicate: true iff `content` with trailing whitespace
    /// stripped ends with the exact sentinel.
    ///
    /// Content ending with the sentinel followed by punctuation or any other
    /// character does not match.
    #[must_use]
    pub fn matches(&self, content: &str) -> bool {
        content.trim_end().ends_with(&self.0)
    }

    /// Decorate a task with the termination-instruction suffix that every
    /// session opening message carries.
    #[must_use]
    pub fn decorate(&self, task: &str) -> String {
        format!(
            "{task}\n\nDo not show appreciation in your responses, say only what is necessary. \
             if \"Thank you\" or \"You're welcome\" are said in the conversation, then say {} \
             to indicate the conversation is finished and this is your last message.",
            self.0
        )
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::terminate()
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sentinel {
    fn from(keyword: &str) -> Self {
        Self::new(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_suffix() {
        let sentinel = Sentinel::terminate();
        assert!(sentinel.matches("Ha! ... TERMINATE"));
        assert!(sentinel.matches("TERMINATE"));
        assert!(sentinel.matches("done TERMINATE   \n"));
    }

    #[test]
    fn rejects_trailing_punctuation() {
        let sentinel = Sentinel::terminate();
        assert!(!sentinel.matches("... TERMINATE."));
        assert!(!sentinel.matches("TERMINATE!"));
        assert!(!sentinel.matches("TERMINATED"));
        assert!(!sentinel.matches(""));
    }

    #[test]
    fn bracketed_form_is_distinct() {
        let sentinel = Sentinel::bracketed();
        assert!(sentinel.matches("all set [TERMINATE]"));
        assert!(!sentinel.matches("all set TERMINATE"));
    }

    #[test]
    fn decorate_appends_instruction_once() {
        let sentinel = Sentinel::bracketed();
        let decorated = sentinel.decorate("Tell me a joke.");
        assert!(decorated.starts_with("Tell me a joke.\n\n"));
        assert_eq!(decorated.matches("[TERMINATE]").count(), 1);
        assert!(decorated.contains("Do not show appreciation"));
        assert!(decorated.contains("You're welcome"));
    }
}
