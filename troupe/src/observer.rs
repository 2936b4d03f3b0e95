//! Observer seam between the orchestration engine and the caller.
//!
//! Engines invoke the observer once per emitted message, before applying
//! their own reply logic. The roster is fixed per session, so a single
//! explicit interface replaces dynamic per-agent callback registration: one
//! method, called for every agent.

use async_trait::async_trait;
use std::sync::Arc;

use crate::agent::AgentSpec;
use crate::message::Message;

/// A shared, thread-safe [`ChatObserver`] trait object.
pub type SharedObserver = Arc<dyn ChatObserver>;

/// What the engine should do after the observer has seen a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyDecision {
    /// Proceed with the engine's own default reply logic. Observers that only
    /// watch and forward — the message relay among them — always return this.
    Pass,
    /// Substitute this message for the one that was about to be emitted.
    Override(Message),
}

impl ReplyDecision {
    /// Whether the engine should proceed unmodified.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Per-message observer invoked by the engine for every agent in a run.
///
/// Object-safe; engines hold `&dyn ChatObserver` or [`SharedObserver`].
#[async_trait]
pub trait ChatObserver: Send + Sync {
    /// Called once per emitted message.
    ///
    /// `history` is the transcript so far, with the message under
    /// consideration last; `recipient` is the agent the message is addressed
    /// to and `sender` the name of the agent that produced it.
    async fn on_message(
        &self,
        recipient: &AgentSpec,
        history: &[Message],
        sender: &str,
    ) -> ReplyDecision;
}

/// Observer that watches nothing and always lets the engine proceed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl ChatObserver for NoopObserver {
    async fn on_message(
        &self,
        _recipient: &AgentSpec,
        _history: &[Message],
        _sender: &str,
    ) -> ReplyDecision {
        ReplyDecision::Pass
    }
}
