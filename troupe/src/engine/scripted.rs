//! Scripted engine for tests and demos.
//!
//! Replays a predefined sequence of turns instead of calling any model,
//! exercising the full observer/termination/cost plumbing without network
//! access. Grounded in the same role a mock model plays for provider code.

use async_trait::async_trait;

use super::{ChatEngine, EngineResult};
use crate::agent::AgentSet;
use crate::cost::CostEntry;
use crate::error::EngineError;
use crate::message::Message;
use crate::observer::{ChatObserver, ReplyDecision};
use crate::session::{SessionResult, TerminationReason};

/// One canned turn of a scripted session.
#[derive(Debug, Clone)]
pub struct ScriptedTurn {
    sender: Option<String>,
    recipient: Option<String>,
    content: String,
    cost: Option<CostEntry>,
}

impl ScriptedTurn {
    /// A turn attributed to a named agent.
    #[must_use]
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: Some(sender.into()),
            recipient: None,
            content: content.into(),
            cost: None,
        }
    }

    /// A turn without sender attribution, as one-on-one exchanges emit.
    #[must_use]
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self {
            sender: None,
            recipient: None,
            content: content.into(),
            cost: None,
        }
    }

    /// Address the turn to a specific agent instead of the proxy.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Attach the cost billed for producing this turn.
    #[must_use]
    pub fn with_cost(mut self, cost: CostEntry) -> Self {
        self.cost = Some(cost);
        self
    }
}

/// Engine that replays a fixed script.
///
/// Per replayed turn it invokes the observer (honoring overrides), records
/// any cost entry, and checks the roster's termination predicate. It stops at
/// the sentinel, the end of the script, or the round cap, whichever comes
/// first. Constructed with [`ScriptedEngine::failing`], it instead returns
/// the given error unchanged, for exercising failure propagation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    turns: Vec<ScriptedTurn>,
    failure: Option<EngineError>,
}

impl ScriptedEngine {
    /// Engine replaying `turns` in order.
    #[must_use]
    pub fn new(turns: Vec<ScriptedTurn>) -> Self {
        Self {
            turns,
            failure: None,
        }
    }

    /// Engine that fails every run with `error`.
    #[must_use]
    pub fn failing(error: EngineError) -> Self {
        Self {
            turns: Vec::new(),
            failure: Some(error),
        }
    }
}

impl FromIterator<ScriptedTurn> for ScriptedEngine {
    fn from_iter<I: IntoIterator<Item = ScriptedTurn>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl ChatEngine for ScriptedEngine {
    async fn run(
        &self,
        agents: &AgentSet,
        opening: Message,
        max_rounds: usize,
        observer: &dyn ChatObserver,
    ) -> EngineResult<SessionResult> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        let detector = agents.proxy();
        let mut transcript = vec![opening];
        let mut cost = Vec::new();
        let mut termination = TerminationReason::RoundLimit;

        // The opening message occupies the first round.
        let remaining = max_rounds.saturating_sub(1);
        for turn in self.turns.iter().take(remaining) {
            let recipient_name = turn.recipient.as_deref().unwrap_or_else(|| detector.name());
            let Some(recipient) = agents.get(recipient_name) else {
                return Err(EngineError::provider(format!(
                    "scripted turn addressed to unknown agent: {recipient_name}"
                )));
            };

            let message = match &turn.sender {
                Some(name) => Message::from_agent(name.clone(), turn.content.clone()),
                None => Message::assistant(turn.content.clone()),
            };
            let sender = turn.sender.as_deref().unwrap_or_else(|| detector.name());

            transcript.push(message);
            let decision = observer.on_message(recipient, &transcript, sender).await;
            if let ReplyDecision::Override(reply) = decision {
                transcript.pop();
                transcript.push(reply);
            }

            if let Some(entry) = &turn.cost {
                cost.push(entry.clone());
            }

            let last = transcript.last().expect("transcript is non-empty");
            if detector.is_termination_message(&last.content) {
                termination = TerminationReason::Sentinel;
                break;
            }
        }

        Ok(SessionResult::new(transcript, cost, termination))
    }
}
