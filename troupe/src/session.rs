//! Session coordination.
//!
//! One session is one bounded exchange: the coordinator decorates the
//! opening message with the roster's termination instruction, hands the
//! roster and round cap to the engine, and returns the result unmodified.
//! Engine failures cross this module untouched. Calls are serialized by
//! construction; a new session only starts after the previous call returns.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentSet;
use crate::cost::{CostEntry, summarize_cost};
use crate::engine::ChatEngine;
use crate::error::Result;
use crate::message::Message;
use crate::observer::{ChatObserver, NoopObserver};

/// Unique identifier for one session run, used in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationReason {
    /// The termination detector saw its sentinel as a message suffix.
    Sentinel,
    /// The round cap was reached first.
    RoundLimit,
}

impl TerminationReason {
    /// String form used in log lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sentinel => "sentinel",
            Self::RoundLimit => "round-limit",
        }
    }
}

/// Everything one session run produced. Read-only once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    id: SessionId,
    transcript: Vec<Message>,
    cost: Vec<CostEntry>,
    termination: TerminationReason,
}

impl SessionResult {
    /// Assemble a result with a fresh session id.
    #[must_use]
    pub fn new(
        transcript: Vec<Message>,
        cost: Vec<CostEntry>,
        termination: TerminationReason,
    ) -> Self {
        Self {
            id: SessionId::new(),
            transcript,
            cost,
            termination,
        }
    }

    /// The session id.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Ordered message transcript, opening message first.
    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Ordered per-call cost entries. May be empty.
    #[must_use]
    pub fn cost(&self) -> &[CostEntry] {
        &self.cost
    }

    /// Why the session ended.
    #[must_use]
    pub fn termination(&self) -> TerminationReason {
        self.termination
    }

    /// Rounds consumed, opening message included.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.transcript.len()
    }
}

/// Runs sessions against one engine, with one observer watching every
/// emitted message.
#[derive(Clone)]
pub struct SessionCoordinator {
    engine: Arc<dyn ChatEngine>,
    observer: Arc<dyn ChatObserver>,
}

impl SessionCoordinator {
    /// Coordinator with no observer attached.
    #[must_use]
    pub fn new(engine: Arc<dyn ChatEngine>) -> Self {
        Self {
            engine,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Attach an observer (the message relay, in the UI variant).
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ChatObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run one session to completion.
    ///
    /// The opening message is `initial_message` decorated with the roster's
    /// termination instruction. Blocks until the engine's turn-taking loop
    /// ends; the result is returned exactly as the engine produced it.
    ///
    /// # Errors
    ///
    /// Engine transport/authentication/timeout failures are propagated
    /// unchanged as [`Error::Engine`](crate::Error::Engine).
    pub async fn run_session(
        &self,
        agents: &AgentSet,
        initial_message: &str,
        max_rounds: usize,
    ) -> Result<SessionResult> {
        let opening = Message::user(agents.sentinel().decorate(initial_message));

        tracing::debug!(
            agents = agents.len(),
            max_rounds,
            "starting session"
        );

        let result = self
            .engine
            .run(agents, opening, max_rounds, self.observer.as_ref())
            .await?;

        tracing::info!(
            session = %result.id(),
            rounds = result.rounds(),
            termination = result.termination().as_str(),
            cost = %summarize_cost(result.cost()),
            "session complete"
        );

        Ok(result)
    }
}

impl fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("engine", &"..")
            .field("observer", &"..")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::AgentSpec;
    use crate::engine::{ScriptedEngine, ScriptedTurn};
    use crate::error::Error;
    use crate::profile::ProfileOverrides;
    use crate::registry::{ModelEntry, ModelRegistry};
    use crate::sentinel::Sentinel;
    use url::Url;

    fn pair() -> AgentSet {
        let registry: ModelRegistry = [ModelEntry::local(
            "mistral",
            "mistral",
            Url::parse("http://0.0.0.0:59991").unwrap(),
        )]
        .into_iter()
        .collect();
        let profile = Arc::new(
            registry
                .build_profile("mistral", ProfileOverrides::none())
                .unwrap(),
        );
        AgentSet::builder()
            .agent(AgentSpec::proxy(
                "UserProxy",
                Arc::clone(&profile),
                Sentinel::terminate(),
            ))
            .agent(AgentSpec::assistant("Assistant", profile))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn opening_message_carries_termination_notice() {
        let engine: ScriptedEngine = [ScriptedTurn::new("Assistant", "done TERMINATE")]
            .into_iter()
            .collect();
        let coordinator = SessionCoordinator::new(Arc::new(engine));

        let result = coordinator
            .run_session(&pair(), "Tell me a joke.", 10)
            .await
            .unwrap();

        let opening = &result.transcript()[0];
        assert!(opening.content.starts_with("Tell me a joke.\n\n"));
        assert!(opening.content.contains("then say TERMINATE"));
        assert_eq!(result.termination(), TerminationReason::Sentinel);
    }

    #[tokio::test]
    async fn engine_failure_propagates_unchanged() {
        use crate::error::{EngineError, EngineErrorKind};

        let coordinator = SessionCoordinator::new(Arc::new(ScriptedEngine::failing(
            EngineError::transport("connection refused"),
        )));

        let err = coordinator
            .run_session(&pair(), "hello", 10)
            .await
            .unwrap_err();
        let Error::Engine(engine_err) = err else {
            panic!("expected engine error, got {err}");
        };
        assert_eq!(engine_err.kind, EngineErrorKind::Transport);
        assert_eq!(engine_err.message, "connection refused");
    }

    #[tokio::test]
    async fn sequential_sessions_reuse_one_roster() {
        let agents = pair();
        let engine: ScriptedEngine = [ScriptedTurn::new("Assistant", "ok TERMINATE")]
            .into_iter()
            .collect();
        let coordinator = SessionCoordinator::new(Arc::new(engine));

        let first = coordinator.run_session(&agents, "one", 10).await.unwrap();
        let second = coordinator.run_session(&agents, "two", 10).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(second.transcript()[0].content.lines().next(), Some("two"));
    }
}
