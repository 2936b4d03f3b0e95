//! The orchestration engine seam.
//!
//! Turn-taking, speaker selection, message routing, and retry behavior all
//! belong to the engine behind [`ChatEngine`]; this crate only supplies the
//! roster, the decorated opening message, and a round cap, and it propagates
//! engine failures unchanged. The in-tree [`ScriptedEngine`] replays canned
//! turns for tests and demos — it is not a production orchestrator.

mod scripted;

pub use scripted::{ScriptedEngine, ScriptedTurn};

use async_trait::async_trait;
use std::sync::Arc;

pub use crate::error::{EngineError, EngineErrorKind};

use crate::agent::AgentSet;
use crate::message::Message;
use crate::observer::ChatObserver;
use crate::session::SessionResult;

/// Result type for engine runs.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// A shared, thread-safe [`ChatEngine`] trait object.
pub type SharedEngine = Arc<dyn ChatEngine>;

/// A turn-based multi-agent conversation engine.
///
/// One call runs one bounded session: from the opening message until the
/// roster's termination predicate fires or `max_rounds` is reached. The call
/// blocks the caller for the whole exchange; sessions are serialized by the
/// coordinator, never concurrent.
#[async_trait]
pub trait ChatEngine: Send + Sync {
    /// Run one session.
    ///
    /// The engine must invoke `observer` once per emitted message before
    /// applying its own reply logic, and honor an override decision.
    ///
    /// # Errors
    ///
    /// Transport, authentication, and timeout failures surface as
    /// [`EngineError`] and must not be retried or rewritten here.
    async fn run(
        &self,
        agents: &AgentSet,
        opening: Message,
        max_rounds: usize,
        observer: &dyn ChatObserver,
    ) -> EngineResult<SessionResult>;
}
