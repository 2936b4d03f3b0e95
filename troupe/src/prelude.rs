//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use troupe::prelude::*;
//! ```

pub use crate::agent::{AgentSet, AgentSetBuilder, AgentSpec, CodeExecution};
pub use crate::cost::{CostEntry, Usage, format_usd, summarize_cost};
pub use crate::engine::{
    ChatEngine, EngineError, EngineErrorKind, EngineResult, ScriptedEngine, ScriptedTurn,
    SharedEngine,
};
pub use crate::error::{Error, Result};
pub use crate::message::{Message, MessageRole};
pub use crate::observer::{ChatObserver, NoopObserver, ReplyDecision, SharedObserver};
pub use crate::profile::{
    ConversationProfile, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, ProfileOverrides, ProfileSet,
    ResolvedModel,
};
pub use crate::registry::{Credential, ModelEntry, ModelRegistry};
pub use crate::relay::{AvatarMap, ChatBubble, ChatDisplay, MessageRelay};
pub use crate::sentinel::Sentinel;
pub use crate::session::{SessionCoordinator, SessionId, SessionResult, TerminationReason};
