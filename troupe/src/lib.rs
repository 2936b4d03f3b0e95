//! Troupe - multi-agent chat session wiring
//!
//! This crate supplies everything around a multi-agent conversation except
//! the conversation itself: a model registry, per-purpose conversation
//! profiles, role-tagged agent rosters, a termination-sentinel convention,
//! a message-relay observer for chat displays, and cost reporting. The
//! turn-taking engine is an external collaborator behind the
//! [`ChatEngine`](engine::ChatEngine) trait; the bundled
//! [`ScriptedEngine`](engine::ScriptedEngine) replays canned transcripts for
//! tests and demos.

pub mod agent;
pub mod cost;
pub mod engine;
pub mod error;
pub mod message;
pub mod observer;
pub mod prelude;
pub mod profile;
pub mod registry;
pub mod relay;
pub mod roster;
pub mod sentinel;
pub mod session;

pub use error::{EngineError, Error, Result};
