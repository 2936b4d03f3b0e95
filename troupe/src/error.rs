//! Unified error types for the troupe crate.
//!
//! Two layers of failure exist:
//! - [`Error`]: configuration-time failures (unknown model keys, duplicate
//!   agent names) that are fatal before any session starts.
//! - [`EngineError`]: failures raised by the orchestration engine while a
//!   session is running. These are propagated to the caller unchanged; no
//!   retry or recovery happens in this crate.

use std::fmt;

/// Result type alias for troupe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the troupe crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Requested model key is absent from the registry.
    #[error("unknown model key: {key}")]
    UnknownModelKey {
        /// The key that was looked up.
        key: String,
    },

    /// A hosted model entry's API key environment variable is unset.
    ///
    /// Surfaced the first time the entry is used (profile build), not at
    /// process start.
    #[error("missing API key for model `{key}`: environment variable {var} is unset")]
    MissingApiKey {
        /// The model key whose credential failed to resolve.
        key: String,
        /// The environment variable that was consulted.
        var: String,
    },

    /// Sampling temperature outside the accepted range.
    #[error("temperature {value} out of range (expected 0.0..=2.0)")]
    InvalidTemperature {
        /// The rejected value.
        value: f32,
    },

    /// Two agents in one set share a display name.
    #[error("duplicate agent name: {name}")]
    DuplicateAgentName {
        /// The colliding name.
        name: String,
    },

    /// An agent set must contain exactly one termination detector.
    #[error("agent set must contain exactly one termination detector, found {count}")]
    TerminationDetector {
        /// How many detectors were actually present.
        count: usize,
    },

    /// A roster requires a profile that was not configured.
    #[error("no profile configured for {purpose}")]
    MissingProfile {
        /// The functional need the profile would have served.
        purpose: String,
    },

    /// Orchestration engine failure, propagated unchanged.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised by a [`ChatEngine`](crate::engine::ChatEngine) run.
///
/// Transport and authentication failures from the engine cross this crate
/// untouched; the categories below exist so callers can tell them apart
/// without parsing messages.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct EngineError {
    /// The error kind.
    pub kind: EngineErrorKind,
    /// The provider or endpoint involved, when known.
    pub provider: Option<String>,
    /// Human-readable detail.
    pub message: String,
}

/// Categories of engine errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineErrorKind {
    /// Authentication or authorization failure (bad API key).
    Auth,
    /// Network or connection error (unreachable endpoint).
    Transport,
    /// Per-call timeout exceeded.
    Timeout,
    /// Provider-specific or protocol error.
    Provider,
}

impl EngineErrorKind {
    /// String form used in log lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::Provider => "provider",
        }
    }
}

impl EngineError {
    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: EngineErrorKind::Auth,
            provider: Some(provider.into()),
            message: message.into(),
        }
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: EngineErrorKind::Transport,
            provider: None,
            message: message.into(),
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: EngineErrorKind::Timeout,
            provider: None,
            message: message.into(),
        }
    }

    /// Create a provider error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self {
            kind: EngineErrorKind::Provider,
            provider: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider {
            Some(provider) => {
                write!(f, "{} error ({provider}): {}", self.kind.as_str(), self.message)
            }
            None => write!(f, "{} error: {}", self.kind.as_str(), self.message),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display_includes_provider() {
        let err = EngineError::auth("openai", "invalid key");
        assert_eq!(err.to_string(), "auth error (openai): invalid key");

        let err = EngineError::transport("connection refused");
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn engine_error_converts_into_crate_error() {
        let err: Error = EngineError::timeout("600s elapsed").into();
        assert!(matches!(err, Error::Engine(_)));
    }
}
