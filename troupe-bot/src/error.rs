//! Error type for the bot binary.

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;

/// Errors surfaced to the operator.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Configuration problem: missing file, bad TOML, failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure from the session plumbing, including engine errors. The chat
    /// widget shows no response for these; the log sink has the detail.
    #[error(transparent)]
    Session(#[from] troupe::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
