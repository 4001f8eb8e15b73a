//! Error types for the engine

use thiserror::Error;

/// Result type alias using our EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for replay processing
#[derive(Error, Debug)]
pub enum EngineError {
    /// A handler or the event factory referenced a round that was never opened
    #[error("Round context not found for round index {round_index}")]
    RoundNotFound { round_index: usize },

    /// Round number outside `1..=round_count`
    #[error("Invalid round number {round_number} (match has {round_count} rounds)")]
    InvalidRoundNumber {
        round_number: i64,
        round_count: usize,
    },

    /// Corrupt or truncated replay stream
    #[error("Decode error at line {line}: {reason}")]
    Decode { line: usize, reason: String },

    /// The hit log produced more frags than kills recorded for the round
    #[error("Inconsistent battle log for round {round_number}: {frags} frags for {kills} kills")]
    InconsistentBattleLog {
        round_number: usize,
        frags: usize,
        kills: usize,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O errors from the replay reader or an output sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The consumer side of the output queue is gone
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Publishing blocked longer than the configured timeout
    #[error("Publish timed out after {timeout_ms}ms")]
    PublishTimeout { timeout_ms: u64 },

    /// The caller cancelled processing
    #[error("Processing cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for EngineError {
    fn from(err: tokio::sync::mpsc::error::SendError<T>) -> Self {
        EngineError::ChannelSend(err.to_string())
    }
}

impl EngineError {
    /// True for errors raised by a broken caller/consumer contract rather than by the replay data
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            EngineError::RoundNotFound { .. } | EngineError::InvalidRoundNumber { .. }
        )
    }
}
