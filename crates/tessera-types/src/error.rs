use thiserror::Error;

/// Transport-neutral classification of a failed stage runner call.
///
/// Adapters map their transport's failures onto these variants; the
/// dispatcher decides retry policy from the variant alone.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageError {
    #[error("stage unavailable: {0}")]
    Unavailable(String),

    #[error("stage resources exhausted: {0}")]
    ResourceExhausted(String),

    #[error("stage aborted: {0}")]
    Aborted(String),

    #[error("stage deadline exceeded")]
    DeadlineExceeded,

    #[error("stage call cancelled")]
    Cancelled,

    #[error("invalid stage response: {0}")]
    InvalidResponse(String),

    #[error("stage call failed: {0}")]
    Failed(String),
}

/// Errors from loading orchestrator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file '{path}': {reason}")]
    Parse { path: String, reason: String },
}
