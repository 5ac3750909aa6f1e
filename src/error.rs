use thiserror::Error;

/// Failures the core can surface. Sampling errors are per-tick and
/// recoverable (skip the tick, retry next period); storage errors must
/// reach the caller so a failed write is never shown as success.
#[derive(Debug, Error)]
pub enum Error {
    #[error("host metrics facility is unavailable")]
    SamplingUnavailable,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("session {0} not found")]
    SessionNotFound(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
