//! Error types for decoded protocol records.

use thiserror::Error;

/// Result type for protocol record construction.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while constructing protocol records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A value blob cannot hold its trailing value MAC.
    #[error("value blob too short: expected at least {expected} bytes, got {actual}")]
    ValueTooShort {
        /// Minimum length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Unknown mutation operation code.
    #[error("unknown operation code: {0}")]
    UnknownOperation(i32),
}
