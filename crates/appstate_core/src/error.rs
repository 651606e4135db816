//! Error types for app state integrity verification.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while verifying or applying app state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A REMOVE mutation has no previous SET value to take out of the hash.
    #[error("missing value MAC of previous SET operation for mutation {position}")]
    MissingPreviousSetValue {
        /// Position of the mutation within its patch.
        position: usize,
    },

    /// The recomputed snapshot MAC does not match the one the server sent.
    #[error("mismatching LTHash after applying patch v{version}")]
    MismatchingLtHash {
        /// Version the state was advanced to.
        version: u64,
    },

    /// The recomputed patch MAC does not match.
    #[error("mismatching patch MAC for patch v{version}")]
    MismatchingPatchMac {
        /// Patch version.
        version: u64,
    },

    /// A record's content MAC does not match its value MAC.
    #[error("mismatching content MAC for record {position}")]
    MismatchingContentMac {
        /// Position of the record within its patch or snapshot.
        position: usize,
    },

    /// A decoded index does not match its index MAC.
    #[error("mismatching index MAC")]
    MismatchingIndexMac,

    /// The patch does not advance the collection version.
    #[error("stale patch: collection is at v{current}, patch is v{patch}")]
    StaleVersion {
        /// Current collection version.
        current: u64,
        /// Declared patch version.
        patch: u64,
    },

    /// The patch skips one or more versions.
    #[error("version gap: collection is at v{current}, patch is v{patch}")]
    VersionGap {
        /// Current collection version.
        current: u64,
        /// Declared patch version.
        patch: u64,
    },

    /// Invalid key size.
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Actual size provided.
        actual: usize,
        /// Expected size.
        expected: usize,
    },
}

impl CoreError {
    /// Returns true if this error means the received state cannot be trusted.
    ///
    /// Integrity failures call for a full resynchronization from a fresh
    /// snapshot; the remaining errors are ordering or input problems.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            CoreError::MissingPreviousSetValue { .. }
                | CoreError::MismatchingLtHash { .. }
                | CoreError::MismatchingPatchMac { .. }
                | CoreError::MismatchingContentMac { .. }
                | CoreError::MismatchingIndexMac
        )
    }
}
