//! Mutation operations.

use crate::error::{ProtocolError, ProtocolResult};

/// Type of a record mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Record was created or replaced.
    Set,
    /// Record was removed.
    Remove,
}

impl Operation {
    /// Returns the wire code.
    pub fn code(&self) -> u8 {
        match self {
            Operation::Set => 0,
            Operation::Remove => 1,
        }
    }

    /// Converts from a wire code.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownOperation`] for any code other than 0 or 1.
    pub fn from_code(code: i32) -> ProtocolResult<Self> {
        match code {
            0 => Ok(Operation::Set),
            1 => Ok(Operation::Remove),
            other => Err(ProtocolError::UnknownOperation(other)),
        }
    }

    /// Returns true for [`Operation::Set`].
    pub fn is_set(&self) -> bool {
        matches!(self, Operation::Set)
    }
}
