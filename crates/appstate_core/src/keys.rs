//! MAC key material.
//!
//! Keys are always passed explicitly. Each collection and device may be
//! synchronized with its own secrets, so nothing here is global.

use crate::error::{CoreError, CoreResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a MAC key in bytes.
pub const KEY_SIZE: usize = 32;

/// A single HMAC key.
///
/// The key is automatically zeroized when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MacKey {
    bytes: [u8; KEY_SIZE],
}

impl MacKey {
    /// Creates a key from a fixed-size array.
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CoreError::InvalidKeySize {
                actual: bytes.len(),
                expected: KEY_SIZE,
            });
        }

        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Returns the key as a byte slice.
    ///
    /// # Security
    ///
    /// Be careful with this method - don't log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for MacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The keys one collection's records and patches are authenticated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacKeys {
    /// Key for index MACs.
    pub index: MacKey,
    /// Key for content (value) MACs.
    pub value_mac: MacKey,
    /// Key for snapshot MACs.
    pub snapshot_mac: MacKey,
    /// Key for patch MACs.
    pub patch_mac: MacKey,
}
