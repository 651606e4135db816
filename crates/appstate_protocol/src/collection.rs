//! Collection names.

use std::fmt;

/// Name of an independently synchronized app state collection.
///
/// The raw name bytes are mixed into snapshot and patch MACs, which keeps a
/// patch for one collection from verifying against another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionName(String);

impl CollectionName {
    /// Blocking-related critical data.
    pub const CRITICAL_BLOCK: &'static str = "critical_block";
    /// Low-priority critical data.
    pub const CRITICAL_UNBLOCK_LOW: &'static str = "critical_unblock_low";
    /// High-priority regular data.
    pub const REGULAR_HIGH: &'static str = "regular_high";
    /// Regular data.
    pub const REGULAR: &'static str = "regular";
    /// Low-priority regular data.
    pub const REGULAR_LOW: &'static str = "regular_low";

    /// Every collection a client normally keeps.
    pub const ALL: [&'static str; 5] = [
        Self::CRITICAL_BLOCK,
        Self::CRITICAL_UNBLOCK_LOW,
        Self::REGULAR_HIGH,
        Self::REGULAR,
        Self::REGULAR_LOW,
    ];

    /// Creates a collection name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name bytes as mixed into MACs.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CollectionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CollectionName {
    fn from(name: String) -> Self {
        Self(name)
    }
}
