//! Patches and snapshots.

use crate::record::{SyncdMutation, SyncdRecord};

/// An atomic batch of mutations advancing a collection by one version.
///
/// # Fields
///
/// - `version`: The version the collection is at after this patch
/// - `mutations`: Ordered mutation list
/// - `snapshot_mac`: Snapshot MAC of the collection state after the patch
/// - `patch_mac`: MAC binding the patch to its snapshot and mutations
/// - `key_id`: ID of the key the MACs were generated with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncdPatch {
    /// Declared version.
    pub version: u64,
    /// Ordered mutations.
    pub mutations: Vec<SyncdMutation>,
    /// Snapshot commitment.
    pub snapshot_mac: Vec<u8>,
    /// Patch MAC.
    pub patch_mac: Vec<u8>,
    /// Key ID.
    pub key_id: Vec<u8>,
}

impl SyncdPatch {
    /// Creates a patch without MACs.
    pub fn new(version: u64, mutations: Vec<SyncdMutation>) -> Self {
        Self {
            version,
            mutations,
            ..Self::default()
        }
    }

    /// Sets the snapshot MAC.
    pub fn with_snapshot_mac(mut self, mac: impl Into<Vec<u8>>) -> Self {
        self.snapshot_mac = mac.into();
        self
    }

    /// Sets the patch MAC.
    pub fn with_patch_mac(mut self, mac: impl Into<Vec<u8>>) -> Self {
        self.patch_mac = mac.into();
        self
    }

    /// Sets the key ID.
    pub fn with_key_id(mut self, key_id: impl Into<Vec<u8>>) -> Self {
        self.key_id = key_id.into();
        self
    }

    /// Returns true if the patch carries no mutations.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// The authoritative full state of a collection at a version.
///
/// Every record in a snapshot is present, as if SET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncdSnapshot {
    /// Snapshot version.
    pub version: u64,
    /// Every present record.
    pub records: Vec<SyncdRecord>,
    /// Snapshot MAC of the resulting state.
    pub mac: Vec<u8>,
    /// Key ID.
    pub key_id: Vec<u8>,
}

impl SyncdSnapshot {
    /// Creates a snapshot without a MAC.
    pub fn new(version: u64, records: Vec<SyncdRecord>) -> Self {
        Self {
            version,
            records,
            ..Self::default()
        }
    }

    /// Sets the snapshot MAC.
    pub fn with_mac(mut self, mac: impl Into<Vec<u8>>) -> Self {
        self.mac = mac.into();
        self
    }

    /// Sets the key ID.
    pub fn with_key_id(mut self, key_id: impl Into<Vec<u8>>) -> Self {
        self.key_id = key_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_builder() {
        let patch = SyncdPatch::new(4, Vec::new())
            .with_snapshot_mac(vec![1u8; 32])
            .with_patch_mac(vec![2u8; 32])
            .with_key_id(vec![0, 7]);

        assert_eq!(patch.version, 4);
        assert!(patch.is_empty());
        assert_eq!(patch.snapshot_mac, vec![1u8; 32]);
        assert_eq!(patch.patch_mac, vec![2u8; 32]);
        assert_eq!(patch.key_id, vec![0, 7]);
    }

    #[test]
    fn snapshot_builder() {
        let snapshot = SyncdSnapshot::new(10, Vec::new())
            .with_mac(vec![5u8; 32])
            .with_key_id(vec![1]);

        assert_eq!(snapshot.version, 10);
        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.mac, vec![5u8; 32]);
        assert_eq!(snapshot.key_id, vec![1]);
    }
}
