//! Per-collection hash state and the accumulator updater.

use crate::error::{CoreError, CoreResult};
use crate::mac::{generate_snapshot_mac, MacBytes};
use appstate_lthash::{Accumulator, HashBuffer, LtHash, HASH_SIZE};
use appstate_protocol::{CollectionName, Operation, SyncdMutation, ValueMac};
use tracing::trace;

/// A decoded mutation, kept in the state's log for diagnostics and replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    /// SET or REMOVE.
    pub operation: Operation,
    /// Decoded action payload.
    pub action: Vec<u8>,
    /// Index segments identifying the record.
    pub index: Vec<String>,
    /// Index MAC.
    pub index_mac: Vec<u8>,
    /// Value MAC.
    pub value_mac: ValueMac,
}

/// Outcome of folding one patch into the accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashUpdate {
    /// Number of value MACs added.
    pub added: usize,
    /// Number of value MACs removed.
    pub removed: usize,
}

/// Integrity state of one collection on one device.
///
/// Created zeroed, advanced one patch at a time, and persisted between
/// sessions by the caller. Distinct collections must use distinct states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashState {
    /// Version of the last applied patch or snapshot.
    pub version: u64,
    /// LtHash of the value MACs of every present record.
    pub hash: HashBuffer,
    /// Applied mutations, oldest first.
    pub mutations: Vec<Mutation>,
}

impl HashState {
    /// Creates a state at version 0 with a zero hash.
    pub fn new() -> Self {
        Self {
            version: 0,
            hash: [0u8; HASH_SIZE],
            mutations: Vec::new(),
        }
    }

    /// Folds a patch's mutations into the hash using the patch integrity LtHash.
    ///
    /// See [`update_hash_with`](Self::update_hash_with).
    pub fn update_hash(
        &mut self,
        mutations: &[SyncdMutation],
        lookup: impl FnMut(&[u8], usize) -> Option<ValueMac>,
    ) -> CoreResult<HashUpdate> {
        self.update_hash_with(&LtHash::PATCH_INTEGRITY, mutations, lookup)
    }

    /// Folds a patch's mutations into the hash.
    ///
    /// Every SET contributes its value MAC to the added set. For every
    /// mutation, SET or REMOVE, `lookup(index_mac, position)` is asked for
    /// the value MAC most recently SET for that index before `position`; a
    /// hit goes to the removed set. The accumulator then subtracts the
    /// removed set and adds the added set.
    ///
    /// `lookup` is called exactly once per mutation, in ascending position
    /// order, until the first failure.
    ///
    /// The version is left alone; advancing it is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingPreviousSetValue`] if a REMOVE has no
    /// previous value. The hash is unchanged in that case.
    pub fn update_hash_with<A: Accumulator>(
        &mut self,
        accumulator: &A,
        mutations: &[SyncdMutation],
        mut lookup: impl FnMut(&[u8], usize) -> Option<ValueMac>,
    ) -> CoreResult<HashUpdate> {
        let mut added: Vec<ValueMac> = Vec::new();
        let mut removed: Vec<ValueMac> = Vec::new();

        for (position, mutation) in mutations.iter().enumerate() {
            if mutation.operation == Operation::Set {
                added.push(mutation.value_mac());
            }
            match lookup(mutation.index_mac(), position) {
                Some(previous) => removed.push(previous),
                None if mutation.operation == Operation::Remove => {
                    return Err(CoreError::MissingPreviousSetValue { position });
                }
                None => trace!(position, "no previous value for SET"),
            }
        }

        accumulator.subtract_then_add_in_place(&mut self.hash, &removed, &added);

        Ok(HashUpdate {
            added: added.len(),
            removed: removed.len(),
        })
    }

    /// Computes the snapshot MAC of this state for a collection.
    pub fn generate_snapshot_mac(&self, name: &CollectionName, key: &[u8]) -> MacBytes {
        generate_snapshot_mac(&self.hash, self.version, name, key)
    }

    /// Appends decoded mutations to the log.
    pub fn record_mutations(&mut self, mutations: impl IntoIterator<Item = Mutation>) {
        self.mutations.extend(mutations);
    }

    /// Drains the log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Returns true if the state has never advanced.
    pub fn is_initial(&self) -> bool {
        self.version == 0 && self.hash == [0u8; HASH_SIZE]
    }
}

impl Default for HashState {
    fn default() -> Self {
        Self::new()
    }
}
