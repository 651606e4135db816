//! Resolving the previous value MAC of a record.
//!
//! The updater asks, for every mutation, which value MAC was last SET for
//! the mutation's index. The answer comes from two places: earlier
//! mutations of the same patch, then the persisted history of the
//! collection. [`PatchLookup`] combines both; [`ValueMacStore`] abstracts
//! the history so the core stays agnostic of how it is persisted.

use appstate_protocol::{Operation, SyncdMutation, ValueMac};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Persisted value MACs of one collection, keyed by index MAC.
pub trait ValueMacStore: Send + Sync {
    /// Returns the value MAC currently SET for an index.
    fn value_mac(&self, index_mac: &[u8]) -> Option<ValueMac>;

    /// Records the value MAC SET for an index.
    fn put_value_mac(&self, index_mac: &[u8], value_mac: ValueMac);

    /// Forgets an index.
    fn delete_value_mac(&self, index_mac: &[u8]);

    /// Records the effect of an applied patch: SET stores, REMOVE deletes.
    ///
    /// Call this only after the patch has been applied successfully.
    fn apply_mutations(&self, mutations: &[SyncdMutation]) {
        for mutation in mutations {
            match mutation.operation {
                Operation::Set => self.put_value_mac(mutation.index_mac(), mutation.value_mac()),
                Operation::Remove => self.delete_value_mac(mutation.index_mac()),
            }
        }
    }
}

/// In-memory value MAC store.
#[derive(Debug, Default)]
pub struct MemoryValueMacStore {
    macs: RwLock<HashMap<Vec<u8>, ValueMac>>,
}

impl MemoryValueMacStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored indexes.
    pub fn len(&self) -> usize {
        self.macs.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.macs.read().is_empty()
    }
}

impl ValueMacStore for MemoryValueMacStore {
    fn value_mac(&self, index_mac: &[u8]) -> Option<ValueMac> {
        self.macs.read().get(index_mac).copied()
    }

    fn put_value_mac(&self, index_mac: &[u8], value_mac: ValueMac) {
        self.macs.write().insert(index_mac.to_vec(), value_mac);
    }

    fn delete_value_mac(&self, index_mac: &[u8]) {
        self.macs.write().remove(index_mac);
    }
}

/// Previous-value lookup for one patch.
///
/// For the mutation at `position`, earlier mutations of the patch are
/// scanned from `position - 1` down to 0 and the first one with the same
/// index decides: a SET yields its value MAC, a REMOVE yields nothing.
/// A mutation is never its own previous value. Only if no earlier
/// mutation touches the index is the store consulted.
pub struct PatchLookup<'a, S: ValueMacStore + ?Sized> {
    mutations: &'a [SyncdMutation],
    store: &'a S,
}

impl<'a, S: ValueMacStore + ?Sized> PatchLookup<'a, S> {
    /// Creates a lookup over a patch's mutations and a collection's store.
    pub fn new(mutations: &'a [SyncdMutation], store: &'a S) -> Self {
        Self { mutations, store }
    }

    /// Returns the previous value MAC for `index_mac` as seen by the
    /// mutation at `position`.
    pub fn prior_value_mac(&self, index_mac: &[u8], position: usize) -> Option<ValueMac> {
        let bound = position.min(self.mutations.len());
        let nearest = self.mutations[..bound]
            .iter()
            .rev()
            .find(|mutation| mutation.index_mac() == index_mac);
        match nearest {
            Some(mutation) if mutation.operation == Operation::Set => Some(mutation.value_mac()),
            // Removed earlier in this patch: the store's entry is stale.
            Some(_) => None,
            None => self.store.value_mac(index_mac),
        }
    }
}
