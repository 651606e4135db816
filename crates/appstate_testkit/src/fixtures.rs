//! Test fixtures.
//!
//! [`ServerCollection`] stands in for the server side of one collection:
//! it accumulates mutations, seals them into patches carrying correct
//! snapshot, patch and content MACs, and can emit a full snapshot. Clients
//! under test apply what it produces and must end up byte-identical.

use appstate_core::mac::{generate_content_mac, generate_index_mac, generate_patch_mac};
use appstate_core::{HashState, MacKey, MacKeys, MemoryValueMacStore, PatchLookup, ValueMacStore};
use appstate_protocol::{
    CollectionName, Operation, SyncdMutation, SyncdPatch, SyncdRecord, SyncdSnapshot, ValueMac,
};
use std::collections::BTreeMap;

/// Key ID used by every fixture.
pub const TEST_KEY_ID: &[u8] = &[0x00, 0x01];

/// Deterministic keys matching the golden vectors.
pub fn test_keys() -> MacKeys {
    MacKeys {
        index: MacKey::new([0x44; 32]),
        value_mac: MacKey::new([0x22; 32]),
        snapshot_mac: MacKey::new([0x11; 32]),
        patch_mac: MacKey::new([0x33; 32]),
    }
}

/// Builds a value blob: `content || value_mac`.
pub fn value_blob(content: &[u8], value_mac: &ValueMac) -> Vec<u8> {
    let mut value = Vec::with_capacity(content.len() + value_mac.len());
    value.extend_from_slice(content);
    value.extend_from_slice(value_mac);
    value
}

/// Builds a record whose value MAC is the correct content MAC.
pub fn signed_record(
    operation: Operation,
    index_mac: &[u8],
    content: &[u8],
    keys: &MacKeys,
) -> SyncdRecord {
    let mac = generate_content_mac(operation, content, TEST_KEY_ID, keys.value_mac.as_bytes());
    SyncdRecord::new(
        index_mac.to_vec(),
        value_blob(content, &mac),
        TEST_KEY_ID.to_vec(),
    )
    .expect("value blob always carries a MAC")
}

/// Builds a mutation with a correct content MAC.
pub fn signed_mutation(
    operation: Operation,
    index_mac: &[u8],
    content: &[u8],
    keys: &MacKeys,
) -> SyncdMutation {
    SyncdMutation::new(operation, signed_record(operation, index_mac, content, keys))
}

/// Builds a mutation with an arbitrary value MAC, for hash-only tests.
pub fn unsigned_mutation(operation: Operation, index_mac: &[u8], value_mac: ValueMac) -> SyncdMutation {
    let record = SyncdRecord::new(
        index_mac.to_vec(),
        value_blob(b"content", &value_mac),
        TEST_KEY_ID.to_vec(),
    )
    .expect("value blob always carries a MAC");
    SyncdMutation::new(operation, record)
}

/// The server's side of one collection.
pub struct ServerCollection {
    name: CollectionName,
    keys: MacKeys,
    state: HashState,
    store: MemoryValueMacStore,
    records: BTreeMap<Vec<u8>, SyncdRecord>,
    pending: Vec<SyncdMutation>,
}

impl ServerCollection {
    /// Creates an empty collection using [`test_keys`].
    pub fn new(name: impl Into<CollectionName>) -> Self {
        Self::with_keys(name, test_keys())
    }

    /// Creates an empty collection with the given keys.
    pub fn with_keys(name: impl Into<CollectionName>, keys: MacKeys) -> Self {
        Self {
            name: name.into(),
            keys,
            state: HashState::new(),
            store: MemoryValueMacStore::new(),
            records: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Returns the keys.
    pub fn keys(&self) -> &MacKeys {
        &self.keys
    }

    /// Returns the server's current state.
    pub fn state(&self) -> &HashState {
        &self.state
    }

    /// Returns the index MAC of a plain index.
    pub fn index_mac(&self, index: &[u8]) -> Vec<u8> {
        generate_index_mac(index, self.keys.index.as_bytes()).to_vec()
    }

    /// Queues a SET of `index` to `content`.
    pub fn set(&mut self, index: &[u8], content: &[u8]) -> &mut Self {
        let index_mac = self.index_mac(index);
        let mutation = signed_mutation(Operation::Set, &index_mac, content, &self.keys);
        self.pending.push(mutation);
        self
    }

    /// Queues a REMOVE of `index`.
    pub fn remove(&mut self, index: &[u8]) -> &mut Self {
        let index_mac = self.index_mac(index);
        let mutation = signed_mutation(Operation::Remove, &index_mac, b"", &self.keys);
        self.pending.push(mutation);
        self
    }

    /// Seals the queued mutations into the next patch.
    ///
    /// Panics if a queued REMOVE has nothing to remove; the server never
    /// produces such a patch.
    pub fn seal_patch(&mut self) -> SyncdPatch {
        let mutations = std::mem::take(&mut self.pending);
        let version = self.state.version + 1;

        let lookup = PatchLookup::new(&mutations, &self.store);
        self.state
            .update_hash(&mutations, |index_mac, position| {
                lookup.prior_value_mac(index_mac, position)
            })
            .expect("server patches resolve every REMOVE");
        self.state.version = version;
        self.store.apply_mutations(&mutations);

        for mutation in &mutations {
            match mutation.operation {
                Operation::Set => {
                    self.records
                        .insert(mutation.index_mac().to_vec(), mutation.record.clone());
                }
                Operation::Remove => {
                    self.records.remove(mutation.index_mac());
                }
            }
        }

        let snapshot_mac = self
            .state
            .generate_snapshot_mac(&self.name, self.keys.snapshot_mac.as_bytes());
        let patch = SyncdPatch::new(version, mutations)
            .with_snapshot_mac(snapshot_mac.to_vec())
            .with_key_id(TEST_KEY_ID);
        let patch_mac = generate_patch_mac(&patch, &self.name, self.keys.patch_mac.as_bytes());
        patch.with_patch_mac(patch_mac.to_vec())
    }

    /// Emits the full current state as a snapshot.
    pub fn snapshot(&self) -> SyncdSnapshot {
        let mac = self
            .state
            .generate_snapshot_mac(&self.name, self.keys.snapshot_mac.as_bytes());
        SyncdSnapshot::new(self.state.version, self.records.values().cloned().collect())
            .with_mac(mac.to_vec())
            .with_key_id(TEST_KEY_ID)
    }
}
