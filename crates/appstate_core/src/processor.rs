//! Verified application of patches and snapshots.

use crate::config::ProcessorConfig;
use crate::error::{CoreError, CoreResult};
use crate::keys::MacKeys;
use crate::lookup::{PatchLookup, ValueMacStore};
use crate::mac::{verify_content_mac, verify_patch_mac, verify_snapshot_mac};
use crate::state::HashState;
use appstate_lthash::{Accumulator, LtHash};
use appstate_protocol::{CollectionName, Operation, SyncdPatch, SyncdSnapshot, ValueMac};
use tracing::{debug, warn};

/// Summary of an applied patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedPatch {
    /// Version the state advanced to.
    pub version: u64,
    /// Value MACs added to the hash.
    pub added: usize,
    /// Value MACs removed from the hash.
    pub removed: usize,
}

/// Applies patches and snapshots of one collection with verification.
///
/// Application is all-or-nothing: a patch either advances the state's
/// version and hash together, or fails and leaves the state as it was.
/// A processor holds no mutable state, but each [`HashState`] must have a
/// single writer at a time.
#[derive(Debug, Clone)]
pub struct PatchProcessor {
    name: CollectionName,
    config: ProcessorConfig,
    accumulator: LtHash,
}

impl PatchProcessor {
    /// Creates a processor for a collection.
    pub fn new(name: impl Into<CollectionName>, config: ProcessorConfig) -> Self {
        Self {
            name: name.into(),
            config,
            accumulator: LtHash::PATCH_INTEGRITY,
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Applies one patch to `state`.
    ///
    /// Previous values are resolved from earlier mutations of the patch,
    /// then from `store`. The store is only read; once this returns `Ok`,
    /// the caller persists the patch with
    /// [`ValueMacStore::apply_mutations`].
    ///
    /// Only `version` and `hash` advance. The processor never decodes
    /// actions, so [`HashState::mutations`] is left as it was; the decoding
    /// layer appends to it with [`HashState::record_mutations`].
    ///
    /// # Errors
    ///
    /// - [`CoreError::StaleVersion`] or [`CoreError::VersionGap`] if the
    ///   patch version does not follow the state
    /// - [`CoreError::MissingPreviousSetValue`] if a REMOVE cannot be resolved
    /// - [`CoreError::MismatchingLtHash`], [`CoreError::MismatchingPatchMac`]
    ///   or [`CoreError::MismatchingContentMac`] when MACs are validated and
    ///   one does not match
    ///
    /// On error `state` is unchanged.
    pub fn apply_patch<S: ValueMacStore + ?Sized>(
        &self,
        state: &mut HashState,
        patch: &SyncdPatch,
        keys: &MacKeys,
        store: &S,
    ) -> CoreResult<AppliedPatch> {
        self.check_version(state.version, patch.version)?;

        let mut next = HashState {
            version: patch.version,
            hash: state.hash,
            mutations: Vec::new(),
        };
        let lookup = PatchLookup::new(&patch.mutations, store);
        let update = next
            .update_hash_with(&self.accumulator, &patch.mutations, |index_mac, position| {
                lookup.prior_value_mac(index_mac, position)
            })
            .map_err(|err| {
                warn!(collection = %self.name, version = patch.version, %err, "patch rejected");
                err
            })?;

        if self.config.validate_macs {
            self.validate_patch(&next, patch, keys)?;
        }

        state.version = next.version;
        state.hash = next.hash;

        debug!(
            collection = %self.name,
            version = patch.version,
            added = update.added,
            removed = update.removed,
            "applied patch"
        );

        Ok(AppliedPatch {
            version: patch.version,
            added: update.added,
            removed: update.removed,
        })
    }

    /// Applies patches in order, persisting each into `store` as it lands.
    ///
    /// Stops at the first failing patch. Patches before it stay applied, so
    /// `state.version` tells the caller where to resume.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing patch. See
    /// [`apply_patch`](Self::apply_patch).
    pub fn apply_patches<S: ValueMacStore + ?Sized>(
        &self,
        state: &mut HashState,
        patches: &[SyncdPatch],
        keys: &MacKeys,
        store: &S,
    ) -> CoreResult<Vec<AppliedPatch>> {
        let mut applied = Vec::with_capacity(patches.len());
        for patch in patches {
            applied.push(self.apply_patch(state, patch, keys, store)?);
            store.apply_mutations(&patch.mutations);
        }
        Ok(applied)
    }

    /// Builds a fresh state from a full snapshot.
    ///
    /// Every record is added to a zero hash and the state takes the
    /// snapshot's version. The caller replaces its store contents with the
    /// snapshot's records once this succeeds.
    ///
    /// # Errors
    ///
    /// [`CoreError::MismatchingLtHash`] or [`CoreError::MismatchingContentMac`]
    /// when MACs are validated and one does not match.
    pub fn apply_snapshot(&self, snapshot: &SyncdSnapshot, keys: &MacKeys) -> CoreResult<HashState> {
        let mut state = HashState::new();
        state.version = snapshot.version;

        let removed: [ValueMac; 0] = [];
        let added: Vec<ValueMac> = snapshot.records.iter().map(|r| r.value_mac()).collect();
        self.accumulator
            .subtract_then_add_in_place(&mut state.hash, &removed, &added);

        if self.config.validate_macs {
            if !verify_snapshot_mac(
                &state.hash,
                state.version,
                &self.name,
                keys.snapshot_mac.as_bytes(),
                &snapshot.mac,
            ) {
                warn!(collection = %self.name, version = snapshot.version, "snapshot MAC mismatch");
                return Err(CoreError::MismatchingLtHash {
                    version: snapshot.version,
                });
            }

            for (position, record) in snapshot.records.iter().enumerate() {
                if !verify_content_mac(
                    Operation::Set,
                    record.content(),
                    record.key_id(),
                    keys.value_mac.as_bytes(),
                    &record.value_mac(),
                ) {
                    warn!(collection = %self.name, position, "snapshot record content MAC mismatch");
                    return Err(CoreError::MismatchingContentMac { position });
                }
            }
        }

        debug!(
            collection = %self.name,
            version = snapshot.version,
            records = snapshot.records.len(),
            "applied snapshot"
        );

        Ok(state)
    }

    fn check_version(&self, current: u64, patch: u64) -> CoreResult<()> {
        if patch <= current {
            warn!(collection = %self.name, current, patch, "stale patch");
            return Err(CoreError::StaleVersion { current, patch });
        }
        if self.config.require_sequential_versions && patch != current + 1 {
            warn!(collection = %self.name, current, patch, "patch skips versions");
            return Err(CoreError::VersionGap { current, patch });
        }
        Ok(())
    }

    fn validate_patch(&self, next: &HashState, patch: &SyncdPatch, keys: &MacKeys) -> CoreResult<()> {
        if !verify_snapshot_mac(
            &next.hash,
            next.version,
            &self.name,
            keys.snapshot_mac.as_bytes(),
            &patch.snapshot_mac,
        ) {
            warn!(collection = %self.name, version = patch.version, "snapshot MAC mismatch");
            return Err(CoreError::MismatchingLtHash {
                version: patch.version,
            });
        }

        if !verify_patch_mac(patch, &self.name, keys.patch_mac.as_bytes()) {
            warn!(collection = %self.name, version = patch.version, "patch MAC mismatch");
            return Err(CoreError::MismatchingPatchMac {
                version: patch.version,
            });
        }

        for (position, mutation) in patch.mutations.iter().enumerate() {
            let record = &mutation.record;
            if !verify_content_mac(
                mutation.operation,
                record.content(),
                record.key_id(),
                keys.value_mac.as_bytes(),
                &record.value_mac(),
            ) {
                warn!(
                    collection = %self.name,
                    version = patch.version,
                    position,
                    "content MAC mismatch"
                );
                return Err(CoreError::MismatchingContentMac { position });
            }
        }

        Ok(())
    }
}
