//! Property tests for the updater and the MACs.

use appstate_core::mac::{generate_content_mac, generate_patch_mac, generate_snapshot_mac};
use appstate_core::{CoreError, HashState, MemoryValueMacStore, PatchLookup, ValueMacStore};
use appstate_lthash::{LtHash, HASH_SIZE};
use appstate_protocol::{CollectionName, Operation, SyncdMutation, SyncdPatch};
use appstate_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::HashMap;

/// Turns raw steps into a valid history: a REMOVE of an absent index
/// becomes a SET. Returns the mutations and the value MACs left SET.
fn valid_history(steps: &[(u8, bool, [u8; 32])]) -> (Vec<SyncdMutation>, Vec<[u8; 32]>) {
    let mut present: HashMap<u8, [u8; 32]> = HashMap::new();
    let mutations = steps
        .iter()
        .map(|&(index, remove, value_mac)| {
            if remove && present.remove(&index).is_some() {
                unsigned_mutation(Operation::Remove, &[index], value_mac)
            } else {
                present.insert(index, value_mac);
                unsigned_mutation(Operation::Set, &[index], value_mac)
            }
        })
        .collect();
    (mutations, present.into_values().collect())
}

fn apply_in_patches(mutations: &[SyncdMutation], split: usize) -> HashState {
    let store = MemoryValueMacStore::new();
    let mut state = HashState::new();
    for patch in [&mutations[..split], &mutations[split..]] {
        let lookup = PatchLookup::new(patch, &store);
        state
            .update_hash(patch, |i, p| lookup.prior_value_mac(i, p))
            .unwrap();
        store.apply_mutations(patch);
    }
    state
}

proptest! {
    #[test]
    fn patch_boundaries_never_change_the_hash(
        steps in prop::collection::vec((0u8..3, any::<bool>(), value_mac_strategy()), 1..16),
        split in any::<prop::sample::Index>(),
    ) {
        let (mutations, remaining) = valid_history(&steps);
        let split = split.index(mutations.len() + 1);

        let mut expected = [0u8; HASH_SIZE];
        for value_mac in &remaining {
            LtHash::PATCH_INTEGRITY.add(&mut expected, value_mac);
        }

        prop_assert_eq!(apply_in_patches(&mutations, 0).hash, expected);
        prop_assert_eq!(apply_in_patches(&mutations, split).hash, expected);
    }

    #[test]
    fn any_permutation_gives_the_same_hash(
        (batch, shuffled) in set_batch_strategy(10)
            .prop_flat_map(|batch| (Just(batch.clone()), Just(batch).prop_shuffle())),
        prior in prop::collection::vec(value_mac_strategy(), 10),
    ) {
        // Give every other index a previous value in the history.
        let store = MemoryValueMacStore::new();
        for (mutation, value_mac) in batch.iter().zip(&prior).step_by(2) {
            store.put_value_mac(mutation.index_mac(), *value_mac);
        }

        let mut ordered = HashState::new();
        let lookup = PatchLookup::new(&batch, &store);
        ordered.update_hash(&batch, |i, p| lookup.prior_value_mac(i, p)).unwrap();

        let mut permuted = HashState::new();
        let lookup = PatchLookup::new(&shuffled, &store);
        permuted.update_hash(&shuffled, |i, p| lookup.prior_value_mac(i, p)).unwrap();

        prop_assert_eq!(ordered.hash, permuted.hash);
    }

    #[test]
    fn set_then_remove_is_identity(
        start in prop::collection::vec(any::<u8>(), HASH_SIZE),
        index_mac in index_mac_strategy(),
        value_mac in value_mac_strategy(),
    ) {
        let mut state = HashState::new();
        state.hash.copy_from_slice(&start);
        let original = state.hash;

        state.update_hash(&[unsigned_mutation(Operation::Set, &index_mac, value_mac)], |_, _| None).unwrap();
        state.update_hash(
            &[unsigned_mutation(Operation::Remove, &index_mac, [0u8; 32])],
            |_, _| Some(value_mac),
        ).unwrap();

        prop_assert_eq!(state.hash, original);
    }

    #[test]
    fn unresolved_remove_never_changes_state(
        batch in set_batch_strategy(6),
        orphan in index_mac_strategy(),
        insert_at in 0usize..6,
    ) {
        let mut mutations = batch.clone();
        let position = insert_at.min(mutations.len());
        prop_assume!(mutations.iter().all(|m| m.index_mac() != orphan.as_slice()));
        mutations.insert(position, unsigned_mutation(Operation::Remove, &orphan, [1u8; 32]));

        let store = MemoryValueMacStore::new();
        let lookup = PatchLookup::new(&mutations, &store);
        let mut state = HashState::new();
        state.version = 3;
        let before = state.clone();

        let result = state.update_hash(&mutations, |i, p| lookup.prior_value_mac(i, p));
        prop_assert_eq!(result, Err(CoreError::MissingPreviousSetValue { position }));
        prop_assert_eq!(state, before);
    }

    #[test]
    fn snapshot_mac_is_sensitive(
        key in mac_key_strategy(),
        version in any::<u64>(),
        name in collection_name_strategy(),
        flip in 0usize..HASH_SIZE,
    ) {
        let hash = [0x5Cu8; HASH_SIZE];
        let mac = generate_snapshot_mac(&hash, version, &name, &key);
        prop_assert_eq!(mac, generate_snapshot_mac(&hash, version, &name, &key));

        let mut flipped = hash;
        flipped[flip] ^= 1;
        prop_assert_ne!(mac, generate_snapshot_mac(&flipped, version, &name, &key));
        prop_assert_ne!(mac, generate_snapshot_mac(&hash, version.wrapping_add(1), &name, &key));

        let other = CollectionName::new(format!("{}_x", name));
        prop_assert_ne!(mac, generate_snapshot_mac(&hash, version, &other, &key));
    }

    #[test]
    fn patch_mac_is_sensitive(
        batch in set_batch_strategy(5),
        version in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let name = CollectionName::new(CollectionName::REGULAR);
        let key = [0x33u8; 32];
        let patch = SyncdPatch::new(version, batch.clone()).with_snapshot_mac(vec![9u8; 32]);
        let mac = generate_patch_mac(&patch, &name, &key);
        prop_assert_eq!(mac, generate_patch_mac(&patch, &name, &key));

        let mut altered = patch.clone();
        let i = pick.index(altered.mutations.len());
        let index_mac = altered.mutations[i].index_mac().to_vec();
        let mut value_mac = altered.mutations[i].value_mac();
        value_mac[0] ^= 0xFF;
        altered.mutations[i] = unsigned_mutation(Operation::Set, &index_mac, value_mac);
        prop_assert_ne!(mac, generate_patch_mac(&altered, &name, &key));

        let mut bumped = patch.clone();
        bumped.version = version.wrapping_add(1);
        prop_assert_ne!(mac, generate_patch_mac(&bumped, &name, &key));

        let resnapped = patch.clone().with_snapshot_mac(vec![8u8; 32]);
        prop_assert_ne!(mac, generate_patch_mac(&resnapped, &name, &key));
    }

    #[test]
    fn content_mac_is_sensitive(
        key in mac_key_strategy(),
        key_id in prop::collection::vec(any::<u8>(), 0..8),
        data in prop::collection::vec(any::<u8>(), 1..64),
        operation in operation_strategy(),
    ) {
        let mac = generate_content_mac(operation, &data, &key_id, &key);
        prop_assert_eq!(mac, generate_content_mac(operation, &data, &key_id, &key));

        let other_op = match operation {
            Operation::Set => Operation::Remove,
            Operation::Remove => Operation::Set,
        };
        prop_assert_ne!(mac, generate_content_mac(other_op, &data, &key_id, &key));

        // Move the first data byte into the key ID: same concatenation, new boundary.
        let mut shifted_key_id = key_id.clone();
        shifted_key_id.push(data[0]);
        prop_assert_ne!(mac, generate_content_mac(operation, &data[1..], &shifted_key_id, &key));

        let mut other_data = data.clone();
        other_data[0] ^= 1;
        prop_assert_ne!(mac, generate_content_mac(operation, &other_data, &key_id, &key));
    }
}
