//! Property-based test generators using proptest.

use crate::fixtures::unsigned_mutation;
use appstate_protocol::{CollectionName, Operation, SyncdMutation, ValueMac};
use proptest::prelude::*;

/// Strategy for value MACs.
pub fn value_mac_strategy() -> impl Strategy<Value = ValueMac> {
    prop::array::uniform32(any::<u8>())
}

/// Strategy for index MAC blobs.
pub fn index_mac_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 32)
}

/// Strategy for HMAC keys of any length, including empty.
pub fn mac_key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..96)
}

/// Strategy for operations.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![Just(Operation::Set), Just(Operation::Remove)]
}

/// Strategy for collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = CollectionName> {
    prop::string::string_regex("[a-z][a-z_]{0,23}")
        .expect("Invalid regex")
        .prop_map(CollectionName::new)
}

/// Strategy for a batch of SET mutations on distinct indexes.
pub fn set_batch_strategy(max_len: usize) -> impl Strategy<Value = Vec<SyncdMutation>> {
    prop::collection::hash_map(index_mac_strategy(), value_mac_strategy(), 1..=max_len).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(index_mac, value_mac)| {
                    unsigned_mutation(Operation::Set, &index_mac, value_mac)
                })
                .collect()
        },
    )
}
