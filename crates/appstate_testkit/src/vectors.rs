//! Golden vectors for the MACs and the LtHash.
//!
//! Expected values were computed with an independent HMAC and HKDF
//! implementation and must stay byte-identical across implementations.
//! [`vectors_to_json`] exports them for other clients.

use serde::{Deserialize, Serialize};

/// Fingerprint `00 01 02 .. 1f` used by several vectors.
pub const FINGERPRINT_ONE_HEX: &str =
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// Fingerprint of 32 bytes of `0xab`.
pub const FINGERPRINT_TWO_HEX: &str =
    "abababababababababababababababababababababababababababababababab";

/// Inputs of one MAC construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MacInput {
    /// Snapshot MAC inputs.
    Snapshot {
        /// Accumulator (hex).
        hash_hex: String,
        /// State version.
        version: u64,
        /// Collection name.
        collection: String,
    },
    /// Patch MAC inputs.
    Patch {
        /// Snapshot MAC the patch carries (hex).
        snapshot_mac_hex: String,
        /// Value MAC of each mutation in order (hex).
        value_macs_hex: Vec<String>,
        /// Patch version.
        version: u64,
        /// Collection name.
        collection: String,
    },
    /// Content MAC inputs.
    Content {
        /// Operation code (0 = SET, 1 = REMOVE).
        operation: u8,
        /// Key ID (hex).
        key_id_hex: String,
        /// Content bytes (hex).
        data_hex: String,
    },
    /// Index MAC inputs.
    Index {
        /// Encoded index (hex).
        index_hex: String,
    },
}

/// One MAC test vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// HMAC key (hex).
    pub key_hex: String,
    /// Construction inputs.
    pub input: MacInput,
    /// Expected 32-byte MAC (hex).
    pub expected_hex: String,
}

/// One LtHash test vector: a zero buffer plus `added`, minus `removed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtHashVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Elements added (hex).
    pub added_hex: Vec<String>,
    /// Elements removed (hex).
    pub removed_hex: Vec<String>,
    /// Expected 128-byte buffer (hex).
    pub expected_hex: String,
}

/// Accumulator after adding [`FINGERPRINT_ONE_HEX`] to zero.
pub const HASH_ONE_HEX: &str = concat!(
    "fa29a23a1edb970a8db0b86d1ae94d4461209cbea2dae9dc39ef1ba696d72130",
    "42d167b5db383efd034591861867ae2746357ecee3bccd070b1110e0abb6f18c",
    "91d687194dd9f7ea2d474f815bed0adb07fd6256915d9bda410982dab7bc7e07",
    "f525caf02ef2bc7b9f8d7b70469ab8ada2fc32c2c718728f04d0d340a6a368a2",
);

/// Accumulator after adding [`FINGERPRINT_TWO_HEX`] to zero.
pub const HASH_TWO_HEX: &str = concat!(
    "7c4423892e169815db85c2ffdec37b607851a943bc460afeb915c3fe561d30a7",
    "9fc1bef908ecbcf6adbd66a3615bfa672f35df0ebd53376573613f851b8aad4c",
    "5a64cc2565f2d0e69849b446ea11823bdceb322881a1257a80c756add94ceada",
    "37863aa83b97730705e437b49cde627431e7c32b87e463b6ac12637fcf441c72",
);

/// Accumulator after adding both fingerprints to zero.
pub const HASH_ONE_TWO_HEX: &str = concat!(
    "766ec5c34cf12f2068367a6df8acc8a4d97145025e21f3daf204dea4ecf451d7",
    "e19225afe324faf3b002f72979c2a88f756a5ddda010046d7e724f65c6409ed9",
    "eb3a533fb2cbc7d1c59003c845ff8c16e3e8947e12ffc054c1d0d887900968e2",
    "2cac049969892f83a471b224e2781a22d3e3f5ed4efdd545b0e236c075e88414",
);

/// Snapshot MAC of [`HASH_ONE_HEX`] at version 1 in `regular_high`.
pub const SNAPSHOT_MAC_ONE_HEX: &str =
    "ba6efed0f7285976ba25932d9bd1a113a14ce7feea83a926ee667208eb44f82a";

/// LtHash vectors.
pub fn lthash_vectors() -> Vec<LtHashVector> {
    vec![
        LtHashVector {
            id: "lthash_empty".into(),
            added_hex: vec![],
            removed_hex: vec![],
            expected_hex: "00".repeat(128),
        },
        LtHashVector {
            id: "lthash_add_one".into(),
            added_hex: vec![FINGERPRINT_ONE_HEX.into()],
            removed_hex: vec![],
            expected_hex: HASH_ONE_HEX.into(),
        },
        LtHashVector {
            id: "lthash_add_two".into(),
            added_hex: vec![FINGERPRINT_TWO_HEX.into()],
            removed_hex: vec![],
            expected_hex: HASH_TWO_HEX.into(),
        },
        LtHashVector {
            id: "lthash_add_both".into(),
            added_hex: vec![FINGERPRINT_TWO_HEX.into(), FINGERPRINT_ONE_HEX.into()],
            removed_hex: vec![],
            expected_hex: HASH_ONE_TWO_HEX.into(),
        },
        LtHashVector {
            id: "lthash_add_both_remove_two".into(),
            added_hex: vec![FINGERPRINT_ONE_HEX.into(), FINGERPRINT_TWO_HEX.into()],
            removed_hex: vec![FINGERPRINT_TWO_HEX.into()],
            expected_hex: HASH_ONE_HEX.into(),
        },
    ]
}

/// MAC vectors.
pub fn mac_vectors() -> Vec<MacVector> {
    vec![
        MacVector {
            id: "snapshot_zero_state".into(),
            description: "Snapshot MAC of the initial state".into(),
            key_hex: "11".repeat(32),
            input: MacInput::Snapshot {
                hash_hex: "00".repeat(128),
                version: 0,
                collection: "regular_high".into(),
            },
            expected_hex: "62100b209538ee9c4ba48eda417151f40110b0dbaf86646748983b5d6f59ee7e"
                .into(),
        },
        MacVector {
            id: "snapshot_one_record".into(),
            description: "Snapshot MAC after one SET at version 1".into(),
            key_hex: "11".repeat(32),
            input: MacInput::Snapshot {
                hash_hex: HASH_ONE_HEX.into(),
                version: 1,
                collection: "regular_high".into(),
            },
            expected_hex: SNAPSHOT_MAC_ONE_HEX.into(),
        },
        MacVector {
            id: "patch_two_mutations".into(),
            description: "Patch MAC over two value MACs at version 7".into(),
            key_hex: "33".repeat(32),
            input: MacInput::Patch {
                snapshot_mac_hex: SNAPSHOT_MAC_ONE_HEX.into(),
                value_macs_hex: vec![FINGERPRINT_ONE_HEX.into(), FINGERPRINT_TWO_HEX.into()],
                version: 7,
                collection: "regular".into(),
            },
            expected_hex: "c44ab1e8c411796b9dd518f1551bca0ddef42352380257fc274d29a2bf72c080"
                .into(),
        },
        MacVector {
            id: "content_set".into(),
            description: "Content MAC of a SET".into(),
            key_hex: "22".repeat(32),
            input: MacInput::Content {
                operation: 0,
                key_id_hex: "0001".into(),
                data_hex: "63697068657274657874".into(),
            },
            expected_hex: "288ddf56edaa060650274010bce13c669ae8081f421154ef1d8b57dfa169a65e"
                .into(),
        },
        MacVector {
            id: "content_remove".into(),
            description: "Content MAC of a REMOVE over the same data".into(),
            key_hex: "22".repeat(32),
            input: MacInput::Content {
                operation: 1,
                key_id_hex: "0001".into(),
                data_hex: "63697068657274657874".into(),
            },
            expected_hex: "139cfc925601f3053dd8ccaba1a9f96b3d438cd86903423be6c914323061dd9b"
                .into(),
        },
        MacVector {
            id: "content_boundary_short_key_id".into(),
            description: "key ID \"ab\", data \"cdef\"".into(),
            key_hex: "22".repeat(32),
            input: MacInput::Content {
                operation: 0,
                key_id_hex: "6162".into(),
                data_hex: "63646566".into(),
            },
            expected_hex: "8f08df59e4992df5d7df032976afba63475563077c4a16c9fa4b8ce81ebffaf8"
                .into(),
        },
        MacVector {
            id: "content_boundary_long_key_id".into(),
            description: "key ID \"abcd\", data \"ef\"".into(),
            key_hex: "22".repeat(32),
            input: MacInput::Content {
                operation: 0,
                key_id_hex: "61626364".into(),
                data_hex: "6566".into(),
            },
            expected_hex: "235a2f528caa09a472095ebd7e50cd4838b0c2bd1d0f0333172458e5b4f20d68"
                .into(),
        },
        MacVector {
            id: "index_contact".into(),
            description: "Index MAC of a contact index".into(),
            key_hex: "44".repeat(32),
            input: MacInput::Index {
                index_hex: crate::golden::hex_encode(br#"["contact","123@s.whatsapp.net"]"#),
            },
            expected_hex: "b0e214cb07051c51afc6f415eaa6fca914af8c1d52000ba00e11cce10380b89e"
                .into(),
        },
    ]
}

/// Serializes MAC vectors as pretty JSON.
pub fn vectors_to_json(vectors: &[MacVector]) -> String {
    serde_json::to_string_pretty(vectors).expect("vectors are always serializable")
}

/// Parses MAC vectors from JSON.
pub fn vectors_from_json(json: &str) -> serde_json::Result<Vec<MacVector>> {
    serde_json::from_str(json)
}
