//! Keyed authentication codes for app state.
//!
//! Four constructions, each an HMAC over an explicit, ordered byte
//! concatenation. Field order and encoding are fixed by the wire protocol:
//!
//! | MAC      | Hash    | Input                                                     |
//! |----------|---------|-----------------------------------------------------------|
//! | snapshot | SHA-256 | `hash (128) ‖ be64(version) ‖ name`                        |
//! | patch    | SHA-256 | `snapshot MAC ‖ value MAC₁ … value MACₙ ‖ be64(version) ‖ name` |
//! | content  | SHA-512 | `(op + 1) ‖ key ID ‖ data ‖ be64(len(key ID) + 1)`, first 32 bytes |
//! | index    | SHA-256 | encoded index                                             |
//!
//! Variable-length fields are raw with no length prefix, except for the
//! trailing length in the content MAC. That length pins the boundary
//! between key ID and data, so `("ab", "cdef")` and `("abcd", "ef")` do not
//! collide.
//!
//! The `verify_*` functions compare in constant time.

use crate::encoding::u64_to_bytes;
use crate::error::{CoreError, CoreResult};
use appstate_lthash::HashBuffer;
use appstate_protocol::{CollectionName, Operation, SyncdPatch};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Size of every MAC this module produces.
pub const MAC_SIZE: usize = 32;

/// A 32-byte MAC.
pub type MacBytes = [u8; MAC_SIZE];

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    mac
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> HmacSha512 {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC can take key of any size");
    for part in parts {
        mac.update(part);
    }
    mac
}

fn patch_hmac(patch: &SyncdPatch, name: &CollectionName, key: &[u8]) -> HmacSha256 {
    let mut mac = hmac_sha256(key, &[&patch.snapshot_mac]);
    for mutation in &patch.mutations {
        mac.update(&mutation.value_mac());
    }
    mac.update(&u64_to_bytes(patch.version));
    mac.update(name.as_bytes());
    mac
}

fn content_hmac(operation: Operation, data: &[u8], key_id: &[u8], key: &[u8]) -> HmacSha512 {
    // Operation codes are shifted so that 0 never appears as an operation.
    let operation_byte = [operation.code() + 1];
    let key_data_length = u64_to_bytes(key_id.len() as u64 + 1);
    hmac_sha512(key, &[&operation_byte, key_id, data, &key_data_length])
}

/// Computes the snapshot MAC committing to a whole collection state.
pub fn generate_snapshot_mac(
    hash: &HashBuffer,
    version: u64,
    name: &CollectionName,
    key: &[u8],
) -> MacBytes {
    hmac_sha256(key, &[hash, &u64_to_bytes(version), name.as_bytes()])
        .finalize()
        .into_bytes()
        .into()
}

/// Computes the patch MAC.
///
/// Covers the patch's snapshot MAC, the value MAC of every mutation (SET and
/// REMOVE alike) in order, and the patch's own declared version.
pub fn generate_patch_mac(patch: &SyncdPatch, name: &CollectionName, key: &[u8]) -> MacBytes {
    patch_hmac(patch, name, key).finalize().into_bytes().into()
}

/// Computes the content MAC of a record value.
///
/// This is the value MAC that trails every value blob, computed over the
/// blob's content.
pub fn generate_content_mac(
    operation: Operation,
    data: &[u8],
    key_id: &[u8],
    key: &[u8],
) -> MacBytes {
    let full = content_hmac(operation, data, key_id, key)
        .finalize()
        .into_bytes();
    let mut out = [0u8; MAC_SIZE];
    out.copy_from_slice(&full[..MAC_SIZE]);
    out
}

/// Computes the index MAC of an encoded record index.
pub fn generate_index_mac(index: &[u8], key: &[u8]) -> MacBytes {
    hmac_sha256(key, &[index]).finalize().into_bytes().into()
}

/// Checks a snapshot MAC.
#[must_use]
pub fn verify_snapshot_mac(
    hash: &HashBuffer,
    version: u64,
    name: &CollectionName,
    key: &[u8],
    expected: &[u8],
) -> bool {
    hmac_sha256(key, &[hash, &u64_to_bytes(version), name.as_bytes()])
        .verify_slice(expected)
        .is_ok()
}

/// Checks a patch's own `patch_mac` field.
#[must_use]
pub fn verify_patch_mac(patch: &SyncdPatch, name: &CollectionName, key: &[u8]) -> bool {
    patch_hmac(patch, name, key)
        .verify_slice(&patch.patch_mac)
        .is_ok()
}

/// Checks a content MAC.
#[must_use]
pub fn verify_content_mac(
    operation: Operation,
    data: &[u8],
    key_id: &[u8],
    key: &[u8],
    expected: &[u8],
) -> bool {
    expected.len() == MAC_SIZE
        && content_hmac(operation, data, key_id, key)
            .verify_truncated_left(expected)
            .is_ok()
}

/// Validates a decoded index against its index MAC.
///
/// # Errors
///
/// Returns [`CoreError::MismatchingIndexMac`] if they differ.
pub fn validate_index_mac(index: &[u8], key: &[u8], expected: &[u8]) -> CoreResult<()> {
    hmac_sha256(key, &[index])
        .verify_slice(expected)
        .map_err(|_| CoreError::MismatchingIndexMac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use appstate_lthash::{LtHash, HASH_SIZE};
    use appstate_protocol::{SyncdMutation, SyncdRecord};
    use appstate_testkit::hex_decode;

    fn f1() -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, b) in out.iter_mut().enumerate() {
            *b = i as u8;
        }
        out
    }

    fn record(content: &[u8], value_mac: &[u8; 32]) -> SyncdRecord {
        let mut value = content.to_vec();
        value.extend_from_slice(value_mac);
        SyncdRecord::new(b"index".to_vec(), value, vec![0, 1]).unwrap()
    }

    fn snapshot_fixture() -> HashBuffer {
        let mut hash = [0u8; HASH_SIZE];
        LtHash::PATCH_INTEGRITY.add(&mut hash, &f1());
        hash
    }

    #[test]
    fn snapshot_mac_vector() {
        let name = CollectionName::new(CollectionName::REGULAR_HIGH);
        let mac = generate_snapshot_mac(&snapshot_fixture(), 1, &name, &[0x11; 32]);
        assert_eq!(
            mac.to_vec(),
            hex_decode("ba6efed0f7285976ba25932d9bd1a113a14ce7feea83a926ee667208eb44f82a")
        );

        let zero = generate_snapshot_mac(&[0u8; HASH_SIZE], 0, &name, &[0x11; 32]);
        assert_eq!(
            zero.to_vec(),
            hex_decode("62100b209538ee9c4ba48eda417151f40110b0dbaf86646748983b5d6f59ee7e")
        );
    }

    #[test]
    fn patch_mac_vector() {
        let name = CollectionName::new(CollectionName::REGULAR_HIGH);
        let snapshot_mac = generate_snapshot_mac(&snapshot_fixture(), 1, &name, &[0x11; 32]);

        let patch = SyncdPatch::new(
            7,
            vec![
                SyncdMutation::set(record(b"ciphertext-one", &f1())),
                SyncdMutation::remove(record(b"ciphertext-two", &[0xAB; 32])),
            ],
        )
        .with_snapshot_mac(snapshot_mac.to_vec());

        let regular = CollectionName::new(CollectionName::REGULAR);
        let mac = generate_patch_mac(&patch, &regular, &[0x33; 32]);
        assert_eq!(
            mac.to_vec(),
            hex_decode("c44ab1e8c411796b9dd518f1551bca0ddef42352380257fc274d29a2bf72c080")
        );

        let patch = patch.with_patch_mac(mac.to_vec());
        assert!(verify_patch_mac(&patch, &regular, &[0x33; 32]));
        assert!(!verify_patch_mac(&patch, &name, &[0x33; 32]));
    }

    #[test]
    fn content_mac_vectors() {
        let key = [0x22; 32];
        assert_eq!(
            generate_content_mac(Operation::Set, b"ciphertext", &[0, 1], &key).to_vec(),
            hex_decode("288ddf56edaa060650274010bce13c669ae8081f421154ef1d8b57dfa169a65e")
        );
        assert_eq!(
            generate_content_mac(Operation::Remove, b"ciphertext", &[0, 1], &key).to_vec(),
            hex_decode("139cfc925601f3053dd8ccaba1a9f96b3d438cd86903423be6c914323061dd9b")
        );
    }

    #[test]
    fn content_mac_boundary() {
        let key = [0x22; 32];
        let short_key_id = generate_content_mac(Operation::Set, b"cdef", b"ab", &key);
        let long_key_id = generate_content_mac(Operation::Set, b"ef", b"abcd", &key);

        assert_ne!(short_key_id, long_key_id);
        assert_eq!(
            short_key_id.to_vec(),
            hex_decode("8f08df59e4992df5d7df032976afba63475563077c4a16c9fa4b8ce81ebffaf8")
        );
        assert_eq!(
            long_key_id.to_vec(),
            hex_decode("235a2f528caa09a472095ebd7e50cd4838b0c2bd1d0f0333172458e5b4f20d68")
        );
    }

    #[test]
    fn index_mac_vector() {
        let index = br#"["contact","123@s.whatsapp.net"]"#;
        let key = [0x44; 32];
        let mac = generate_index_mac(index, &key);
        assert_eq!(
            mac.to_vec(),
            hex_decode("b0e214cb07051c51afc6f415eaa6fca914af8c1d52000ba00e11cce10380b89e")
        );

        assert!(validate_index_mac(index, &key, &mac).is_ok());
        assert_eq!(
            validate_index_mac(br#"["contact"]"#, &key, &mac),
            Err(CoreError::MismatchingIndexMac)
        );
    }

    #[test]
    fn verify_snapshot_mac_checks_every_field() {
        let name = CollectionName::new("regular_low");
        let hash = snapshot_fixture();
        let key = [5u8; 32];
        let mac = generate_snapshot_mac(&hash, 3, &name, &key);

        assert!(verify_snapshot_mac(&hash, 3, &name, &key, &mac));
        assert!(!verify_snapshot_mac(&hash, 4, &name, &key, &mac));
        assert!(!verify_snapshot_mac(&[0u8; HASH_SIZE], 3, &name, &key, &mac));
        assert!(!verify_snapshot_mac(&hash, 3, &"regular".into(), &key, &mac));
        assert!(!verify_snapshot_mac(&hash, 3, &name, &[6u8; 32], &mac));
        assert!(!verify_snapshot_mac(&hash, 3, &name, &key, &mac[..16]));
    }

    #[test]
    fn verify_content_mac_rejects_truncated() {
        let key = [0x22; 32];
        let mac = generate_content_mac(Operation::Set, b"data", b"id", &key);

        assert!(verify_content_mac(Operation::Set, b"data", b"id", &key, &mac));
        assert!(!verify_content_mac(Operation::Remove, b"data", b"id", &key, &mac));
        assert!(!verify_content_mac(Operation::Set, b"data", b"id", &key, &mac[..8]));
        assert!(!verify_content_mac(Operation::Set, b"data", b"id", &key, &[]));
    }
}
