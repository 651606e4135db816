//! Fixed-width integer encoding shared by every MAC.

/// Width of an encoded counter.
pub const U64_SIZE: usize = 8;

/// Encodes a 64-bit counter as 8 big-endian bytes.
pub fn u64_to_bytes(value: u64) -> [u8; U64_SIZE] {
    value.to_be_bytes()
}
