//! # App State LtHash
//!
//! Additive homomorphic hash used to accumulate the fingerprints of every
//! record currently present in an app state collection.
//!
//! This crate provides:
//! - [`LtHash`], parameterised by its HKDF info string
//! - [`LtHash::PATCH_INTEGRITY`], the instance used for patch integrity
//! - [`Accumulator`], the seam the updater in `appstate_core` is generic over
//!
//! ## Construction
//!
//! The state is a 128-byte buffer read as 64 little-endian `u16` lanes.
//! An element is expanded to 128 bytes with HKDF-SHA256 (no salt, the
//! instance's info string) and added to or subtracted from every lane with
//! wrapping arithmetic. Because lane arithmetic is modulo 2^16:
//!
//! - additions and subtractions commute, so list order never matters
//! - subtracting an element exactly undoes adding it
//!
//! ```
//! use appstate_lthash::{LtHash, HASH_SIZE};
//!
//! let lthash = LtHash::PATCH_INTEGRITY;
//! let mut hash = [0u8; HASH_SIZE];
//!
//! lthash.add(&mut hash, b"alice");
//! lthash.add(&mut hash, b"bob");
//! lthash.subtract(&mut hash, b"alice");
//!
//! let mut expected = [0u8; HASH_SIZE];
//! lthash.add(&mut expected, b"bob");
//! assert_eq!(hash, expected);
//! ```
//!
//! Adding the same element 2^16 times wraps every lane back to where it
//! started. Callers feed fingerprints of distinct records, which keeps this
//! out of reach in practice.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use hkdf::Hkdf;
use sha2::Sha256;

/// Size of the accumulator buffer in bytes.
pub const HASH_SIZE: usize = 128;

/// HKDF info string of the patch integrity instance.
pub const PATCH_INTEGRITY_INFO: &[u8] = b"WhatsApp Patch Integrity";

/// The accumulator buffer.
pub type HashBuffer = [u8; HASH_SIZE];

/// A homomorphic accumulator over a fixed-size buffer.
///
/// Implementations must produce the same buffer regardless of the order of
/// elements within `subtract` and within `add`, and must be bit-compatible
/// with the remote peer's accumulator after the same mutation history.
pub trait Accumulator {
    /// Removes every element of `subtract`, then adds every element of `add`.
    fn subtract_then_add_in_place<T: AsRef<[u8]>>(
        &self,
        base: &mut HashBuffer,
        subtract: &[T],
        add: &[T],
    );
}

/// Lattice hash parameterised by its HKDF expansion info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LtHash {
    info: &'static [u8],
}

impl LtHash {
    /// The instance used for app state patch integrity.
    pub const PATCH_INTEGRITY: LtHash = LtHash::new(PATCH_INTEGRITY_INFO);

    /// Creates an instance with the given HKDF info string.
    pub const fn new(info: &'static [u8]) -> Self {
        Self { info }
    }

    /// Returns the HKDF info string.
    pub fn info(&self) -> &'static [u8] {
        self.info
    }

    /// Expands an element to a full buffer of lane values.
    #[must_use]
    pub fn expand(&self, item: &[u8]) -> HashBuffer {
        let hk = Hkdf::<Sha256>::new(None, item);
        let mut out = [0u8; HASH_SIZE];
        hk.expand(self.info, &mut out)
            .expect("128 bytes is a valid HKDF-SHA256 output length");
        out
    }

    /// Adds one element to `base`.
    pub fn add(&self, base: &mut HashBuffer, item: &[u8]) {
        pointwise(base, &self.expand(item), Lane::Add);
    }

    /// Subtracts one element from `base`.
    pub fn subtract(&self, base: &mut HashBuffer, item: &[u8]) {
        pointwise(base, &self.expand(item), Lane::Subtract);
    }

    /// Like [`subtract_then_add_in_place`](Accumulator::subtract_then_add_in_place),
    /// but leaves `base` untouched and returns the result.
    #[must_use]
    pub fn subtract_then_add<T: AsRef<[u8]>>(
        &self,
        base: &HashBuffer,
        subtract: &[T],
        add: &[T],
    ) -> HashBuffer {
        let mut out = *base;
        self.subtract_then_add_in_place(&mut out, subtract, add);
        out
    }
}

impl Default for LtHash {
    fn default() -> Self {
        Self::PATCH_INTEGRITY
    }
}

impl Accumulator for LtHash {
    fn subtract_then_add_in_place<T: AsRef<[u8]>>(
        &self,
        base: &mut HashBuffer,
        subtract: &[T],
        add: &[T],
    ) {
        for item in subtract {
            self.subtract(base, item.as_ref());
        }
        for item in add {
            self.add(base, item.as_ref());
        }
    }
}

#[derive(Clone, Copy)]
enum Lane {
    Add,
    Subtract,
}

fn pointwise(base: &mut HashBuffer, input: &HashBuffer, lane: Lane) {
    for (x, y) in base.chunks_exact_mut(2).zip(input.chunks_exact(2)) {
        let a = u16::from_le_bytes([x[0], x[1]]);
        let b = u16::from_le_bytes([y[0], y[1]]);
        let result = match lane {
            Lane::Add => a.wrapping_add(b),
            Lane::Subtract => a.wrapping_sub(b),
        };
        x.copy_from_slice(&result.to_le_bytes());
    }
}
