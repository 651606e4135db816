//! # App State Core
//!
//! Integrity verification for incrementally synchronized app state.
//!
//! This crate provides:
//! - [`HashState`]: version, LtHash accumulator and mutation log of one collection
//! - [`HashState::update_hash`]: folds one patch's mutations into the accumulator
//! - [`mac`]: snapshot, patch, content and index MACs
//! - [`PatchLookup`] and [`ValueMacStore`]: resolving previous values
//! - [`PatchProcessor`]: verified application of patches and snapshots
//!
//! ## Key Invariants
//!
//! - The hash always equals the LtHash of the value MACs of exactly the
//!   records currently SET, never a partial update
//! - A REMOVE must resolve to a previous SET value, or the patch fails
//! - A failed patch leaves version and hash unchanged
//! - Keys and collection names are explicit parameters, never global state
//!
//! ## Example
//!
//! ```
//! use appstate_core::HashState;
//! use appstate_protocol::{SyncdMutation, SyncdRecord};
//!
//! let mut value = b"encrypted action".to_vec();
//! value.extend_from_slice(&[7u8; 32]);
//! let record = SyncdRecord::new(b"index mac".to_vec(), value, vec![0, 1]).unwrap();
//!
//! let mut state = HashState::new();
//! state.update_hash(&[SyncdMutation::set(record)], |_, _| None).unwrap();
//! state.version = 1;
//! ```
//!
//! Everything is synchronous and performs no I/O. Concurrent calls against
//! the same [`HashState`] must be serialized by the caller; independent
//! collections use independent states and may be processed in parallel.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod encoding;
mod error;
mod keys;
mod lookup;
pub mod mac;
mod processor;
mod state;

pub use config::ProcessorConfig;
pub use encoding::{u64_to_bytes, U64_SIZE};
pub use error::{CoreError, CoreResult};
pub use keys::{MacKey, MacKeys, KEY_SIZE};
pub use lookup::{MemoryValueMacStore, PatchLookup, ValueMacStore};
pub use mac::{MacBytes, MAC_SIZE};
pub use processor::{AppliedPatch, PatchProcessor};
pub use state::{HashState, HashUpdate, Mutation};
