//! # App State Protocol
//!
//! Decoded app state sync records.
//!
//! This crate provides:
//! - [`Operation`] codes for mutations
//! - [`SyncdRecord`] and [`SyncdMutation`], one keyed record change
//! - [`SyncdPatch`] and [`SyncdSnapshot`], the units a server sends
//! - [`CollectionName`] for the independently synchronized collections
//!
//! Wire decoding happens upstream. Records here are already decoded, and the
//! only validation performed is the one every consumer relies on: a value
//! blob always ends with a 32-byte value MAC.
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod error;
mod operation;
mod patch;
mod record;

pub use collection::CollectionName;
pub use error::{ProtocolError, ProtocolResult};
pub use operation::Operation;
pub use patch::{SyncdPatch, SyncdSnapshot};
pub use record::{SyncdMutation, SyncdRecord, ValueMac, VALUE_MAC_SIZE};
