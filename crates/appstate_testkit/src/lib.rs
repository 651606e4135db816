//! # App State Testkit
//!
//! Test utilities for app state integrity verification.
//!
//! This crate provides:
//! - Fixtures: deterministic keys, signed mutations and [`ServerCollection`],
//!   which plays the server's side of a collection
//! - Property-based test generators using proptest
//! - Golden vectors for the MACs and the LtHash
//! - Hex helpers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use appstate_testkit::prelude::*;
//!
//! let mut server = ServerCollection::new("regular");
//! server.set(b"contact:alice", b"{...}");
//! let patch = server.seal_patch();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod golden;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::golden::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use golden::*;
pub use vectors::*;
