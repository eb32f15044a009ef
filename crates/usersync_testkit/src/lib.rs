//! # usersync testkit
//!
//! Test utilities for usersync.
//!
//! This crate provides:
//! - Wire-format vectors captured from the user endpoint
//! - Fixtures: sample users, record builders and temporary file stores
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use usersync_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_file_store(|store, _path| {
//!         store.upsert_all(&sample_users()).unwrap();
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use vectors::*;
