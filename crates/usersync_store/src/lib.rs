//! # usersync store
//!
//! Local store trait and implementations for usersync.
//!
//! The local store exclusively owns durable user records, including the two
//! device-owned flags (`is_favorite`, `pending_sync`). The sync engine never
//! writes records by any other path.
//!
//! ## Design Principles
//!
//! - Records are keyed by user ID; batch writes are insert-or-replace
//! - Full scans are ordered by name
//! - Stores are `Send + Sync` and serialize writes internally, so a flag
//!   update racing a batch upsert is never lost halfway
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - For testing and ephemeral sessions
//! - [`FileStore`] - Durable JSON snapshot on disk
//!
//! ## Example
//!
//! ```rust
//! use usersync_store::{InMemoryStore, LocalStore};
//!
//! let store = InMemoryStore::new();
//! assert_eq!(store.count().unwrap(), 0);
//! assert!(store.get_by_id(1).unwrap().is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod records;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use store::LocalStore;
