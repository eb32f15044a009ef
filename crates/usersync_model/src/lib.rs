//! # usersync model
//!
//! Data contracts shared by every usersync crate.
//!
//! This crate provides:
//! - [`User`] records with their nested [`Address`], [`Geo`] and [`Company`] values
//! - [`FavoriteUpdate`] for transmitting favorite changes to the server
//! - [`SyncStatus`], the reconciliation state observed by the presentation layer
//! - JSON encoding/decoding for the remote wire format
//!
//! This is a pure data crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod error;
mod status;
mod user;

pub use codec::{decode_favorite_patch, decode_users, encode_favorite_patch, encode_users};
pub use error::{ModelError, ModelResult};
pub use status::SyncStatus;
pub use user::{Address, Company, FavoriteUpdate, Geo, User, UserId};
