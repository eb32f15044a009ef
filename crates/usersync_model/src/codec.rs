//! JSON wire codec.
//!
//! The remote endpoint serves users as a JSON array of profile objects and
//! accepts favorite changes as `PATCH /users/{id}` with a `{"isFavorite": bool}`
//! body. Locally-owned flags are optional on decode so that server payloads,
//! which never carry them, decode with both flags cleared.

use crate::error::{ModelError, ModelResult};
use crate::user::{FavoriteUpdate, User, UserId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoritePatch {
    is_favorite: bool,
}

/// Decodes a JSON array of users.
pub fn decode_users(bytes: &[u8]) -> ModelResult<Vec<User>> {
    serde_json::from_slice(bytes).map_err(ModelError::Decode)
}

/// Encodes users as a pretty-printed JSON array.
pub fn encode_users(users: &[User]) -> ModelResult<Vec<u8>> {
    serde_json::to_vec_pretty(users).map_err(ModelError::Encode)
}

/// Encodes the request body for a favorite change.
pub fn encode_favorite_patch(update: &FavoriteUpdate) -> ModelResult<Vec<u8>> {
    serde_json::to_vec(&FavoritePatch {
        is_favorite: update.is_favorite,
    })
    .map_err(ModelError::Encode)
}

/// Decodes a favorite change body addressed to `id`.
pub fn decode_favorite_patch(id: UserId, bytes: &[u8]) -> ModelResult<FavoriteUpdate> {
    let patch: FavoritePatch = serde_json::from_slice(bytes).map_err(ModelError::Decode)?;
    Ok(FavoriteUpdate::new(id, patch.is_favorite))
}
