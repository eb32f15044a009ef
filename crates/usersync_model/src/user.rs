//! User records.

use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
pub type UserId = u32;

/// A user record.
///
/// Profile fields are owned by the server and replaced wholesale on every
/// fetch. `is_favorite` and `pending_sync` are owned by the device: the
/// server never supplies them, so both default to `false` when a record is
/// decoded from a remote payload.
///
/// # Invariants
///
/// - `pending_sync` is true only while a local favorite change has not been
///   acknowledged by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Full name.
    pub name: String,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Phone number, free-form.
    pub phone: String,
    /// Personal website.
    pub website: String,
    /// Postal address.
    pub address: Address,
    /// Employer.
    pub company: Company,
    /// Whether the user marked this record as a favorite.
    #[serde(default)]
    pub is_favorite: bool,
    /// Whether a local favorite change still has to reach the server.
    #[serde(default)]
    pub pending_sync: bool,
}

impl User {
    /// Returns the favorite state of this record as an update for the server.
    pub fn favorite_update(&self) -> FavoriteUpdate {
        FavoriteUpdate {
            id: self.id,
            is_favorite: self.is_favorite,
        }
    }
}

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// Street name.
    pub street: String,
    /// Suite or apartment.
    pub suite: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub zipcode: String,
    /// Coordinates.
    pub geo: Geo,
}

/// Geographic coordinates, kept as the server formats them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geo {
    /// Latitude.
    pub lat: String,
    /// Longitude.
    pub lng: String,
}

/// Company information.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Company name.
    pub name: String,
    /// Marketing slogan.
    pub catch_phrase: String,
    /// Business summary.
    pub bs: String,
}

/// A favorite change to transmit to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteUpdate {
    /// The user the change applies to.
    pub id: UserId,
    /// The new favorite state.
    pub is_favorite: bool,
}

impl FavoriteUpdate {
    /// Creates a new favorite update.
    pub fn new(id: UserId, is_favorite: bool) -> Self {
        Self { id, is_favorite }
    }
}

impl From<&User> for FavoriteUpdate {
    fn from(user: &User) -> Self {
        user.favorite_update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorite_update_from_user() {
        let user = User {
            id: 7,
            name: "Kurtis Weissnat".into(),
            username: "Elwyn.Skiles".into(),
            email: "Telly.Hoeger@billy.biz".into(),
            phone: "210.067.6132".into(),
            website: "elvis.io".into(),
            address: Address::default(),
            company: Company::default(),
            is_favorite: true,
            pending_sync: true,
        };

        let update = FavoriteUpdate::from(&user);
        assert_eq!(update, FavoriteUpdate::new(7, true));
    }
}
