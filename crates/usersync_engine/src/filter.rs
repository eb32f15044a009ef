//! Search filtering over a loaded user list.

use usersync_model::User;

/// Returns the users whose name, email, city or phone contains `query`,
/// ignoring case. An empty query returns the full list.
pub fn filter_users(users: &[User], query: &str) -> Vec<User> {
    if query.is_empty() {
        return users.to_vec();
    }

    let needle = query.to_lowercase();
    users
        .iter()
        .filter(|user| matches(user, &needle))
        .cloned()
        .collect()
}

fn matches(user: &User, needle: &str) -> bool {
    [
        user.name.as_str(),
        user.email.as_str(),
        user.address.city.as_str(),
        user.phone.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use usersync_testkit::{sample_user, sample_users};

    #[test]
    fn empty_query_returns_everything() {
        let users = sample_users();
        assert_eq!(filter_users(&users, ""), users);
    }

    #[test]
    fn matches_city_case_insensitively() {
        let users = vec![sample_user(1)];
        let found = filter_users(&users, "gwen");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Leanne Graham");
    }

    #[test]
    fn matches_each_searchable_field() {
        let users = sample_users();
        assert_eq!(filter_users(&users, "ERVIN")[0].id, 2);
        assert_eq!(filter_users(&users, "sincere@april")[0].id, 1);
        assert_eq!(filter_users(&users, "1-463-123-4447")[0].id, 3);
    }

    #[test]
    fn does_not_match_other_fields() {
        let users = vec![sample_user(1)];
        // Username and company are not searchable.
        assert!(filter_users(&users, "Bret").is_empty());
        assert!(filter_users(&users, "Romaguera").is_empty());
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filter_users(&sample_users(), "zzzz").is_empty());
    }
}
