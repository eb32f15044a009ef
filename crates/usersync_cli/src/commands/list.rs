//! List command implementation.

use super::Format;
use crate::app::App;
use crate::error::CliResult;
use usersync_engine::filter_users;
use usersync_model::User;

/// Which stored users to print.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Only favorites.
    pub favorites: bool,
    /// Only records awaiting reconciliation.
    pub pending: bool,
    /// Search query over name, email, city and phone.
    pub search: Option<String>,
}

/// Runs the list command.
pub fn run(app: &App, options: &ListOptions, format: Format) -> CliResult<()> {
    let users = select(app.engine().users()?, options);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&users)?),
        Format::Text => {
            for user in &users {
                println!("{}", render(user));
            }
            println!("{} users", users.len());
        }
    }

    Ok(())
}

fn select(users: Vec<User>, options: &ListOptions) -> Vec<User> {
    let users = match options.search.as_deref() {
        Some(query) => filter_users(&users, query),
        None => users,
    };
    users
        .into_iter()
        .filter(|u| !options.favorites || u.is_favorite)
        .filter(|u| !options.pending || u.pending_sync)
        .collect()
}

fn render(user: &User) -> String {
    let star = if user.is_favorite { '*' } else { ' ' };
    let pending = if user.pending_sync { " (pending)" } else { "" };
    format!(
        "[{}] {:>3}  {:<24} {:<28} {:<16} {}{}",
        star, user.id, user.name, user.email, user.address.city, user.phone, pending
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use usersync_model::{Address, Company};

    fn user(id: u32, name: &str, city: &str, is_favorite: bool, pending_sync: bool) -> User {
        User {
            id,
            name: name.into(),
            username: name.to_lowercase(),
            email: format!("{}@example.com", id),
            phone: "555-0100".into(),
            website: "example.com".into(),
            address: Address {
                city: city.into(),
                ..Address::default()
            },
            company: Company::default(),
            is_favorite,
            pending_sync,
        }
    }

    #[test]
    fn select_combines_filters() {
        let users = vec![
            user(1, "Leanne Graham", "Gwenborough", true, true),
            user(2, "Ervin Howell", "Wisokyburgh", true, false),
            user(3, "Clementine Bauch", "McKenziehaven", false, false),
        ];

        let favorites = select(
            users.clone(),
            &ListOptions {
                favorites: true,
                ..Default::default()
            },
        );
        assert_eq!(favorites.len(), 2);

        let pending = select(
            users.clone(),
            &ListOptions {
                pending: true,
                ..Default::default()
            },
        );
        assert_eq!(pending[0].id, 1);

        let searched = select(
            users,
            &ListOptions {
                favorites: true,
                search: Some("wiso".into()),
                ..Default::default()
            },
        );
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].id, 2);
    }

    #[test]
    fn render_marks_flags() {
        let line = render(&user(1, "Leanne Graham", "Gwenborough", true, true));
        assert!(line.starts_with("[*]"));
        assert!(line.ends_with("(pending)"));

        let line = render(&user(2, "Ervin Howell", "Wisokyburgh", false, false));
        assert!(line.starts_with("[ ]"));
        assert!(!line.contains("pending"));
    }
}
