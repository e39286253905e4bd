use crate::models::User;

/// Legacy CAS clients cannot store usernames longer than this
const LEGACY_USERNAME_LENGTH: usize = 30;

const TOUCHSTONE_DOMAIN: &str = "@touchstonenetwork.net";

/// User field reported as the CAS username
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UsernameField {
    #[default]
    Username,
    Id,
    /// Falls back to the username if no email is known
    Email,
}

impl UsernameField {
    pub fn select<'a>(&self, user: &'a User) -> &'a str {
        match self {
            UsernameField::Username => &user.username,
            UsernameField::Id => &user.id,
            UsernameField::Email => user.email.as_deref().unwrap_or(&user.username),
        }
    }
}

/// Username truncation policy
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UsernameTruncation {
    /// Shorten long usernames to 30 characters
    ///
    /// Deprecated, only required by clients with a fixed size username column.
    #[default]
    Legacy,

    /// Report usernames as they are
    Disabled,
}

impl UsernameTruncation {
    pub fn apply(&self, username: &str) -> String {
        match self {
            UsernameTruncation::Disabled => username.to_owned(),
            UsernameTruncation::Legacy => {
                if username.chars().count() <= LEGACY_USERNAME_LENGTH {
                    return username.to_owned();
                }

                let head: String = username.chars().take(LEGACY_USERNAME_LENGTH).collect();
                if head.contains('@') {
                    head
                } else if username.ends_with(TOUCHSTONE_DOMAIN) {
                    let local = username.split(TOUCHSTONE_DOMAIN).next().unwrap_or_default();
                    let local: String = local.chars().take(LEGACY_USERNAME_LENGTH - 3).collect();

                    format!("{local}@tn")
                } else {
                    let head: String = username.chars().take(LEGACY_USERNAME_LENGTH - 1).collect();

                    format!("{head}@")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".into(),
            username: "alice".into(),
            email: None,
        }
    }

    #[test]
    fn email_falls_back_to_username() {
        let mut user = user();
        assert_eq!(UsernameField::Email.select(&user), "alice");

        user.email = Some("alice@example.com".into());
        assert_eq!(UsernameField::Email.select(&user), "alice@example.com");
        assert_eq!(UsernameField::Id.select(&user), "01ARZ3NDEKTSV4RRFFQ69G5FAV");
    }

    #[test]
    fn short_usernames_are_untouched() {
        let exactly_thirty = "a".repeat(30);
        assert_eq!(UsernameTruncation::Legacy.apply("alice"), "alice");
        assert_eq!(UsernameTruncation::Legacy.apply(&exactly_thirty), exactly_thirty);
    }

    #[test]
    fn keeps_head_when_it_contains_at() {
        let username = "bob@averyveryverylongdomainname.example";
        assert_eq!(
            UsernameTruncation::Legacy.apply(username),
            "bob@averyveryverylongdomainnam"
        );
    }

    #[test]
    fn shortens_touchstone_addresses() {
        let local = "c".repeat(32);
        let username = format!("{local}@touchstonenetwork.net");

        assert_eq!(
            UsernameTruncation::Legacy.apply(&username),
            format!("{}@tn", "c".repeat(27))
        );
    }

    #[test]
    fn marks_other_long_usernames() {
        let username = "d".repeat(40);
        assert_eq!(
            UsernameTruncation::Legacy.apply(&username),
            format!("{}@", "d".repeat(29))
        );
    }

    #[test]
    fn disabled_keeps_everything() {
        let username = "d".repeat(40);
        assert_eq!(UsernameTruncation::Disabled.apply(&username), username);
    }
}
