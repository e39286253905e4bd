/// Plain text response to a successful `/validate`
pub fn success(username: &str) -> String {
    format!("yes\n{username}\n")
}

/// Plain text response to any failed `/validate`
pub fn failure() -> String {
    "no\n\n".to_owned()
}
