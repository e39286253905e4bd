/// Identity of an authenticated user
///
/// Credential checks happen outside of the provider, tickets only carry
/// the outcome.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique Id
    pub id: String,

    /// Login name
    pub username: String,

    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
