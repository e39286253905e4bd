mod attributes;
mod expiry;
mod proxy_callback;
mod service_matching;
mod username;

pub use attributes::*;
pub use expiry::*;
pub use proxy_callback::*;
pub use service_matching::*;
pub use username::*;

/// CAS provider configuration
#[derive(Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Ticket lifetimes
    pub expiry: TicketExpiry,

    /// Which user field is reported as the CAS username
    pub username_field: UsernameField,

    /// Legacy 30 character username limit
    pub username_truncation: UsernameTruncation,

    /// Dialect used to render custom attributes
    pub attribute_format: AttributeFormat,

    /// Whether logout redirects straight to the given URL
    pub auto_redirect_after_logout: bool,

    /// How presented service URLs are compared to issued ones
    pub service_matching: ServiceMatching,

    /// Proxy callback delivery
    pub proxy_callback: ProxyCallbackConfig,
}
