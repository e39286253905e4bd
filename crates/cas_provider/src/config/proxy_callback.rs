use std::time::Duration;

/// Proxy callback delivery options
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ProxyCallbackConfig {
    /// Upper bound on a single callback request
    pub timeout_seconds: u64,

    /// Refuse callback URLs which are not `https`
    pub require_https: bool,
}

impl Default for ProxyCallbackConfig {
    fn default() -> ProxyCallbackConfig {
        ProxyCallbackConfig {
            timeout_seconds: 10,
            require_https: true,
        }
    }
}

impl ProxyCallbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
