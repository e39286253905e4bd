use reqwest::Url;

/// Service URL matching policy
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ServiceMatching {
    /// Compare host, port and path only
    ///
    /// Scheme and query string are ignored so existing clients which append
    /// their own parameters keep working. This is weaker than `Strict`.
    #[default]
    Legacy,

    /// Additionally require scheme and query string to match
    Strict,
}

impl ServiceMatching {
    /// Check whether the presented service URL is the one a ticket was issued for
    pub fn matches(&self, issued: &str, presented: &str) -> bool {
        let (Ok(issued), Ok(presented)) = (Url::parse(issued), Url::parse(presented)) else {
            return false;
        };

        let same_location = issued.host_str() == presented.host_str()
            && issued.port() == presented.port()
            && issued.path() == presented.path();

        match self {
            ServiceMatching::Legacy => same_location,
            ServiceMatching::Strict => {
                same_location
                    && issued.scheme() == presented.scheme()
                    && issued.query() == presented.query()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceMatching;

    #[test]
    fn legacy_ignores_query_and_scheme() {
        let policy = ServiceMatching::Legacy;

        assert!(policy.matches("https://app.example/cb", "https://app.example/cb?lang=en"));
        assert!(policy.matches("https://app.example/cb?a=1", "https://app.example/cb?a=2"));
        assert!(policy.matches("https://app.example/cb", "http://app.example/cb"));
    }

    #[test]
    fn legacy_compares_host_port_and_path() {
        let policy = ServiceMatching::Legacy;

        assert!(!policy.matches("https://app.example/cb", "https://evil.example/cb"));
        assert!(!policy.matches("https://app.example/cb", "https://app.example:8443/cb"));
        assert!(!policy.matches("https://app.example/cb", "https://app.example/other"));
    }

    #[test]
    fn strict_compares_everything() {
        let policy = ServiceMatching::Strict;

        assert!(policy.matches("https://app.example/cb?a=1", "https://app.example/cb?a=1"));
        assert!(!policy.matches("https://app.example/cb", "https://app.example/cb?lang=en"));
        assert!(!policy.matches("https://app.example/cb", "http://app.example/cb"));
    }

    #[test]
    fn unparseable_urls_never_match() {
        assert!(!ServiceMatching::Legacy.matches("not a url", "not a url"));
    }
}
