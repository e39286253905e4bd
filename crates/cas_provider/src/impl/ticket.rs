use iso8601_timestamp::Timestamp;
use reqwest::Url;

use crate::{
    models::{LoginTicket, Origin, ProxyGrantingTicket, ServiceTicket, TicketKind, User},
    util::generate_ticket_id,
    CasProvider, Error, Result, Success,
};

impl LoginTicket {
    /// Mint a new login ticket
    pub fn new() -> LoginTicket {
        LoginTicket {
            id: generate_ticket_id(TicketKind::Login.prefix()),
            created_at: Timestamp::now_utc(),
            consumed: false,
        }
    }

    /// Save model
    pub async fn save(&self, cas: &CasProvider) -> Success {
        cas.database.save_login_ticket(self).await
    }

    /// Check if this login ticket has expired
    pub fn is_expired(&self, cas: &CasProvider) -> bool {
        cas.config
            .expiry
            .ticket_expired(&self.created_at, &Timestamp::now_utc())
    }
}

impl Default for LoginTicket {
    fn default() -> LoginTicket {
        LoginTicket::new()
    }
}

impl ServiceTicket {
    /// Mint a new service ticket, or a proxy ticket if the origin is a proxy
    pub fn new(user: User, service: String, origin: Origin) -> ServiceTicket {
        let kind = match origin {
            Origin::Login => TicketKind::Service,
            Origin::Proxy { .. } => TicketKind::Proxy,
        };

        ServiceTicket {
            id: generate_ticket_id(kind.prefix()),
            user,
            service,
            origin,
            created_at: Timestamp::now_utc(),
            consumed: false,
        }
    }

    /// Save model
    pub async fn save(&self, cas: &CasProvider) -> Success {
        cas.database.save_service_ticket(self).await
    }

    pub fn kind(&self) -> TicketKind {
        match self.origin {
            Origin::Login => TicketKind::Service,
            Origin::Proxy { .. } => TicketKind::Proxy,
        }
    }

    /// Check if this ticket has expired
    pub fn is_expired(&self, cas: &CasProvider) -> bool {
        cas.config
            .expiry
            .ticket_expired(&self.created_at, &Timestamp::now_utc())
    }

    /// Service URL with this ticket appended, keeping existing parameters
    pub fn redirect_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.service).map_err(|_| Error::InvalidService)?;
        url.query_pairs_mut().append_pair("ticket", &self.id);
        Ok(url)
    }
}

impl ProxyGrantingTicket {
    /// Mint a new proxy granting ticket during validation of `granted_for`
    pub fn new(granted_for: &ServiceTicket, callback_url: String) -> ProxyGrantingTicket {
        ProxyGrantingTicket {
            id: generate_ticket_id(TicketKind::ProxyGranting.prefix()),
            iou: generate_ticket_id("PGTIOU"),
            user: granted_for.user.clone(),
            granted_for: granted_for.id.clone(),
            callback_url,
            created_at: Timestamp::now_utc(),
        }
    }

    /// Save model
    pub async fn save(&self, cas: &CasProvider) -> Success {
        cas.database.save_proxy_granting_ticket(self).await
    }

    /// Check if this proxy granting ticket may no longer be used
    pub fn is_expired(&self, cas: &CasProvider) -> bool {
        cas.config
            .expiry
            .proxy_granting_ticket_expired(&self.created_at, &Timestamp::now_utc())
    }

    /// Callback URL carrying this ticket and its IOU
    ///
    /// Existing query parameters are kept, except for stale `pgtId`/`pgtIou`.
    pub fn delivery_url(&self, callback_url: &Url) -> Url {
        let existing: Vec<(String, String)> = callback_url
            .query_pairs()
            .filter(|(key, _)| key != "pgtId" && key != "pgtIou")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut url = callback_url.clone();
        url.set_query(None);
        url.query_pairs_mut()
            .extend_pairs(existing)
            .append_pair("pgtId", &self.id)
            .append_pair("pgtIou", &self.iou);

        url
    }
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    #[test]
    fn ticket_prefixes() {
        let ticket = ServiceTicket::new(alice(), APP.into(), Origin::Login);
        assert!(ticket.id.starts_with("ST-"));
        assert_eq!(TicketKind::from_id(&ticket.id), Some(TicketKind::Service));

        let pgt = ProxyGrantingTicket::new(&ticket, "https://proxy.example/pgt".into());
        assert!(pgt.id.starts_with("PGT-"));
        assert!(pgt.iou.starts_with("PGTIOU-"));
        assert_eq!(pgt.granted_for, ticket.id);
        assert_eq!(TicketKind::from_id(&pgt.iou), None);

        let proxy_ticket = ServiceTicket::new(
            alice(),
            APP.into(),
            Origin::Proxy {
                proxy_granting_ticket: pgt.id,
            },
        );
        assert!(proxy_ticket.id.starts_with("PT-"));
        assert_eq!(proxy_ticket.kind(), TicketKind::Proxy);

        assert!(LoginTicket::new().id.starts_with("LT-"));
    }

    #[test]
    fn unknown_prefixes() {
        assert_eq!(TicketKind::from_id("XT-abc"), None);
        assert_eq!(TicketKind::from_id("ST-"), None);
        assert_eq!(TicketKind::from_id("ST"), None);
    }

    #[test]
    fn redirect_keeps_existing_query() {
        let ticket = ServiceTicket::new(
            alice(),
            "https://app.example/cb?next=/home page".into(),
            Origin::Login,
        );

        assert_eq!(
            ticket.redirect_url().unwrap().as_str(),
            format!("https://app.example/cb?next=/home%20page&ticket={}", ticket.id)
        );
    }

    #[test]
    fn redirect_requires_url() {
        let ticket = ServiceTicket::new(alice(), "not a url".into(), Origin::Login);
        assert_eq!(ticket.redirect_url(), Err(Error::InvalidService));
    }

    #[test]
    fn delivery_url_keeps_existing_query() {
        let ticket = ServiceTicket::new(alice(), APP.into(), Origin::Login);
        let pgt = ProxyGrantingTicket::new(&ticket, "https://proxy.example/pgt".into());
        let callback = "https://proxy.example/pgt?app=1&pgtId=stale".parse().unwrap();

        assert_eq!(
            pgt.delivery_url(&callback).as_str(),
            format!(
                "https://proxy.example/pgt?app=1&pgtId={}&pgtIou={}",
                pgt.id, pgt.iou
            )
        );
    }

    #[async_std::test]
    async fn expires_after_configured_lifetime() {
        let (cas, _) = for_test();

        let mut ticket = ServiceTicket::new(alice(), APP.into(), Origin::Login);
        assert!(!ticket.is_expired(&cas));

        ticket.created_at = Timestamp::UNIX_EPOCH;
        assert!(ticket.is_expired(&cas));
    }
}
