use crate::{
    models::{ServiceTicket, TicketKind, User, Validation},
    CasEvent, CasProvider, Error, Result,
};

impl CasProvider {
    /// Validate a service or proxy ticket for the given service
    ///
    /// On success the ticket is consumed. If a proxy callback URL is given a
    /// proxy granting ticket is issued, and proxy tickets report the chain of
    /// proxies they passed through.
    pub async fn validate(
        &self,
        ticket: Option<&str>,
        service: Option<&str>,
        proxy_callback_url: Option<&str>,
    ) -> Result<Validation> {
        let ticket = self.consume_ticket(ticket, service).await?;

        let proxy_granting_ticket_iou = match proxy_callback_url {
            Some(callback_url) => self
                .issue_proxy_granting_ticket(callback_url, &ticket)
                .await?
                .map(|pgt| pgt.iou),
            None => None,
        };

        let proxies = match ticket.kind() {
            TicketKind::Proxy => self.resolve_proxy_chain(&ticket).await?,
            _ => vec![],
        };

        self.publish_event(CasEvent::ValidateTicket {
            user_id: ticket.user.id.clone(),
            service: ticket.service.clone(),
        })
        .await;

        Ok(Validation {
            user: ticket.user,
            proxy_granting_ticket_iou,
            proxies,
        })
    }

    /// Validate a ticket for `/serviceValidate`, which never accepts proxy tickets
    pub async fn service_validate(
        &self,
        ticket: Option<&str>,
        service: Option<&str>,
        proxy_callback_url: Option<&str>,
    ) -> Result<Validation> {
        if let Some(ticket) = ticket {
            if TicketKind::from_id(ticket) == Some(TicketKind::Proxy) {
                debug!("Refusing proxy ticket {} on serviceValidate", ticket);
                return Err(Error::InvalidTicket);
            }
        }

        self.validate(ticket, service, proxy_callback_url).await
    }

    /// Validate a ticket for `/proxyValidate`, which accepts service and proxy tickets
    pub async fn proxy_validate(
        &self,
        ticket: Option<&str>,
        service: Option<&str>,
        proxy_callback_url: Option<&str>,
    ) -> Result<Validation> {
        self.validate(ticket, service, proxy_callback_url).await
    }

    /// Validate a service ticket for the plain text `/validate`
    ///
    /// Proxy tickets are refused, no proxy granting ticket is issued.
    pub async fn validate_v1(&self, ticket: Option<&str>, service: Option<&str>) -> Result<User> {
        if let Some(ticket) = ticket {
            if TicketKind::from_id(ticket) != Some(TicketKind::Service) {
                return Err(Error::InvalidTicket);
            }
        }

        let ticket = self.consume_ticket(ticket, service).await?;

        self.publish_event(CasEvent::ValidateTicket {
            user_id: ticket.user.id.clone(),
            service: ticket.service.clone(),
        })
        .await;

        Ok(ticket.user)
    }

    /// Look up a ticket, check it against the service and consume it
    async fn consume_ticket(
        &self,
        ticket: Option<&str>,
        service: Option<&str>,
    ) -> Result<ServiceTicket> {
        let (Some(id), Some(service)) = (ticket, service) else {
            return Err(Error::InvalidRequest);
        };

        if !matches!(
            TicketKind::from_id(id),
            Some(TicketKind::Service | TicketKind::Proxy)
        ) {
            debug!("{} is neither a service nor a proxy ticket", id);
            return Err(Error::InvalidTicket);
        }

        let ticket = self
            .database
            .find_service_ticket(id)
            .await?
            .ok_or(Error::InvalidTicket)?;

        if ticket.consumed || ticket.is_expired(self) {
            debug!("Ticket {} is already consumed or has expired", id);
            return Err(Error::InvalidTicket);
        }

        if !self
            .config
            .service_matching
            .matches(&ticket.service, service)
        {
            debug!(
                "Ticket {} was issued for {}, not {}",
                id, ticket.service, service
            );
            return Err(Error::InvalidService);
        }

        // Only one concurrent validation can win this
        if !self.database.consume_service_ticket(id).await? {
            debug!("Ticket {} was consumed concurrently", id);
            return Err(Error::InvalidTicket);
        }

        Ok(ticket)
    }
}
