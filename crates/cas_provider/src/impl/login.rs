use iso8601_timestamp::Timestamp;
use reqwest::Url;

use crate::{
    models::{LoginTicket, Origin, ServiceTicket, User},
    CasEvent, CasProvider, Error, Result, Success,
};

impl CasProvider {
    /// Mint and store a login ticket for a login form about to be rendered
    pub async fn create_login_ticket(&self) -> Result<LoginTicket> {
        let ticket = LoginTicket::new();
        ticket.save(self).await?;
        Ok(ticket)
    }

    /// Complete a login form submission for an already authenticated user
    ///
    /// Consumes the login ticket the form was rendered with. Returns the URL
    /// to redirect the user to if a service was given.
    pub async fn login(
        &self,
        login_ticket: &str,
        user: User,
        service: Option<&str>,
    ) -> Result<Option<Url>> {
        let ticket = self
            .database
            .find_login_ticket(login_ticket)
            .await?
            .ok_or(Error::InvalidTicket)?;

        if ticket.consumed || ticket.is_expired(self) {
            return Err(Error::InvalidTicket);
        }

        // An unusable service leaves the login ticket unspent
        if let Some(service) = service {
            Url::parse(service).map_err(|_| Error::InvalidService)?;
        }

        if !self.database.consume_login_ticket(&ticket.id).await? {
            return Err(Error::InvalidTicket);
        }

        match service {
            Some(service) => self.grant_service_ticket(user, service).await.map(Some),
            None => Ok(None),
        }
    }

    /// Issue a service ticket and build the redirect back to the service
    pub async fn grant_service_ticket(&self, user: User, service: &str) -> Result<Url> {
        let ticket = ServiceTicket::new(user, service.to_owned(), Origin::Login);
        let redirect = ticket.redirect_url()?;

        ticket.save(self).await?;
        info!("Issued service ticket for {}", ticket.service);

        self.publish_event(CasEvent::IssueServiceTicket {
            user_id: ticket.user.id,
            service: ticket.service,
        })
        .await;

        Ok(redirect)
    }

    /// Invalidate every outstanding ticket of a user
    ///
    /// Returns where to redirect the user to, if anywhere.
    pub async fn logout(&self, user_id: &str, url: Option<&str>) -> Result<Option<String>> {
        self.database.delete_tickets_for_user(user_id).await?;
        info!("Logged out {}", user_id);

        self.publish_event(CasEvent::Logout {
            user_id: user_id.to_owned(),
        })
        .await;

        Ok(url
            .filter(|_| self.config.auto_redirect_after_logout)
            .map(ToOwned::to_owned))
    }

    /// Remove tickets which can no longer be used from the store
    pub async fn purge_expired_tickets(&self) -> Success {
        let now = Timestamp::now_utc();
        let expiry = &self.config.expiry;

        self.database
            .delete_expired_tickets(
                expiry.ticket_cutoff(&now),
                expiry.proxy_granting_ticket_cutoff(&now),
            )
            .await
    }
}
