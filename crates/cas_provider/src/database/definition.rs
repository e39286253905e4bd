use iso8601_timestamp::Timestamp;

use crate::{
    models::{LoginTicket, ProxyGrantingTicket, ServiceTicket},
    Result, Success,
};

use super::Migration;

#[async_trait]
pub trait AbstractDatabase: Send + Sync {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success;

    /// Find login ticket by id
    async fn find_login_ticket(&self, id: &str) -> Result<Option<LoginTicket>>;

    /// Find service or proxy ticket by id
    async fn find_service_ticket(&self, id: &str) -> Result<Option<ServiceTicket>>;

    /// Find proxy granting ticket by id
    async fn find_proxy_granting_ticket(&self, id: &str) -> Result<Option<ProxyGrantingTicket>>;

    /// Save login ticket
    async fn save_login_ticket(&self, ticket: &LoginTicket) -> Success;

    /// Save service or proxy ticket
    async fn save_service_ticket(&self, ticket: &ServiceTicket) -> Success;

    /// Save proxy granting ticket
    async fn save_proxy_granting_ticket(&self, ticket: &ProxyGrantingTicket) -> Success;

    /// Mark login ticket as consumed if it has not been already
    ///
    /// Returns whether this call consumed the ticket.
    async fn consume_login_ticket(&self, id: &str) -> Result<bool>;

    /// Mark service or proxy ticket as consumed if it has not been already
    ///
    /// Returns whether this call consumed the ticket.
    async fn consume_service_ticket(&self, id: &str) -> Result<bool>;

    /// Delete all service, proxy and proxy granting tickets of a user
    async fn delete_tickets_for_user(&self, user_id: &str) -> Success;

    /// Delete tickets created before the given cutoffs
    async fn delete_expired_tickets(
        &self,
        ticket_cutoff: Timestamp,
        proxy_granting_ticket_cutoff: Timestamp,
    ) -> Success;
}
