use iso8601_timestamp::Timestamp;

use crate::{
    models::{LoginTicket, Origin, ProxyGrantingTicket, ServiceTicket, TicketKind},
    Error, Result, Success,
};

use futures::lock::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{definition::AbstractDatabase, Migration};

type Collection<T> = Arc<Mutex<HashMap<String, T>>>;

#[derive(Default, Clone)]
pub struct DummyDb {
    pub login_tickets: Collection<LoginTicket>,
    pub service_tickets: Collection<ServiceTicket>,
    pub proxy_tickets: Collection<ServiceTicket>,
    pub proxy_granting_tickets: Collection<ProxyGrantingTicket>,
}

impl DummyDb {
    /// Service and proxy tickets are tracked separately
    fn service_collection(&self, id: &str) -> Option<&Collection<ServiceTicket>> {
        match TicketKind::from_id(id) {
            Some(TicketKind::Service) => Some(&self.service_tickets),
            Some(TicketKind::Proxy) => Some(&self.proxy_tickets),
            _ => None,
        }
    }
}

#[async_trait]
impl AbstractDatabase for DummyDb {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success {
        debug!("skip migration {:?}", migration);
        Ok(())
    }

    /// Find login ticket by id
    async fn find_login_ticket(&self, id: &str) -> Result<Option<LoginTicket>> {
        let tickets = self.login_tickets.lock().await;
        Ok(tickets.get(id).cloned())
    }

    /// Find service or proxy ticket by id
    async fn find_service_ticket(&self, id: &str) -> Result<Option<ServiceTicket>> {
        let Some(collection) = self.service_collection(id) else {
            return Ok(None);
        };

        let tickets = collection.lock().await;
        Ok(tickets.get(id).cloned())
    }

    /// Find proxy granting ticket by id
    async fn find_proxy_granting_ticket(&self, id: &str) -> Result<Option<ProxyGrantingTicket>> {
        let tickets = self.proxy_granting_tickets.lock().await;
        Ok(tickets.get(id).cloned())
    }

    /// Save login ticket
    async fn save_login_ticket(&self, ticket: &LoginTicket) -> Success {
        let mut tickets = self.login_tickets.lock().await;
        tickets.insert(ticket.id.to_string(), ticket.clone());
        Ok(())
    }

    /// Save service or proxy ticket
    async fn save_service_ticket(&self, ticket: &ServiceTicket) -> Success {
        let collection = self
            .service_collection(&ticket.id)
            .ok_or(Error::DatabaseError {
                operation: "insert",
                with: "service_ticket",
            })?;

        let mut tickets = collection.lock().await;
        tickets.insert(ticket.id.to_string(), ticket.clone());
        Ok(())
    }

    /// Save proxy granting ticket
    async fn save_proxy_granting_ticket(&self, ticket: &ProxyGrantingTicket) -> Success {
        let mut tickets = self.proxy_granting_tickets.lock().await;
        tickets.insert(ticket.id.to_string(), ticket.clone());
        Ok(())
    }

    /// Mark login ticket as consumed if it has not been already
    async fn consume_login_ticket(&self, id: &str) -> Result<bool> {
        let mut tickets = self.login_tickets.lock().await;
        Ok(match tickets.get_mut(id) {
            Some(ticket) if !ticket.consumed => {
                ticket.consumed = true;
                true
            }
            _ => false,
        })
    }

    /// Mark service or proxy ticket as consumed if it has not been already
    async fn consume_service_ticket(&self, id: &str) -> Result<bool> {
        let Some(collection) = self.service_collection(id) else {
            return Ok(false);
        };

        let mut tickets = collection.lock().await;
        Ok(match tickets.get_mut(id) {
            Some(ticket) if !ticket.consumed => {
                ticket.consumed = true;
                true
            }
            _ => false,
        })
    }

    /// Delete all service, proxy and proxy granting tickets of a user
    async fn delete_tickets_for_user(&self, user_id: &str) -> Success {
        for collection in [&self.service_tickets, &self.proxy_tickets] {
            let mut tickets = collection.lock().await;
            tickets.retain(|_, ticket| ticket.user.id != user_id);
        }

        let mut tickets = self.proxy_granting_tickets.lock().await;
        tickets.retain(|_, ticket| ticket.user.id != user_id);

        Ok(())
    }

    /// Delete tickets created before the given cutoffs
    async fn delete_expired_tickets(
        &self,
        ticket_cutoff: Timestamp,
        proxy_granting_ticket_cutoff: Timestamp,
    ) -> Success {
        let cutoff = ticket_cutoff.to_unix_timestamp_ms();
        let pgt_cutoff = proxy_granting_ticket_cutoff.to_unix_timestamp_ms();

        {
            let mut tickets = self.login_tickets.lock().await;
            tickets.retain(|_, ticket| ticket.created_at.to_unix_timestamp_ms() >= cutoff);
        }

        let mut proxy_granting_tickets = self.proxy_granting_tickets.lock().await;
        let mut service_tickets = self.service_tickets.lock().await;
        let mut proxy_tickets = self.proxy_tickets.lock().await;

        // Live tickets keep every link of the proxy chain above them
        let mut pending: Vec<String> = proxy_granting_tickets
            .values()
            .filter(|ticket| ticket.created_at.to_unix_timestamp_ms() >= pgt_cutoff)
            .map(|ticket| ticket.id.clone())
            .chain(
                proxy_tickets
                    .values()
                    .filter(|ticket| ticket.created_at.to_unix_timestamp_ms() >= cutoff)
                    .filter_map(|ticket| match &ticket.origin {
                        Origin::Proxy {
                            proxy_granting_ticket,
                        } => Some(proxy_granting_ticket.clone()),
                        Origin::Login => None,
                    }),
            )
            .collect();

        let mut kept_proxy_granting_tickets = HashSet::new();
        let mut kept_tickets = HashSet::new();
        while let Some(id) = pending.pop() {
            if !kept_proxy_granting_tickets.insert(id.clone()) {
                continue;
            }

            let Some(pgt) = proxy_granting_tickets.get(&id) else {
                continue;
            };

            kept_tickets.insert(pgt.granted_for.clone());
            if let Some(ServiceTicket {
                origin:
                    Origin::Proxy {
                        proxy_granting_ticket,
                    },
                ..
            }) = proxy_tickets.get(&pgt.granted_for)
            {
                pending.push(proxy_granting_ticket.clone());
            }
        }

        proxy_granting_tickets.retain(|id, _| kept_proxy_granting_tickets.contains(id));
        for tickets in [&mut *service_tickets, &mut *proxy_tickets] {
            tickets.retain(|id, ticket| {
                ticket.created_at.to_unix_timestamp_ms() >= cutoff || kept_tickets.contains(id)
            });
        }

        Ok(())
    }
}
