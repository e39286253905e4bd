use iso8601_timestamp::Timestamp;

use crate::util::{expiry_cutoff, has_expired};

/// Ticket lifetimes in minutes, measured from creation
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TicketExpiry {
    /// Login, service and proxy tickets
    pub ticket: i64,

    /// Proxy granting tickets
    pub proxy_granting_ticket: i64,
}

impl Default for TicketExpiry {
    fn default() -> TicketExpiry {
        TicketExpiry {
            ticket: 5,
            proxy_granting_ticket: 120,
        }
    }
}

impl TicketExpiry {
    pub fn ticket_expired(&self, created_at: &Timestamp, now: &Timestamp) -> bool {
        has_expired(created_at, self.ticket, now)
    }

    pub fn proxy_granting_ticket_expired(&self, created_at: &Timestamp, now: &Timestamp) -> bool {
        has_expired(created_at, self.proxy_granting_ticket, now)
    }

    /// Tickets created before this are expired
    pub fn ticket_cutoff(&self, now: &Timestamp) -> Timestamp {
        expiry_cutoff(self.ticket, now)
    }

    /// Proxy granting tickets created before this are expired
    pub fn proxy_granting_ticket_cutoff(&self, now: &Timestamp) -> Timestamp {
        expiry_cutoff(self.proxy_granting_ticket, now)
    }
}
