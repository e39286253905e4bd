use iso8601_timestamp::Timestamp;

use super::User;

/// Kind of ticket, determined by the identifier prefix
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketKind {
    Login,
    Service,
    Proxy,
    ProxyGranting,
}

impl TicketKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            TicketKind::Login => "LT",
            TicketKind::Service => "ST",
            TicketKind::Proxy => "PT",
            TicketKind::ProxyGranting => "PGT",
        }
    }

    /// Determine the kind of ticket from its identifier
    pub fn from_id(id: &str) -> Option<TicketKind> {
        let (prefix, token) = id.split_once('-')?;
        if token.is_empty() {
            return None;
        }

        match prefix {
            "LT" => Some(TicketKind::Login),
            "ST" => Some(TicketKind::Service),
            "PT" => Some(TicketKind::Proxy),
            "PGT" => Some(TicketKind::ProxyGranting),
            _ => None,
        }
    }
}

/// Login form ticket
///
/// Proves a login form was rendered before credentials were posted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoginTicket {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Time of creation
    pub created_at: Timestamp,

    /// Whether this ticket has been used
    pub consumed: bool,
}

/// Where a service ticket came from
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Origin {
    /// Issued directly to the user's browser
    Login,

    /// Issued to a proxy holding a proxy granting ticket
    Proxy { proxy_granting_ticket: String },
}

/// Service or proxy ticket
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceTicket {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// User this ticket vouches for
    pub user: User,

    /// Service this ticket was issued for
    pub service: String,

    /// Where this ticket came from
    pub origin: Origin,

    /// Time of creation
    pub created_at: Timestamp,

    /// Whether this ticket has been validated
    pub consumed: bool,
}

/// Proxy granting ticket
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProxyGrantingTicket {
    /// Unique Id
    #[serde(rename = "_id")]
    pub id: String,

    /// Handle returned to the validating service in place of the ticket
    pub iou: String,

    /// User proxy tickets will be issued for
    pub user: User,

    /// Service or proxy ticket this was granted during validation of
    pub granted_for: String,

    /// Callback URL this ticket was delivered to
    pub callback_url: String,

    /// Time of creation
    pub created_at: Timestamp,
}
