use super::User;

/// Outcome of a successful ticket validation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Validation {
    /// User the ticket was issued to
    pub user: User,

    /// IOU of the proxy granting ticket delivered to the callback
    pub proxy_granting_ticket_iou: Option<String>,

    /// Services which proxied this request, most recent first
    pub proxies: Vec<String>,
}
