#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event_type")]
pub enum CasEvent {
    IssueServiceTicket {
        user_id: String,
        service: String,
    },
    IssueProxyTicket {
        user_id: String,
        service: String,
        proxy_granting_ticket_iou: String,
    },
    IssueProxyGrantingTicket {
        user_id: String,
        iou: String,
        granted_for: String,
    },
    ValidateTicket {
        user_id: String,
        service: String,
    },
    Logout {
        user_id: String,
    },
}
