//! Validate a service ticket
//! GET /validate
use cas_provider::CasProvider;
use rocket::response::content::RawText;
use rocket::State;

use super::ValidationQuery;

/// # Validate Ticket
///
/// Plain text answer for CAS 1.0 clients. Proxy tickets are refused.
#[get("/validate?<query..>")]
pub async fn validate(cas: &State<CasProvider>, query: ValidationQuery) -> RawText<String> {
    let outcome = cas
        .validate_v1(query.ticket.as_deref(), query.service.as_deref())
        .await;

    RawText(cas.render_v1(outcome))
}
