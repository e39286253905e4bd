//! Validate a service ticket
//! GET /serviceValidate
use cas_provider::CasProvider;
use rocket::response::content::RawXml;
use rocket::State;

use super::ValidationQuery;

/// # Service Validate
///
/// CAS 2.0 validation of service tickets, optionally issuing a proxy
/// granting ticket to `pgtUrl`. Proxy tickets are refused.
#[get("/serviceValidate?<query..>")]
pub async fn service_validate(
    cas: &State<CasProvider>,
    query: ValidationQuery,
) -> RawXml<String> {
    let outcome = cas
        .service_validate(
            query.ticket.as_deref(),
            query.service.as_deref(),
            query.pgt_url.as_deref(),
        )
        .await;

    RawXml(cas.render_validation(outcome).await)
}
