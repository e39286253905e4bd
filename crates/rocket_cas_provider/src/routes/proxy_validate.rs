//! Validate a service or proxy ticket
//! GET /proxyValidate
use cas_provider::CasProvider;
use rocket::response::content::RawXml;
use rocket::State;

use super::ValidationQuery;

/// # Proxy Validate
///
/// CAS 2.0 validation of service and proxy tickets. Proxy tickets report
/// the proxies they passed through.
#[get("/proxyValidate?<query..>")]
pub async fn proxy_validate(cas: &State<CasProvider>, query: ValidationQuery) -> RawXml<String> {
    let outcome = cas
        .proxy_validate(
            query.ticket.as_deref(),
            query.service.as_deref(),
            query.pgt_url.as_deref(),
        )
        .await;

    RawXml(cas.render_validation(outcome).await)
}
