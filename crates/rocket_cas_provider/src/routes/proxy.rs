//! Issue a proxy ticket
//! GET /proxy
use cas_provider::{protocol::v2, CasProvider, Result};
use rocket::response::content::RawXml;
use rocket::State;

/// Query parameters of `/proxy`
#[derive(FromForm, Debug, Default)]
pub struct ProxyQuery {
    pub pgt: Option<String>,

    #[field(name = "targetService")]
    pub target_service: Option<String>,
}

/// # Proxy
///
/// Issue a proxy ticket for `targetService` on behalf of a proxy granting ticket.
#[get("/proxy?<query..>")]
pub async fn proxy(cas: &State<CasProvider>, query: ProxyQuery) -> Result<RawXml<String>> {
    let ticket = cas
        .proxy(query.pgt.as_deref(), query.target_service.as_deref())
        .await?;

    Ok(RawXml(v2::proxy_success(&ticket.id)))
}

#[cfg(test)]
mod tests {
    use crate::test::*;

    #[async_std::test]
    async fn success() {
        let (cas, receiver) = for_test();

        let ticket = ServiceTicket::new(alice(), APP.into(), Origin::Login);
        ticket.save(&cas).await.unwrap();
        let pgt = ProxyGrantingTicket::new(&ticket, PROXY_CALLBACK.into());
        pgt.save(&cas).await.unwrap();

        let client = bootstrap_rocket_with_cas(cas, routes![crate::routes::proxy::proxy]).await;

        let res = client
            .get(request_uri(
                "/proxy",
                &[("targetService", "https://b.example"), ("pgt", &pgt.id)],
            ))
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);
        let body = res.into_string().await.unwrap();
        assert!(body.contains("<cas:proxySuccess><cas:proxyTicket>PT-"));

        let event = receiver.try_recv().expect("an event");
        if !matches!(event, CasEvent::IssueProxyTicket { .. }) {
            panic!("Received incorrect event type. {:?}", event);
        }
    }

    #[async_std::test]
    async fn fail_unknown_proxy_granting_ticket() {
        let (cas, _) = for_test();
        let client = bootstrap_rocket_with_cas(cas, routes![crate::routes::proxy::proxy]).await;

        let res = client
            .get(request_uri(
                "/proxy",
                &[("targetService", "https://b.example"), ("pgt", "PGT-1")],
            ))
            .dispatch()
            .await;

        assert_eq!(res.status(), Status::Ok);
        assert_eq!(res.content_type(), Some(ContentType::XML));

        let body = res.into_string().await.unwrap();
        assert!(body.contains("<cas:authenticationFailure code=\"INVALID_TICKET\">"));
    }

    #[async_std::test]
    async fn fail_missing_parameters() {
        let (cas, _) = for_test();
        let client = bootstrap_rocket_with_cas(cas, routes![crate::routes::proxy::proxy]).await;

        let res = client.get("/proxy?pgt=PGT-1").dispatch().await;
        let body = res.into_string().await.unwrap();
        assert!(body.contains("code=\"INVALID_REQUEST\""));
    }
}
