use quick_xml::escape::escape;

use crate::Error;

use super::CAS_NAMESPACE;

fn service_response(body: &str) -> String {
    format!("<cas:serviceResponse xmlns:cas=\"{CAS_NAMESPACE}\">{body}</cas:serviceResponse>")
}

/// Successful `/serviceValidate` or `/proxyValidate` response
///
/// `attributes` must already be serialised XML, it is embedded as is.
pub fn authentication_success(
    username: &str,
    attributes: &str,
    proxy_granting_ticket_iou: Option<&str>,
    proxies: &[String],
) -> String {
    let mut body = format!(
        "<cas:authenticationSuccess><cas:user>{}</cas:user>",
        escape(username)
    );

    body.push_str(attributes);

    if let Some(iou) = proxy_granting_ticket_iou {
        body.push_str(&format!(
            "<cas:proxyGrantingTicket>{}</cas:proxyGrantingTicket>",
            escape(iou)
        ));
    }

    if !proxies.is_empty() {
        body.push_str("<cas:proxies>");
        for proxy in proxies {
            body.push_str(&format!("<cas:proxy>{}</cas:proxy>", escape(proxy.as_str())));
        }
        body.push_str("</cas:proxies>");
    }

    body.push_str("</cas:authenticationSuccess>");
    service_response(&body)
}

/// Failed validation or proxy request
pub fn authentication_failure(error: &Error) -> String {
    service_response(&format!(
        "<cas:authenticationFailure code=\"{}\">{}</cas:authenticationFailure>",
        error.code(),
        escape(error.message())
    ))
}

/// Successful `/proxy` response
pub fn proxy_success(proxy_ticket: &str) -> String {
    service_response(&format!(
        "<cas:proxySuccess><cas:proxyTicket>{}</cas:proxyTicket></cas:proxySuccess>",
        escape(proxy_ticket)
    ))
}
