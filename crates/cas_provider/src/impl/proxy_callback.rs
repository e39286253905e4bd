use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{redirect::Policy, Url};

use crate::{
    models::{ProxyGrantingTicket, ServiceTicket},
    CasEvent, CasProvider, Error, Result,
};

/// Status codes with which a proxy callback accepts a ticket
static ACCEPTED_STATUS: [u16; 5] = [200, 202, 301, 302, 304];

/// Transport delivering proxy granting tickets to proxy callbacks
#[async_trait]
pub trait AbstractProxyCallback: Send + Sync {
    /// Perform a GET request on the given URL and report the status code
    async fn deliver(&self, url: &Url, timeout: Duration) -> Result<u16>;
}

/// Proxy callback over HTTPS
#[derive(Clone)]
pub struct HttpCallback {
    client: reqwest::Client,
}

impl Default for HttpCallback {
    fn default() -> Self {
        // Redirects count as acceptance and are never followed
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("TLS backend");

        HttpCallback { client }
    }
}

#[async_trait]
impl AbstractProxyCallback for HttpCallback {
    async fn deliver(&self, url: &Url, timeout: Duration) -> Result<u16> {
        self.client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map(|response| response.status().as_u16())
            .map_err(|_| Error::ProxyCallbackFailed)
    }
}

#[derive(Clone)]
pub enum ProxyCallback {
    Http(HttpCallback),
    Custom(Arc<dyn AbstractProxyCallback>),
}

impl Default for ProxyCallback {
    fn default() -> Self {
        Self::Http(Default::default())
    }
}

impl Deref for ProxyCallback {
    type Target = dyn AbstractProxyCallback;

    fn deref(&self) -> &Self::Target {
        match self {
            ProxyCallback::Http(http) => http,
            ProxyCallback::Custom(custom) => custom.as_ref(),
        }
    }
}

impl CasProvider {
    /// Mint a proxy granting ticket and deliver it to the callback
    ///
    /// The ticket is only stored if the callback accepts it. Callback failures
    /// are logged and yield `None`, store failures are returned.
    pub async fn issue_proxy_granting_ticket(
        &self,
        callback_url: &str,
        granted_for: &ServiceTicket,
    ) -> Result<Option<ProxyGrantingTicket>> {
        let pgt = ProxyGrantingTicket::new(granted_for, callback_url.to_owned());

        if let Err(err) = self.deliver_proxy_granting_ticket(&pgt).await {
            debug!(
                "Proxy callback {} refused ticket for {}: {:?}. Not issuing PGT.",
                callback_url, granted_for.service, err
            );

            return Ok(None);
        }

        pgt.save(self).await?;
        info!(
            "Issued proxy granting ticket {} for {}",
            pgt.iou, granted_for.service
        );

        self.publish_event(CasEvent::IssueProxyGrantingTicket {
            user_id: pgt.user.id.clone(),
            iou: pgt.iou.clone(),
            granted_for: pgt.granted_for.clone(),
        })
        .await;

        Ok(Some(pgt))
    }

    async fn deliver_proxy_granting_ticket(&self, pgt: &ProxyGrantingTicket) -> Result<()> {
        let config = &self.config.proxy_callback;

        let callback_url =
            Url::parse(&pgt.callback_url).map_err(|_| Error::ProxyCallbackFailed)?;
        if config.require_https && callback_url.scheme() != "https" {
            return Err(Error::ProxyCallbackFailed);
        }

        let status = self
            .proxy_callback
            .deliver(&pgt.delivery_url(&callback_url), config.timeout())
            .await?;

        if ACCEPTED_STATUS.contains(&status) {
            Ok(())
        } else {
            Err(Error::ProxyCallbackFailed)
        }
    }
}
