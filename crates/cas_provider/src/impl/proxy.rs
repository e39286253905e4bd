use crate::{
    models::{Origin, ServiceTicket},
    CasEvent, CasProvider, Error, Result,
};

/// Longest chain of proxies walked before giving up
pub const MAX_PROXY_CHAIN_LENGTH: usize = 32;

impl CasProvider {
    /// Issue a proxy ticket for the target service on behalf of a proxy granting ticket
    pub async fn proxy(
        &self,
        proxy_granting_ticket: Option<&str>,
        target_service: Option<&str>,
    ) -> Result<ServiceTicket> {
        let (Some(id), Some(target_service)) = (proxy_granting_ticket, target_service) else {
            return Err(Error::InvalidRequest);
        };

        let pgt = self
            .database
            .find_proxy_granting_ticket(id)
            .await?
            .ok_or(Error::InvalidTicket)?;

        if pgt.is_expired(self) {
            debug!("Proxy granting ticket {} has expired", pgt.iou);
            return Err(Error::InvalidTicket);
        }

        let ticket = ServiceTicket::new(
            pgt.user,
            target_service.to_owned(),
            Origin::Proxy {
                proxy_granting_ticket: pgt.id,
            },
        );

        ticket.save(self).await?;
        info!("Issued proxy ticket for {}", ticket.service);

        self.publish_event(CasEvent::IssueProxyTicket {
            user_id: ticket.user.id.clone(),
            service: ticket.service.clone(),
            proxy_granting_ticket_iou: pgt.iou,
        })
        .await;

        Ok(ticket)
    }

    /// Services a proxy ticket passed through, most recent first
    ///
    /// The first proxy of a chain, which was granted its proxy granting ticket
    /// during validation of a service ticket, is not listed.
    pub async fn resolve_proxy_chain(&self, proxy_ticket: &ServiceTicket) -> Result<Vec<String>> {
        let mut proxies = vec![];
        let mut origin = proxy_ticket.origin.clone();

        while let Origin::Proxy {
            proxy_granting_ticket,
        } = origin
        {
            let Some(pgt) = self
                .database
                .find_proxy_granting_ticket(&proxy_granting_ticket)
                .await?
            else {
                break;
            };

            let Some(backing) = self.database.find_service_ticket(&pgt.granted_for).await? else {
                break;
            };

            if let Origin::Login = backing.origin {
                break;
            }

            if proxies.len() == MAX_PROXY_CHAIN_LENGTH {
                error!(
                    "Proxy chain of {} exceeds {} hops, refusing to resolve it",
                    proxy_ticket.id, MAX_PROXY_CHAIN_LENGTH
                );
                return Err(Error::InternalError);
            }

            proxies.push(backing.service);
            origin = backing.origin;
        }

        Ok(proxies)
    }
}
