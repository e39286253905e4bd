use crate::{
    config::AttributeFormatter,
    models::{User, Validation},
    protocol::{v1, v2},
    CasProvider, Result,
};

impl CasProvider {
    /// Username reported in `<cas:user>`
    pub fn cas_username(&self, user: &User) -> String {
        self.config
            .username_truncation
            .apply(self.config.username_field.select(user))
    }

    /// Custom attributes of a user, serialised with the configured formatter
    pub async fn attributes_xml(&self, user: &User) -> Result<String> {
        let Some(source) = &self.attribute_source else {
            return Ok(String::new());
        };

        let attributes = source.attributes(user).await?;
        Ok(match &self.attribute_formatter {
            Some(formatter) => formatter.format(&attributes),
            None => self.config.attribute_format.format(&attributes),
        })
    }

    /// Render the outcome of `/serviceValidate` or `/proxyValidate`
    pub async fn render_validation(&self, outcome: Result<Validation>) -> String {
        let validation = match outcome {
            Ok(validation) => validation,
            Err(err) => return v2::authentication_failure(&err),
        };

        let attributes = match self.attributes_xml(&validation.user).await {
            Ok(attributes) => attributes,
            Err(err) => {
                error!("Failed to fetch attributes of {}: {:?}", validation.user.id, err);
                return v2::authentication_failure(&err);
            }
        };

        v2::authentication_success(
            &self.cas_username(&validation.user),
            &attributes,
            validation.proxy_granting_ticket_iou.as_deref(),
            &validation.proxies,
        )
    }

    /// Render the outcome of `/validate`
    pub fn render_v1(&self, outcome: Result<User>) -> String {
        match outcome {
            Ok(user) => v1::success(self.config.username_field.select(&user)),
            Err(_) => v1::failure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::test::*;

    struct Groups;

    #[async_trait]
    impl AttributeSource for Groups {
        async fn attributes(&self, user: &User) -> Result<Attributes> {
            let mut attributes = Attributes::new();
            attributes.insert("uid".into(), vec![user.id.clone()]);
            attributes.insert("group".into(), vec!["staff".into(), "r&d".into()]);
            Ok(attributes)
        }
    }

    struct Unavailable;

    #[async_trait]
    impl AttributeSource for Unavailable {
        async fn attributes(&self, _user: &User) -> Result<Attributes> {
            Err(Error::InternalError)
        }
    }

    struct Shouting;

    impl AttributeFormatter for Shouting {
        fn format(&self, attributes: &Attributes) -> String {
            attributes
                .keys()
                .map(|name| format!("<cas:{}/>", name.to_uppercase()))
                .collect()
        }
    }

    fn validation(user: User) -> Validation {
        Validation {
            user,
            proxy_granting_ticket_iou: None,
            proxies: vec![],
        }
    }

    #[async_std::test]
    async fn renders_failures() {
        let (cas, _) = for_test();

        let xml = cas.render_validation(Err(Error::InvalidService)).await;
        assert!(xml.contains("<cas:authenticationFailure code=\"INVALID_SERVICE\">"));

        assert_eq!(cas.render_v1(Err(Error::InvalidService)), "no\n\n");
    }

    #[async_std::test]
    async fn renders_attributes() {
        let (mut cas, _) = for_test();
        cas.attribute_source = Some(Arc::new(Groups));

        let xml = cas.render_validation(Ok(validation(alice()))).await;
        assert!(xml.contains(
            "<cas:user>alice</cas:user>\
             <cas:attributes>\
             <cas:group>staff</cas:group>\
             <cas:group>r&amp;d</cas:group>\
             <cas:uid>01ARZ3NDEKTSV4RRFFQ69G5FAV</cas:uid>\
             </cas:attributes>"
        ));

        cas.config.attribute_format = AttributeFormat::NameValue;
        let xml = cas.render_validation(Ok(validation(alice()))).await;
        assert!(xml.contains("<cas:attribute name=\"group\" value=\"staff\"/>"));

        cas.attribute_formatter = Some(Arc::new(Shouting));
        let xml = cas.render_validation(Ok(validation(alice()))).await;
        assert!(xml.contains("<cas:user>alice</cas:user><cas:GROUP/><cas:UID/>"));
    }

    #[async_std::test]
    async fn attribute_failures_are_internal_errors() {
        let (mut cas, _) = for_test();
        cas.attribute_source = Some(Arc::new(Unavailable));

        let xml = cas.render_validation(Ok(validation(alice()))).await;
        assert!(xml.contains("code=\"INTERNAL_ERROR\""));
    }

    #[async_std::test]
    async fn selects_and_truncates_username() {
        let (mut cas, _) = for_test();
        cas.config.username_field = UsernameField::Email;

        let mut user = alice();
        user.email = Some(format!("{}@touchstonenetwork.net", "c".repeat(32)));

        let xml = cas.render_validation(Ok(validation(user.clone()))).await;
        assert!(xml.contains(&format!("<cas:user>{}@tn</cas:user>", "c".repeat(27))));

        cas.config.username_truncation = UsernameTruncation::Disabled;
        let xml = cas.render_validation(Ok(validation(user.clone()))).await;
        assert!(xml.contains(&format!(
            "<cas:user>{}@touchstonenetwork.net</cas:user>",
            "c".repeat(32)
        )));

        assert_eq!(
            cas.render_v1(Ok(user)),
            format!("yes\n{}@touchstonenetwork.net\n", "c".repeat(32))
        );
    }

    #[async_std::test]
    async fn renders_proxy_granting_ticket_and_proxies() {
        let (cas, _) = for_test();

        let xml = cas
            .render_validation(Ok(Validation {
                user: alice(),
                proxy_granting_ticket_iou: Some("PGTIOU-1".into()),
                proxies: vec!["https://proxy1.example/".into()],
            }))
            .await;

        assert!(xml.contains(
            "<cas:proxyGrantingTicket>PGTIOU-1</cas:proxyGrantingTicket>\
             <cas:proxies><cas:proxy>https://proxy1.example/</cas:proxy></cas:proxies>"
        ));
    }
}
