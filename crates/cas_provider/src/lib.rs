#[macro_use]
extern crate serde;
#[macro_use]
extern crate async_trait;
#[macro_use]
extern crate nanoid;
#[macro_use]
extern crate log;

#[cfg(feature = "database-mongodb")]
#[macro_use]
extern crate bson;

mod result;
pub use result::*;

pub mod config;
pub mod database;
pub mod derive;
pub mod events;
pub mod r#impl;
pub mod models;
pub mod protocol;
pub mod util;


pub use config::Config;
pub use database::{Database, Migration};
pub use events::CasEvent;
pub use r#impl::proxy_callback::{AbstractProxyCallback, HttpCallback, ProxyCallback};
pub use reqwest::Url;

use std::sync::Arc;

use async_std::channel::Sender;
use config::{AttributeFormatter, AttributeSource};

/// CAS provider state
#[derive(Default, Clone)]
pub struct CasProvider {
    pub config: Config,
    pub database: Database,
    pub proxy_callback: ProxyCallback,

    /// Custom attributes released alongside the username
    pub attribute_source: Option<Arc<dyn AttributeSource>>,

    /// Overrides `config.attribute_format` when present
    pub attribute_formatter: Option<Arc<dyn AttributeFormatter>>,

    pub event_channel: Option<Sender<CasEvent>>,
}

impl CasProvider {
    pub async fn publish_event(&self, event: CasEvent) {
        if let Some(sender) = &self.event_channel {
            if let Err(err) = sender.send(event).await {
                error!("Failed to publish a CAS event: {:?}", err);
            }
        }
    }
}
