use bson::{to_document, Bson, Document};
use iso8601_timestamp::Timestamp;
use mongodb::options::UpdateOptions;
use std::collections::HashSet;
use std::ops::Deref;

use crate::{
    models::{LoginTicket, ProxyGrantingTicket, ServiceTicket, TicketKind},
    Error, Result, Success,
};

use super::{definition::AbstractDatabase, Migration};

static COLLECTIONS: [&str; 4] = [
    "login_tickets",
    "service_tickets",
    "proxy_tickets",
    "proxy_granting_tickets",
];

#[derive(Clone)]
pub struct MongoDb(pub mongodb::Database);

impl Deref for MongoDb {
    type Target = mongodb::Database;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoDb {
    /// Service and proxy tickets are tracked separately
    fn service_collection(&self, id: &str) -> Option<&'static str> {
        match TicketKind::from_id(id) {
            Some(TicketKind::Service) => Some("service_tickets"),
            Some(TicketKind::Proxy) => Some("proxy_tickets"),
            _ => None,
        }
    }

    /// Flip `consumed` only if it is still unset
    async fn consume(&self, collection: &str, id: &str, with: &'static str) -> Result<bool> {
        self.collection::<Document>(collection)
            .update_one(
                doc! {
                    "_id": id,
                    "consumed": false
                },
                doc! {
                    "$set": {
                        "consumed": true
                    }
                },
            )
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "update_one",
                with,
            })
            .map(|result| result.modified_count == 1)
    }

    /// Distinct string values of a field among matching documents
    async fn distinct_ids(
        &self,
        collection: &'static str,
        field: &str,
        filter: Document,
    ) -> Result<HashSet<String>> {
        let values = self
            .collection::<Document>(collection)
            .distinct(field, filter)
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "distinct",
                with: collection,
            })?;

        Ok(values
            .iter()
            .filter_map(Bson::as_str)
            .map(ToOwned::to_owned)
            .collect())
    }
}

#[async_trait]
impl AbstractDatabase for MongoDb {
    /// Run a database migration
    async fn run_migration(&self, migration: Migration) -> Success {
        match migration {
            #[cfg(debug_assertions)]
            Migration::WipeAll => {
                // Drop the entire database
                self.drop().await.map_err(|_| Error::DatabaseError {
                    operation: "drop",
                    with: "database",
                })?;
            }
            Migration::M2024_10_01CreateTicketCollections => {
                let list = self
                    .list_collection_names()
                    .await
                    .map_err(|_| Error::DatabaseError {
                        operation: "list_collection_names",
                        with: "database",
                    })?;

                // Make sure all collections exist
                for name in COLLECTIONS {
                    if !list.contains(&name.to_string()) {
                        self.create_collection(name)
                            .await
                            .map_err(|_| Error::DatabaseError {
                                operation: "create_collection",
                                with: "database",
                            })?;
                    }
                }

                for name in ["service_tickets", "proxy_tickets", "proxy_granting_tickets"] {
                    self.run_command(doc! {
                        "createIndexes": name,
                        "indexes": [
                            {
                                "key": {
                                    "user.id": 1
                                },
                                "name": "user_id"
                            },
                            {
                                "key": {
                                    "created_at": 1
                                },
                                "name": "created_at"
                            }
                        ]
                    })
                    .await
                    .map_err(|_| Error::DatabaseError {
                        operation: "create_indexes",
                        with: "database",
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Find login ticket by id
    async fn find_login_ticket(&self, id: &str) -> Result<Option<LoginTicket>> {
        self.collection("login_tickets")
            .find_one(doc! {
                "_id": id
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "login_ticket",
            })
    }

    /// Find service or proxy ticket by id
    async fn find_service_ticket(&self, id: &str) -> Result<Option<ServiceTicket>> {
        let Some(collection) = self.service_collection(id) else {
            return Ok(None);
        };

        self.collection(collection)
            .find_one(doc! {
                "_id": id
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "service_ticket",
            })
    }

    /// Find proxy granting ticket by id
    async fn find_proxy_granting_ticket(&self, id: &str) -> Result<Option<ProxyGrantingTicket>> {
        self.collection("proxy_granting_tickets")
            .find_one(doc! {
                "_id": id
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "find_one",
                with: "proxy_granting_ticket",
            })
    }

    /// Save login ticket
    async fn save_login_ticket(&self, ticket: &LoginTicket) -> Success {
        self.collection::<LoginTicket>("login_tickets")
            .update_one(
                doc! {
                    "_id": &ticket.id
                },
                doc! {
                    "$set": to_document(ticket).map_err(|_| Error::DatabaseError {
                        operation: "to_document",
                        with: "login_ticket",
                    })?
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "login_ticket",
            })
            .map(|_| ())
    }

    /// Save service or proxy ticket
    async fn save_service_ticket(&self, ticket: &ServiceTicket) -> Success {
        let collection = self
            .service_collection(&ticket.id)
            .ok_or(Error::DatabaseError {
                operation: "upsert_one",
                with: "service_ticket",
            })?;

        self.collection::<ServiceTicket>(collection)
            .update_one(
                doc! {
                    "_id": &ticket.id
                },
                doc! {
                    "$set": to_document(ticket).map_err(|_| Error::DatabaseError {
                        operation: "to_document",
                        with: "service_ticket",
                    })?
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "service_ticket",
            })
            .map(|_| ())
    }

    /// Save proxy granting ticket
    async fn save_proxy_granting_ticket(&self, ticket: &ProxyGrantingTicket) -> Success {
        self.collection::<ProxyGrantingTicket>("proxy_granting_tickets")
            .update_one(
                doc! {
                    "_id": &ticket.id
                },
                doc! {
                    "$set": to_document(ticket).map_err(|_| Error::DatabaseError {
                        operation: "to_document",
                        with: "proxy_granting_ticket",
                    })?
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "upsert_one",
                with: "proxy_granting_ticket",
            })
            .map(|_| ())
    }

    /// Mark login ticket as consumed if it has not been already
    async fn consume_login_ticket(&self, id: &str) -> Result<bool> {
        self.consume("login_tickets", id, "login_ticket").await
    }

    /// Mark service or proxy ticket as consumed if it has not been already
    async fn consume_service_ticket(&self, id: &str) -> Result<bool> {
        let Some(collection) = self.service_collection(id) else {
            return Ok(false);
        };

        self.consume(collection, id, "service_ticket").await
    }

    /// Delete all service, proxy and proxy granting tickets of a user
    async fn delete_tickets_for_user(&self, user_id: &str) -> Success {
        for name in ["service_tickets", "proxy_tickets", "proxy_granting_tickets"] {
            self.collection::<Document>(name)
                .delete_many(doc! {
                    "user.id": user_id
                })
                .await
                .map_err(|_| Error::DatabaseError {
                    operation: "delete_many",
                    with: "tickets",
                })?;
        }

        Ok(())
    }

    /// Delete tickets created before the given cutoffs
    async fn delete_expired_tickets(
        &self,
        ticket_cutoff: Timestamp,
        proxy_granting_ticket_cutoff: Timestamp,
    ) -> Success {
        let cutoff = String::from(&*ticket_cutoff.format());
        let pgt_cutoff = String::from(&*proxy_granting_ticket_cutoff.format());

        // Live tickets keep every link of the proxy chain above them
        let mut pending = self
            .distinct_ids(
                "proxy_granting_tickets",
                "_id",
                doc! {
                    "created_at": {
                        "$gte": pgt_cutoff.as_str()
                    }
                },
            )
            .await?;
        pending.extend(
            self.distinct_ids(
                "proxy_tickets",
                "origin.proxy_granting_ticket",
                doc! {
                    "created_at": {
                        "$gte": cutoff.as_str()
                    }
                },
            )
            .await?,
        );

        let mut kept_proxy_granting_tickets = HashSet::new();
        let mut kept_tickets = HashSet::new();
        loop {
            let batch: Vec<String> = pending
                .into_iter()
                .filter(|id| kept_proxy_granting_tickets.insert(id.clone()))
                .collect();

            if batch.is_empty() {
                break;
            }

            let granted_for: Vec<String> = self
                .distinct_ids(
                    "proxy_granting_tickets",
                    "granted_for",
                    doc! {
                        "_id": {
                            "$in": batch
                        }
                    },
                )
                .await?
                .into_iter()
                .filter(|id| kept_tickets.insert(id.clone()))
                .collect();

            pending = self
                .distinct_ids(
                    "proxy_tickets",
                    "origin.proxy_granting_ticket",
                    doc! {
                        "_id": {
                            "$in": granted_for
                        }
                    },
                )
                .await?;
        }

        self.collection::<Document>("proxy_granting_tickets")
            .delete_many(doc! {
                "created_at": {
                    "$lt": pgt_cutoff.as_str()
                },
                "_id": {
                    "$nin": kept_proxy_granting_tickets.into_iter().collect::<Vec<_>>()
                }
            })
            .await
            .map_err(|_| Error::DatabaseError {
                operation: "delete_many",
                with: "proxy_granting_tickets",
            })?;

        let kept_tickets: Vec<String> = kept_tickets.into_iter().collect();
        for name in ["login_tickets", "service_tickets", "proxy_tickets"] {
            self.collection::<Document>(name)
                .delete_many(doc! {
                    "created_at": {
                        "$lt": cutoff.as_str()
                    },
                    "_id": {
                        "$nin": kept_tickets.clone()
                    }
                })
                .await
                .map_err(|_| Error::DatabaseError {
                    operation: "delete_many",
                    with: "tickets",
                })?;
        }

        Ok(())
    }
}
