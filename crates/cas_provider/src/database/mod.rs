use std::ops::Deref;
use std::sync::Arc;

use self::definition::AbstractDatabase;

pub mod definition;

#[derive(Debug)]
pub enum Migration {
    M2024_10_01CreateTicketCollections,
    #[cfg(debug_assertions)]
    WipeAll,
}

mod dummy;
pub use dummy::DummyDb;

#[cfg(feature = "database-mongodb")]
mod mongo;

#[cfg(feature = "database-mongodb")]
pub use mongo::MongoDb;

#[derive(Clone)]
pub enum Database {
    Dummy(DummyDb),
    #[cfg(feature = "database-mongodb")]
    MongoDb(MongoDb),
    Custom(Arc<dyn AbstractDatabase>),
}

impl Default for Database {
    fn default() -> Self {
        Self::Dummy(Default::default())
    }
}

impl Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match self {
            Database::Dummy(dummy) => dummy,
            #[cfg(feature = "database-mongodb")]
            Database::MongoDb(mongo) => mongo,
            Database::Custom(custom) => custom.as_ref(),
        }
    }
}
