use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

#[cfg(test)]
pub mod memory_store;
pub mod mongo_store;
pub mod store;

pub use mongo_store::MongoUserStore;
pub use store::{UserKey, UserStore};

/// Shared MongoDB handle. Cloning is cheap: the client is a pooled handle.
#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        Ok(Self { db })
    }

    /// Creates the lookup index on `email` for the user collection.
    ///
    /// Not unique: the plain add-user route does not deduplicate emails.
    pub async fn ensure_indexes(&self, user_collection: &str) -> Result<(), mongodb::error::Error> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(user_collection);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().name("email_1".to_string()).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(email)", user_collection),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
