use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::Collection;

use super::store::{UserKey, UserStore};
use super::MongoDB;
use crate::models::{DeleteOutcome, InsertOutcome, UpdateOutcome, UserRecord};
use crate::utils::AppResult;

/// `UserStore` over a MongoDB collection.
#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<Document>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB, collection: &str) -> Self {
        Self {
            collection: db.collection::<Document>(collection),
        }
    }
}

fn decode(document: Document) -> AppResult<UserRecord> {
    Ok(bson::from_document(document)?)
}

/// `$or` over name/email with the needle escaped so it matches literally.
pub(crate) fn search_filter(needle: &str) -> Document {
    let pattern = regex::escape(needle);
    doc! {
        "$or": [
            { "name": { "$regex": &pattern, "$options": "i" } },
            { "email": { "$regex": &pattern, "$options": "i" } },
        ]
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_one(&self, key: &UserKey) -> AppResult<Option<UserRecord>> {
        self.collection
            .find_one(key.filter())
            .await?
            .map(decode)
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<UserRecord>> {
        let documents: Vec<Document> = self.collection.find(doc! {}).await?.try_collect().await?;
        documents.into_iter().map(decode).collect()
    }

    async fn search_by_name_or_email(&self, needle: &str) -> AppResult<Vec<UserRecord>> {
        let documents: Vec<Document> = self
            .collection
            .find(search_filter(needle))
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(decode).collect()
    }

    async fn insert_one(&self, user: Document) -> AppResult<InsertOutcome> {
        let result = self.collection.insert_one(user).await?;
        Ok(result.into())
    }

    async fn set_fields(
        &self,
        key: &UserKey,
        fields: Document,
        upsert: bool,
    ) -> AppResult<UpdateOutcome> {
        let result = self
            .collection
            .update_one(key.filter(), doc! { "$set": fields })
            .upsert(upsert)
            .await?;
        Ok(result.into())
    }

    async fn delete_one(&self, key: &UserKey) -> AppResult<DeleteOutcome> {
        let result = self.collection.delete_one(key.filter()).await?;
        Ok(result.into())
    }
}
