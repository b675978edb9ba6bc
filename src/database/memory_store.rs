use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::store::{UserKey, UserStore};
use crate::models::{DeleteOutcome, InsertOutcome, UpdateOutcome, UserRecord};
use crate::utils::AppResult;

/// In-memory user collection with the driver's `$set`/upsert counting rules.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<Document>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored document, for assertions on what actually hit the store.
    pub async fn raw(&self, key: &UserKey) -> Option<Document> {
        let users = self.users.read().await;
        users.iter().find(|doc| matches_key(doc, key)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

fn matches_key(doc: &Document, key: &UserKey) -> bool {
    match key {
        UserKey::Email(email) => doc.get_str("email").map(|v| v == email.as_str()).unwrap_or(false),
        UserKey::Id(id) => doc.get_object_id("_id").map(|v| v == *id).unwrap_or(false),
    }
}

fn contains_ignore_case(doc: &Document, field: &str, needle: &str) -> bool {
    doc.get_str(field)
        .map(|value| value.to_lowercase().contains(needle))
        .unwrap_or(false)
}

fn decode(doc: &Document) -> AppResult<UserRecord> {
    Ok(bson::from_document(doc.clone())?)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_one(&self, key: &UserKey) -> AppResult<Option<UserRecord>> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|doc| matches_key(doc, key))
            .map(decode)
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<UserRecord>> {
        let users = self.users.read().await;
        users.iter().map(decode).collect()
    }

    async fn search_by_name_or_email(&self, needle: &str) -> AppResult<Vec<UserRecord>> {
        let needle = needle.to_lowercase();
        let users = self.users.read().await;
        users
            .iter()
            .filter(|doc| {
                contains_ignore_case(doc, "name", &needle)
                    || contains_ignore_case(doc, "email", &needle)
            })
            .map(decode)
            .collect()
    }

    async fn insert_one(&self, mut user: Document) -> AppResult<InsertOutcome> {
        if !user.contains_key("_id") {
            user.insert("_id", ObjectId::new());
        }
        let inserted_id = user.get("_id").map(crate::models::outcome::id_to_string);

        self.users.write().await.push(user);

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn set_fields(
        &self,
        key: &UserKey,
        fields: Document,
        upsert: bool,
    ) -> AppResult<UpdateOutcome> {
        let mut users = self.users.write().await;

        if let Some(existing) = users.iter_mut().find(|doc| matches_key(doc, key)) {
            let changed = fields
                .iter()
                .any(|(field, value)| existing.get(field) != Some(value));
            for (field, value) in fields {
                existing.insert(field, value);
            }
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(changed),
                ..Default::default()
            });
        }

        if !upsert {
            return Ok(UpdateOutcome {
                acknowledged: true,
                ..Default::default()
            });
        }

        let id = match key {
            UserKey::Id(id) => *id,
            UserKey::Email(_) => ObjectId::new(),
        };
        let mut created = key.filter();
        created.insert("_id", Bson::ObjectId(id));
        for (field, value) in fields {
            created.insert(field, value);
        }
        users.push(created);

        Ok(UpdateOutcome {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: Some(id.to_hex()),
            ..Default::default()
        })
    }

    async fn delete_one(&self, key: &UserKey) -> AppResult<DeleteOutcome> {
        let mut users = self.users.write().await;
        let deleted_count = match users.iter().position(|doc| matches_key(doc, key)) {
            Some(index) => {
                users.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn set_fields_counts_like_the_driver() {
        let store = InMemoryUserStore::new();
        store
            .insert_one(doc! { "email": "a@b.c", "plan": "basic" })
            .await
            .unwrap();
        let key = UserKey::email("a@b.c");

        let same = store.set_fields(&key, doc! { "plan": "basic" }, false).await.unwrap();
        assert_eq!((same.matched_count, same.modified_count), (1, 0));

        let changed = store.set_fields(&key, doc! { "plan": "gold" }, false).await.unwrap();
        assert_eq!((changed.matched_count, changed.modified_count), (1, 1));

        let missing = store
            .set_fields(&UserKey::email("nobody@b.c"), doc! { "plan": "gold" }, false)
            .await
            .unwrap();
        assert_eq!(missing, UpdateOutcome { acknowledged: true, ..Default::default() });
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn upsert_creates_document_from_filter() {
        let store = InMemoryUserStore::new();
        let key = UserKey::email("new@b.c");

        let outcome = store.set_fields(&key, doc! { "likedMeals": ["m1"] }, true).await.unwrap();
        assert_eq!(outcome.upserted_count, 1);
        assert!(outcome.upserted_id.is_some());

        let raw = store.raw(&key).await.unwrap();
        assert_eq!(raw.get_str("email").unwrap(), "new@b.c");
        assert_eq!(raw.get_array("likedMeals").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_name_and_email() {
        let store = InMemoryUserStore::new();
        store.insert_one(doc! { "email": "ada@lovelace.io", "name": "Ada" }).await.unwrap();
        store.insert_one(doc! { "email": "alan@turing.io", "name": "Alan" }).await.unwrap();

        assert_eq!(store.search_by_name_or_email("ADA").await.unwrap().len(), 1);
        assert_eq!(store.search_by_name_or_email("TURING").await.unwrap().len(), 1);
        assert_eq!(store.search_by_name_or_email(".io").await.unwrap().len(), 2);
        assert!(store.search_by_name_or_email("grace").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_one_match() {
        let store = InMemoryUserStore::new();
        let inserted = store.insert_one(doc! { "email": "a@b.c" }).await.unwrap();
        let id = ObjectId::parse_str(inserted.inserted_id.unwrap()).unwrap();

        let first = store.delete_one(&UserKey::Id(id)).await.unwrap();
        let second = store.delete_one(&UserKey::Id(id)).await.unwrap();
        assert_eq!(first.deleted_count, 1);
        assert_eq!(second.deleted_count, 0);
    }
}
