use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use std::fmt;

use crate::models::{DeleteOutcome, InsertOutcome, UpdateOutcome, UserRecord};
use crate::utils::AppResult;

/// How a single user document is addressed.
#[derive(Debug, Clone, PartialEq)]
pub enum UserKey {
    Email(String),
    Id(ObjectId),
}

impl UserKey {
    pub fn email(email: impl Into<String>) -> Self {
        UserKey::Email(email.into())
    }

    pub fn filter(&self) -> Document {
        match self {
            UserKey::Email(email) => doc! { "email": email },
            UserKey::Id(id) => doc! { "_id": id },
        }
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserKey::Email(email) => write!(f, "email={}", email),
            UserKey::Id(id) => write!(f, "_id={}", id),
        }
    }
}

/// The slice of a document collection the user service needs.
///
/// Writes replace whole top-level fields (`$set` semantics); there is no
/// array-append primitive here, so the service's append routes are
/// read-modify-write.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_one(&self, key: &UserKey) -> AppResult<Option<UserRecord>>;

    async fn find_all(&self) -> AppResult<Vec<UserRecord>>;

    /// Case-insensitive literal substring match on `name` or `email`.
    async fn search_by_name_or_email(&self, needle: &str) -> AppResult<Vec<UserRecord>>;

    async fn insert_one(&self, user: Document) -> AppResult<InsertOutcome>;

    async fn set_fields(
        &self,
        key: &UserKey,
        fields: Document,
        upsert: bool,
    ) -> AppResult<UpdateOutcome>;

    async fn delete_one(&self, key: &UserKey) -> AppResult<DeleteOutcome>;
}
