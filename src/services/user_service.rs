// ==================== USER RECORD SERVICE ====================
// Request logic for the user collection. Every operation is one or two
// store calls; nothing here holds state between requests.

use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    database::{UserKey, UserStore},
    models::{ArrayField, DeleteOutcome, InsertOutcome, Role, UpdateOutcome, UserRecord},
    services::array_fields::{append_items, normalize_items, patch_by_id, remove_by_id},
    utils::{AppError, AppResult},
};

// ==================== RESPONSE MODELS ====================

/// Result of the Google sign-in create path.
#[derive(Debug, Serialize)]
pub struct GoogleSignIn {
    /// False when a user with this email already existed.
    pub created: bool,
    pub user: UserRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub is_admin: bool,
    pub user: Option<UserRecord>,
}

// ==================== SERVICE ====================

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

fn required_email(email: &str) -> AppResult<UserKey> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::bad_request("Email is required"));
    }
    Ok(UserKey::email(email))
}

fn parse_id(id: &str) -> AppResult<UserKey> {
    Ok(UserKey::Id(ObjectId::parse_str(id)?))
}

fn with_default_role(mut payload: Document) -> Document {
    payload.insert("role", Role::User.as_str());
    payload
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    async fn require_user(&self, key: &UserKey) -> AppResult<UserRecord> {
        self.store
            .find_one(key)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Inserts the payload as a new user with role `user`. No dedupe.
    pub async fn add_user(&self, payload: Document) -> AppResult<InsertOutcome> {
        self.store.insert_one(with_default_role(payload)).await
    }

    /// Creates the user unless one with the same email already exists.
    pub async fn add_google_user(&self, mut payload: Document) -> AppResult<GoogleSignIn> {
        let email = payload.get_str("email").unwrap_or_default().trim().to_string();
        let key = required_email(&email)?;

        if let Some(existing) = self.store.find_one(&key).await? {
            log::info!("ℹ️  Google user already registered: {}", key);
            return Ok(GoogleSignIn {
                created: false,
                user: existing,
            });
        }

        payload.insert("email", email);
        let outcome = self.store.insert_one(with_default_role(payload)).await?;
        let key = match outcome.inserted_id.as_deref().map(ObjectId::parse_str) {
            Some(Ok(id)) => UserKey::Id(id),
            _ => key,
        };
        let user = self.require_user(&key).await?;

        Ok(GoogleSignIn {
            created: true,
            user,
        })
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserRecord>> {
        self.store.find_all().await
    }

    pub async fn get_user(&self, email: &str) -> AppResult<UserRecord> {
        self.require_user(&UserKey::email(email)).await
    }

    pub async fn search_users(&self, query: Option<&str>) -> AppResult<Vec<UserRecord>> {
        let query = query.unwrap_or_default();
        if query.trim().is_empty() {
            return Err(AppError::bad_request("Search query is required"));
        }

        let users = self.store.search_by_name_or_email(query).await?;
        if users.is_empty() {
            return Err(AppError::not_found("No users found"));
        }
        Ok(users)
    }

    /// Items of one array field; an absent field reads as empty.
    pub async fn get_items(&self, email: &str, field: ArrayField) -> AppResult<Vec<Bson>> {
        let user = self.require_user(&UserKey::email(email)).await?;
        Ok(user.items(field).to_vec())
    }

    /// Appends one element or a list of elements to `field`, creating the
    /// user when absent.
    ///
    /// Read-modify-write without isolation: two appends racing on the same
    /// email can lose one of them, since the second write replaces the
    /// whole array.
    pub async fn append_items(
        &self,
        email: &str,
        field: ArrayField,
        payload: Bson,
    ) -> AppResult<UpdateOutcome> {
        let key = UserKey::email(email);
        let incoming = normalize_items(payload);

        let current = self.store.find_one(&key).await?;
        let existing = current.as_ref().map(|u| u.items(field)).unwrap_or_default();
        let merged = append_items(existing, incoming);

        log::debug!("{} {} -> {} items", key, field.key(), merged.len());

        let mut fields = Document::new();
        fields.insert(field.key(), merged);
        self.store.set_fields(&key, fields, true).await
    }

    pub async fn update_plan(&self, email: &str, plan: Option<String>) -> AppResult<UpdateOutcome> {
        let mut fields = Document::new();
        fields.insert("plan", plan.map(Bson::String).unwrap_or(Bson::Null));
        self.store.set_fields(&UserKey::email(email), fields, false).await
    }

    /// Merges `patch` into the review with `review_id`.
    ///
    /// An unknown id writes nothing and still counts as success.
    pub async fn edit_review(&self, email: &str, review_id: &str, patch: Document) -> AppResult<()> {
        let key = UserKey::email(email);
        let user = self.require_user(&key).await?;

        let (reviews, matched) = patch_by_id(&user.reviewed_meal, review_id, &patch);
        if !matched {
            log::warn!("⚠️ Review {} not present for {}, nothing to update", review_id, key);
            return Ok(());
        }

        let mut fields = Document::new();
        fields.insert(ArrayField::ReviewedMeal.key(), reviews);
        let outcome = self.store.set_fields(&key, fields, false).await?;
        if outcome.modified_count == 0 {
            return Err(AppError::bad_request("Failed to update review"));
        }
        Ok(())
    }

    pub async fn delete_review(&self, email: &str, review_id: &str) -> AppResult<()> {
        let key = UserKey::email(email);
        let user = self.require_user(&key).await?;

        let remaining = remove_by_id(&user.reviewed_meal, review_id);
        if remaining.len() == user.reviewed_meal.len() {
            return Err(AppError::not_found("Review not found"));
        }

        let mut fields = Document::new();
        fields.insert(ArrayField::ReviewedMeal.key(), remaining);
        let outcome = self.store.set_fields(&key, fields, false).await?;
        if outcome.modified_count == 0 {
            return Err(AppError::bad_request("Failed to delete review"));
        }
        Ok(())
    }

    pub async fn set_role(&self, id: &str, role: Role) -> AppResult<UpdateOutcome> {
        let key = parse_id(id)?;
        let mut fields = Document::new();
        fields.insert("role", role.as_str());
        self.store.set_fields(&key, fields, false).await
    }

    pub async fn check_admin(&self, email: &str) -> AppResult<AdminStatus> {
        if email.trim().is_empty() {
            return Err(AppError::Forbidden("Forbidden access".to_string()));
        }

        let user = self.store.find_one(&UserKey::email(email)).await?;
        Ok(AdminStatus {
            is_admin: user.as_ref().map(UserRecord::is_admin).unwrap_or(false),
            user,
        })
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<DeleteOutcome> {
        let key = parse_id(id)?;
        self.store.delete_one(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_store::InMemoryUserStore;
    use mongodb::bson::{bson, doc};

    fn service() -> (UserService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::new());
        (UserService::new(store.clone()), store)
    }

    async fn seeded_with_reviews() -> (UserService, Arc<InMemoryUserStore>) {
        let (service, store) = service();
        store
            .insert_one(doc! {
                "email": "ada@meals.io",
                "reviewedMeal": [
                    { "id": "a", "text": "x" },
                    { "id": "b", "text": "y" },
                ],
            })
            .await
            .unwrap();
        (service, store)
    }

    #[tokio::test]
    async fn add_user_forces_user_role_and_does_not_dedupe() {
        let (service, store) = service();

        let first = service
            .add_user(doc! { "email": "ada@meals.io", "role": "admin" })
            .await
            .unwrap();
        service.add_user(doc! { "email": "ada@meals.io" }).await.unwrap();

        assert!(first.inserted_id.is_some());
        assert_eq!(store.len().await, 2);
        let user = service.get_user("ada@meals.io").await.unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn google_sign_in_creates_once() {
        let (service, store) = service();
        let payload = doc! { "email": "ada@meals.io", "name": "Ada" };

        let created = service.add_google_user(payload.clone()).await.unwrap();
        assert!(created.created);
        assert_eq!(created.user.name.as_deref(), Some("Ada"));
        assert!(created.user.id.is_some());

        let again = service.add_google_user(payload).await.unwrap();
        assert!(!again.created);
        assert_eq!(again.user.id, created.user.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn google_sign_in_stores_trimmed_email() {
        let (service, store) = service();
        let payload = doc! { "email": "  ada@meals.io ", "name": "Ada" };

        let first = service.add_google_user(payload.clone()).await.unwrap();
        assert!(first.created);
        assert_eq!(first.user.email, "ada@meals.io");

        let again = service.add_google_user(payload).await.unwrap();
        assert!(!again.created);
        assert_eq!(store.len().await, 1);
        assert!(store.raw(&UserKey::email("ada@meals.io")).await.is_some());
    }

    #[tokio::test]
    async fn google_sign_in_requires_email() {
        let (service, _) = service();
        let err = service.add_google_user(doc! { "name": "Ada" }).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn get_user_absent_is_not_found() {
        let (service, _) = service();
        let err = service.get_user("ghost@meals.io").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_user_present_returns_full_record() {
        let (service, store) = service();
        store
            .insert_one(doc! { "email": "ada@meals.io", "name": "Ada", "photo": "p.png", "plan": "gold" })
            .await
            .unwrap();

        let user = service.get_user("ada@meals.io").await.unwrap();
        assert_eq!(user.plan.as_deref(), Some("gold"));
        assert_eq!(user.extra.get_str("photo").unwrap(), "p.png");
    }

    #[tokio::test]
    async fn search_validates_and_matches() {
        let (service, store) = service();
        store.insert_one(doc! { "email": "ada@meals.io", "name": "Ada Lovelace" }).await.unwrap();
        store.insert_one(doc! { "email": "alan@meals.io", "name": "Alan" }).await.unwrap();

        for blank in [None, Some(""), Some("   ")] {
            let err = service.search_users(blank).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }

        let err = service.search_users(Some("grace")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert_eq!(service.search_users(Some("LOVE")).await.unwrap().len(), 1);
        assert_eq!(service.search_users(Some("MEALS")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn append_on_absent_user_creates_it_with_exact_input() {
        let (service, store) = service();

        let outcome = service
            .append_items("new@meals.io", ArrayField::LikedMeals, bson!(["m1", "m2"]))
            .await
            .unwrap();

        assert_eq!(outcome.upserted_count, 1);
        let raw = store.raw(&UserKey::email("new@meals.io")).await.unwrap();
        assert_eq!(raw.get_array("likedMeals").unwrap(), &vec![bson!("m1"), bson!("m2")]);
    }

    #[tokio::test]
    async fn append_concatenates_existing_then_new() {
        let (service, _) = service();
        let email = "ada@meals.io";

        service
            .append_items(email, ArrayField::RequestedMeal, bson!(["e1", "e2"]))
            .await
            .unwrap();
        let outcome = service
            .append_items(email, ArrayField::RequestedMeal, bson!(["s1", "s2", "s3"]))
            .await
            .unwrap();

        assert_eq!((outcome.matched_count, outcome.modified_count), (1, 1));
        let items = service.get_items(email, ArrayField::RequestedMeal).await.unwrap();
        assert_eq!(
            items,
            vec![bson!("e1"), bson!("e2"), bson!("s1"), bson!("s2"), bson!("s3")]
        );
    }

    #[tokio::test]
    async fn append_single_equals_append_one_element_list() {
        let (single, _) = service();
        let (listed, _) = service();
        let payment = bson!({ "amount": 25, "transactionId": "tx-1" });

        single
            .append_items("ada@meals.io", ArrayField::PaymentHistory, payment.clone())
            .await
            .unwrap();
        listed
            .append_items("ada@meals.io", ArrayField::PaymentHistory, Bson::Array(vec![payment]))
            .await
            .unwrap();

        assert_eq!(
            single.get_items("ada@meals.io", ArrayField::PaymentHistory).await.unwrap(),
            listed.get_items("ada@meals.io", ArrayField::PaymentHistory).await.unwrap()
        );
    }

    #[tokio::test]
    async fn scholarship_append_builds_on_scholarships_not_reviews() {
        let (service, _) = seeded_with_reviews().await;

        service
            .append_items("ada@meals.io", ArrayField::ReviewedScholarship, bson!({ "id": "s1" }))
            .await
            .unwrap();

        let scholarships = service
            .get_items("ada@meals.io", ArrayField::ReviewedScholarship)
            .await
            .unwrap();
        assert_eq!(scholarships, vec![bson!({ "id": "s1" })]);
    }

    #[tokio::test]
    async fn interleaved_appends_are_last_write_wins() {
        // Known limitation: the append is not isolated. Replays the window
        // between one caller's read and its write.
        let (service, store) = service();
        let email = "ada@meals.io";
        let key = UserKey::email(email);
        service
            .append_items(email, ArrayField::LikedMeals, bson!("m0"))
            .await
            .unwrap();

        let snapshot = store.find_one(&key).await.unwrap().unwrap();
        let stale = append_items(&snapshot.liked_meals, vec![bson!("from-a")]);

        service
            .append_items(email, ArrayField::LikedMeals, bson!("from-b"))
            .await
            .unwrap();
        store
            .set_fields(&key, doc! { "likedMeals": stale }, true)
            .await
            .unwrap();

        let items = service.get_items(email, ArrayField::LikedMeals).await.unwrap();
        assert_eq!(items, vec![bson!("m0"), bson!("from-a")]);
    }

    #[tokio::test]
    async fn get_items_of_absent_field_is_empty() {
        let (service, store) = service();
        store.insert_one(doc! { "email": "ada@meals.io" }).await.unwrap();

        let items = service.get_items("ada@meals.io", ArrayField::UserApplication).await.unwrap();
        assert!(items.is_empty());

        let err = service
            .get_items("ghost@meals.io", ArrayField::UserApplication)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn edit_review_merges_payload() {
        let (service, _) = seeded_with_reviews().await;

        service
            .edit_review("ada@meals.io", "a", doc! { "text": "z" })
            .await
            .unwrap();

        let reviews = service.get_items("ada@meals.io", ArrayField::ReviewedMeal).await.unwrap();
        assert_eq!(
            reviews,
            vec![bson!({ "id": "a", "text": "z" }), bson!({ "id": "b", "text": "y" })]
        );
    }

    #[tokio::test]
    async fn edit_review_unknown_id_is_success_and_unchanged() {
        let (service, _) = seeded_with_reviews().await;

        service
            .edit_review("ada@meals.io", "nope", doc! { "text": "z" })
            .await
            .unwrap();

        let reviews = service.get_items("ada@meals.io", ArrayField::ReviewedMeal).await.unwrap();
        assert_eq!(reviews[0], bson!({ "id": "a", "text": "x" }));
        assert_eq!(reviews.len(), 2);
    }

    #[tokio::test]
    async fn edit_review_with_identical_payload_reports_failure() {
        let (service, _) = seeded_with_reviews().await;

        let err = service
            .edit_review("ada@meals.io", "a", doc! { "text": "x" })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn edit_review_without_reviews_field_does_not_fail_hard() {
        let (service, store) = service();
        store.insert_one(doc! { "email": "ada@meals.io" }).await.unwrap();

        service
            .edit_review("ada@meals.io", "a", doc! { "text": "z" })
            .await
            .unwrap();

        let err = service.edit_review("ghost@meals.io", "a", doc! {}).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_review_removes_only_match() {
        let (service, _) = seeded_with_reviews().await;

        service.delete_review("ada@meals.io", "b").await.unwrap();

        let reviews = service.get_items("ada@meals.io", ArrayField::ReviewedMeal).await.unwrap();
        assert_eq!(reviews, vec![bson!({ "id": "a", "text": "x" })]);
    }

    #[tokio::test]
    async fn delete_review_unknown_id_is_not_found() {
        let (service, _) = seeded_with_reviews().await;

        let err = service.delete_review("ada@meals.io", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Review not found"));

        let reviews = service.get_items("ada@meals.io", ArrayField::ReviewedMeal).await.unwrap();
        assert_eq!(reviews.len(), 2);
    }

    #[tokio::test]
    async fn update_plan_does_not_upsert() {
        let (service, store) = service();
        let outcome = service
            .update_plan("ghost@meals.io", Some("gold".into()))
            .await
            .unwrap();

        assert_eq!(outcome.matched_count, 0);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn role_changes_and_admin_check() {
        let (service, _) = service();
        let inserted = service.add_user(doc! { "email": "ada@meals.io" }).await.unwrap();
        let id = inserted.inserted_id.unwrap();

        let before = service.check_admin("ada@meals.io").await.unwrap();
        assert!(!before.is_admin);
        assert!(before.user.is_some());

        let outcome = service.set_role(&id, Role::Admin).await.unwrap();
        assert_eq!(outcome.modified_count, 1);

        let after = service.check_admin("ada@meals.io").await.unwrap();
        assert!(after.is_admin);

        let missing = service.check_admin("ghost@meals.io").await.unwrap();
        assert!(!missing.is_admin);
        assert!(missing.user.is_none());

        let err = service.check_admin(" ").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unexpected_stored_roles_do_not_break_reads() {
        let (service, store) = service();
        store.insert_one(doc! { "email": "ada@x.io", "role": "admin" }).await.unwrap();
        store.insert_one(doc! { "email": "mod@x.io", "role": "moderator" }).await.unwrap();
        store.insert_one(doc! { "email": "null@x.io", "role": null }).await.unwrap();

        assert_eq!(service.list_users().await.unwrap().len(), 3);
        assert_eq!(service.search_users(Some("x.io")).await.unwrap().len(), 3);

        let moderator = service.check_admin("mod@x.io").await.unwrap();
        assert!(!moderator.is_admin);
        assert_eq!(moderator.user.unwrap().role, Role::Other("moderator".into()));

        let null_role = service.check_admin("null@x.io").await.unwrap();
        assert!(!null_role.is_admin);
        assert!(null_role.user.is_some());

        service
            .append_items("mod@x.io", ArrayField::LikedMeals, bson!("m1"))
            .await
            .unwrap();
        let raw = store.raw(&UserKey::email("mod@x.io")).await.unwrap();
        assert_eq!(raw.get_str("role").unwrap(), "moderator");
    }

    #[tokio::test]
    async fn set_role_writes_any_role_verbatim() {
        let (service, store) = service();
        let inserted = service.add_user(doc! { "email": "ada@x.io" }).await.unwrap();
        let id = inserted.inserted_id.unwrap();

        service.set_role(&id, Role::from("moderator".to_string())).await.unwrap();

        let raw = store.raw(&UserKey::email("ada@x.io")).await.unwrap();
        assert_eq!(raw.get_str("role").unwrap(), "moderator");
        assert!(!service.check_admin("ada@x.io").await.unwrap().is_admin);
    }

    #[tokio::test]
    async fn malformed_id_is_internal_failure() {
        let (service, _) = service();

        let err = service.delete_user("xyz").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));
        assert!(!err.is_client_error());

        let err = service.set_role("xyz", Role::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidId(_)));
    }

    #[tokio::test]
    async fn delete_user_by_id() {
        let (service, store) = service();
        let inserted = service.add_user(doc! { "email": "ada@meals.io" }).await.unwrap();

        let outcome = service.delete_user(&inserted.inserted_id.unwrap()).await.unwrap();
        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(store.len().await, 0);
    }
}
