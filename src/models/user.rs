use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Access level stored on every user document.
///
/// Stored documents may carry any string here (make-admin writes what the
/// client sends), so values other than `user`/`admin` are kept as `Other`.
/// A null or non-string role reads as `User`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    User,
    Admin,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "user" => Role::User,
            "admin" => Role::Admin,
            _ => Role::Other(raw),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Bson::deserialize(deserializer)? {
            Bson::String(raw) => Ok(Role::from(raw)),
            _ => Ok(Role::User),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user document as stored in `userCollection`.
///
/// Documents are schemaless: the known fields are typed, anything else the
/// client sent at creation time is kept in `extra`. Array fields default to
/// empty when the document doesn't have them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_id_as_hex"
    )]
    pub id: Option<ObjectId>,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,

    #[serde(default)]
    pub payment_history: Vec<Bson>,

    #[serde(default)]
    pub reviewed_meal: Vec<Bson>,

    #[serde(default)]
    pub liked_meals: Vec<Bson>,

    #[serde(default)]
    pub reviewed_scholarship: Vec<Bson>,

    #[serde(default)]
    pub user_application: Vec<Bson>,

    #[serde(default)]
    pub requested_meal: Vec<Bson>,

    #[serde(flatten)]
    pub extra: Document,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn items(&self, field: ArrayField) -> &[Bson] {
        match field {
            ArrayField::PaymentHistory => &self.payment_history,
            ArrayField::ReviewedMeal => &self.reviewed_meal,
            ArrayField::LikedMeals => &self.liked_meals,
            ArrayField::ReviewedScholarship => &self.reviewed_scholarship,
            ArrayField::UserApplication => &self.user_application,
            ArrayField::RequestedMeal => &self.requested_meal,
        }
    }
}

// The HTTP layer hands ids out as plain hex strings.
fn serialize_id_as_hex<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// The array fields of a user document that grow through append routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayField {
    PaymentHistory,
    ReviewedMeal,
    LikedMeals,
    ReviewedScholarship,
    UserApplication,
    RequestedMeal,
}

impl ArrayField {
    /// Document key, also the request body key for the insert-* routes.
    pub fn key(&self) -> &'static str {
        match self {
            ArrayField::PaymentHistory => "paymentHistory",
            ArrayField::ReviewedMeal => "reviewedMeal",
            ArrayField::LikedMeals => "likedMeals",
            ArrayField::ReviewedScholarship => "reviewedScholarship",
            ArrayField::UserApplication => "userApplication",
            ArrayField::RequestedMeal => "requestedMeal",
        }
    }

    /// Human wording used in log lines and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ArrayField::PaymentHistory => "payment history",
            ArrayField::ReviewedMeal => "reviews",
            ArrayField::LikedMeals => "liked meals",
            ArrayField::ReviewedScholarship => "reviewed scholarships",
            ArrayField::UserApplication => "user applications",
            ArrayField::RequestedMeal => "requested meals",
        }
    }
}
