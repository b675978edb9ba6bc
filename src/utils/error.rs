use mongodb::bson;
use thiserror::Error;

/// Failures surfaced by the user record service.
///
/// `BadRequest`, `NotFound` and `Forbidden` carry a message that is safe to
/// show to the caller. Everything else is an internal failure whose detail
/// only goes to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Invalid object id: {0}")]
    InvalidId(#[from] bson::oid::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bson::de::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// True for failures the client caused or can act on.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::BadRequest(_) | AppError::NotFound(_) | AppError::Forbidden(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
