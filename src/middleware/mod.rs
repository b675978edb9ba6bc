pub mod auth;
pub mod security_headers;

pub use auth::{AuthMiddleware, TokenVerifier};
pub use security_headers::SecurityHeaders;
