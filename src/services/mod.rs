pub mod array_fields;
pub mod user_service;

pub use user_service::*;
