pub mod outcome;
pub mod user;

pub use outcome::*;
pub use user::*;
