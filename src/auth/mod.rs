pub mod cookie;
pub mod jwt;
pub mod password;
mod types;

pub use types::{CurrentUser, ROLE_NAMES, Role, SessionClaims};
