mod json_error;
mod panic;
mod rate_limit;
mod session;

pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
pub use rate_limit::RateLimitLayer;
pub use session::{AdminSession, ADMIN_LOGIN_PATH};
