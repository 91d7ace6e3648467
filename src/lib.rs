pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod locale;
pub mod logging;
pub mod mailer;
pub mod maintenance;
pub mod middleware;
pub mod ratelimit;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod validation;
