//! Builders shared by the router tests: mock-backed state, the full
//! middleware stack, and signed session headers.

use std::sync::Arc;

use axum::{Router, middleware::from_fn};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    auth::jwt::{encode_session, make_session_claims},
    config::{AppConfig, AuthConfig},
    mailer::Mailer,
    middleware::{catch_panic_layer, json_error_middleware},
    ratelimit::{NoopRateLimiter, RateLimiter},
    routes::router,
    state::AppState,
};

pub const TEST_SESSION_SECRET: &str = "test-session-secret-0123456789";

pub fn test_config() -> AppConfig {
    AppConfig {
        auth: Some(AuthConfig {
            session_secret: TEST_SESSION_SECRET.to_string(),
            session_ttl_hours: 168,
            admin_email: "admin@example.com".to_string(),
            admin_password: "adminpassword".to_string(),
            admin_name: "Admin".to_string(),
            secure_cookies: false,
        }),
        ..AppConfig::default()
    }
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    test_state_with_limiter(db, Arc::new(NoopRateLimiter))
}

pub fn test_state_with_limiter(
    db: DatabaseConnection,
    limiter: Arc<dyn RateLimiter>,
) -> Arc<AppState> {
    AppState::new(test_config(), db, limiter, Mailer::log_only())
}

/// Router wrapped in the same layers `main` installs.
pub fn test_app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}

/// `Authorization` header value carrying a signed envelope for `session_token`.
pub fn bearer_for(state: &AppState, session_token: &str, user_id: &Uuid) -> String {
    let claims = make_session_claims(session_token, user_id, state.config.session_ttl_hours());
    let envelope =
        encode_session(&state.session_keys, &claims).expect("session envelope should encode");
    format!("Bearer {envelope}")
}
