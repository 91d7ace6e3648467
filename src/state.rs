use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::jwt::SessionKeys, config::AppConfig, mailer::Mailer, ratelimit::RateLimiter,
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub session_keys: SessionKeys,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        rate_limiter: Arc<dyn RateLimiter>,
        mailer: Mailer,
    ) -> Arc<Self> {
        let secret = config
            .auth
            .as_ref()
            .map(|auth| auth.session_secret.clone())
            .unwrap_or_default();
        Arc::new(Self {
            session_keys: SessionKeys::from_secret(secret.as_bytes()),
            config,
            db,
            rate_limiter,
            mailer,
        })
    }
}
