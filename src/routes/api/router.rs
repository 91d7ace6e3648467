use std::sync::Arc;

use axum::Router;

use crate::{
    error::AppError, middleware::RateLimitLayer, ratelimit::RateClass, state::AppState,
};

use super::{auth, entities, public, search, sections};

pub fn router(state: Arc<AppState>) -> Router {
    let limiter = state.rate_limiter.clone();

    let managed = Router::new()
        .merge(entities::router(&state))
        .merge(sections::router(&state))
        .merge(search::router())
        .layer(RateLimitLayer::new(RateClass::Api, limiter.clone()));

    Router::new()
        .merge(managed)
        .nest("/auth", auth::router(limiter.clone()))
        .merge(public::router(limiter))
        .fallback(unknown_endpoint)
        .with_state(state)
}

async fn unknown_endpoint() -> AppError {
    AppError::not_found("Endpoint not found")
}
