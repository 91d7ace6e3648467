use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    db::entities::{lead, newsletter_subscriber},
    middleware::RateLimitLayer,
    ratelimit::{RateClass, RateLimiter},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
}

/// Acknowledgement for an anonymous submission; the stored row stays private.
#[derive(Debug, Serialize)]
pub struct Receipt {
    pub id: Uuid,
    pub status: String,
}

impl From<lead::Model> for Receipt {
    fn from(lead: lead::Model) -> Self {
        Self {
            id: lead.id,
            status: lead.status,
        }
    }
}

impl From<newsletter_subscriber::Model> for Receipt {
    fn from(subscriber: newsletter_subscriber::Model) -> Self {
        Self {
            id: subscriber.id,
            status: "subscribed".to_string(),
        }
    }
}

/// Visitor-facing endpoints; each write has its own rate class.
pub fn router(limiter: Arc<dyn RateLimiter>) -> Router<Arc<AppState>> {
    let contact = Router::new()
        .route("/contact", post(submit_contact))
        .layer(RateLimitLayer::new(RateClass::Contact, limiter.clone()));
    let newsletter = Router::new()
        .route("/newsletter", post(subscribe))
        .layer(RateLimitLayer::new(RateClass::Newsletter, limiter));

    Router::new()
        .merge(contact)
        .merge(newsletter)
        .route("/health", get(health))
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResult<Receipt> {
    let lead = ServiceContext::from_state(&state)
        .enquiry(&state.mailer)
        .submit_contact(payload)
        .await?;
    JsonApiResponse::created(Receipt::from(lead))
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> ApiResult<Receipt> {
    let subscriber = ServiceContext::from_state(&state)
        .enquiry(&state.mailer)
        .subscribe(payload)
        .await?;
    JsonApiResponse::created(Receipt::from(subscriber))
}

async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthStatus> {
    let database = state.db.ping().await.is_ok();
    JsonApiResponse::ok(HealthStatus {
        status: "ok",
        database,
    })
}
