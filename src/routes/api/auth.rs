use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{
        CurrentUser,
        cookie::{clear_session_cookie, session_cookie, token_from_headers},
    },
    error::AppError,
    middleware::RateLimitLayer,
    ratelimit::{RateClass, RateLimiter},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: CurrentUser,
    /// Same envelope as the cookie, for `Authorization: Bearer` clients.
    pub token: String,
    pub expires_in: i64,
}

pub fn router(limiter: Arc<dyn RateLimiter>) -> Router<Arc<AppState>> {
    let login_route = Router::new()
        .route("/login", post(login))
        .layer(RateLimitLayer::new(RateClass::Auth, limiter));

    Router::new()
        .merge(login_route)
        .route("/logout", post(logout))
        .route("/session", get(current_session))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let issued = ServiceContext::from_state(&state)
        .session(&state.session_keys, state.config.session_ttl_hours())
        .login(body.email.trim(), &body.password)
        .await?;

    let cookie = session_cookie(&issued.token, issued.max_age_secs, state.config.secure_cookies())
        .ok_or_else(|| AppError::internal("Failed to build session cookie"))?;
    let body = JsonApiResponse::ok(LoginResponse {
        user: issued.user,
        token: issued.token,
        expires_in: issued.max_age_secs,
    })?;
    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = token_from_headers(&headers) {
        ServiceContext::from_state(&state)
            .session(&state.session_keys, state.config.session_ttl_hours())
            .logout(&token)
            .await?;
    }
    let cleared = clear_session_cookie(state.config.secure_cookies());
    let body = JsonApiResponse::with_status(
        axum::http::StatusCode::OK,
        "logged out",
        serde_json::Value::Null,
    )?;
    Ok(([(header::SET_COOKIE, cleared)], body).into_response())
}

async fn current_session(user: CurrentUser) -> ApiResult<CurrentUser> {
    JsonApiResponse::ok(user)
}
