use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    auth::{CurrentUser, cookie::token_from_headers},
    error::AppError,
    services::ServiceContext,
    state::AppState,
};

pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// Resolves the session envelope from the cookie or bearer header.
/// The resolved user is cached in the request extensions so a handler that
/// extracts it twice only hits storage once.
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
        let user = ServiceContext::from_state(state)
            .session(&state.session_keys, state.config.session_ttl_hours())
            .resolve(&token)
            .await?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Signed-in user for admin pages; anonymous visitors are sent to the login form.
#[derive(Debug, Clone)]
pub struct AdminSession(pub CurrentUser);

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(AdminSession(user)),
            Err(AppError::Unauthorized(_)) => Err(Redirect::to(ADMIN_LOGIN_PATH).into_response()),
            Err(err) => Err(err.into_response()),
        }
    }
}
