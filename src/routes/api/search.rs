use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{
    auth::CurrentUser,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, search_service::SearchResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/search", get(search))
}

async fn search(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<SearchResult>> {
    let results = ServiceContext::from_state(&state).search().search(&query.q).await?;
    JsonApiResponse::ok(results)
}
