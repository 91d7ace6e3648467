use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{Router, extract::State, response::Response};
use tower_http::services::ServeDir;

use crate::state::AppState;

use super::{admin, pages};

pub const STATIC_PREFIX: &str = "/static";

pub fn router(state: Arc<AppState>) -> Router {
    let public_dir = resolve_public_dir(&state.config.general.public_dir);
    tracing::debug!(dir = %public_dir.display(), "serving static assets");

    Router::new()
        .merge(pages::router())
        .merge(admin::router(state.rate_limiter.clone()))
        .nest_service(STATIC_PREFIX, ServeDir::new(public_dir))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    pages::not_found_page(&state).await
}

/// Configured directory as given, then next to the executable, then the crate root.
fn resolve_public_dir(configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() || configured.exists() {
        return configured.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let candidate = exe_dir.join(configured);
        if candidate.exists() {
            return candidate;
        }
    }

    Path::new(env!("CARGO_MANIFEST_DIR")).join(configured)
}
