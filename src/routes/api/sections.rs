use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::Value;

use crate::{
    auth::CurrentUser,
    db::entities::{company_info, cta_section, hero_section},
    response::JsonApiResponse,
    services::{
        ServiceContext,
        section_service::{SectionService, SingletonRecord},
    },
    state::AppState,
};

pub fn router(state: &AppState) -> Router<Arc<AppState>> {
    let services = ServiceContext::from_state(state);

    Router::new()
        .merge(singleton_router(services.section::<hero_section::Entity>(), "/sections/hero"))
        .merge(singleton_router(services.section::<cta_section::Entity>(), "/sections/cta"))
        .merge(singleton_router(services.section::<company_info::Entity>(), "/company-info"))
}

/// `GET` reads (creating the default row on first access), `PUT` replaces the
/// existing row, `POST` creates it once.
fn singleton_router<E>(service: SectionService<E>, path: &'static str) -> Router<Arc<AppState>>
where
    E: SingletonRecord + 'static,
{
    let route = get({
        let service = service.clone();
        move |_user: CurrentUser| async move {
            let record = service.get_or_create().await?;
            JsonApiResponse::ok(record)
        }
    })
    .put({
        let service = service.clone();
        move |_user: CurrentUser, Json(payload): Json<Value>| async move {
            let record = service.replace(payload).await?;
            JsonApiResponse::ok(record)
        }
    })
    .post(move |_user: CurrentUser, Json(payload): Json<Value>| async move {
        let record = service.create(payload).await?;
        JsonApiResponse::created(record)
    });

    Router::new().route(path, route)
}
