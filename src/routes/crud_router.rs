use std::{collections::HashMap, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    response::JsonApiResponse,
    services::crud_service::{CrudService, ListParams},
    state::AppState,
};

/// Mounts list/get/create/update/delete for one managed table under
/// `base_path`. Every handler requires a live session, resolved before the
/// payload is read.
pub struct CrudApiRouter<S> {
    service: S,
    base_path: &'static str,
}

impl<S> CrudApiRouter<S>
where
    S: CrudService + Clone + Send + Sync + 'static,
{
    pub fn new(service: S, base_path: &'static str) -> Self {
        Self { service, base_path }
    }

    pub fn router(self) -> Router<Arc<AppState>> {
        let item_path = format!("{}/{{id}}", self.base_path);

        let collection = get({
            let service = self.service.clone();
            move |_user: CurrentUser, Query(query): Query<HashMap<String, String>>| async move {
                let params = ListParams::from_query(query)?;
                let page = service.list(params).await?;
                JsonApiResponse::ok(page)
            }
        })
        .post({
            let service = self.service.clone();
            move |user: CurrentUser, Json(payload): Json<Value>| async move {
                let model = service.create_from_json(&user, payload).await?;
                JsonApiResponse::created(model)
            }
        });

        let item = get({
            let service = self.service.clone();
            move |_user: CurrentUser, Path(id): Path<Uuid>| async move {
                let model = service.find_by_id(id).await?;
                JsonApiResponse::ok(model)
            }
        })
        .patch({
            let service = self.service.clone();
            move |user: CurrentUser, Path(id): Path<Uuid>, Json(payload): Json<Value>| async move {
                let model = service.update_from_json(&user, id, payload).await?;
                JsonApiResponse::ok(model)
            }
        })
        .delete({
            let service = self.service;
            move |user: CurrentUser, Path(id): Path<Uuid>| async move {
                service.delete(&user, id).await?;
                JsonApiResponse::with_status(StatusCode::OK, "deleted", json!({ "id": id }))
            }
        });

        Router::new()
            .route(self.base_path, collection)
            .route(&item_path, item)
    }
}
