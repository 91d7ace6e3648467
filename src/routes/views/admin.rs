use std::{collections::HashMap, sync::Arc};

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::admin_table::{
    AdminTable, FormField, admin_table, form_fields, form_values, payload_from_form,
};
use crate::{
    auth::cookie::{clear_session_cookie, session_cookie, token_from_headers},
    error::AppError,
    middleware::{ADMIN_LOGIN_PATH, AdminSession, RateLimitLayer},
    ratelimit::{RateClass, RateLimiter},
    routes::api::entities::MANAGED_ENTITIES,
    services::{ServiceContext, crud_service::ListParams, site_service::EntityCount},
    state::AppState,
    validation::ValidationMode,
};

const DASHBOARD_PATH: &str = "/admin";
const MAX_COLUMNS: usize = 6;
const MAX_CELL_CHARS: usize = 80;
const HIDDEN_COLUMNS: &[&str] = &["id", "created_at", "updated_at", "password_hash"];

#[derive(Template)]
#[template(path = "admin/login.html")]
struct LoginTemplate {
    site_name: String,
    error: Option<String>,
    email: String,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
struct DashboardTemplate {
    site_name: String,
    user_name: String,
    counts: Vec<EntityCount>,
}

#[derive(Template)]
#[template(path = "admin/entity_list.html")]
struct EntityListTemplate {
    site_name: String,
    user_name: String,
    entity: String,
    nav: Vec<EntityLink>,
    table: EntityTable,
    page: u64,
    prev_href: Option<String>,
    next_href: Option<String>,
    q: String,
}

#[derive(Template)]
#[template(path = "admin/entity_form.html")]
struct EntityFormTemplate {
    site_name: String,
    user_name: String,
    entity: String,
    heading: String,
    action: String,
    fields: Vec<FormField>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/entity_delete.html")]
struct EntityDeleteTemplate {
    site_name: String,
    user_name: String,
    entity: String,
    action: String,
    summary: Vec<(String, String)>,
    error: Option<String>,
}

struct EntityLink {
    name: &'static str,
    active: bool,
}

/// Rows of one managed table flattened to display strings.
#[derive(Debug, Default, PartialEq)]
pub struct EntityTable {
    pub columns: Vec<String>,
    pub rows: Vec<EntityRow>,
}

#[derive(Debug, Default, PartialEq)]
pub struct EntityRow {
    pub id: String,
    pub cells: Vec<String>,
}

impl EntityTable {
    pub fn from_rows(rows: &[Value]) -> Self {
        let columns: Vec<String> = rows
            .first()
            .and_then(Value::as_object)
            .map(|first| {
                first
                    .keys()
                    .filter(|key| !HIDDEN_COLUMNS.contains(&key.as_str()))
                    .take(MAX_COLUMNS)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let rows = rows
            .iter()
            .map(|row| EntityRow {
                id: row.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
                cells: columns
                    .iter()
                    .map(|column| display_cell(row.get(column).unwrap_or(&Value::Null)))
                    .collect(),
            })
            .collect();
        Self { columns, rows }
    }
}

fn display_cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_CHARS {
        let mut cut: String = text.chars().take(MAX_CELL_CHARS).collect();
        cut.push('…');
        cut
    } else {
        text
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub fn router(limiter: Arc<dyn RateLimiter>) -> Router<Arc<AppState>> {
    let login_submit = Router::new()
        .route(ADMIN_LOGIN_PATH, post(login_submit))
        .layer(RateLimitLayer::new(RateClass::Auth, limiter.clone()));

    let pages = Router::new()
        .route(ADMIN_LOGIN_PATH, get(login_page))
        .route("/admin/logout", post(logout))
        .route(DASHBOARD_PATH, get(dashboard))
        .route("/admin/{entity}", get(entity_list))
        .route("/admin/{entity}/new", get(new_form).post(create_submit))
        .route("/admin/{entity}/{id}/edit", get(edit_form).post(update_submit))
        .route("/admin/{entity}/{id}/delete", get(delete_confirm).post(delete_submit))
        .layer(RateLimitLayer::new(RateClass::Admin, limiter));

    Router::new().merge(login_submit).merge(pages)
}

fn html(page: impl Template, status: StatusCode) -> Response {
    match page.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => AppError::internal_with_source("Failed to render admin page", err)
            .into_response(),
    }
}

async fn login_page(State(state): State<Arc<AppState>>) -> Response {
    html(
        LoginTemplate {
            site_name: state.config.site.name.clone(),
            error: None,
            email: String::new(),
        },
        StatusCode::OK,
    )
}

async fn login_submit(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    let sessions = ServiceContext::from_state(&state)
        .session(&state.session_keys, state.config.session_ttl_hours());

    let failure = |message: &str, status: StatusCode| {
        html(
            LoginTemplate {
                site_name: state.config.site.name.clone(),
                error: Some(message.to_string()),
                email: form.email.clone(),
            },
            status,
        )
    };

    match sessions.login(form.email.trim(), &form.password).await {
        Ok(issued) => {
            match session_cookie(&issued.token, issued.max_age_secs, state.config.secure_cookies())
            {
                Some(cookie) => (
                    [(header::SET_COOKIE, cookie)],
                    Redirect::to(DASHBOARD_PATH),
                )
                    .into_response(),
                None => failure("Could not start a session", StatusCode::INTERNAL_SERVER_ERROR),
            }
        }
        Err(AppError::Unauthorized(message)) => failure(&message, StatusCode::UNAUTHORIZED),
        Err(err) => {
            tracing::error!(error = %err, "admin login failed");
            failure("Sign-in is temporarily unavailable", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_headers(&headers) {
        let sessions = ServiceContext::from_state(&state)
            .session(&state.session_keys, state.config.session_ttl_hours());
        if let Err(err) = sessions.logout(&token).await {
            tracing::warn!(error = %err, "admin logout could not close session");
        }
    }
    (
        [(header::SET_COOKIE, clear_session_cookie(state.config.secure_cookies()))],
        Redirect::to(ADMIN_LOGIN_PATH),
    )
        .into_response()
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
) -> Result<Response, AppError> {
    let counts = ServiceContext::from_state(&state).site().dashboard_counts().await?;
    Ok(html(
        DashboardTemplate {
            site_name: state.config.site.name.clone(),
            user_name: user.name,
            counts,
        },
        StatusCode::OK,
    ))
}

async fn entity_list(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
    Path(entity): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let params = ListParams::from_query(query)?;
    let page = params.page;
    let q = params.q.clone().unwrap_or_default();

    let (rows, has_next) = table_for(&state, &entity)?.list_rows(params).await?;

    let nav = MANAGED_ENTITIES
        .iter()
        .map(|&name| EntityLink {
            name,
            active: name == entity,
        })
        .collect();
    Ok(html(
        EntityListTemplate {
            site_name: state.config.site.name.clone(),
            user_name: user.name,
            prev_href: (page > 1).then(|| page_href(&entity, page - 1, &q)),
            next_href: has_next.then(|| page_href(&entity, page + 1, &q)),
            entity,
            nav,
            table: EntityTable::from_rows(&rows),
            page,
            q,
        },
        StatusCode::OK,
    ))
}

/// Link to another page of the listing, keeping the search term.
fn page_href(entity: &str, page: u64, q: &str) -> String {
    let mut href = format!("/admin/{entity}?page={page}");
    if !q.is_empty() {
        href.push_str("&q=");
        href.extend(q.bytes().map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            _ => format!("%{byte:02X}"),
        }));
    }
    href
}

fn table_for(state: &AppState, entity: &str) -> Result<Box<dyn AdminTable>, AppError> {
    admin_table(&ServiceContext::from_state(state), entity)
        .ok_or_else(|| AppError::not_found(format!("Unknown entity: {entity}")))
}

fn list_path(entity: &str) -> String {
    format!("/admin/{entity}")
}

/// Status for a save the editor can correct; anything else is a server fault.
fn correctable_status(err: &AppError) -> Option<StatusCode> {
    match err {
        AppError::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
        AppError::Conflict(_) => Some(StatusCode::CONFLICT),
        AppError::Forbidden(_) => Some(StatusCode::FORBIDDEN),
        _ => None,
    }
}

struct FormPage<'a> {
    entity: &'a str,
    heading: String,
    action: String,
    fields: Vec<FormField>,
    error: Option<String>,
}

fn form_page(state: &AppState, user_name: String, page: FormPage<'_>, status: StatusCode) -> Response {
    html(
        EntityFormTemplate {
            site_name: state.config.site.name.clone(),
            user_name,
            entity: page.entity.to_string(),
            heading: page.heading,
            action: page.action,
            fields: page.fields,
            error: page.error,
        },
        status,
    )
}

async fn new_form(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
    Path(entity): Path<String>,
) -> Result<Response, AppError> {
    let table = table_for(&state, &entity)?;
    let page = FormPage {
        entity: &entity,
        heading: format!("New {entity} record"),
        action: format!("/admin/{entity}/new"),
        fields: form_fields(table.form_schema(), &Map::new(), ValidationMode::Create),
        error: None,
    };
    Ok(form_page(&state, user.name, page, StatusCode::OK))
}

async fn create_submit(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
    Path(entity): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let table = table_for(&state, &entity)?;
    let payload = payload_from_form(table.form_schema(), &form, ValidationMode::Create);

    match table.create_row(&user, payload).await {
        Ok(()) => Ok(Redirect::to(&list_path(&entity)).into_response()),
        Err(err) => {
            let Some(status) = correctable_status(&err) else {
                return Err(err);
            };
            let page = FormPage {
                entity: &entity,
                heading: format!("New {entity} record"),
                action: format!("/admin/{entity}/new"),
                fields: form_fields(table.form_schema(), &form_values(&form), ValidationMode::Create),
                error: Some(err.message().to_string()),
            };
            Ok(form_page(&state, user.name, page, status))
        }
    }
}

async fn edit_form(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
    Path((entity, id)): Path<(String, Uuid)>,
) -> Result<Response, AppError> {
    let table = table_for(&state, &entity)?;
    let row = table.find_row(id).await?;
    let stored = row.as_object().cloned().unwrap_or_default();
    let page = FormPage {
        entity: &entity,
        heading: format!("Edit {entity} record"),
        action: format!("/admin/{entity}/{id}/edit"),
        fields: form_fields(table.form_schema(), &stored, ValidationMode::Update),
        error: None,
    };
    Ok(form_page(&state, user.name, page, StatusCode::OK))
}

async fn update_submit(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
    Path((entity, id)): Path<(String, Uuid)>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let table = table_for(&state, &entity)?;
    let payload = payload_from_form(table.form_schema(), &form, ValidationMode::Update);

    match table.update_row(&user, id, payload).await {
        Ok(()) => Ok(Redirect::to(&list_path(&entity)).into_response()),
        Err(err) => {
            let Some(status) = correctable_status(&err) else {
                return Err(err);
            };
            let page = FormPage {
                entity: &entity,
                heading: format!("Edit {entity} record"),
                action: format!("/admin/{entity}/{id}/edit"),
                fields: form_fields(table.form_schema(), &form_values(&form), ValidationMode::Update),
                error: Some(err.message().to_string()),
            };
            Ok(form_page(&state, user.name, page, status))
        }
    }
}

/// Field/value pairs shown on the delete confirmation.
fn record_summary(row: &Value) -> Vec<(String, String)> {
    row.as_object()
        .map(|object| {
            object
                .iter()
                .filter(|(key, _)| key.as_str() != "password_hash")
                .map(|(key, value)| (key.clone(), display_cell(value)))
                .collect()
        })
        .unwrap_or_default()
}

async fn delete_page(
    state: &AppState,
    user_name: String,
    entity: &str,
    id: Uuid,
    table: &dyn AdminTable,
    error: Option<String>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let row = table.find_row(id).await?;
    Ok(html(
        EntityDeleteTemplate {
            site_name: state.config.site.name.clone(),
            user_name,
            entity: entity.to_string(),
            action: format!("/admin/{entity}/{id}/delete"),
            summary: record_summary(&row),
            error,
        },
        status,
    ))
}

async fn delete_confirm(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
    Path((entity, id)): Path<(String, Uuid)>,
) -> Result<Response, AppError> {
    let table = table_for(&state, &entity)?;
    delete_page(&state, user.name, &entity, id, table.as_ref(), None, StatusCode::OK).await
}

async fn delete_submit(
    State(state): State<Arc<AppState>>,
    AdminSession(user): AdminSession,
    Path((entity, id)): Path<(String, Uuid)>,
) -> Result<Response, AppError> {
    let table = table_for(&state, &entity)?;
    match table.delete_row(&user, id).await {
        Ok(()) => {
            tracing::info!(entity = %entity, id = %id, actor = %user.id, "record deleted from admin");
            Ok(Redirect::to(&list_path(&entity)).into_response())
        }
        Err(err) => {
            let Some(status) = correctable_status(&err) else {
                return Err(err);
            };
            let message = err.message().to_string();
            delete_page(&state, user.name, &entity, id, table.as_ref(), Some(message), status).await
        }
    }
}
