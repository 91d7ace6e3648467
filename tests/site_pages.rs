use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use std::collections::BTreeMap;

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use kitchen_cms::{
    db::entities::{blog_post, service, session, translation, user},
    test_helpers::{bearer_for, test_app, test_state},
};

fn ts() -> chrono::DateTime<chrono::FixedOffset> {
    FixedOffset::east_opt(0)
        .expect("offset should be valid")
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("timestamp should be valid")
}

fn translation_row(key: &str, en: &str, ar: &str) -> translation::Model {
    translation::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        key: key.to_string(),
        value_en: en.to_string(),
        value_ar: ar.to_string(),
        category: key.split('.').next().unwrap_or_default().to_string(),
    }
}

fn strings() -> Vec<translation::Model> {
    vec![
        translation_row("nav.services", "Services", "خدماتنا"),
        translation_row("not_found.title", "Page not found", "الصفحة غير موجودة"),
    ]
}

fn service_row() -> service::Model {
    service::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        sort_order: 10,
        published: true,
        slug: "kitchen-design".to_string(),
        title_en: "Kitchen design".to_string(),
        title_ar: "تصميم المطابخ".to_string(),
        description_en: "Layouts built around how you cook.".to_string(),
        description_ar: "مخطط يناسب طريقة طهيك.".to_string(),
        icon: "compass".to_string(),
    }
}

fn services_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([strings()])
        .append_query_results([vec![service_row()]])
        .into_connection()
}

fn page(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap()
}

async fn html_body(res: axum::response::Response) -> String {
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn root_redirects_to_default_locale() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let res = test_app(test_state(db)).oneshot(page("/")).await.unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()[header::LOCATION], "/en");
}

#[tokio::test]
async fn english_services_page_renders_left_to_right() {
    let res = test_app(test_state(services_db()))
        .oneshot(page("/en/services"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let html = html_body(res).await;
    assert!(html.contains(r#"dir="ltr""#));
    assert!(html.contains("Kitchen design"));
    assert!(!html.contains("تصميم المطابخ"));
}

#[tokio::test]
async fn arabic_services_page_renders_right_to_left() {
    let res = test_app(test_state(services_db()))
        .oneshot(page("/ar/services"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let html = html_body(res).await;
    assert!(html.contains(r#"dir="rtl""#));
    assert!(html.contains("تصميم المطابخ"));
    assert!(html.contains("خدماتنا"));
}

#[tokio::test]
async fn unknown_locale_renders_the_html_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([strings()])
        .into_connection();
    let res = test_app(test_state(db)).oneshot(page("/fr/services")).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let html = html_body(res).await;
    assert!(html.contains("Page not found"));
    assert!(html.contains(r#"lang="en""#));
}

#[tokio::test]
async fn missing_blog_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([strings()])
        .append_query_results([Vec::<blog_post::Model>::new()])
        .into_connection();
    let res = test_app(test_state(db))
        .oneshot(page("/en/blog/no-such-post"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_pages_send_visitors_to_the_login_form() {
    for uri in ["/admin", "/admin/projects"] {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let res = test_app(test_state(db)).oneshot(page(uri)).await.unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(res.headers()[header::LOCATION], "/admin/login");
    }
}

#[tokio::test]
async fn admin_login_form_renders_without_storage() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let res = test_app(test_state(db)).oneshot(page("/admin/login")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let html = html_body(res).await;
    assert!(html.contains(r#"action="/admin/login""#));
}

const SESSION_TOKEN: &str = "admin-session";

fn admin_row(id: Uuid) -> user::Model {
    user::Model {
        id,
        created_at: ts(),
        updated_at: ts(),
        name: "Huda".to_string(),
        email: "huda@example.com".to_string(),
        password_hash: "hash".to_string(),
        role: "admin".to_string(),
        last_login_at: None,
    }
}

fn session_row(user_id: Uuid) -> session::Model {
    session::Model {
        id: Uuid::new_v4(),
        created_at: ts(),
        updated_at: ts(),
        token: SESSION_TOKEN.to_string(),
        user_id,
        expires_at: Utc::now().fixed_offset() + Duration::hours(1),
    }
}

/// Mock that first answers the session lookup for `admin_id`.
fn signed_in(admin_id: Uuid) -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![session_row(admin_id)]])
        .append_query_results([vec![admin_row(admin_id)]])
}

fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
}

async fn admin_request(
    db: DatabaseConnection,
    admin_id: Uuid,
    method: &str,
    uri: &str,
    form: Option<&str>,
) -> axum::response::Response {
    let state = test_state(db);
    let bearer = bearer_for(&state, SESSION_TOKEN, &admin_id);
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ACCEPT, "text/html")
        .header(header::AUTHORIZATION, bearer);
    if form.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    let body = form.map(|form| Body::from(form.to_string())).unwrap_or_else(Body::empty);
    test_app(state)
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn admin_new_record_form_lists_the_table_fields() {
    let admin_id = Uuid::new_v4();
    let res = admin_request(
        signed_in(admin_id).into_connection(),
        admin_id,
        "GET",
        "/admin/translations/new",
        None,
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let html = html_body(res).await;
    assert!(html.contains(r#"action="/admin/translations/new""#));
    for field in ["key", "value_en", "value_ar", "category"] {
        assert!(html.contains(&format!(r#"name="{field}""#)), "{field}");
    }
}

#[tokio::test]
async fn admin_create_with_blank_field_keeps_the_input() {
    let admin_id = Uuid::new_v4();
    let res = admin_request(
        signed_in(admin_id).into_connection(),
        admin_id,
        "POST",
        "/admin/translations/new",
        Some("key=nav.home&value_en=Home&value_ar=&category=nav"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let html = html_body(res).await;
    assert!(html.contains("value_ar must not be empty"));
    assert!(html.contains(r#"name="key" value="nav.home""#));
    assert!(html.contains(">Home</textarea>"));
}

#[tokio::test]
async fn admin_create_saves_and_returns_to_the_listing() {
    let admin_id = Uuid::new_v4();
    let db = signed_in(admin_id)
        .append_query_results([[count_row(0)]])
        .append_query_results([vec![translation_row("nav.home", "Home", "Marhaba")]])
        .into_connection();

    let res = admin_request(
        db,
        admin_id,
        "POST",
        "/admin/translations/new",
        Some("key=nav.home&value_en=Home&value_ar=Marhaba&category=nav"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/admin/translations");
}

#[tokio::test]
async fn admin_delete_asks_for_confirmation_first() {
    let admin_id = Uuid::new_v4();
    let row = translation_row("footer.rights", "All rights reserved", "Huquq");
    let uri = format!("/admin/translations/{}/delete", row.id);
    let db = signed_in(admin_id)
        .append_query_results([vec![row]])
        .into_connection();

    let res = admin_request(db, admin_id, "GET", &uri, None).await;

    assert_eq!(res.status(), StatusCode::OK);
    let html = html_body(res).await;
    assert!(html.contains("This cannot be undone."));
    assert!(html.contains("footer.rights"));
    assert!(html.contains(&format!(r#"action="{uri}""#)));
}

#[tokio::test]
async fn admin_confirmed_delete_returns_to_the_listing() {
    let admin_id = Uuid::new_v4();
    let db = signed_in(admin_id)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let uri = format!("/admin/translations/{}/delete", Uuid::new_v4());

    let res = admin_request(db, admin_id, "POST", &uri, Some("")).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/admin/translations");
}

#[tokio::test]
async fn admin_cannot_delete_their_own_account() {
    let admin_id = Uuid::new_v4();
    let db = signed_in(admin_id)
        .append_query_results([vec![admin_row(admin_id)]])
        .into_connection();
    let uri = format!("/admin/users/{admin_id}/delete");

    let res = admin_request(db, admin_id, "POST", &uri, Some("")).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let html = html_body(res).await;
    assert!(html.contains("You cannot delete your own account"));
    assert!(!html.contains("$argon2"));
}
