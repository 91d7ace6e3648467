use std::collections::HashMap;

use sea_orm::sea_query::{Condition, Expr, ExprTrait, Func, LikeExpr, Value as QueryValue};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ColumnType, EntityTrait, IdenStatic, Iterable,
    Order, PrimaryKeyToColumn, QueryFilter, Select, SqlErr,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::dao::{
    ColumnFilter, DaoBase, DaoLayerError, FilterOp, PaginatedResponse, RecordEntity,
};
use crate::error::AppError;
use crate::validation::{EntitySchema, ValidationMode};

type CrudEntity<D> = <D as DaoBase>::Entity;
type CrudModel<D> = <CrudEntity<D> as EntityTrait>::Model;
pub(crate) type CrudColumn<D> = <CrudEntity<D> as EntityTrait>::Column;

pub const DEFAULT_PAGE_SIZE: u64 = 25;

#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub create_failed: &'static str,
    pub find_failed: &'static str,
    pub not_found: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            create_failed: "Create failed",
            find_failed: "Find failed",
            not_found: "Resource not found",
            update_failed: "Update failed",
            delete_failed: "Delete failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

const INVALID_FILTER_MESSAGE: &str = "Invalid filter";
const INVALID_FILTER_VALUE_MESSAGE: &str = "Invalid filter value";
const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload";

/// One allow-listed list filter: query key, target column, value parser.
pub struct FilterSpec<C> {
    pub key: &'static str,
    pub column: C,
    pub parse: fn(&str) -> Result<FilterOp, AppError>,
}

/// A column whose value must not repeat across rows.
pub struct UniqueField<C> {
    pub field: &'static str,
    pub column: C,
    pub message: &'static str,
}

/// Parsed `GET /<plural>` query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: u64,
    pub page_size: u64,
    pub q: Option<String>,
    pub filters: HashMap<String, String>,
}

impl ListParams {
    pub fn from_query(mut query: HashMap<String, String>) -> Result<Self, AppError> {
        let page = take_number(&mut query, "page")?.unwrap_or(1);
        let page_size = take_number(&mut query, "page_size")?.unwrap_or(DEFAULT_PAGE_SIZE);
        let q = query
            .remove("q")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());
        Ok(Self {
            page,
            page_size,
            q,
            filters: query,
        })
    }
}

fn take_number(query: &mut HashMap<String, String>, key: &str) -> Result<Option<u64>, AppError> {
    query
        .remove(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| {
                    AppError::bad_request(format!(
                        "Invalid query: {key} must be a positive integer"
                    ))
                })
        })
        .transpose()
}

#[async_trait::async_trait]
pub trait CrudService: Send + Sync {
    type Dao: DaoBase;

    fn dao(&self) -> &Self::Dao;

    fn schema(&self) -> &'static EntitySchema;

    fn filters(&self) -> &'static [FilterSpec<CrudColumn<Self::Dao>>] {
        &[]
    }

    /// String columns matched case-insensitively by `?q=`.
    fn search_columns(&self) -> &'static [CrudColumn<Self::Dao>] {
        &[]
    }

    fn unique_fields(&self) -> &'static [UniqueField<CrudColumn<Self::Dao>>] {
        &[]
    }

    fn list_order(&self) -> Option<(CrudColumn<Self::Dao>, Order)> {
        None
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    fn map_error(&self, op: CrudOp, err: DaoLayerError) -> AppError {
        let errors = self.errors();
        match err {
            DaoLayerError::Db(db_err) => {
                if let Some(SqlErr::UniqueConstraintViolation(_)) = db_err.sql_err() {
                    return AppError::conflict("A record with the same unique value already exists");
                }
                let context = match op {
                    CrudOp::Create => errors.create_failed,
                    CrudOp::Find | CrudOp::List => errors.find_failed,
                    CrudOp::Update => errors.update_failed,
                    CrudOp::Delete => errors.delete_failed,
                };
                let message = format!("{context}. Please check the logs for more details");
                AppError::internal_with_source(message, db_err)
            }
            DaoLayerError::NotFound { .. } => AppError::not_found(errors.not_found),
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
        }
    }

    /// Last chance to rewrite a validated payload before it reaches the table.
    fn prepare(
        &self,
        _payload: &mut Map<String, Value>,
        _mode: ValidationMode,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn before_update(
        &self,
        _actor: &CurrentUser,
        _id: Uuid,
        _payload: &Map<String, Value>,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn before_delete(&self, _actor: &CurrentUser, _id: Uuid) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<CrudModel<Self::Dao>, AppError> {
        self.dao()
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    async fn list(
        &self,
        params: ListParams,
    ) -> Result<PaginatedResponse<CrudModel<Self::Dao>>, AppError> {
        let column_filters = self.build_column_filters(&params.filters)?;
        let search = params
            .q
            .as_deref()
            .and_then(|q| free_text_condition(self.search_columns(), q));

        self.dao()
            .find_with_filters(
                params.page,
                params.page_size,
                self.list_order(),
                &column_filters,
                move |select: Select<CrudEntity<Self::Dao>>| match search {
                    Some(condition) => select.filter(condition),
                    None => select,
                },
            )
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    async fn create_from_json(
        &self,
        _actor: &CurrentUser,
        payload: Value,
    ) -> Result<CrudModel<Self::Dao>, AppError> {
        let mut object = self.schema().validate(payload, ValidationMode::Create)?;
        self.prepare(&mut object, ValidationMode::Create)?;
        self.ensure_unique(&object, None).await?;

        let active = active_from_object::<CrudEntity<Self::Dao>>(object)?;
        self.dao()
            .create(active)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    async fn update_from_json(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        payload: Value,
    ) -> Result<CrudModel<Self::Dao>, AppError> {
        let mut object = self.schema().validate(payload, ValidationMode::Update)?;
        if object.is_empty() {
            return Err(AppError::bad_request("payload has no fields to update"));
        }
        self.before_update(actor, id, &object).await?;
        self.prepare(&mut object, ValidationMode::Update)?;
        self.ensure_unique(&object, Some(id)).await?;

        let patch = active_from_object::<CrudEntity<Self::Dao>>(object)?;
        self.dao()
            .update(id, move |active| apply_patch::<CrudEntity<Self::Dao>>(active, patch))
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> Result<(), AppError> {
        self.before_delete(actor, id).await?;
        self.dao()
            .delete(id)
            .await
            .map(|_| ())
            .map_err(|err| self.map_error(CrudOp::Delete, err))
    }

    /// Rejects with 409 when a unique value in `payload` is held by another row.
    async fn ensure_unique(
        &self,
        payload: &Map<String, Value>,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        for unique in self.unique_fields() {
            let Some(value) = payload.get(unique.field).and_then(Value::as_str) else {
                continue;
            };
            let taken = self
                .dao()
                .value_taken(unique.column, value.to_string(), exclude)
                .await
                .map_err(|err| self.map_error(CrudOp::Find, err))?;
            if taken {
                return Err(AppError::conflict(unique.message));
            }
        }
        Ok(())
    }

    fn build_column_filters(
        &self,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<ColumnFilter<CrudColumn<Self::Dao>>>, AppError> {
        let specs = self.filters();
        let mut parsed = Vec::with_capacity(filters.len());
        for (key, value) in filters {
            let spec = specs
                .iter()
                .find(|spec| spec.key == key.as_str())
                .ok_or_else(|| AppError::bad_request(format!("{INVALID_FILTER_MESSAGE}: {key}")))?;
            parsed.push(ColumnFilter {
                column: spec.column,
                op: (spec.parse)(value)?,
            });
        }
        Ok(parsed)
    }
}

/// `lower(col) LIKE %q%` across every column, OR-ed together.
pub(crate) fn free_text_condition<C>(columns: &[C], q: &str) -> Option<Condition>
where
    C: sea_orm::ColumnTrait,
{
    let q = q.trim();
    if columns.is_empty() || q.is_empty() {
        return None;
    }
    let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
    let condition = columns.iter().fold(Condition::any(), |condition, column| {
        condition.add(
            Func::lower(Expr::col(*column)).like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
    });
    Some(condition)
}

/// Builds an active model holding exactly the keys present in `object`.
///
/// sea-orm fills absent columns with dummy values before deserializing, and
/// those dummies do not parse as uuids or timestamps. Such columns get a
/// parseable stand-in that is reset to `NotSet` afterwards.
pub(crate) fn active_from_object<E: RecordEntity>(
    mut object: Map<String, Value>,
) -> Result<E::ActiveModel, AppError> {
    let mut stand_ins = Vec::new();
    for column in E::Column::iter() {
        if object.contains_key(column.as_str()) {
            continue;
        }
        if let Some(value) = stand_in_for(column.def().get_column_type()) {
            object.insert(column.as_str().to_string(), value);
            stand_ins.push(column);
        }
    }

    let mut active = <E::ActiveModel as ActiveModelTrait>::default();
    active
        .set_from_json(Value::Object(object))
        .map_err(|err| AppError::bad_request(format!("{INVALID_PAYLOAD_MESSAGE}: {err}")))?;
    for column in stand_ins {
        active.not_set(column);
    }
    Ok(active)
}

fn stand_in_for(column_type: &ColumnType) -> Option<Value> {
    match column_type {
        ColumnType::Uuid => Some(Value::String(Uuid::nil().to_string())),
        ColumnType::TimestampWithTimeZone | ColumnType::Timestamp | ColumnType::DateTime => {
            Some(Value::String("1970-01-01T00:00:00+00:00".to_string()))
        }
        _ => None,
    }
}

/// Copies the columns set in `patch`; untouched columns keep their stored value.
pub(crate) fn apply_patch<E: RecordEntity>(active: &mut E::ActiveModel, patch: E::ActiveModel) {
    let primary_keys: Vec<&'static str> = E::PrimaryKey::iter()
        .map(|pk| pk.into_column().as_str())
        .collect();

    for column in E::Column::iter() {
        if primary_keys.contains(&column.as_str()) {
            continue;
        }
        if let ActiveValue::Set(value) = patch.get(column) {
            active.set(column, value);
        }
    }
}

fn invalid_filter_value() -> AppError {
    AppError::bad_request(INVALID_FILTER_VALUE_MESSAGE)
}

fn invalid_filter_value_with(detail: impl std::fmt::Display) -> AppError {
    AppError::bad_request(format!("{INVALID_FILTER_VALUE_MESSAGE}: {detail}"))
}

pub(crate) fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '%' => escaped.push_str("\\%"),
            '_' => escaped.push_str("\\_"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Exact match, or a LIKE pattern when the value starts or ends with `*`.
pub fn parse_text(raw: &str) -> Result<FilterOp, AppError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return Err(invalid_filter_value());
    }

    let leading = raw.starts_with('*');
    let trailing = raw.ends_with('*');
    let inner = raw.trim_matches('*');
    if inner.is_empty() || inner.contains('*') {
        return Err(invalid_filter_value());
    }

    if !leading && !trailing {
        return Ok(FilterOp::Eq(QueryValue::String(Some(inner.to_string()))));
    }

    let escaped = escape_like(inner);
    let pattern = match (leading, trailing) {
        (true, true) => format!("%{escaped}%"),
        (true, false) => format!("%{escaped}"),
        _ => format!("{escaped}%"),
    };
    Ok(FilterOp::Like {
        pattern,
        escape: '\\',
    })
}

pub fn parse_bool(raw: &str) -> Result<FilterOp, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(FilterOp::Eq(QueryValue::Bool(Some(true)))),
        "false" | "f" | "0" | "no" | "n" => Ok(FilterOp::Eq(QueryValue::Bool(Some(false)))),
        _ => Err(invalid_filter_value()),
    }
}

pub fn parse_uuid(raw: &str) -> Result<FilterOp, AppError> {
    let id = Uuid::parse_str(raw.trim()).map_err(invalid_filter_value_with)?;
    Ok(FilterOp::Eq(QueryValue::Uuid(Some(id))))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Order};
    use serde_json::json;
    use uuid::Uuid;

    use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel};

    use super::{
        CrudService, FilterSpec, ListParams, UniqueField, active_from_object, apply_patch,
        free_text_condition, parse_bool, parse_text, parse_uuid,
    };
    use crate::auth::CurrentUser;
    use crate::db::dao::{DaoBase, EntityDao, FilterOp};
    use crate::db::entities::{statistic, translation};
    use crate::error::AppError;
    use crate::validation::{EntitySchema, FieldKind, FieldRule};

    static SCHEMA: EntitySchema = EntitySchema {
        entity: "translation",
        fields: &[
            FieldRule::required("key", FieldKind::TranslationKey),
            FieldRule::required("value_en", FieldKind::Text { max: 500 }),
            FieldRule::required("value_ar", FieldKind::Text { max: 500 }),
            FieldRule::required("category", FieldKind::Text { max: 50 }),
        ],
    };

    static FILTERS: &[FilterSpec<translation::Column>] = &[FilterSpec {
        key: "category",
        column: translation::Column::Category,
        parse: parse_text,
    }];

    static UNIQUE: &[UniqueField<translation::Column>] = &[UniqueField {
        field: "key",
        column: translation::Column::Key,
        message: "Translation key already exists",
    }];

    static SEARCH: &[translation::Column] =
        &[translation::Column::Key, translation::Column::ValueEn];

    #[derive(Clone)]
    struct TestService {
        dao: EntityDao<translation::Entity>,
    }

    impl CrudService for TestService {
        type Dao = EntityDao<translation::Entity>;

        fn dao(&self) -> &Self::Dao {
            &self.dao
        }

        fn schema(&self) -> &'static EntitySchema {
            &SCHEMA
        }

        fn filters(&self) -> &'static [FilterSpec<translation::Column>] {
            FILTERS
        }

        fn search_columns(&self) -> &'static [translation::Column] {
            SEARCH
        }

        fn unique_fields(&self) -> &'static [UniqueField<translation::Column>] {
            UNIQUE
        }

        fn list_order(&self) -> Option<(translation::Column, Order)> {
            Some((translation::Column::Key, Order::Asc))
        }
    }

    struct Fixture {
        mock: MockDatabase,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                mock: MockDatabase::new(DatabaseBackend::Postgres),
            }
        }

        fn with_rows(mut self, rows: Vec<translation::Model>) -> Self {
            self.mock = self.mock.append_query_results([rows]);
            self
        }

        fn with_count(mut self, count: i64) -> Self {
            self.mock = self
                .mock
                .append_query_results([[count_row(count)]]);
            self
        }

        fn with_query_error(mut self, err: DbErr) -> Self {
            self.mock = self.mock.append_query_errors([err]);
            self
        }

        fn with_exec(mut self, rows_affected: u64) -> Self {
            self.mock = self.mock.append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected,
            }]);
            self
        }

        fn build(self) -> TestService {
            let db = self.mock.into_connection();
            TestService {
                dao: EntityDao::new(&db),
            }
        }
    }

    fn count_row(count: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::new();
        row.insert("num_items", sea_orm::Value::BigInt(Some(count)));
        row
    }

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn row(key: &str) -> translation::Model {
        translation::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            key: key.to_string(),
            value_en: "Home".to_string(),
            value_ar: "الرئيسية".to_string(),
            category: "nav".to_string(),
        }
    }

    fn actor() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "Editor".to_string(),
            email: "editor@example.com".to_string(),
            role: "editor".to_string(),
            session_token: "tok".to_string(),
        }
    }

    fn query(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn list_params_split_paging_search_and_filters() {
        let params = ListParams::from_query(query(&[
            ("page", "2"),
            ("page_size", "10"),
            ("q", "  kitchen "),
            ("category", "nav"),
        ]))
        .expect("query should parse");

        assert_eq!(params.page, 2);
        assert_eq!(params.page_size, 10);
        assert_eq!(params.q.as_deref(), Some("kitchen"));
        assert_eq!(params.filters.get("category").map(String::as_str), Some("nav"));

        let defaults = ListParams::from_query(HashMap::new()).expect("empty query parses");
        assert_eq!((defaults.page, defaults.page_size), (1, 25));

        let err = ListParams::from_query(query(&[("page", "two")])).expect_err("bad page");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn filter_parsers_cover_text_bool_and_uuid() {
        assert!(matches!(parse_text("nav"), Ok(FilterOp::Eq(_))));
        assert!(matches!(
            parse_text("home*"),
            Ok(FilterOp::Like { ref pattern, .. }) if pattern == "home%"
        ));
        assert!(parse_text("a*b").is_err());
        assert!(matches!(parse_bool("yes"), Ok(FilterOp::Eq(_))));
        assert!(parse_bool("maybe").is_err());
        assert!(parse_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn free_text_skips_blank_queries_and_empty_columns() {
        assert!(free_text_condition(SEARCH, "   ").is_none());
        assert!(free_text_condition::<translation::Column>(&[], "kitchen").is_none());
        assert!(free_text_condition(SEARCH, "kitchen").is_some());
    }

    #[tokio::test]
    async fn list_rejects_filters_outside_allowlist() {
        let service = Fixture::new().build();
        let params = ListParams::from_query(query(&[("value_en", "Home")])).expect("parses");

        let err = service.list(params).await.expect_err("filter should be rejected");
        assert_eq!(err.message(), "Invalid filter: value_en");
    }

    #[tokio::test]
    async fn list_returns_page_with_search_and_filter() {
        let service = Fixture::new()
            .with_rows(vec![row("nav.home"), row("nav.about")])
            .build();
        let params = ListParams::from_query(query(&[("category", "nav"), ("q", "home")]))
            .expect("parses");

        let page = service.list(params).await.expect("list should succeed");
        assert_eq!(page.data.len(), 2);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn create_with_missing_field_fails_before_storage() {
        let service = Fixture::new().build();

        let err = service
            .create_from_json(&actor(), json!({ "key": "nav.home", "value_en": "Home" }))
            .await
            .expect_err("missing arabic value should fail");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.message().starts_with("value_ar"));
    }

    #[tokio::test]
    async fn create_with_taken_key_conflicts() {
        let service = Fixture::new().with_count(1).build();

        let err = service
            .create_from_json(
                &actor(),
                json!({
                    "key": "nav.home",
                    "value_en": "Home",
                    "value_ar": "الرئيسية",
                    "category": "nav"
                }),
            )
            .await
            .expect_err("duplicate key should conflict");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_inserts_after_checks_pass() {
        let service = Fixture::new()
            .with_count(0)
            .with_rows(vec![row("nav.home")])
            .build();

        let created = service
            .create_from_json(
                &actor(),
                json!({
                    "key": "nav.home",
                    "value_en": "Home",
                    "value_ar": "الرئيسية",
                    "category": "nav"
                }),
            )
            .await
            .expect("create should succeed");
        assert_eq!(created.key, "nav.home");
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let service = Fixture::new()
            .with_count(0)
            .with_rows(Vec::new())
            .build();

        let err = service
            .update_from_json(&actor(), Uuid::new_v4(), json!({ "key": "nav.contact" }))
            .await
            .expect_err("missing row should fail");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn storage_failure_is_generic_internal_error() {
        let service = Fixture::new()
            .with_query_error(DbErr::Custom("connection refused".to_string()))
            .build();

        let err = service
            .find_by_id(Uuid::new_v4())
            .await
            .expect_err("query should fail");
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(
            err.message(),
            "Find failed. Please check the logs for more details"
        );
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_not_found() {
        let service = Fixture::new().with_exec(0).build();

        let err = service
            .delete(&actor(), Uuid::new_v4())
            .await
            .expect_err("nothing deleted");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn validated_payload_converts_without_server_columns() {
        let active = active_from_object::<translation::Entity>(object(json!({
            "key": "nav.home",
            "value_en": "Home",
            "value_ar": "الرئيسية",
            "category": "nav"
        })))
        .expect("translation payload should convert");
        assert!(matches!(active.get(translation::Column::Key), ActiveValue::Set(_)));
        assert!(matches!(active.get(translation::Column::Id), ActiveValue::NotSet));
        assert!(matches!(active.get(translation::Column::CreatedAt), ActiveValue::NotSet));
        assert!(matches!(active.get(translation::Column::UpdatedAt), ActiveValue::NotSet));

        let active = active_from_object::<statistic::Entity>(object(json!({
            "label_en": "Kitchens delivered",
            "label_ar": "مطابخ منجزة",
            "value": 240
        })))
        .expect("statistic payload should convert");
        assert!(matches!(active.get(statistic::Column::Value), ActiveValue::Set(_)));
        assert!(matches!(active.get(statistic::Column::SortOrder), ActiveValue::NotSet));
    }

    #[test]
    fn patch_keeps_stored_timestamps() {
        let stored = row("nav.home");
        let mut active = stored.clone().into_active_model();
        let patch = active_from_object::<translation::Entity>(object(json!({ "value_en": "Start" })))
            .expect("partial payload should convert");

        apply_patch::<translation::Entity>(&mut active, patch);

        assert!(matches!(active.get(translation::Column::ValueEn), ActiveValue::Set(_)));
        let created_at = sea_orm::Value::from(stored.created_at);
        assert!(matches!(
            active.get(translation::Column::CreatedAt),
            ActiveValue::Unchanged(ref value) if *value == created_at
        ));
        assert!(matches!(
            active.get(translation::Column::Key),
            ActiveValue::Unchanged(_)
        ));
    }

    #[tokio::test]
    async fn update_with_taken_key_leaves_row_untouched() {
        let service = Fixture::new().with_count(1).build();

        let err = service
            .update_from_json(&actor(), Uuid::new_v4(), json!({ "key": "nav.about" }))
            .await
            .expect_err("taken key should conflict");
        assert!(matches!(err, AppError::Conflict(_)));

        let log = service.dao().db().clone().into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = format!("{log:?}");
        assert!(!sql.contains("UPDATE"));
    }
}
