use chrono::Utc;
use sea_orm::{ColumnTrait, Order, QueryFilter};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{CUSTOMER_TYPES, INTERACTION_KINDS, LEAD_PRIORITIES, LEAD_STATUSES, fill_missing};
use crate::auth::CurrentUser;
use crate::db::dao::{DaoBase, EntityDao};
use crate::db::entities::{customer, interaction, lead, project};
use crate::error::AppError;
use crate::services::crud_service::{
    CrudErrors, CrudOp, CrudService, FilterSpec, UniqueField, parse_text, parse_uuid,
};
use crate::services::entity_service::EntityService;
use crate::validation::{EntitySchema, FieldKind, FieldRule, ValidationMode};

pub type CustomerService = EntityService<customer::Entity>;
pub type LeadService = EntityService<lead::Entity>;
pub type InteractionService = EntityService<interaction::Entity>;

const NAME: FieldKind = FieldKind::Text { max: 200 };
const PHONE: FieldKind = FieldKind::Text { max: 40 };

static CUSTOMER_SCHEMA: EntitySchema = EntitySchema {
    entity: "customer",
    fields: &[
        FieldRule::required("name", NAME),
        FieldRule::required("email", FieldKind::Email),
        FieldRule::optional("phone", PHONE),
        FieldRule::required("customer_type", FieldKind::OneOf(CUSTOMER_TYPES)),
        FieldRule::optional("notes", FieldKind::Text { max: 10_000 }),
    ],
};

static CUSTOMER_FILTERS: &[FilterSpec<customer::Column>] = &[FilterSpec {
    key: "customer_type",
    column: customer::Column::CustomerType,
    parse: parse_text,
}];

static CUSTOMER_SEARCH: &[customer::Column] = &[
    customer::Column::Name,
    customer::Column::Email,
    customer::Column::Phone,
    customer::Column::Notes,
];

static CUSTOMER_UNIQUE: &[UniqueField<customer::Column>] = &[UniqueField {
    field: "email",
    column: customer::Column::Email,
    message: "A customer with this email already exists",
}];

#[async_trait::async_trait]
impl CrudService for EntityService<customer::Entity> {
    type Dao = EntityDao<customer::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &CUSTOMER_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<customer::Column>] {
        CUSTOMER_FILTERS
    }

    fn search_columns(&self) -> &'static [customer::Column] {
        CUSTOMER_SEARCH
    }

    fn unique_fields(&self) -> &'static [UniqueField<customer::Column>] {
        CUSTOMER_UNIQUE
    }

    fn list_order(&self) -> Option<(customer::Column, Order)> {
        Some((customer::Column::Name, Order::Asc))
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "Customer not found",
            ..CrudErrors::default()
        }
    }

    /// Projects keep their rows with `customer_id` cleared by the foreign key.
    async fn before_delete(&self, actor: &CurrentUser, id: Uuid) -> Result<(), AppError> {
        let projects = self
            .daos()
            .entity::<project::Entity>()
            .count(move |query| query.filter(project::Column::CustomerId.eq(id)))
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))?;
        if projects > 0 {
            tracing::warn!(
                customer_id = %id,
                projects,
                actor = %actor.email,
                "deleting customer that still owns projects"
            );
        }
        Ok(())
    }
}

static LEAD_SCHEMA: EntitySchema = EntitySchema {
    entity: "lead",
    fields: &[
        FieldRule::required("name", NAME),
        FieldRule::required("email", FieldKind::Email),
        FieldRule::optional("phone", PHONE),
        FieldRule::required("message", FieldKind::Text { max: 5_000 }),
        FieldRule::optional("source", FieldKind::Text { max: 50 }),
        FieldRule::optional("status", FieldKind::OneOf(LEAD_STATUSES)),
        FieldRule::optional("priority", FieldKind::OneOf(LEAD_PRIORITIES)),
        FieldRule::optional("customer_id", FieldKind::Uuid),
    ],
};

static LEAD_FILTERS: &[FilterSpec<lead::Column>] = &[
    FilterSpec {
        key: "status",
        column: lead::Column::Status,
        parse: parse_text,
    },
    FilterSpec {
        key: "priority",
        column: lead::Column::Priority,
        parse: parse_text,
    },
    FilterSpec {
        key: "source",
        column: lead::Column::Source,
        parse: parse_text,
    },
    FilterSpec {
        key: "customer_id",
        column: lead::Column::CustomerId,
        parse: parse_uuid,
    },
];

static LEAD_SEARCH: &[lead::Column] = &[
    lead::Column::Name,
    lead::Column::Email,
    lead::Column::Phone,
    lead::Column::Message,
];

/// Column defaults applied when an admin creates a lead by hand.
const LEAD_DEFAULTS: [(&str, &str); 3] =
    [("status", "new"), ("priority", "medium"), ("source", "admin")];

#[async_trait::async_trait]
impl CrudService for EntityService<lead::Entity> {
    type Dao = EntityDao<lead::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &LEAD_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<lead::Column>] {
        LEAD_FILTERS
    }

    fn search_columns(&self) -> &'static [lead::Column] {
        LEAD_SEARCH
    }

    fn list_order(&self) -> Option<(lead::Column, Order)> {
        Some((lead::Column::CreatedAt, Order::Desc))
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "Lead not found",
            ..CrudErrors::default()
        }
    }

    fn prepare(
        &self,
        payload: &mut Map<String, Value>,
        mode: ValidationMode,
    ) -> Result<(), AppError> {
        match mode {
            ValidationMode::Create => fill_missing(payload, &LEAD_DEFAULTS),
            ValidationMode::Update => {
                for field in ["status", "priority", "source"] {
                    if payload.get(field).is_some_and(Value::is_null) {
                        return Err(AppError::bad_request(format!("{field} must not be null")));
                    }
                }
            }
        }
        Ok(())
    }
}

static INTERACTION_SCHEMA: EntitySchema = EntitySchema {
    entity: "interaction",
    fields: &[
        FieldRule::optional("customer_id", FieldKind::Uuid),
        FieldRule::optional("lead_id", FieldKind::Uuid),
        FieldRule::required("kind", FieldKind::OneOf(INTERACTION_KINDS)),
        FieldRule::required("summary", FieldKind::Text { max: 10_000 }),
        FieldRule::optional("occurred_at", FieldKind::Timestamp),
    ],
};

static INTERACTION_FILTERS: &[FilterSpec<interaction::Column>] = &[
    FilterSpec {
        key: "kind",
        column: interaction::Column::Kind,
        parse: parse_text,
    },
    FilterSpec {
        key: "customer_id",
        column: interaction::Column::CustomerId,
        parse: parse_uuid,
    },
    FilterSpec {
        key: "lead_id",
        column: interaction::Column::LeadId,
        parse: parse_uuid,
    },
];

static INTERACTION_SEARCH: &[interaction::Column] =
    &[interaction::Column::Summary, interaction::Column::Kind];

#[async_trait::async_trait]
impl CrudService for EntityService<interaction::Entity> {
    type Dao = EntityDao<interaction::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &INTERACTION_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<interaction::Column>] {
        INTERACTION_FILTERS
    }

    fn search_columns(&self) -> &'static [interaction::Column] {
        INTERACTION_SEARCH
    }

    fn list_order(&self) -> Option<(interaction::Column, Order)> {
        Some((interaction::Column::OccurredAt, Order::Desc))
    }

    fn prepare(
        &self,
        payload: &mut Map<String, Value>,
        mode: ValidationMode,
    ) -> Result<(), AppError> {
        let missing = payload.get("occurred_at").is_none_or(Value::is_null);
        match (mode, missing) {
            (ValidationMode::Create, true) => {
                payload.insert(
                    "occurred_at".to_string(),
                    Value::String(Utc::now().fixed_offset().to_rfc3339()),
                );
            }
            (ValidationMode::Update, true) if payload.contains_key("occurred_at") => {
                return Err(AppError::bad_request("occurred_at must not be null"));
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value as DbValue};
    use serde_json::{Map, Value, json};
    use uuid::Uuid;

    use super::{CustomerService, InteractionService, LeadService, fill_missing};
    use crate::auth::CurrentUser;
    use crate::db::dao::DaoContext;
    use crate::db::entities::lead;
    use crate::services::crud_service::CrudService;
    use crate::validation::ValidationMode;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn actor() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            session_token: "tok".to_string(),
        }
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, DbValue> {
        BTreeMap::from([("num_items", DbValue::BigInt(Some(count)))])
    }

    fn lead_row() -> lead::Model {
        lead::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            name: "Noura".to_string(),
            email: "noura@example.com".to_string(),
            phone: None,
            message: "Walnut kitchen for a villa".to_string(),
            source: "admin".to_string(),
            status: "new".to_string(),
            priority: "medium".to_string(),
            customer_id: None,
        }
    }

    #[test]
    fn fill_missing_keeps_explicit_values() {
        let mut payload = Map::new();
        payload.insert("status".to_string(), json!("qualified"));
        payload.insert("priority".to_string(), Value::Null);
        fill_missing(&mut payload, &[("status", "new"), ("priority", "medium")]);

        assert_eq!(payload["status"], "qualified");
        assert_eq!(payload["priority"], "medium");
    }

    #[tokio::test]
    async fn lead_create_applies_defaults() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[lead_row()]])
            .into_connection();
        let service = LeadService::new(&DaoContext::new(&db));

        let created = service
            .create_from_json(
                &actor(),
                json!({
                    "name": "Noura",
                    "email": "noura@example.com",
                    "message": "Walnut kitchen for a villa"
                }),
            )
            .await
            .expect("create should succeed");
        assert_eq!(created.status, "new");
    }

    #[test]
    fn lead_update_rejects_null_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = LeadService::new(&DaoContext::new(&db));
        let mut payload = Map::new();
        payload.insert("status".to_string(), Value::Null);

        let err = service
            .prepare(&mut payload, ValidationMode::Update)
            .expect_err("null status should fail");
        assert_eq!(err.message(), "status must not be null");
    }

    #[tokio::test]
    async fn lead_status_outside_enum_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = LeadService::new(&DaoContext::new(&db));

        let err = service
            .update_from_json(&actor(), Uuid::new_v4(), json!({ "status": "archived" }))
            .await
            .expect_err("unknown status should fail");
        assert!(err.message().starts_with("status must be one of"));
    }

    #[test]
    fn interaction_create_defaults_occurred_at() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = InteractionService::new(&DaoContext::new(&db));
        let mut payload = Map::new();
        payload.insert("kind".to_string(), json!("call"));

        service
            .prepare(&mut payload, ValidationMode::Create)
            .expect("prepare should succeed");
        let stamp = payload["occurred_at"].as_str().expect("timestamp string");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[tokio::test]
    async fn customer_with_projects_is_still_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(2)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = CustomerService::new(&DaoContext::new(&db));

        service
            .delete(&actor(), Uuid::new_v4())
            .await
            .expect("delete should proceed");
    }

    #[tokio::test]
    async fn customer_email_taken_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(1)]])
            .into_connection();
        let service = CustomerService::new(&DaoContext::new(&db));

        let err = service
            .create_from_json(
                &actor(),
                json!({
                    "name": "Al Noor Villas",
                    "email": "Office@AlNoor.example",
                    "customer_type": "developer"
                }),
            )
            .await
            .expect_err("duplicate email should conflict");
        assert_eq!(err.message(), "A customer with this email already exists");
    }
}
