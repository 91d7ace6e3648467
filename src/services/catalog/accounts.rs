use sea_orm::Order;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{LOCALES, fill_missing};
use crate::auth::password::hash_password;
use crate::auth::{CurrentUser, ROLE_NAMES};
use crate::db::dao::EntityDao;
use crate::db::entities::{newsletter_subscriber, user};
use crate::error::AppError;
use crate::services::crud_service::{
    CrudErrors, CrudService, FilterSpec, UniqueField, parse_text,
};
use crate::services::entity_service::EntityService;
use crate::validation::{EntitySchema, FieldKind, FieldRule, ValidationMode};

pub type UserService = EntityService<user::Entity>;
pub type NewsletterSubscriberService = EntityService<newsletter_subscriber::Entity>;

static USER_SCHEMA: EntitySchema = EntitySchema {
    entity: "user",
    fields: &[
        FieldRule::required("name", FieldKind::Text { max: 200 }),
        FieldRule::required("email", FieldKind::Email),
        FieldRule::required("password", FieldKind::Text { max: 200 }),
        FieldRule::required("role", FieldKind::OneOf(ROLE_NAMES)),
    ],
};

static USER_FILTERS: &[FilterSpec<user::Column>] = &[FilterSpec {
    key: "role",
    column: user::Column::Role,
    parse: parse_text,
}];

static USER_SEARCH: &[user::Column] = &[user::Column::Name, user::Column::Email];

static USER_UNIQUE: &[UniqueField<user::Column>] = &[UniqueField {
    field: "email",
    column: user::Column::Email,
    message: "A user with this email already exists",
}];

#[async_trait::async_trait]
impl CrudService for EntityService<user::Entity> {
    type Dao = EntityDao<user::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &USER_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<user::Column>] {
        USER_FILTERS
    }

    fn search_columns(&self) -> &'static [user::Column] {
        USER_SEARCH
    }

    fn unique_fields(&self) -> &'static [UniqueField<user::Column>] {
        USER_UNIQUE
    }

    fn list_order(&self) -> Option<(user::Column, Order)> {
        Some((user::Column::Name, Order::Asc))
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "User not found",
            ..CrudErrors::default()
        }
    }

    /// The plain `password` never reaches the table; it is swapped for its hash.
    fn prepare(
        &self,
        payload: &mut Map<String, Value>,
        _mode: ValidationMode,
    ) -> Result<(), AppError> {
        if let Some(password) = payload.remove("password") {
            let password = password
                .as_str()
                .ok_or_else(|| AppError::bad_request("password must be a string"))?;
            let hash = hash_password(password)?;
            payload.insert("password_hash".to_string(), Value::String(hash));
        }
        Ok(())
    }

    async fn before_update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        payload: &Map<String, Value>,
    ) -> Result<(), AppError> {
        if !actor.is(&id) {
            return Ok(());
        }
        let Some(role) = payload.get("role").and_then(Value::as_str) else {
            return Ok(());
        };
        let current = self.find_by_id(id).await?;
        if current.role != role {
            return Err(AppError::forbidden("You cannot change your own role"));
        }
        Ok(())
    }

    async fn before_delete(&self, actor: &CurrentUser, id: Uuid) -> Result<(), AppError> {
        if actor.is(&id) {
            return Err(AppError::forbidden("You cannot delete your own account"));
        }
        Ok(())
    }
}

static SUBSCRIBER_SCHEMA: EntitySchema = EntitySchema {
    entity: "newsletter_subscriber",
    fields: &[
        FieldRule::required("email", FieldKind::Email),
        FieldRule::optional("locale", FieldKind::OneOf(LOCALES)),
    ],
};

static SUBSCRIBER_FILTERS: &[FilterSpec<newsletter_subscriber::Column>] = &[FilterSpec {
    key: "locale",
    column: newsletter_subscriber::Column::Locale,
    parse: parse_text,
}];

static SUBSCRIBER_SEARCH: &[newsletter_subscriber::Column] =
    &[newsletter_subscriber::Column::Email];

static SUBSCRIBER_UNIQUE: &[UniqueField<newsletter_subscriber::Column>] = &[UniqueField {
    field: "email",
    column: newsletter_subscriber::Column::Email,
    message: "This email is already subscribed",
}];

impl CrudService for EntityService<newsletter_subscriber::Entity> {
    type Dao = EntityDao<newsletter_subscriber::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &SUBSCRIBER_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<newsletter_subscriber::Column>] {
        SUBSCRIBER_FILTERS
    }

    fn search_columns(&self) -> &'static [newsletter_subscriber::Column] {
        SUBSCRIBER_SEARCH
    }

    fn unique_fields(&self) -> &'static [UniqueField<newsletter_subscriber::Column>] {
        SUBSCRIBER_UNIQUE
    }

    fn prepare(
        &self,
        payload: &mut Map<String, Value>,
        mode: ValidationMode,
    ) -> Result<(), AppError> {
        if mode == ValidationMode::Create {
            fill_missing(payload, &[("locale", "en")]);
        }
        Ok(())
    }
}
