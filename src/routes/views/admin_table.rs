use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    db::entities::{
        blog_post, customer, gallery_image, interaction, lead, newsletter_subscriber, project,
        service, statistic, team_member, testimonial, translation, user,
    },
    error::AppError,
    services::{
        ServiceContext,
        crud_service::{CrudService, ListParams},
    },
    validation::{EntitySchema, FieldKind, FieldRule, ValidationMode},
};

/// Form inputs that are never echoed back and are left alone when blank.
const SECRET_FIELDS: &[&str] = &["password"];
const TEXTAREA_MIN_CHARS: usize = 1_000;

/// Object-safe view of one managed table for the admin screens.
#[async_trait::async_trait]
pub trait AdminTable: Send + Sync {
    fn form_schema(&self) -> &'static EntitySchema;

    async fn list_rows(&self, params: ListParams) -> Result<(Vec<Value>, bool), AppError>;

    async fn find_row(&self, id: Uuid) -> Result<Value, AppError>;

    async fn create_row(&self, actor: &CurrentUser, payload: Value) -> Result<(), AppError>;

    async fn update_row(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        payload: Value,
    ) -> Result<(), AppError>;

    async fn delete_row(&self, actor: &CurrentUser, id: Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl<S: CrudService> AdminTable for S {
    fn form_schema(&self) -> &'static EntitySchema {
        self.schema()
    }

    async fn list_rows(&self, params: ListParams) -> Result<(Vec<Value>, bool), AppError> {
        let page = self.list(params).await?;
        let rows = page
            .data
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|err| AppError::internal_with_source("Failed to serialize rows", err))?;
        Ok((rows, page.has_next))
    }

    async fn find_row(&self, id: Uuid) -> Result<Value, AppError> {
        let row = self.find_by_id(id).await?;
        serde_json::to_value(&row)
            .map_err(|err| AppError::internal_with_source("Failed to serialize row", err))
    }

    async fn create_row(&self, actor: &CurrentUser, payload: Value) -> Result<(), AppError> {
        self.create_from_json(actor, payload).await.map(|_| ())
    }

    async fn update_row(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        payload: Value,
    ) -> Result<(), AppError> {
        self.update_from_json(actor, id, payload).await.map(|_| ())
    }

    async fn delete_row(&self, actor: &CurrentUser, id: Uuid) -> Result<(), AppError> {
        self.delete(actor, id).await
    }
}

/// Table behind an admin path segment; `None` for unknown names.
pub fn admin_table(services: &ServiceContext, entity: &str) -> Option<Box<dyn AdminTable>> {
    let table: Box<dyn AdminTable> = match entity {
        "projects" => Box::new(services.entity::<project::Entity>()),
        "gallery-images" => Box::new(services.entity::<gallery_image::Entity>()),
        "testimonials" => Box::new(services.entity::<testimonial::Entity>()),
        "services" => Box::new(services.entity::<service::Entity>()),
        "team-members" => Box::new(services.entity::<team_member::Entity>()),
        "statistics" => Box::new(services.entity::<statistic::Entity>()),
        "blog-posts" => Box::new(services.entity::<blog_post::Entity>()),
        "translations" => Box::new(services.entity::<translation::Entity>()),
        "customers" => Box::new(services.entity::<customer::Entity>()),
        "leads" => Box::new(services.entity::<lead::Entity>()),
        "interactions" => Box::new(services.entity::<interaction::Entity>()),
        "newsletter-subscribers" => Box::new(services.entity::<newsletter_subscriber::Entity>()),
        "users" => Box::new(services.entity::<user::Entity>()),
        _ => return None,
    };
    Some(table)
}

/// One input on a create or edit screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub input: &'static str,
    pub value: String,
    pub checked: bool,
    pub required: bool,
    pub options: &'static [&'static str],
}

impl FormField {
    pub fn is_selected(&self, option: &str) -> bool {
        self.value == option
    }
}

fn input_for(rule: &FieldRule) -> &'static str {
    if SECRET_FIELDS.contains(&rule.name) {
        return "password";
    }
    match rule.kind {
        FieldKind::Text { max } if max >= TEXTAREA_MIN_CHARS => "textarea",
        FieldKind::Email => "email",
        FieldKind::OneOf(_) => "select",
        FieldKind::Int { .. } => "number",
        FieldKind::Bool => "checkbox",
        _ => "text",
    }
}

/// Inputs for every schema field, prefilled from `values` (a stored row or a
/// rejected submission). `required` follows create rules only.
pub fn form_fields(
    schema: &EntitySchema,
    values: &Map<String, Value>,
    mode: ValidationMode,
) -> Vec<FormField> {
    schema
        .fields
        .iter()
        .map(|rule| {
            let stored = values.get(rule.name).unwrap_or(&Value::Null);
            let value = match stored {
                _ if SECRET_FIELDS.contains(&rule.name) => String::new(),
                Value::Null | Value::Bool(_) => String::new(),
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            FormField {
                name: rule.name,
                input: input_for(rule),
                value,
                checked: stored.as_bool().unwrap_or(false)
                    || matches!(stored.as_str(), Some("on" | "true")),
                required: rule.required
                    && (mode == ValidationMode::Create || !SECRET_FIELDS.contains(&rule.name)),
                options: match rule.kind {
                    FieldKind::OneOf(options) => options,
                    _ => &[],
                },
            }
        })
        .collect()
}

/// Turns a urlencoded admin form into the JSON payload the CRUD services take.
///
/// Unchecked boxes arrive as absent keys and become `false`. Blank optional
/// inputs are dropped on create so defaults apply; on edit a blank optional
/// text clears the value and a blank reference or timestamp becomes `null`.
/// A blank secret input on edit keeps the stored value.
pub fn payload_from_form(
    schema: &EntitySchema,
    form: &HashMap<String, String>,
    mode: ValidationMode,
) -> Value {
    let mut payload = Map::new();
    for rule in schema.fields {
        if let FieldKind::Bool = rule.kind {
            let checked = form
                .get(rule.name)
                .is_some_and(|raw| matches!(raw.as_str(), "on" | "true" | "1"));
            payload.insert(rule.name.to_string(), Value::Bool(checked));
            continue;
        }

        let raw = form.get(rule.name).map(|raw| raw.trim()).unwrap_or_default();
        if raw.is_empty() {
            if SECRET_FIELDS.contains(&rule.name) && mode == ValidationMode::Update {
                continue;
            }
            if rule.required {
                payload.insert(rule.name.to_string(), Value::String(String::new()));
                continue;
            }
            match (mode, rule.kind) {
                (ValidationMode::Create, _) => {}
                (_, FieldKind::Text { .. }) => {
                    payload.insert(rule.name.to_string(), Value::String(String::new()));
                }
                (_, FieldKind::Uuid | FieldKind::Timestamp) => {
                    payload.insert(rule.name.to_string(), Value::Null);
                }
                _ => {}
            }
            continue;
        }

        let value = match rule.kind {
            FieldKind::Int { .. } => raw
                .parse::<i64>()
                .map(|number| Value::Number(Number::from(number)))
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            _ => Value::String(raw.to_string()),
        };
        payload.insert(rule.name.to_string(), value);
    }
    Value::Object(payload)
}

/// Submitted form echoed back into the inputs after a rejected save.
pub fn form_values(form: &HashMap<String, String>) -> Map<String, Value> {
    form.iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}
