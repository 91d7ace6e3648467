use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid regex"));
static TRANSLATION_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+(\.[a-z0-9_]+)*$").expect("valid regex"));

/// Server-managed keys that clients may echo back but never set.
const READ_ONLY_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text { max: usize },
    Email,
    Slug,
    TranslationKey,
    OneOf(&'static [&'static str]),
    Int { min: i64, max: i64 },
    Bool,
    Uuid,
    Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

#[derive(Debug)]
pub struct EntitySchema {
    pub entity: &'static str,
    pub fields: &'static [FieldRule],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Every required field must be present and non-empty.
    Create,
    /// Only the fields present are checked.
    Update,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Checks `payload` against the schema and returns the normalized object
    /// (read-only keys dropped, strings trimmed, emails lowercased).
    pub fn validate(
        &self,
        payload: Value,
        mode: ValidationMode,
    ) -> Result<Map<String, Value>, ValidationError> {
        let Value::Object(mut object) = payload else {
            return Err(ValidationError::new("payload", "must be a JSON object"));
        };

        for key in READ_ONLY_FIELDS {
            object.remove(key);
        }

        if let Some(unknown) = object.keys().find(|key| self.field(key).is_none()) {
            return Err(ValidationError::new(unknown.clone(), "is not an accepted field"));
        }

        if mode == ValidationMode::Create {
            for rule in self.fields.iter().filter(|rule| rule.required) {
                if !object.contains_key(rule.name) {
                    return Err(ValidationError::new(rule.name, "is required"));
                }
            }
        }

        let mut normalized = Map::with_capacity(object.len());
        for (key, value) in object {
            let Some(rule) = self.field(&key) else {
                continue;
            };
            let value = check_field(rule, value)?;
            normalized.insert(key, value);
        }

        Ok(normalized)
    }
}

fn check_field(rule: &FieldRule, value: Value) -> Result<Value, ValidationError> {
    if value.is_null() {
        if rule.required {
            return Err(ValidationError::new(rule.name, "is required"));
        }
        return Ok(Value::Null);
    }

    match rule.kind {
        FieldKind::Text { max } => {
            let text = required_text(rule, &value)?;
            if text.chars().count() > max {
                return Err(ValidationError::new(
                    rule.name,
                    format!("must be at most {max} characters"),
                ));
            }
            Ok(Value::String(text))
        }
        FieldKind::Email => {
            let text = required_text(rule, &value)?.to_lowercase();
            if text.is_empty() {
                return Ok(Value::Null);
            }
            if !EMAIL_RE.is_match(&text) {
                return Err(ValidationError::new(rule.name, "must be a valid email address"));
            }
            Ok(Value::String(text))
        }
        FieldKind::Slug => {
            let text = required_text(rule, &value)?;
            if !SLUG_RE.is_match(&text) {
                return Err(ValidationError::new(
                    rule.name,
                    "must contain only lowercase letters, digits and single hyphens",
                ));
            }
            Ok(Value::String(text))
        }
        FieldKind::TranslationKey => {
            let text = required_text(rule, &value)?;
            if !TRANSLATION_KEY_RE.is_match(&text) {
                return Err(ValidationError::new(
                    rule.name,
                    "must be dot-separated lowercase segments (e.g. home.hero.title)",
                ));
            }
            Ok(Value::String(text))
        }
        FieldKind::OneOf(allowed) => {
            let text = required_text(rule, &value)?;
            if !allowed.contains(&text.as_str()) {
                return Err(ValidationError::new(
                    rule.name,
                    format!("must be one of: {}", allowed.join(", ")),
                ));
            }
            Ok(Value::String(text))
        }
        FieldKind::Int { min, max } => {
            let number = value
                .as_i64()
                .ok_or_else(|| ValidationError::new(rule.name, "must be an integer"))?;
            if number < min || number > max {
                return Err(ValidationError::new(
                    rule.name,
                    format!("must be between {min} and {max}"),
                ));
            }
            Ok(value)
        }
        FieldKind::Bool => {
            if !value.is_boolean() {
                return Err(ValidationError::new(rule.name, "must be true or false"));
            }
            Ok(value)
        }
        FieldKind::Uuid => {
            let text = value
                .as_str()
                .ok_or_else(|| ValidationError::new(rule.name, "must be a UUID string"))?;
            Uuid::parse_str(text.trim())
                .map_err(|_| ValidationError::new(rule.name, "must be a UUID string"))?;
            Ok(Value::String(text.trim().to_string()))
        }
        FieldKind::Timestamp => {
            let text = value
                .as_str()
                .ok_or_else(|| ValidationError::new(rule.name, "must be an RFC 3339 timestamp"))?;
            DateTime::parse_from_rfc3339(text.trim())
                .map_err(|_| ValidationError::new(rule.name, "must be an RFC 3339 timestamp"))?;
            Ok(Value::String(text.trim().to_string()))
        }
    }
}

fn required_text(rule: &FieldRule, value: &Value) -> Result<String, ValidationError> {
    let text = value
        .as_str()
        .ok_or_else(|| ValidationError::new(rule.name, "must be a string"))?
        .trim();
    if rule.required && text.is_empty() {
        return Err(ValidationError::new(rule.name, "must not be empty"));
    }
    Ok(text.to_string())
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw.trim())
}
