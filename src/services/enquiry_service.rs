use sea_orm::{ColumnTrait, QueryFilter, Set, SqlErr};
use serde::Deserialize;
use serde_json::Value;

use crate::db::dao::{DaoBase, DaoContext, DaoLayerError, EntityDao};
use crate::db::entities::{lead, newsletter_subscriber};
use crate::error::AppError;
use crate::mailer::{Mailer, OutgoingMail};
use crate::services::catalog::LOCALES;
use crate::validation::{EntitySchema, FieldKind, FieldRule, ValidationMode};

const ALREADY_SUBSCRIBED: &str = "This email is already subscribed";

static CONTACT_SCHEMA: EntitySchema = EntitySchema {
    entity: "contact",
    fields: &[
        FieldRule::required("name", FieldKind::Text { max: 200 }),
        FieldRule::required("email", FieldKind::Email),
        FieldRule::optional("phone", FieldKind::Text { max: 40 }),
        FieldRule::required("message", FieldKind::Text { max: 5_000 }),
    ],
};

static SUBSCRIBE_SCHEMA: EntitySchema = EntitySchema {
    entity: "newsletter",
    fields: &[
        FieldRule::required("email", FieldKind::Email),
        FieldRule::optional("locale", FieldKind::OneOf(LOCALES)),
    ],
};

#[derive(Debug, Deserialize)]
struct ContactForm {
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SubscribeForm {
    email: String,
    locale: Option<String>,
}

/// Visitor-facing writes: contact enquiries and newsletter sign-ups.
#[derive(Clone)]
pub struct EnquiryService {
    leads: EntityDao<lead::Entity>,
    subscribers: EntityDao<newsletter_subscriber::Entity>,
    mailer: Mailer,
}

impl EnquiryService {
    pub fn new(daos: &DaoContext, mailer: Mailer) -> Self {
        Self {
            leads: daos.entity(),
            subscribers: daos.entity(),
            mailer,
        }
    }

    /// Stores the enquiry as a new website lead, then notifies the sales inbox.
    /// A failed notification is logged and does not fail the enquiry.
    pub async fn submit_contact(&self, payload: Value) -> Result<lead::Model, AppError> {
        let form: ContactForm = parse_form(&CONTACT_SCHEMA, payload)?;

        let active = lead::ActiveModel {
            name: Set(form.name),
            email: Set(form.email),
            phone: Set(form.phone.filter(|phone| !phone.is_empty())),
            message: Set(form.message),
            source: Set("website".to_string()),
            status: Set("new".to_string()),
            priority: Set("medium".to_string()),
            customer_id: Set(None),
            ..Default::default()
        };
        let lead = self.leads.create(active).await?;
        tracing::info!(lead_id = %lead.id, "website enquiry stored");

        self.mailer.notify_best_effort(&enquiry_mail(&lead)).await;
        Ok(lead)
    }

    pub async fn subscribe(&self, payload: Value) -> Result<newsletter_subscriber::Model, AppError> {
        let form: SubscribeForm = parse_form(&SUBSCRIBE_SCHEMA, payload)?;

        let email = form.email.clone();
        let existing = self
            .subscribers
            .count(move |select| select.filter(newsletter_subscriber::Column::Email.eq(email)))
            .await?;
        if existing > 0 {
            return Err(AppError::conflict(ALREADY_SUBSCRIBED));
        }

        let active = newsletter_subscriber::ActiveModel {
            email: Set(form.email),
            locale: Set(form.locale.unwrap_or_else(|| "en".to_string())),
            ..Default::default()
        };
        match self.subscribers.create(active).await {
            Ok(subscriber) => {
                tracing::info!(subscriber_id = %subscriber.id, "newsletter subscription added");
                Ok(subscriber)
            }
            Err(DaoLayerError::Db(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                Err(AppError::conflict(ALREADY_SUBSCRIBED))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_form<T: serde::de::DeserializeOwned>(
    schema: &EntitySchema,
    payload: Value,
) -> Result<T, AppError> {
    let object = schema.validate(payload, ValidationMode::Create)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|err| AppError::bad_request(format!("Invalid payload: {err}")))
}

fn enquiry_mail(lead: &lead::Model) -> OutgoingMail {
    let phone = lead.phone.as_deref().unwrap_or("-");
    OutgoingMail {
        subject: format!("New enquiry from {}", lead.name),
        text: format!(
            "Name: {}\nEmail: {}\nPhone: {}\n\n{}",
            lead.name, lead.email, phone, lead.message
        ),
        reply_to: Some(lead.email.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase, Value as DbValue};
    use serde_json::json;
    use uuid::Uuid;

    use super::{EnquiryService, enquiry_mail};
    use crate::db::dao::DaoContext;
    use crate::db::entities::lead;
    use crate::error::AppError;
    use crate::mailer::Mailer;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn lead_row() -> lead::Model {
        lead::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            name: "Huda".to_string(),
            email: "huda@example.com".to_string(),
            phone: Some("+971500000000".to_string()),
            message: "Looking for a lacquered kitchen".to_string(),
            source: "website".to_string(),
            status: "new".to_string(),
            priority: "medium".to_string(),
            customer_id: None,
        }
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, DbValue> {
        BTreeMap::from([("num_items", DbValue::BigInt(Some(count)))])
    }

    #[tokio::test]
    async fn contact_creates_website_lead() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[lead_row()]])
            .into_connection();
        let service = EnquiryService::new(&DaoContext::new(&db), Mailer::log_only());

        let lead = service
            .submit_contact(json!({
                "name": "Huda",
                "email": "Huda@Example.com",
                "message": "Looking for a lacquered kitchen"
            }))
            .await
            .expect("enquiry should be stored");
        assert_eq!(lead.source, "website");
        assert_eq!(lead.status, "new");
    }

    #[tokio::test]
    async fn contact_without_message_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = EnquiryService::new(&DaoContext::new(&db), Mailer::log_only());

        let err = service
            .submit_contact(json!({ "name": "Huda", "email": "huda@example.com" }))
            .await
            .expect_err("missing message should fail");
        assert_eq!(err.message(), "message is required");
    }

    #[tokio::test]
    async fn duplicate_subscription_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(1)]])
            .into_connection();
        let service = EnquiryService::new(&DaoContext::new(&db), Mailer::log_only());

        let err = service
            .subscribe(json!({ "email": "huda@example.com" }))
            .await
            .expect_err("second sign-up should conflict");
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn notification_replies_to_the_visitor() {
        let mail = enquiry_mail(&lead_row());
        assert_eq!(mail.reply_to.as_deref(), Some("huda@example.com"));
        assert!(mail.subject.contains("Huda"));
        assert!(mail.text.contains("+971500000000"));
    }
}
