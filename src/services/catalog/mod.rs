//! Per-table CRUD rules for every entity managed through the admin API.

use serde_json::{Map, Value};

mod accounts;
mod content;
mod relations;

pub use accounts::{NewsletterSubscriberService, UserService};
pub use content::{
    BlogPostService, GalleryImageService, ProjectService, ServiceOfferingService,
    StatisticService, TeamMemberService, TestimonialService, TranslationService,
};
pub use relations::{CustomerService, InteractionService, LeadService};

pub const CUSTOMER_TYPES: &[&str] = &["residential", "commercial", "developer"];
pub const LEAD_STATUSES: &[&str] = &["new", "contacted", "qualified", "converted", "lost"];
pub const LEAD_PRIORITIES: &[&str] = &["low", "medium", "high"];
pub const INTERACTION_KINDS: &[&str] = &["call", "email", "meeting", "note"];
pub const LOCALES: &[&str] = &["en", "ar"];

/// Inserts `default` for every listed field that is absent or null.
fn fill_missing(payload: &mut Map<String, Value>, defaults: &[(&str, &str)]) {
    for (field, default) in defaults {
        if payload.get(*field).is_none_or(Value::is_null) {
            payload.insert((*field).to_string(), Value::String((*default).to_string()));
        }
    }
}
