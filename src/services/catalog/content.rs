use sea_orm::Order;

use crate::db::dao::EntityDao;
use crate::db::entities::{
    blog_post, gallery_image, project, service, statistic, team_member, testimonial, translation,
};
use crate::services::crud_service::{CrudErrors, CrudService, FilterSpec, UniqueField, parse_bool, parse_text, parse_uuid};
use crate::services::entity_service::EntityService;
use crate::validation::{EntitySchema, FieldKind, FieldRule};

pub type ProjectService = EntityService<project::Entity>;
pub type GalleryImageService = EntityService<gallery_image::Entity>;
pub type TestimonialService = EntityService<testimonial::Entity>;
pub type ServiceOfferingService = EntityService<service::Entity>;
pub type TeamMemberService = EntityService<team_member::Entity>;
pub type StatisticService = EntityService<statistic::Entity>;
pub type BlogPostService = EntityService<blog_post::Entity>;
pub type TranslationService = EntityService<translation::Entity>;

const TITLE: FieldKind = FieldKind::Text { max: 200 };
const SHORT: FieldKind = FieldKind::Text { max: 100 };
const LONG: FieldKind = FieldKind::Text { max: 10_000 };
const URL: FieldKind = FieldKind::Text { max: 500 };
const SORT_ORDER: FieldRule = FieldRule::optional("sort_order", FieldKind::Int { min: 0, max: 100_000 });
const PUBLISHED: FieldRule = FieldRule::optional("published", FieldKind::Bool);

static PROJECT_SCHEMA: EntitySchema = EntitySchema {
    entity: "project",
    fields: &[
        FieldRule::required("slug", FieldKind::Slug),
        FieldRule::required("title_en", TITLE),
        FieldRule::required("title_ar", TITLE),
        FieldRule::required("description_en", LONG),
        FieldRule::required("description_ar", LONG),
        FieldRule::required("category", SHORT),
        FieldRule::required("image_url", URL),
        FieldRule::optional("location", TITLE),
        FieldRule::optional("customer_id", FieldKind::Uuid),
        SORT_ORDER,
        PUBLISHED,
    ],
};

static PROJECT_FILTERS: &[FilterSpec<project::Column>] = &[
    FilterSpec {
        key: "category",
        column: project::Column::Category,
        parse: parse_text,
    },
    FilterSpec {
        key: "published",
        column: project::Column::Published,
        parse: parse_bool,
    },
    FilterSpec {
        key: "customer_id",
        column: project::Column::CustomerId,
        parse: parse_uuid,
    },
];

static PROJECT_SEARCH: &[project::Column] = &[
    project::Column::TitleEn,
    project::Column::TitleAr,
    project::Column::Slug,
    project::Column::Category,
    project::Column::Location,
];

static PROJECT_UNIQUE: &[UniqueField<project::Column>] = &[UniqueField {
    field: "slug",
    column: project::Column::Slug,
    message: "A project with this slug already exists",
}];

impl CrudService for EntityService<project::Entity> {
    type Dao = EntityDao<project::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &PROJECT_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<project::Column>] {
        PROJECT_FILTERS
    }

    fn search_columns(&self) -> &'static [project::Column] {
        PROJECT_SEARCH
    }

    fn unique_fields(&self) -> &'static [UniqueField<project::Column>] {
        PROJECT_UNIQUE
    }

    fn list_order(&self) -> Option<(project::Column, Order)> {
        Some((project::Column::SortOrder, Order::Asc))
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "Project not found",
            ..CrudErrors::default()
        }
    }
}

static GALLERY_SCHEMA: EntitySchema = EntitySchema {
    entity: "gallery_image",
    fields: &[
        FieldRule::required("caption_en", TITLE),
        FieldRule::required("caption_ar", TITLE),
        FieldRule::required("image_url", URL),
        FieldRule::required("category", SHORT),
        SORT_ORDER,
        PUBLISHED,
    ],
};

static GALLERY_FILTERS: &[FilterSpec<gallery_image::Column>] = &[
    FilterSpec {
        key: "category",
        column: gallery_image::Column::Category,
        parse: parse_text,
    },
    FilterSpec {
        key: "published",
        column: gallery_image::Column::Published,
        parse: parse_bool,
    },
];

static GALLERY_SEARCH: &[gallery_image::Column] = &[
    gallery_image::Column::CaptionEn,
    gallery_image::Column::CaptionAr,
    gallery_image::Column::Category,
];

impl CrudService for EntityService<gallery_image::Entity> {
    type Dao = EntityDao<gallery_image::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &GALLERY_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<gallery_image::Column>] {
        GALLERY_FILTERS
    }

    fn search_columns(&self) -> &'static [gallery_image::Column] {
        GALLERY_SEARCH
    }

    fn list_order(&self) -> Option<(gallery_image::Column, Order)> {
        Some((gallery_image::Column::SortOrder, Order::Asc))
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "Gallery image not found",
            ..CrudErrors::default()
        }
    }
}

static TESTIMONIAL_SCHEMA: EntitySchema = EntitySchema {
    entity: "testimonial",
    fields: &[
        FieldRule::required("quote_en", LONG),
        FieldRule::required("quote_ar", LONG),
        FieldRule::required("author_en", SHORT),
        FieldRule::required("author_ar", SHORT),
        FieldRule::optional("rating", FieldKind::Int { min: 1, max: 5 }),
        SORT_ORDER,
        PUBLISHED,
    ],
};

static TESTIMONIAL_FILTERS: &[FilterSpec<testimonial::Column>] = &[FilterSpec {
    key: "published",
    column: testimonial::Column::Published,
    parse: parse_bool,
}];

static TESTIMONIAL_SEARCH: &[testimonial::Column] = &[
    testimonial::Column::AuthorEn,
    testimonial::Column::AuthorAr,
    testimonial::Column::QuoteEn,
];

impl CrudService for EntityService<testimonial::Entity> {
    type Dao = EntityDao<testimonial::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &TESTIMONIAL_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<testimonial::Column>] {
        TESTIMONIAL_FILTERS
    }

    fn search_columns(&self) -> &'static [testimonial::Column] {
        TESTIMONIAL_SEARCH
    }

    fn list_order(&self) -> Option<(testimonial::Column, Order)> {
        Some((testimonial::Column::SortOrder, Order::Asc))
    }
}

static SERVICE_SCHEMA: EntitySchema = EntitySchema {
    entity: "service",
    fields: &[
        FieldRule::required("slug", FieldKind::Slug),
        FieldRule::required("title_en", TITLE),
        FieldRule::required("title_ar", TITLE),
        FieldRule::required("description_en", LONG),
        FieldRule::required("description_ar", LONG),
        FieldRule::required("icon", SHORT),
        SORT_ORDER,
        PUBLISHED,
    ],
};

static SERVICE_FILTERS: &[FilterSpec<service::Column>] = &[FilterSpec {
    key: "published",
    column: service::Column::Published,
    parse: parse_bool,
}];

static SERVICE_SEARCH: &[service::Column] = &[
    service::Column::TitleEn,
    service::Column::TitleAr,
    service::Column::Slug,
];

static SERVICE_UNIQUE: &[UniqueField<service::Column>] = &[UniqueField {
    field: "slug",
    column: service::Column::Slug,
    message: "A service with this slug already exists",
}];

impl CrudService for EntityService<service::Entity> {
    type Dao = EntityDao<service::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &SERVICE_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<service::Column>] {
        SERVICE_FILTERS
    }

    fn search_columns(&self) -> &'static [service::Column] {
        SERVICE_SEARCH
    }

    fn unique_fields(&self) -> &'static [UniqueField<service::Column>] {
        SERVICE_UNIQUE
    }

    fn list_order(&self) -> Option<(service::Column, Order)> {
        Some((service::Column::SortOrder, Order::Asc))
    }
}

static TEAM_SCHEMA: EntitySchema = EntitySchema {
    entity: "team_member",
    fields: &[
        FieldRule::required("name_en", SHORT),
        FieldRule::required("name_ar", SHORT),
        FieldRule::required("role_en", SHORT),
        FieldRule::required("role_ar", SHORT),
        FieldRule::required("photo_url", URL),
        FieldRule::optional("email", FieldKind::Email),
        SORT_ORDER,
        PUBLISHED,
    ],
};

static TEAM_FILTERS: &[FilterSpec<team_member::Column>] = &[FilterSpec {
    key: "published",
    column: team_member::Column::Published,
    parse: parse_bool,
}];

static TEAM_SEARCH: &[team_member::Column] = &[
    team_member::Column::NameEn,
    team_member::Column::NameAr,
    team_member::Column::RoleEn,
];

impl CrudService for EntityService<team_member::Entity> {
    type Dao = EntityDao<team_member::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &TEAM_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<team_member::Column>] {
        TEAM_FILTERS
    }

    fn search_columns(&self) -> &'static [team_member::Column] {
        TEAM_SEARCH
    }

    fn list_order(&self) -> Option<(team_member::Column, Order)> {
        Some((team_member::Column::SortOrder, Order::Asc))
    }
}

static STATISTIC_SCHEMA: EntitySchema = EntitySchema {
    entity: "statistic",
    fields: &[
        FieldRule::required("label_en", SHORT),
        FieldRule::required("label_ar", SHORT),
        FieldRule::required(
            "value",
            FieldKind::Int {
                min: i32::MIN as i64,
                max: i32::MAX as i64,
            },
        ),
        FieldRule::optional("suffix", FieldKind::Text { max: 20 }),
        SORT_ORDER,
        PUBLISHED,
    ],
};

static STATISTIC_FILTERS: &[FilterSpec<statistic::Column>] = &[FilterSpec {
    key: "published",
    column: statistic::Column::Published,
    parse: parse_bool,
}];

static STATISTIC_SEARCH: &[statistic::Column] =
    &[statistic::Column::LabelEn, statistic::Column::LabelAr];

impl CrudService for EntityService<statistic::Entity> {
    type Dao = EntityDao<statistic::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &STATISTIC_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<statistic::Column>] {
        STATISTIC_FILTERS
    }

    fn search_columns(&self) -> &'static [statistic::Column] {
        STATISTIC_SEARCH
    }

    fn list_order(&self) -> Option<(statistic::Column, Order)> {
        Some((statistic::Column::SortOrder, Order::Asc))
    }
}

static BLOG_SCHEMA: EntitySchema = EntitySchema {
    entity: "blog_post",
    fields: &[
        FieldRule::required("slug", FieldKind::Slug),
        FieldRule::required("title_en", TITLE),
        FieldRule::required("title_ar", TITLE),
        FieldRule::required("excerpt_en", FieldKind::Text { max: 1_000 }),
        FieldRule::required("excerpt_ar", FieldKind::Text { max: 1_000 }),
        FieldRule::required("body_en", FieldKind::Text { max: 100_000 }),
        FieldRule::required("body_ar", FieldKind::Text { max: 100_000 }),
        FieldRule::required("cover_image_url", URL),
        FieldRule::optional("published_at", FieldKind::Timestamp),
        SORT_ORDER,
        PUBLISHED,
    ],
};

static BLOG_FILTERS: &[FilterSpec<blog_post::Column>] = &[FilterSpec {
    key: "published",
    column: blog_post::Column::Published,
    parse: parse_bool,
}];

static BLOG_SEARCH: &[blog_post::Column] = &[
    blog_post::Column::TitleEn,
    blog_post::Column::TitleAr,
    blog_post::Column::Slug,
    blog_post::Column::ExcerptEn,
];

static BLOG_UNIQUE: &[UniqueField<blog_post::Column>] = &[UniqueField {
    field: "slug",
    column: blog_post::Column::Slug,
    message: "A blog post with this slug already exists",
}];

impl CrudService for EntityService<blog_post::Entity> {
    type Dao = EntityDao<blog_post::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &BLOG_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<blog_post::Column>] {
        BLOG_FILTERS
    }

    fn search_columns(&self) -> &'static [blog_post::Column] {
        BLOG_SEARCH
    }

    fn unique_fields(&self) -> &'static [UniqueField<blog_post::Column>] {
        BLOG_UNIQUE
    }

    fn list_order(&self) -> Option<(blog_post::Column, Order)> {
        Some((blog_post::Column::SortOrder, Order::Asc))
    }

    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "Blog post not found",
            ..CrudErrors::default()
        }
    }
}

static TRANSLATION_SCHEMA: EntitySchema = EntitySchema {
    entity: "translation",
    fields: &[
        FieldRule::required("key", FieldKind::TranslationKey),
        FieldRule::required("value_en", LONG),
        FieldRule::required("value_ar", LONG),
        FieldRule::required("category", SHORT),
    ],
};

static TRANSLATION_FILTERS: &[FilterSpec<translation::Column>] = &[FilterSpec {
    key: "category",
    column: translation::Column::Category,
    parse: parse_text,
}];

static TRANSLATION_SEARCH: &[translation::Column] = &[
    translation::Column::Key,
    translation::Column::ValueEn,
    translation::Column::ValueAr,
];

static TRANSLATION_UNIQUE: &[UniqueField<translation::Column>] = &[UniqueField {
    field: "key",
    column: translation::Column::Key,
    message: "A translation with this key already exists",
}];

impl CrudService for EntityService<translation::Entity> {
    type Dao = EntityDao<translation::Entity>;

    fn dao(&self) -> &Self::Dao {
        self.entity_dao()
    }

    fn schema(&self) -> &'static EntitySchema {
        &TRANSLATION_SCHEMA
    }

    fn filters(&self) -> &'static [FilterSpec<translation::Column>] {
        TRANSLATION_FILTERS
    }

    fn search_columns(&self) -> &'static [translation::Column] {
        TRANSLATION_SEARCH
    }

    fn unique_fields(&self) -> &'static [UniqueField<translation::Column>] {
        TRANSLATION_UNIQUE
    }

    fn list_order(&self) -> Option<(translation::Column, Order)> {
        Some((translation::Column::Key, Order::Asc))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use serde_json::json;
    use uuid::Uuid;

    use chrono::{FixedOffset, TimeZone};

    use super::{ProjectService, ServiceOfferingService, TestimonialService};
    use crate::auth::CurrentUser;
    use crate::db::dao::DaoContext;
    use crate::db::entities::service;
    use crate::error::AppError;
    use crate::services::crud_service::{CrudService, ListParams};

    fn actor() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            session_token: "tok".to_string(),
        }
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(count)))])
    }

    fn project_payload() -> serde_json::Value {
        json!({
            "slug": "marble-island",
            "title_en": "Marble Island",
            "title_ar": "جزيرة رخامية",
            "description_en": "Calacatta island with walnut base",
            "description_ar": "جزيرة من رخام كالاكاتا",
            "category": "residential",
            "image_url": "/uploads/projects/marble.jpg"
        })
    }

    #[tokio::test]
    async fn project_without_arabic_title_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = ProjectService::new(&DaoContext::new(&db));
        let mut payload = project_payload();
        payload["title_ar"] = json!("");

        let err = service
            .create_from_json(&actor(), payload)
            .await
            .expect_err("empty arabic title should fail");
        assert_eq!(err.message(), "title_ar must not be empty");
    }

    #[tokio::test]
    async fn project_slug_taken_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(1)]])
            .into_connection();
        let service = ProjectService::new(&DaoContext::new(&db));

        let err = service
            .create_from_json(&actor(), project_payload())
            .await
            .expect_err("taken slug should conflict");
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.message(), "A project with this slug already exists");
    }

    #[tokio::test]
    async fn testimonial_rating_is_bounded() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = TestimonialService::new(&DaoContext::new(&db));

        let err = service
            .update_from_json(&actor(), Uuid::new_v4(), json!({ "rating": 6 }))
            .await
            .expect_err("rating 6 should fail");
        assert_eq!(err.message(), "rating must be between 1 and 5");
    }

    fn service_row(slug: &str, published: bool) -> service::Model {
        let ts = FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid");
        service::Model {
            id: Uuid::new_v4(),
            created_at: ts,
            updated_at: ts,
            sort_order: 10,
            published,
            slug: slug.to_string(),
            title_en: "Cabinetry".to_string(),
            title_ar: "الخزائن".to_string(),
            description_en: "Made to measure".to_string(),
            description_ar: "حسب المقاس".to_string(),
            icon: "ruler".to_string(),
        }
    }

    #[tokio::test]
    async fn admin_list_includes_unpublished_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                service_row("cabinetry", true),
                service_row("lighting", false),
            ]])
            .into_connection();
        let service = ServiceOfferingService::new(&DaoContext::new(&db));

        let page = service
            .list(ListParams::from_query(Default::default()).expect("empty query parses"))
            .await
            .expect("list should succeed");
        assert_eq!(page.data.len(), 2);
        assert!(page.data.iter().any(|row| !row.published));

        let sql = format!("{:?}", db.into_transaction_log());
        assert!(!sql.contains(r#""published" = "#), "{sql}");
    }
}
