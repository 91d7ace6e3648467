use std::collections::HashMap;

use sea_orm::{ColumnTrait, Order, QueryFilter};

use crate::db::dao::{DaoBase, DaoContext, EntityDao, HasContentColumns, ModelOf, RecordEntity};
use crate::db::entities::{
    blog_post, company_info, cta_section, customer, gallery_image, hero_section, interaction,
    lead, newsletter_subscriber, project, service, statistic, team_member, testimonial,
    translation, user,
};
use crate::error::AppError;
use crate::services::section_service::SectionService;

const HOME_PROJECT_LIMIT: u64 = 6;
const HOME_TESTIMONIAL_LIMIT: u64 = 6;

#[derive(Debug, Clone)]
pub struct HomeContent {
    pub hero: Option<hero_section::Model>,
    pub services: Vec<service::Model>,
    pub projects: Vec<project::Model>,
    pub statistics: Vec<statistic::Model>,
    pub testimonials: Vec<testimonial::Model>,
    pub cta: Option<cta_section::Model>,
}

#[derive(Debug, Clone)]
pub struct AboutContent {
    pub company: company_info::Model,
    pub team: Vec<team_member::Model>,
    pub statistics: Vec<statistic::Model>,
}

/// Bilingual UI string table; a missing key renders as the key itself.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    entries: HashMap<String, (String, String)>,
}

impl Translations {
    pub fn from_rows(rows: Vec<translation::Model>) -> Self {
        Self {
            entries: rows
                .into_iter()
                .map(|row| (row.key, (row.value_en, row.value_ar)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str, arabic: bool) -> String {
        match self.entries.get(key) {
            Some((_, ar)) if arabic => ar.clone(),
            Some((en, _)) => en.clone(),
            None => key.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCount {
    pub entity: &'static str,
    pub count: u64,
}

/// Read-only queries behind the public pages and the admin dashboard.
/// Public reads never create rows and only ever see published content.
#[derive(Clone)]
pub struct SiteService {
    daos: DaoContext,
}

impl SiteService {
    pub fn new(daos: &DaoContext) -> Self {
        Self { daos: daos.clone() }
    }

    async fn published<E>(&self, limit: Option<u64>) -> Result<Vec<ModelOf<E>>, AppError>
    where
        E: RecordEntity + HasContentColumns,
    {
        let dao: EntityDao<E> = self.daos.entity();
        Ok(dao
            .find_all(&[(E::sort_order_column(), Order::Asc)], limit, |select| {
                select.filter(E::published_column().eq(true))
            })
            .await?)
    }

    pub async fn home(&self) -> Result<HomeContent, AppError> {
        let hero_sections = SectionService::<hero_section::Entity>::new(&self.daos);
        let cta_sections = SectionService::<cta_section::Entity>::new(&self.daos);
        let (hero, cta) = tokio::try_join!(hero_sections.current(), cta_sections.current())?;
        let (services, projects, statistics, testimonials) = tokio::try_join!(
            self.published::<service::Entity>(None),
            self.published::<project::Entity>(Some(HOME_PROJECT_LIMIT)),
            self.published::<statistic::Entity>(None),
            self.published::<testimonial::Entity>(Some(HOME_TESTIMONIAL_LIMIT)),
        )?;
        Ok(HomeContent {
            hero,
            services,
            projects,
            statistics,
            testimonials,
            cta,
        })
    }

    /// `None` when no company record exists yet.
    pub async fn about(&self) -> Result<Option<AboutContent>, AppError> {
        let Some(company) = SectionService::<company_info::Entity>::new(&self.daos)
            .current()
            .await?
        else {
            return Ok(None);
        };
        let (team, statistics) = tokio::try_join!(
            self.published::<team_member::Entity>(None),
            self.published::<statistic::Entity>(None),
        )?;
        Ok(Some(AboutContent {
            company,
            team,
            statistics,
        }))
    }

    pub async fn services(&self) -> Result<Vec<service::Model>, AppError> {
        self.published::<service::Entity>(None).await
    }

    pub async fn blog_posts(&self) -> Result<Vec<blog_post::Model>, AppError> {
        let dao: EntityDao<blog_post::Entity> = self.daos.entity();
        Ok(dao
            .find_all(
                &[
                    (blog_post::Column::PublishedAt, Order::Desc),
                    (blog_post::Column::CreatedAt, Order::Desc),
                ],
                None,
                |select| select.filter(blog_post::Column::Published.eq(true)),
            )
            .await?)
    }

    /// Unpublished and unknown slugs are indistinguishable.
    pub async fn blog_post(&self, slug: &str) -> Result<Option<blog_post::Model>, AppError> {
        let dao: EntityDao<blog_post::Entity> = self.daos.entity();
        let slug = slug.to_string();
        Ok(dao
            .find_one(move |select| {
                select
                    .filter(blog_post::Column::Slug.eq(slug))
                    .filter(blog_post::Column::Published.eq(true))
            })
            .await?)
    }

    pub async fn translations(&self) -> Result<Translations, AppError> {
        let dao: EntityDao<translation::Entity> = self.daos.entity();
        let rows = dao
            .find_all(&[(translation::Column::Key, Order::Asc)], None, |select| select)
            .await?;
        Ok(Translations::from_rows(rows))
    }

    pub async fn dashboard_counts(&self) -> Result<Vec<EntityCount>, AppError> {
        Ok(vec![
            self.count::<project::Entity>("projects").await?,
            self.count::<gallery_image::Entity>("gallery-images").await?,
            self.count::<testimonial::Entity>("testimonials").await?,
            self.count::<service::Entity>("services").await?,
            self.count::<team_member::Entity>("team-members").await?,
            self.count::<statistic::Entity>("statistics").await?,
            self.count::<blog_post::Entity>("blog-posts").await?,
            self.count::<translation::Entity>("translations").await?,
            self.count::<customer::Entity>("customers").await?,
            self.count::<lead::Entity>("leads").await?,
            self.count::<interaction::Entity>("interactions").await?,
            self.count::<newsletter_subscriber::Entity>("newsletter-subscribers").await?,
            self.count::<user::Entity>("users").await?,
        ])
    }

    async fn count<E: RecordEntity>(&self, entity: &'static str) -> Result<EntityCount, AppError> {
        let dao: EntityDao<E> = self.daos.entity();
        let count = dao.count(|select| select).await?;
        Ok(EntityCount { entity, count })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::{SiteService, Translations};
    use crate::db::dao::DaoContext;
    use crate::db::entities::{blog_post, company_info, service, translation};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn string_row(key: &str, en: &str, ar: &str) -> translation::Model {
        translation::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            key: key.to_string(),
            value_en: en.to_string(),
            value_ar: ar.to_string(),
            category: "nav".to_string(),
        }
    }

    #[test]
    fn translations_fall_back_to_the_key() {
        let strings = Translations::from_rows(vec![string_row("nav.home", "Home", "الرئيسية")]);

        assert_eq!(strings.get("nav.home", false), "Home");
        assert_eq!(strings.get("nav.home", true), "الرئيسية");
        assert_eq!(strings.get("nav.blog", true), "nav.blog");
    }

    #[tokio::test]
    async fn about_without_company_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<company_info::Model>::new()])
            .into_connection();
        let service = SiteService::new(&DaoContext::new(&db));

        let about = service.about().await.expect("query should succeed");
        assert!(about.is_none());
    }

    #[tokio::test]
    async fn unknown_blog_slug_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();
        let service = SiteService::new(&DaoContext::new(&db));

        let post = service.blog_post("draft-post").await.expect("query should succeed");
        assert!(post.is_none());
    }

    fn service_row(slug: &str) -> service::Model {
        service::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            sort_order: 10,
            published: true,
            slug: slug.to_string(),
            title_en: "Kitchen design".to_string(),
            title_ar: "تصميم المطابخ".to_string(),
            description_en: "Layouts".to_string(),
            description_ar: "مخططات".to_string(),
            icon: "compass".to_string(),
        }
    }

    #[tokio::test]
    async fn public_reads_only_ask_for_published_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![service_row("kitchen-design")]])
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();
        let site = SiteService::new(&DaoContext::new(&db));

        site.services().await.expect("services query should succeed");
        site.blog_post("spring-trends").await.expect("post query should succeed");

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        for statement in &log {
            let sql = format!("{statement:?}");
            assert!(sql.contains(r#""published" = $1"#), "{sql}");
            assert!(sql.contains("Bool(Some(true))"), "{sql}");
        }
    }

    #[tokio::test]
    async fn home_reads_sections_without_creating_them() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results((0..6).map(|_| Vec::<service::Model>::new()))
            .into_connection();
        let site = SiteService::new(&DaoContext::new(&db));

        let home = site.home().await.expect("home queries should succeed");
        assert!(home.hero.is_none());
        assert!(home.cta.is_none());
        assert!(home.services.is_empty());

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 6);
        assert!(!format!("{log:?}").contains("INSERT"));
    }

    #[tokio::test]
    async fn dashboard_counts_every_managed_table() {
        let counts = (1..=13).map(|count| {
            vec![std::collections::BTreeMap::from([(
                "num_items",
                sea_orm::Value::BigInt(Some(count)),
            )])]
        });
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(counts)
            .into_connection();
        let site = SiteService::new(&DaoContext::new(&db));

        let counts = site.dashboard_counts().await.expect("counts should load");
        assert_eq!(counts.len(), 13);
        assert_eq!(counts[1].entity, "gallery-images");
        assert_eq!(counts[1].count, 2);
        assert_eq!(counts[12].entity, "users");
    }
}
