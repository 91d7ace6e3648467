use sea_orm::{Order, QueryFilter};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::db::dao::{DaoBase, DaoContext, EntityDao};
use crate::db::entities::{blog_post, customer, lead, project};
use crate::error::AppError;
use crate::services::crud_service::free_text_condition;

pub const MIN_QUERY_LEN: usize = 2;
pub const PER_SOURCE_LIMIT: u64 = 10;
pub const MAX_RESULTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Project,
    Customer,
    Lead,
    BlogPost,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Project => "project",
            ResultKind::Customer => "customer",
            ResultKind::Lead => "lead",
            ResultKind::BlogPost => "blog_post",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// `<type>-<uuid>`, unique across sources.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub title: String,
    pub subtitle: String,
}

impl SearchResult {
    fn new(kind: ResultKind, id: uuid::Uuid, title: String, subtitle: String) -> Self {
        Self {
            id: format!("{}-{id}", kind.as_str()),
            kind,
            title,
            subtitle,
        }
    }
}

/// Admin quick-search over the tables an operator looks things up in.
#[derive(Clone)]
pub struct SearchService {
    projects: EntityDao<project::Entity>,
    customers: EntityDao<customer::Entity>,
    leads: EntityDao<lead::Entity>,
    posts: EntityDao<blog_post::Entity>,
}

impl SearchService {
    pub fn new(daos: &DaoContext) -> Self {
        Self {
            projects: daos.entity(),
            customers: daos.entity(),
            leads: daos.entity(),
            posts: daos.entity(),
        }
    }

    pub async fn search(&self, raw: &str) -> Result<Vec<SearchResult>, AppError> {
        let q = raw.trim();
        if q.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let (projects, customers, leads, posts) = tokio::try_join!(
            self.search_projects(q),
            self.search_customers(q),
            self.search_leads(q),
            self.search_posts(q),
        )?;

        let mut merged = Vec::with_capacity(projects.len() + customers.len() + leads.len() + posts.len());
        merged.extend(projects);
        merged.extend(customers);
        merged.extend(leads);
        merged.extend(posts);
        Ok(rank_results(merged, q))
    }

    async fn search_projects(&self, q: &str) -> Result<Vec<SearchResult>, AppError> {
        let condition = free_text_condition(
            &[project::Column::TitleEn, project::Column::TitleAr, project::Column::Slug],
            q,
        );
        let rows = self
            .projects
            .find_all(
                &[(project::Column::TitleEn, Order::Asc)],
                Some(PER_SOURCE_LIMIT),
                move |select| match condition {
                    Some(condition) => select.filter(condition),
                    None => select,
                },
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| SearchResult::new(ResultKind::Project, row.id, row.title_en, row.category))
            .collect())
    }

    async fn search_customers(&self, q: &str) -> Result<Vec<SearchResult>, AppError> {
        let condition = free_text_condition(
            &[customer::Column::Name, customer::Column::Email, customer::Column::Phone],
            q,
        );
        let rows = self
            .customers
            .find_all(
                &[(customer::Column::Name, Order::Asc)],
                Some(PER_SOURCE_LIMIT),
                move |select| match condition {
                    Some(condition) => select.filter(condition),
                    None => select,
                },
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| SearchResult::new(ResultKind::Customer, row.id, row.name, row.email))
            .collect())
    }

    async fn search_leads(&self, q: &str) -> Result<Vec<SearchResult>, AppError> {
        let condition = free_text_condition(
            &[lead::Column::Name, lead::Column::Email, lead::Column::Message],
            q,
        );
        let rows = self
            .leads
            .find_all(
                &[(lead::Column::CreatedAt, Order::Desc)],
                Some(PER_SOURCE_LIMIT),
                move |select| match condition {
                    Some(condition) => select.filter(condition),
                    None => select,
                },
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let subtitle = format!("{} · {}", row.email, row.status);
                SearchResult::new(ResultKind::Lead, row.id, row.name, subtitle)
            })
            .collect())
    }

    async fn search_posts(&self, q: &str) -> Result<Vec<SearchResult>, AppError> {
        let condition = free_text_condition(
            &[blog_post::Column::TitleEn, blog_post::Column::TitleAr, blog_post::Column::Slug],
            q,
        );
        let rows = self
            .posts
            .find_all(
                &[(blog_post::Column::TitleEn, Order::Asc)],
                Some(PER_SOURCE_LIMIT),
                move |select| match condition {
                    Some(condition) => select.filter(condition),
                    None => select,
                },
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| SearchResult::new(ResultKind::BlogPost, row.id, row.title_en, row.slug))
            .collect())
    }
}

/// 0 = exact title, 1 = title prefix, 2 = anything else.
fn match_tier(title: &str, q: &str) -> u8 {
    if title == q {
        0
    } else if title.starts_with(q) {
        1
    } else {
        2
    }
}

/// Alphabetical key: decomposed, accents dropped, lowercased, so `É` sorts with `E`.
fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase()
}

/// Stable: rows with equal tier and title keep their source order.
pub fn rank_results(mut results: Vec<SearchResult>, q: &str) -> Vec<SearchResult> {
    let q = q.trim().to_lowercase();
    results.sort_by_cached_key(|result| {
        let title = result.title.to_lowercase();
        (match_tier(&title, &q), collation_key(&result.title))
    });
    results.truncate(MAX_RESULTS);
    results
}
