use std::sync::Arc;

use askama::Template;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

use super::localized::{
    Card, Chrome, CompanyView, CtaView, HeroView, MemberView, PostView, QuoteView, StatView,
};
use crate::{error::AppError, locale::Locale, services::ServiceContext, state::AppState};

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    chrome: Chrome,
    hero: Option<HeroView>,
    services: Vec<Card>,
    projects: Vec<Card>,
    statistics: Vec<StatView>,
    testimonials: Vec<QuoteView>,
    cta: Option<CtaView>,
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {
    chrome: Chrome,
    company: CompanyView,
    team: Vec<MemberView>,
    statistics: Vec<StatView>,
}

#[derive(Template)]
#[template(path = "services.html")]
struct ServicesTemplate {
    chrome: Chrome,
    services: Vec<Card>,
}

#[derive(Template)]
#[template(path = "blog_index.html")]
struct BlogIndexTemplate {
    chrome: Chrome,
    posts: Vec<Card>,
}

#[derive(Template)]
#[template(path = "blog_post.html")]
struct BlogPostTemplate {
    chrome: Chrome,
    post: PostView,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    chrome: Chrome,
}

/// Why a public page could not be rendered.
pub enum PageError {
    /// Rendered as the localized 404 page.
    NotFound(Chrome),
    Failed,
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        tracing::error!(error = %err, "page data unavailable");
        PageError::Failed
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(chrome) => {
                let page = NotFoundTemplate {
                    chrome: chrome.titled("404"),
                };
                match page.render() {
                    Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
                    Err(err) => render_failure(err),
                }
            }
            PageError::Failed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong</h1>".to_string()),
            )
                .into_response(),
        }
    }
}

type PageResult = Result<Response, PageError>;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/{locale}", get(home))
        .route("/{locale}/about", get(about))
        .route("/{locale}/services", get(services))
        .route("/{locale}/blog", get(blog_index))
        .route("/{locale}/blog/{slug}", get(blog_post))
}

async fn root() -> Redirect {
    Redirect::temporary(&format!("/{}", Locale::DEFAULT.as_str()))
}

/// Resolves the locale segment and loads the UI strings. An unknown locale
/// becomes a 404 rendered in the default language.
async fn chrome_for(
    state: &AppState,
    segment: &str,
    path: &str,
) -> Result<(Locale, Chrome), PageError> {
    let locale = Locale::from_segment(segment);
    let strings = ServiceContext::from_state(state).site().translations().await?;
    let chrome = Chrome::new(
        locale.unwrap_or(Locale::DEFAULT),
        strings,
        &state.config.site.name,
        path,
    );
    match locale {
        Some(locale) => Ok((locale, chrome)),
        None => Err(PageError::NotFound(chrome)),
    }
}

fn render(page: impl Template) -> PageResult {
    page.render()
        .map(|html| Html(html).into_response())
        .map_err(|err| {
            tracing::error!(error = %err, "template render failed");
            PageError::Failed
        })
}

fn render_failure(err: askama::Error) -> Response {
    tracing::error!(error = %err, "template render failed");
    PageError::Failed.into_response()
}

pub async fn not_found_page(state: &AppState) -> Response {
    match chrome_for(state, Locale::DEFAULT.as_str(), "").await {
        Ok((_, chrome)) => PageError::NotFound(chrome).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn home(State(state): State<Arc<AppState>>, Path(segment): Path<String>) -> PageResult {
    let (locale, chrome) = chrome_for(&state, &segment, "").await?;
    let content = ServiceContext::from_state(&state).site().home().await?;

    render(HomeTemplate {
        chrome,
        hero: content.hero.as_ref().map(|row| HeroView::new(locale, row)),
        services: content.services.iter().map(|row| Card::service(locale, row)).collect(),
        projects: content.projects.iter().map(|row| Card::project(locale, row)).collect(),
        statistics: content.statistics.iter().map(|row| StatView::new(locale, row)).collect(),
        testimonials: content
            .testimonials
            .iter()
            .map(|row| QuoteView::new(locale, row))
            .collect(),
        cta: content.cta.as_ref().map(|row| CtaView::new(locale, row)),
    })
}

async fn about(State(state): State<Arc<AppState>>, Path(segment): Path<String>) -> PageResult {
    let (locale, chrome) = chrome_for(&state, &segment, "/about").await?;
    let Some(content) = ServiceContext::from_state(&state).site().about().await? else {
        return Err(PageError::NotFound(chrome));
    };

    let title = chrome.t("nav.about");
    render(AboutTemplate {
        chrome: chrome.titled(&title),
        company: CompanyView::new(locale, &content.company),
        team: content.team.iter().map(|row| MemberView::new(locale, row)).collect(),
        statistics: content.statistics.iter().map(|row| StatView::new(locale, row)).collect(),
    })
}

async fn services(State(state): State<Arc<AppState>>, Path(segment): Path<String>) -> PageResult {
    let (locale, chrome) = chrome_for(&state, &segment, "/services").await?;
    let rows = ServiceContext::from_state(&state).site().services().await?;

    let title = chrome.t("nav.services");
    render(ServicesTemplate {
        chrome: chrome.titled(&title),
        services: rows.iter().map(|row| Card::service(locale, row)).collect(),
    })
}

async fn blog_index(State(state): State<Arc<AppState>>, Path(segment): Path<String>) -> PageResult {
    let (locale, chrome) = chrome_for(&state, &segment, "/blog").await?;
    let rows = ServiceContext::from_state(&state).site().blog_posts().await?;

    let title = chrome.t("nav.blog");
    render(BlogIndexTemplate {
        chrome: chrome.titled(&title),
        posts: rows.iter().map(|row| Card::post(locale, row)).collect(),
    })
}

async fn blog_post(
    State(state): State<Arc<AppState>>,
    Path((segment, slug)): Path<(String, String)>,
) -> PageResult {
    let path = format!("/blog/{slug}");
    let (locale, chrome) = chrome_for(&state, &segment, &path).await?;
    let Some(row) = ServiceContext::from_state(&state).site().blog_post(&slug).await? else {
        return Err(PageError::NotFound(chrome));
    };

    let post = PostView::new(locale, &row);
    let title = post.title.clone();
    render(BlogPostTemplate {
        chrome: chrome.titled(&title),
        post,
    })
}
