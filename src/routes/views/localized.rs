//! Locale-resolved projections of content rows, ready for the page templates.

use crate::{
    db::entities::{
        blog_post, company_info, cta_section, hero_section, project, service, statistic,
        team_member, testimonial,
    },
    locale::Locale,
    services::site_service::Translations,
};

const MAX_RATING: i32 = 5;

/// Layout data shared by every public page.
pub struct Chrome {
    pub locale: &'static str,
    pub dir: &'static str,
    pub alternate: &'static str,
    pub site_name: String,
    pub title: String,
    /// Path below the locale segment, used by the language switcher.
    pub path: String,
    strings: Translations,
    arabic: bool,
}

impl Chrome {
    pub fn new(locale: Locale, strings: Translations, site_name: &str, path: &str) -> Self {
        Self {
            locale: locale.as_str(),
            dir: locale.dir(),
            alternate: locale.alternate().as_str(),
            site_name: site_name.to_string(),
            title: site_name.to_string(),
            path: path.to_string(),
            strings,
            arabic: locale.is_arabic(),
        }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = format!("{title} | {}", self.site_name);
        self
    }

    /// UI string for `key`; the key itself when no translation exists.
    pub fn t(&self, key: &str) -> String {
        self.strings.get(key, self.arabic)
    }
}

pub struct HeroView {
    pub title: String,
    pub subtitle: String,
    pub cta_label: String,
    pub cta_url: String,
    pub image_url: String,
}

impl HeroView {
    pub fn new(locale: Locale, row: &hero_section::Model) -> Self {
        Self {
            title: locale.pick(&row.title_en, &row.title_ar).to_string(),
            subtitle: locale.pick(&row.subtitle_en, &row.subtitle_ar).to_string(),
            cta_label: locale.pick(&row.cta_label_en, &row.cta_label_ar).to_string(),
            cta_url: localize_href(locale, &row.cta_url),
            image_url: row.background_image_url.clone(),
        }
    }
}

pub struct CtaView {
    pub title: String,
    pub body: String,
    pub button_label: String,
    pub button_url: String,
}

impl CtaView {
    pub fn new(locale: Locale, row: &cta_section::Model) -> Self {
        Self {
            title: locale.pick(&row.title_en, &row.title_ar).to_string(),
            body: locale.pick(&row.body_en, &row.body_ar).to_string(),
            button_label: locale.pick(&row.button_label_en, &row.button_label_ar).to_string(),
            button_url: localize_href(locale, &row.button_url),
        }
    }
}

/// Title/text/image tile used for services, projects and posts.
pub struct Card {
    pub title: String,
    pub text: String,
    pub image_url: String,
    pub tag: String,
    pub link: String,
}

impl Card {
    pub fn service(locale: Locale, row: &service::Model) -> Self {
        Self {
            title: locale.pick(&row.title_en, &row.title_ar).to_string(),
            text: locale.pick(&row.description_en, &row.description_ar).to_string(),
            image_url: String::new(),
            tag: row.icon.clone(),
            link: String::new(),
        }
    }

    pub fn project(locale: Locale, row: &project::Model) -> Self {
        Self {
            title: locale.pick(&row.title_en, &row.title_ar).to_string(),
            text: locale.pick(&row.description_en, &row.description_ar).to_string(),
            image_url: row.image_url.clone(),
            tag: row.location.clone().unwrap_or_else(|| row.category.clone()),
            link: String::new(),
        }
    }

    pub fn post(locale: Locale, row: &blog_post::Model) -> Self {
        Self {
            title: locale.pick(&row.title_en, &row.title_ar).to_string(),
            text: locale.pick(&row.excerpt_en, &row.excerpt_ar).to_string(),
            image_url: row.cover_image_url.clone(),
            tag: published_on(row),
            link: format!("/{}/blog/{}", locale.as_str(), row.slug),
        }
    }
}

pub struct StatView {
    pub value: i32,
    pub suffix: String,
    pub label: String,
}

impl StatView {
    pub fn new(locale: Locale, row: &statistic::Model) -> Self {
        Self {
            value: row.value,
            suffix: row.suffix.clone(),
            label: locale.pick(&row.label_en, &row.label_ar).to_string(),
        }
    }
}

pub struct QuoteView {
    pub quote: String,
    pub author: String,
    pub stars: String,
}

impl QuoteView {
    pub fn new(locale: Locale, row: &testimonial::Model) -> Self {
        let filled = row.rating.clamp(0, MAX_RATING) as usize;
        let empty = MAX_RATING as usize - filled;
        Self {
            quote: locale.pick(&row.quote_en, &row.quote_ar).to_string(),
            author: locale.pick(&row.author_en, &row.author_ar).to_string(),
            stars: format!("{}{}", "★".repeat(filled), "☆".repeat(empty)),
        }
    }
}

pub struct MemberView {
    pub name: String,
    pub role: String,
    pub photo_url: String,
}

impl MemberView {
    pub fn new(locale: Locale, row: &team_member::Model) -> Self {
        Self {
            name: locale.pick(&row.name_en, &row.name_ar).to_string(),
            role: locale.pick(&row.role_en, &row.role_ar).to_string(),
            photo_url: row.photo_url.clone(),
        }
    }
}

pub struct CompanyView {
    pub name: String,
    pub about: Vec<String>,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub founded_year: i32,
}

impl CompanyView {
    pub fn new(locale: Locale, row: &company_info::Model) -> Self {
        Self {
            name: locale.pick(&row.name_en, &row.name_ar).to_string(),
            about: paragraphs(locale.pick(&row.about_en, &row.about_ar)),
            address: locale.pick(&row.address_en, &row.address_ar).to_string(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            founded_year: row.founded_year,
        }
    }
}

pub struct PostView {
    pub title: String,
    pub published: String,
    pub cover_image_url: String,
    pub paragraphs: Vec<String>,
}

impl PostView {
    pub fn new(locale: Locale, row: &blog_post::Model) -> Self {
        Self {
            title: locale.pick(&row.title_en, &row.title_ar).to_string(),
            published: published_on(row),
            cover_image_url: row.cover_image_url.clone(),
            paragraphs: paragraphs(locale.pick(&row.body_en, &row.body_ar)),
        }
    }
}

fn published_on(row: &blog_post::Model) -> String {
    row.published_at
        .unwrap_or(row.created_at)
        .format("%Y-%m-%d")
        .to_string()
}

/// Splits stored text on blank lines.
pub fn paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(str::to_string)
        .collect()
}

/// Site-relative links gain the locale prefix; absolute and anchor links are kept.
pub fn localize_href(locale: Locale, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return format!("/{}", locale.as_str());
    }
    if href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
    {
        return href.to_string();
    }
    let path = href.trim_start_matches('/');
    let already_prefixed = ["en", "ar"]
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")));
    if already_prefixed {
        format!("/{path}")
    } else {
        format!("/{}/{path}", locale.as_str())
    }
}
