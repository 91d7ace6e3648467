use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::db::dao::{ActiveModelOf, DaoBase, DaoContext, EntityDao, RecordEntity};
use crate::db::entities::{
    company_info, cta_section, hero_section, project, service, statistic, translation,
};
use crate::services::crud_service::apply_patch;
use crate::services::section_service::SingletonRecord;

use super::TableReport;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub translations: TableReport,
    pub sections: TableReport,
    pub services: TableReport,
    pub projects: TableReport,
    pub statistics: TableReport,
}

/// Fills an empty database with the content the public pages need.
///
/// Rows are matched by their natural key (translation key, slug), so a second
/// run only adds what is missing. With `force` the shipped values overwrite
/// whatever is stored, and the statistics table is rebuilt.
pub async fn run_seed(daos: &DaoContext, force: bool) -> Result<SeedReport> {
    let report = SeedReport {
        translations: seed_translations(daos, force).await?,
        sections: seed_sections(daos, force).await?,
        services: seed_services(daos, force).await?,
        projects: seed_projects(daos, force).await?,
        statistics: seed_statistics(daos, force).await?,
    };
    tracing::info!(?report, force, "seed finished");
    Ok(report)
}

struct TranslationSeed {
    key: &'static str,
    en: &'static str,
    ar: &'static str,
}

impl TranslationSeed {
    fn category(&self) -> &'static str {
        self.key.split('.').next().unwrap_or("general")
    }
}

const fn tr(key: &'static str, en: &'static str, ar: &'static str) -> TranslationSeed {
    TranslationSeed { key, en, ar }
}

const TRANSLATIONS: &[TranslationSeed] = &[
    tr("nav.home", "Home", "الرئيسية"),
    tr("nav.about", "About", "من نحن"),
    tr("nav.services", "Services", "خدماتنا"),
    tr("nav.blog", "Journal", "المدونة"),
    tr("nav.switch_language", "العربية", "English"),
    tr("footer.rights", "All rights reserved.", "جميع الحقوق محفوظة."),
    tr("home.services_title", "What we do", "ماذا نقدم"),
    tr("home.projects_title", "Selected projects", "مشاريع مختارة"),
    tr("home.testimonials_title", "What our clients say", "آراء عملائنا"),
    tr("about.founded", "Founded", "تأسست"),
    tr("about.team_title", "Our team", "فريقنا"),
    tr("services.empty", "Our services will be listed here soon.", "ستظهر خدماتنا هنا قريباً."),
    tr("blog.empty", "No articles yet.", "لا توجد مقالات بعد."),
    tr("blog.read_more", "Read more", "اقرأ المزيد"),
    tr("blog.back", "Back to the journal", "العودة إلى المدونة"),
    tr("not_found.title", "Page not found", "الصفحة غير موجودة"),
    tr(
        "not_found.body",
        "The page you are looking for has moved or never existed.",
        "الصفحة التي تبحث عنها نُقلت أو لم تكن موجودة.",
    ),
    tr("not_found.back", "Return home", "العودة للرئيسية"),
    tr("contact.title", "Get in touch", "تواصل معنا"),
    tr("contact.success", "Thank you, we will be in touch shortly.", "شكراً لك، سنتواصل معك قريباً."),
    tr("newsletter.title", "Stay inspired", "ابق على اطلاع"),
    tr("newsletter.success", "You are subscribed.", "تم الاشتراك بنجاح."),
];

async fn seed_translations(daos: &DaoContext, force: bool) -> Result<TableReport> {
    let dao = daos.entity::<translation::Entity>();
    let mut report = TableReport::default();

    for seed in TRANSLATIONS {
        let key = seed.key;
        let existing = dao
            .find_one(move |select| select.filter(translation::Column::Key.eq(key)))
            .await
            .with_context(|| format!("looking up translation {key}"))?;
        let sample = translation::ActiveModel {
            key: Set(seed.key.to_string()),
            value_en: Set(seed.en.to_string()),
            value_ar: Set(seed.ar.to_string()),
            category: Set(seed.category().to_string()),
            ..Default::default()
        };
        upsert(&dao, existing.map(|row| row.id), sample, force, &mut report).await?;
    }
    Ok(report)
}

async fn seed_sections(daos: &DaoContext, force: bool) -> Result<TableReport> {
    let mut report = TableReport::default();
    seed_singleton::<hero_section::Entity>(daos, force, &mut report).await?;
    seed_singleton::<cta_section::Entity>(daos, force, &mut report).await?;
    seed_singleton::<company_info::Entity>(daos, force, &mut report).await?;
    Ok(report)
}

async fn seed_singleton<E: SingletonRecord>(
    daos: &DaoContext,
    force: bool,
    report: &mut TableReport,
) -> Result<()> {
    let dao = daos.entity::<E>();
    let existing = dao.count(|select| select).await?;

    if existing > 0 && !force {
        report.skipped += 1;
        return Ok(());
    }
    if existing > 0 {
        // duplicates left by earlier manual edits go too
        E::delete_many().exec(daos.db()).await?;
        report.updated += 1;
    } else {
        report.inserted += 1;
    }
    dao.create(E::default_record())
        .await
        .with_context(|| format!("creating default {}", E::LABEL))?;
    Ok(())
}

struct ServiceSeed {
    slug: &'static str,
    icon: &'static str,
    title: (&'static str, &'static str),
    description: (&'static str, &'static str),
}

const SERVICES: &[ServiceSeed] = &[
    ServiceSeed {
        slug: "kitchen-design",
        icon: "compass",
        title: ("Kitchen design", "تصميم المطابخ"),
        description: (
            "Measured surveys, 3D visuals and a layout built around how you cook.",
            "قياسات دقيقة وتصاميم ثلاثية الأبعاد ومخطط يناسب طريقة طهيك.",
        ),
    },
    ServiceSeed {
        slug: "custom-cabinetry",
        icon: "cabinet",
        title: ("Custom cabinetry", "خزائن حسب الطلب"),
        description: (
            "Solid wood and lacquered cabinets made to measure in our workshop.",
            "خزائن من الخشب الطبيعي واللاكيه تُصنع حسب المقاس في ورشتنا.",
        ),
    },
    ServiceSeed {
        slug: "stone-worktops",
        icon: "layers",
        title: ("Stone worktops", "أسطح حجرية"),
        description: (
            "Marble, quartz and granite templated and fitted by our own masons.",
            "رخام وكوارتز وجرانيت يتم قياسها وتركيبها بأيدي حرفيينا.",
        ),
    },
    ServiceSeed {
        slug: "installation",
        icon: "tools",
        title: ("Installation", "التركيب"),
        description: (
            "A single team handles fitting, appliances and final handover.",
            "فريق واحد يتولى التركيب والأجهزة والتسليم النهائي.",
        ),
    },
];

async fn seed_services(daos: &DaoContext, force: bool) -> Result<TableReport> {
    let dao = daos.entity::<service::Entity>();
    let mut report = TableReport::default();

    for (position, seed) in SERVICES.iter().enumerate() {
        let slug = seed.slug;
        let existing = dao
            .find_one(move |select| select.filter(service::Column::Slug.eq(slug)))
            .await
            .with_context(|| format!("looking up service {slug}"))?;
        let sample = service::ActiveModel {
            slug: Set(seed.slug.to_string()),
            title_en: Set(seed.title.0.to_string()),
            title_ar: Set(seed.title.1.to_string()),
            description_en: Set(seed.description.0.to_string()),
            description_ar: Set(seed.description.1.to_string()),
            icon: Set(seed.icon.to_string()),
            sort_order: Set(sort_position(position)),
            published: Set(true),
            ..Default::default()
        };
        upsert(&dao, existing.map(|row| row.id), sample, force, &mut report).await?;
    }
    Ok(report)
}

struct ProjectSeed {
    slug: &'static str,
    category: &'static str,
    image_url: &'static str,
    location: &'static str,
    title: (&'static str, &'static str),
    description: (&'static str, &'static str),
}

const PROJECTS: &[ProjectSeed] = &[
    ProjectSeed {
        slug: "marble-island-villa",
        category: "modern",
        image_url: "/static/images/projects/marble-island.jpg",
        location: "Riyadh",
        title: ("Marble island villa", "فيلا الجزيرة الرخامية"),
        description: (
            "A handleless kitchen wrapped around a book-matched marble island.",
            "مطبخ بدون مقابض يلتف حول جزيرة رخامية متناظرة العروق.",
        ),
    },
    ProjectSeed {
        slug: "oak-family-kitchen",
        category: "classic",
        image_url: "/static/images/projects/oak-family.jpg",
        location: "Jeddah",
        title: ("Oak family kitchen", "مطبخ العائلة من خشب البلوط"),
        description: (
            "Framed oak cabinetry with a walk-in pantry and breakfast bar.",
            "خزائن بلوط بإطارات مع مخزن واسع وركن للإفطار.",
        ),
    },
    ProjectSeed {
        slug: "penthouse-galley",
        category: "minimal",
        image_url: "/static/images/projects/penthouse-galley.jpg",
        location: "Dubai",
        title: ("Penthouse galley", "مطبخ البنتهاوس"),
        description: (
            "A compact galley in smoked glass and brushed brass.",
            "مطبخ ممر مدمج من الزجاج المدخن والنحاس المصقول.",
        ),
    },
];

async fn seed_projects(daos: &DaoContext, force: bool) -> Result<TableReport> {
    let dao = daos.entity::<project::Entity>();
    let mut report = TableReport::default();

    for (position, seed) in PROJECTS.iter().enumerate() {
        let slug = seed.slug;
        let existing = dao
            .find_one(move |select| select.filter(project::Column::Slug.eq(slug)))
            .await
            .with_context(|| format!("looking up project {slug}"))?;
        let sample = project::ActiveModel {
            slug: Set(seed.slug.to_string()),
            title_en: Set(seed.title.0.to_string()),
            title_ar: Set(seed.title.1.to_string()),
            description_en: Set(seed.description.0.to_string()),
            description_ar: Set(seed.description.1.to_string()),
            category: Set(seed.category.to_string()),
            image_url: Set(seed.image_url.to_string()),
            location: Set(Some(seed.location.to_string())),
            sort_order: Set(sort_position(position)),
            published: Set(true),
            ..Default::default()
        };
        upsert(&dao, existing.map(|row| row.id), sample, force, &mut report).await?;
    }
    Ok(report)
}

const STATISTICS: &[(&str, &str, i32, &str)] = &[
    ("Kitchens delivered", "مطبخ منجز", 850, "+"),
    ("Years of craft", "سنة من الحرفية", 18, ""),
    ("Design awards", "جائزة تصميم", 12, ""),
    ("Client satisfaction", "رضا العملاء", 98, "%"),
];

/// Statistics have no natural key, so they are only written into an empty
/// table (or rebuilt under `force`).
async fn seed_statistics(daos: &DaoContext, force: bool) -> Result<TableReport> {
    let dao = daos.entity::<statistic::Entity>();
    let mut report = TableReport::default();

    let existing = dao.count(|select| select).await?;
    if existing > 0 {
        if !force {
            report.skipped = existing as usize;
            return Ok(report);
        }
        statistic::Entity::delete_many().exec(daos.db()).await?;
    }

    for (position, (label_en, label_ar, value, suffix)) in STATISTICS.iter().enumerate() {
        dao.create(statistic::ActiveModel {
            label_en: Set(label_en.to_string()),
            label_ar: Set(label_ar.to_string()),
            value: Set(*value),
            suffix: Set(suffix.to_string()),
            sort_order: Set(sort_position(position)),
            published: Set(true),
            ..Default::default()
        })
        .await?;
        report.inserted += 1;
    }
    Ok(report)
}

async fn upsert<E: RecordEntity>(
    dao: &EntityDao<E>,
    existing: Option<Uuid>,
    sample: ActiveModelOf<E>,
    force: bool,
    report: &mut TableReport,
) -> Result<()> {
    match existing {
        None => {
            dao.create(sample).await?;
            report.inserted += 1;
        }
        Some(id) if force => {
            dao.update(id, move |active| apply_patch::<E>(active, sample))
                .await?;
            report.updated += 1;
        }
        Some(_) => report.skipped += 1,
    }
    Ok(())
}

fn sort_position(index: usize) -> i32 {
    i32::try_from(index).map_or(i32::MAX, |index| (index + 1) * 10)
}
