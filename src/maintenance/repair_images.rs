use anyhow::{Context, Result};
use sea_orm::{Order, Set};
use uuid::Uuid;

use crate::db::dao::{ActiveModelOf, DaoBase, DaoContext, ModelOf, RecordEntity};
use crate::db::entities::{blog_post, gallery_image, hero_section, project, team_member};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFix {
    pub table: String,
    pub id: Uuid,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Default)]
pub struct RepairReport {
    pub scanned: usize,
    pub fixes: Vec<ImageFix>,
    pub dry_run: bool,
}

/// Canonical form of a stored image reference.
///
/// Absolute `http(s)` URLs keep their scheme and host; anything else is
/// treated as a site path and gets a single leading `/`. Backslashes become
/// `/` and runs of slashes collapse, leaving query strings and fragments as
/// they were.
pub fn normalize_image_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || has_scheme(trimmed, "data:") {
        return trimmed.to_string();
    }

    let unified = trimmed.replace('\\', "/");
    if has_scheme(&unified, "http://") || has_scheme(&unified, "https://") {
        if let Some((scheme, rest)) = unified.split_once("://") {
            let rest = rest.trim_start_matches('/');
            return format!("{scheme}://{}", collapse_path_slashes(rest));
        }
    }

    let relative = unified.trim_start_matches("./");
    let collapsed = collapse_path_slashes(relative);
    if collapsed.starts_with('/') {
        collapsed
    } else {
        format!("/{collapsed}")
    }
}

fn has_scheme(value: &str, scheme: &str) -> bool {
    value
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

fn collapse_path_slashes(value: &str) -> String {
    let split_at = value.find(['?', '#']).unwrap_or(value.len());
    let (path, tail) = value.split_at(split_at);

    let mut out = String::with_capacity(value.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        if ch == '/' && previous_slash {
            continue;
        }
        previous_slash = ch == '/';
        out.push(ch);
    }
    out.push_str(tail);
    out
}

/// One image column: how to read it off a row and how to write a fixed value back.
struct ImageColumn<E: RecordEntity> {
    read: fn(&ModelOf<E>) -> (Uuid, String),
    write: fn(&mut ActiveModelOf<E>, String),
}

/// Normalizes every stored image URL. With `dry_run` the fixes are only reported.
pub async fn run_repair_images(daos: &DaoContext, dry_run: bool) -> Result<RepairReport> {
    let mut report = RepairReport {
        dry_run,
        ..RepairReport::default()
    };

    repair_table(
        daos,
        ImageColumn::<project::Entity> {
            read: |row| (row.id, row.image_url.clone()),
            write: |active, value| active.image_url = Set(value),
        },
        &mut report,
    )
    .await?;
    repair_table(
        daos,
        ImageColumn::<gallery_image::Entity> {
            read: |row| (row.id, row.image_url.clone()),
            write: |active, value| active.image_url = Set(value),
        },
        &mut report,
    )
    .await?;
    repair_table(
        daos,
        ImageColumn::<team_member::Entity> {
            read: |row| (row.id, row.photo_url.clone()),
            write: |active, value| active.photo_url = Set(value),
        },
        &mut report,
    )
    .await?;
    repair_table(
        daos,
        ImageColumn::<blog_post::Entity> {
            read: |row| (row.id, row.cover_image_url.clone()),
            write: |active, value| active.cover_image_url = Set(value),
        },
        &mut report,
    )
    .await?;
    repair_table(
        daos,
        ImageColumn::<hero_section::Entity> {
            read: |row| (row.id, row.background_image_url.clone()),
            write: |active, value| active.background_image_url = Set(value),
        },
        &mut report,
    )
    .await?;

    tracing::info!(
        scanned = report.scanned,
        fixed = report.fixes.len(),
        dry_run,
        "image urls checked"
    );
    Ok(report)
}

async fn repair_table<E: RecordEntity>(
    daos: &DaoContext,
    column: ImageColumn<E>,
    report: &mut RepairReport,
) -> Result<()> {
    let table = E::default().table_name().to_string();
    let dao = daos.entity::<E>();

    // collect first so updates never shift the pages being read
    let mut fixes = Vec::new();
    let mut pager = dao.find_iter(None, Some((E::created_at_column(), Order::Asc)), |select| select);
    while let Some(page) = pager
        .next_page()
        .await
        .with_context(|| format!("reading {table}"))?
    {
        report.scanned += page.data.len();
        for row in &page.data {
            let (id, before) = (column.read)(row);
            let after = normalize_image_url(&before);
            if after != before {
                fixes.push(ImageFix {
                    table: table.clone(),
                    id,
                    before,
                    after,
                });
            }
        }
    }

    for fix in &fixes {
        tracing::info!(table = %fix.table, id = %fix.id, before = %fix.before, after = %fix.after, "image url");
        if report.dry_run {
            continue;
        }
        let write = column.write;
        let value = fix.after.clone();
        dao.update(fix.id, move |active| write(active, value))
            .await
            .with_context(|| format!("updating {} {}", fix.table, fix.id))?;
    }

    report.fixes.extend(fixes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    #[test]
    fn relative_paths_gain_a_single_leading_slash() {
        assert_eq!(normalize_image_url("images/a.jpg"), "/images/a.jpg");
        assert_eq!(normalize_image_url("  ./images/a.jpg "), "/images/a.jpg");
        assert_eq!(normalize_image_url("/static//images///a.jpg"), "/static/images/a.jpg");
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        assert_eq!(
            normalize_image_url(r"static\images\projects\oak.jpg"),
            "/static/images/projects/oak.jpg"
        );
        assert_eq!(normalize_image_url(r"\\static\\hero.jpg"), "/static/hero.jpg");
    }

    #[test]
    fn absolute_urls_keep_scheme_and_query() {
        assert_eq!(
            normalize_image_url("https://cdn.example.com//kitchens//a.jpg?w=800&src=//x"),
            "https://cdn.example.com/kitchens/a.jpg?w=800&src=//x"
        );
        assert_eq!(
            normalize_image_url("HTTP://cdn.example.com/a.jpg"),
            "HTTP://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn empty_and_data_urls_are_left_alone() {
        assert_eq!(normalize_image_url("   "), "");
        assert_eq!(normalize_image_url("data:image/png;base64,AAAA"), "data:image/png;base64,AAAA");
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        for raw in ["a//b.jpg", r"\x\y.png", "https://h//p.jpg", "/ok.jpg"] {
            let once = normalize_image_url(raw);
            assert_eq!(normalize_image_url(&once), once);
        }
    }

    fn team_member(photo_url: &str) -> team_member::Model {
        team_member::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            sort_order: 0,
            published: true,
            name_en: "Lina".to_string(),
            name_ar: "لينا".to_string(),
            role_en: "Designer".to_string(),
            role_ar: "مصممة".to_string(),
            photo_url: photo_url.to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn dry_run_reports_without_writing() {
        let broken = team_member(r"team\lina.jpg");
        let clean = team_member("/team/omar.jpg");
        // only the select runs; an update would exhaust the mock and fail
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![broken.clone(), clean]])
            .into_connection();
        let daos = DaoContext::new(&db);
        let mut report = RepairReport {
            dry_run: true,
            ..RepairReport::default()
        };

        repair_table(
            &daos,
            ImageColumn::<team_member::Entity> {
                read: |row| (row.id, row.photo_url.clone()),
                write: |active, value| active.photo_url = Set(value),
            },
            &mut report,
        )
        .await
        .expect("dry run should succeed");

        assert_eq!(report.scanned, 2);
        assert_eq!(
            report.fixes,
            vec![ImageFix {
                table: "team_members".to_string(),
                id: broken.id,
                before: r"team\lina.jpg".to_string(),
                after: "/team/lina.jpg".to_string(),
            }]
        );
    }
}
