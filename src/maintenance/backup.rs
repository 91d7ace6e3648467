use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sea_orm::Order;

use crate::db::dao::{DaoBase, DaoContext, RecordEntity};
use crate::db::entities::{
    blog_post, company_info, cta_section, customer, gallery_image, hero_section, interaction,
    lead, newsletter_subscriber, project, service, statistic, team_member, testimonial,
    translation, user,
};

const BACKUP_PAGE_SIZE: u64 = 100;

#[derive(Debug, Default)]
pub struct BackupReport {
    pub dir: PathBuf,
    pub tables: Vec<(String, usize)>,
}

impl BackupReport {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|(_, rows)| rows).sum()
    }
}

/// Writes every content table to `<out>/<table>.json`, oldest row first.
///
/// Sessions are not exported and user rows carry no password hash, so a
/// restored site needs its admin bootstrapped again.
pub async fn run_backup(daos: &DaoContext, out: &Path) -> Result<BackupReport> {
    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("creating backup directory {}", out.display()))?;

    let mut report = BackupReport {
        dir: out.to_path_buf(),
        tables: Vec::new(),
    };

    report.tables.push(dump_table::<user::Entity>(daos, out).await?);
    report.tables.push(dump_table::<customer::Entity>(daos, out).await?);
    report.tables.push(dump_table::<lead::Entity>(daos, out).await?);
    report.tables.push(dump_table::<interaction::Entity>(daos, out).await?);
    report.tables.push(dump_table::<service::Entity>(daos, out).await?);
    report.tables.push(dump_table::<project::Entity>(daos, out).await?);
    report.tables.push(dump_table::<gallery_image::Entity>(daos, out).await?);
    report.tables.push(dump_table::<testimonial::Entity>(daos, out).await?);
    report.tables.push(dump_table::<team_member::Entity>(daos, out).await?);
    report.tables.push(dump_table::<statistic::Entity>(daos, out).await?);
    report.tables.push(dump_table::<blog_post::Entity>(daos, out).await?);
    report.tables.push(dump_table::<newsletter_subscriber::Entity>(daos, out).await?);
    report.tables.push(dump_table::<translation::Entity>(daos, out).await?);
    report.tables.push(dump_table::<hero_section::Entity>(daos, out).await?);
    report.tables.push(dump_table::<cta_section::Entity>(daos, out).await?);
    report.tables.push(dump_table::<company_info::Entity>(daos, out).await?);

    tracing::info!(
        dir = %out.display(),
        tables = report.tables.len(),
        rows = report.total_rows(),
        "backup written"
    );
    Ok(report)
}

async fn dump_table<E: RecordEntity>(daos: &DaoContext, out: &Path) -> Result<(String, usize)> {
    let table = E::default().table_name().to_string();
    let mut pager = daos.entity::<E>().find_iter(
        Some(BACKUP_PAGE_SIZE),
        Some((E::created_at_column(), Order::Asc)),
        |select| select,
    );

    let mut rows = Vec::new();
    while let Some(page) = pager
        .next_page()
        .await
        .with_context(|| format!("reading {table}"))?
    {
        rows.extend(page.data);
    }

    let path = backup_path(out, &table);
    let body = serde_json::to_vec_pretty(&rows)?;
    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(table = %table, rows = rows.len(), "table exported");

    Ok((table, rows.len()))
}

fn backup_path(out: &Path, table: &str) -> PathBuf {
    out.join(format!("{table}.json"))
}
