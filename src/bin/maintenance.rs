use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kitchen_cms::{
    config::AppConfig,
    db::{connection, dao::DaoContext},
    logging::init_cli_tracing,
    maintenance::{run_backup, run_repair_images, run_seed},
};

#[derive(Parser)]
#[command(author, version, about = "Maintenance jobs for the kitchen site database")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert translations, default sections and sample content
    Seed {
        /// Overwrite rows that already exist with the shipped values
        #[arg(long)]
        force: bool,
    },
    /// Dump every table to <out>/<table>.json
    Backup {
        #[arg(long)]
        out: PathBuf,
    },
    /// Normalize stored image URLs
    RepairImages {
        /// Print the fixes without writing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_cli_tracing(cli.verbose);

    if let Err(err) = run(cli.command).await {
        tracing::error!("maintenance failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    let db_cfg = cfg
        .database
        .context("database.url is required (APP_DATABASE__URL)")?;

    // seeding may run against a fresh database, so it syncs the schema first
    let db = match command {
        Commands::Seed { .. } => connection::connect(&db_cfg).await?,
        _ => connection::open(&db_cfg).await?,
    };
    let daos = DaoContext::new(&db);

    match command {
        Commands::Seed { force } => {
            let report = run_seed(&daos, force).await?;
            println!("translations: {}", report.translations);
            println!("sections:     {}", report.sections);
            println!("services:     {}", report.services);
            println!("projects:     {}", report.projects);
            println!("statistics:   {}", report.statistics);
        }
        Commands::Backup { out } => {
            let report = run_backup(&daos, &out).await?;
            for (table, rows) in &report.tables {
                println!("{table:<24} {rows:>6}");
            }
            println!(
                "{} rows written to {}",
                report.total_rows(),
                report.dir.display()
            );
        }
        Commands::RepairImages { dry_run } => {
            let report = run_repair_images(&daos, dry_run).await?;
            for fix in &report.fixes {
                println!("{} {}: {} -> {}", fix.table, fix.id, fix.before, fix.after);
            }
            let verb = if dry_run { "would fix" } else { "fixed" };
            println!("{verb} {} of {} image urls", report.fixes.len(), report.scanned);
        }
    }
    Ok(())
}
