//! urlinfo seeder entry point.
//!
//! Clears the verdict table and repopulates it with the synthetic corpus.
//! Any store error aborts the run with a non-zero exit status.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use urlinfo_core::{AppConfig, BulkLoader, VerdictDb};

/// Reseed the URL verdict table with synthetic data.
#[derive(Debug, Parser)]
#[command(name = "urlinfo-seed", version, about)]
struct Args {
    /// SQLite database path (overrides URLINFO_DB_PATH).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Verdict table name (overrides URLINFO_TABLE).
    #[arg(long)]
    table: Option<String>,

    /// Number of records to generate (overrides URLINFO_SEED_COUNT).
    #[arg(long)]
    count: Option<u64>,

    /// Records per grouped write (overrides URLINFO_BATCH_SIZE).
    #[arg(long)]
    batch_size: Option<usize>,

    /// Seed the verdict RNG for a reproducible table.
    #[arg(long)]
    rng_seed: Option<u64>,
}

impl Args {
    /// Layer command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.db_path {
            config.db_path = Some(path.clone());
        }
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(count) = self.count {
            config.seed_count = count;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let mut config = AppConfig::extract()?;
    args.apply(&mut config);
    config.validate()?;

    let db_path = config.require_db_path()?;
    tracing::info!(db_path = %db_path.display(), table = %config.table, "attaching to verdict database");

    let db = VerdictDb::open(db_path, &config.table)
        .await
        .with_context(|| format!("opening verdict database {}", db_path.display()))?;

    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let loader = BulkLoader::new(Arc::new(db.clone()), config.load_plan());
    let report = loader.run(&mut rng).await.context("seeding verdict table")?;

    let rows = db.count().await?;
    tracing::info!(records = report.records, batches = report.batches, rows, "seed complete");

    Ok(())
}
