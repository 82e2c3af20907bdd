//! Bulk loading of synthetic verdicts.
//!
//! The loader clears the verdict table, then writes the generated corpus in
//! fixed-size grouped writes with random verdicts. Batches are issued one at a
//! time; the first failure aborts the run and is returned to the caller.

use std::sync::Arc;

use rand::Rng;

use crate::Error;
use crate::corpus::{CorpusEntry, VARIANTS, generate_urls};
use crate::store::{UrlRecord, VerdictStore};

/// How many records to load and how to group them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPlan {
    /// Total records to write.
    pub count: u64,
    /// Records per grouped write.
    pub batch_size: usize,
    /// Log a progress line every this many records.
    pub progress_every: u64,
}

/// Summary of a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub records: u64,
    pub batches: u64,
}

/// Populates a verdict store from the synthetic corpus.
pub struct BulkLoader {
    store: Arc<dyn VerdictStore>,
    plan: LoadPlan,
}

impl BulkLoader {
    pub fn new(store: Arc<dyn VerdictStore>, plan: LoadPlan) -> Self {
        Self { store, plan }
    }

    pub fn plan(&self) -> LoadPlan {
        self.plan
    }

    /// Truncate the table and load `plan.count` records.
    ///
    /// # Errors
    ///
    /// Returns `Error::TruncateFailed` if the table cannot be cleared and
    /// `Error::BatchFailed` for the first grouped write that fails. Rows from
    /// earlier batches stay in the table; the caller is expected to rerun the
    /// whole load.
    pub async fn run<R: Rng>(&self, rng: &mut R) -> Result<LoadReport, Error> {
        self.store
            .truncate()
            .await
            .map_err(|e| Error::TruncateFailed(Box::new(e)))?;
        tracing::info!(count = self.plan.count, batch_size = self.plan.batch_size, "verdict table cleared, loading");

        let batch_size = self.plan.batch_size.max(VARIANTS.len()) as u64;
        let mut report = LoadReport { records: 0, batches: 0 };

        while report.records < self.plan.count {
            if report.records % self.plan.progress_every.max(1) == 0 {
                tracing::info!(loaded = report.records, "seeding progress");
            }

            let size = batch_size.min(self.plan.count - report.records) as usize;
            let records = self.build_batch(report.records, size, rng);
            if records.is_empty() {
                break;
            }

            self.load_batch(report.batches, &records).await?;
            report.records += records.len() as u64;
            report.batches += 1;
        }

        tracing::info!(records = report.records, batches = report.batches, "generated urls");
        Ok(report)
    }

    /// Build the records for the batch starting at record `offset`.
    ///
    /// Hostname seeds are `offset / 5` onward, so the generated keyspace does
    /// not depend on the batch size. The earlier seeder started each batch at
    /// seed `batch * batch_size` instead, leaving gaps between batches, so
    /// hostnames past the first batch differ from tables it produced.
    pub fn build_batch<R: Rng>(&self, offset: u64, size: usize, rng: &mut R) -> Vec<UrlRecord> {
        let start_at = offset / VARIANTS.len() as u64;
        generate_urls(start_at, size)
            .iter()
            .map(|entry: &CorpusEntry| UrlRecord::new(entry.canonical(), rng.gen_bool(0.5)))
            .collect()
    }

    /// Submit one grouped write.
    pub async fn load_batch(&self, batch: u64, records: &[UrlRecord]) -> Result<(), Error> {
        self.store.put_batch(records).await.map_err(|e| {
            tracing::error!(batch, error = %e, "batch write failed");
            Error::BatchFailed { batch, source: Box::new(e) }
        })
    }
}
