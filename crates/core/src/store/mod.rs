//! SQLite-backed verdict store.
//!
//! This module provides the persistent `(hostname, rest) -> safe` table using
//! SQLite with async access via tokio-rusqlite. It supports:
//!
//! - Point reads by exact canonical key
//! - Grouped writes (one transaction per batch) with last-write-wins upserts
//! - Full-table clear for reseeding
//! - Automatic schema migrations, tracked per table

pub mod connection;
pub mod migrations;
pub mod urls;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::Error;
use crate::canon::UrlKey;

pub use connection::VerdictDb;

/// A persisted verdict row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub hostname: String,
    pub rest: String,
    pub safe: bool,
    pub updated: DateTime<Utc>,
}

impl UrlRecord {
    /// Build a record for `key` stamped with the current time.
    pub fn new(key: UrlKey, safe: bool) -> Self {
        Self { hostname: key.hostname, rest: key.rest, safe, updated: Utc::now() }
    }

    pub fn key(&self) -> UrlKey {
        UrlKey::new(self.hostname.clone(), self.rest.clone())
    }
}

/// Keyed verdict table used by the lookup service and the bulk loader.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait::async_trait]
pub trait VerdictStore: Send + Sync {
    /// Point read by exact canonical key. `Ok(None)` when the key is absent.
    async fn get(&self, key: &UrlKey) -> Result<Option<UrlRecord>, Error>;

    /// Insert or overwrite all `records` as a single grouped write.
    async fn put_batch(&self, records: &[UrlRecord]) -> Result<(), Error>;

    /// Remove every row in the table.
    async fn truncate(&self) -> Result<(), Error>;
}

#[async_trait::async_trait]
impl VerdictStore for VerdictDb {
    async fn get(&self, key: &UrlKey) -> Result<Option<UrlRecord>, Error> {
        self.get_record(key).await
    }

    async fn put_batch(&self, records: &[UrlRecord]) -> Result<(), Error> {
        self.put_records(records).await
    }

    async fn truncate(&self) -> Result<(), Error> {
        self.clear().await.map(|_| ())
    }
}
