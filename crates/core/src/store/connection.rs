//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying required pragmas
//! for performance and concurrency (WAL mode), and running migrations for the
//! configured verdict table.

use super::migrations;
use crate::Error;
use crate::config::is_valid_table_name;
use std::path::Path;
use std::sync::Arc;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Verdict database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Cloning shares the same connection.
#[derive(Clone, Debug)]
pub struct VerdictDb {
    pub(crate) conn: Connection,
    pub(crate) table: Arc<str>,
}

impl VerdictDb {
    /// Open a database at the specified path using `table` for verdicts.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, Error> {
        check_table(table)?;
        let path = path.as_ref();
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        tracing::debug!(path = %path.display(), table, "opened verdict database");
        Self::init(conn, table).await
    }

    /// Open an in-memory database for testing.
    ///
    /// Creates a temporary in-memory SQLite database with the same
    /// pragma configuration as file-based databases.
    pub async fn open_in_memory(table: &str) -> Result<Self, Error> {
        check_table(table)?;
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn, table).await
    }

    /// Name of the verdict table this handle reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Handle to another verdict table on the same connection.
    ///
    /// Runs that table's migrations first; rows are not shared between tables.
    pub async fn with_table(&self, table: &str) -> Result<Self, Error> {
        check_table(table)?;
        migrations::run(&self.conn, table).await?;
        Ok(Self { conn: self.conn.clone(), table: Arc::from(table) })
    }

    async fn init(conn: Connection, table: &str) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn, table).await?;

        Ok(Self { conn, table: Arc::from(table) })
    }
}

fn check_table(table: &str) -> Result<(), Error> {
    if is_valid_table_name(table) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("invalid table name: {table:?}")))
    }
}
