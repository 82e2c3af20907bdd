//! Database schema migrations.
//!
//! Uses a simple version table approach to track applied migrations.
//! Each migration is a SQL batch with a `{table}` placeholder, so several
//! verdict tables can live in one database file with independent versions.

use std::num::ParseIntError;

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Migration list: (version, SQL).
///
/// Migrations must be applied in order. The version number is an
/// incrementing integer used to track which migrations have been applied
/// to a given table. All migrations are idempotent using CREATE IF NOT EXISTS.
const MIGRATIONS: &[(&str, &str)] = &[("1", include_str!("../../migrations/001_urls.sql"))];

/// Run any pending migrations for `table`.
///
/// This creates the _migrations table if it doesn't exist, checks the
/// current version for the table, and applies any migrations that haven't
/// been run yet.
///
/// # Errors
///
/// Returns an error if a migration SQL fails to execute.
pub async fn run(conn: &Connection, table: &str) -> Result<(), Error> {
    let table = table.to_string();
    conn.call(move |conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                target TEXT NOT NULL,
                version INTEGER NOT NULL,
                applied_at TEXT NOT NULL,
                PRIMARY KEY (target, version)
            )",
            [],
        )
        .map_err(Error::from)?;

        let current: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM _migrations WHERE target = ?1",
                params![table],
                |row| row.get(0),
            )
            .map_err(Error::from)?;

        for (version, sql) in MIGRATIONS {
            let version_num: i64 = version
                .parse()
                .map_err(|e: ParseIntError| Error::MigrationFailed(e.to_string()))?;
            if version_num > current {
                conn.execute_batch(&sql.replace("{table}", &table))
                    .map_err(|e| Error::MigrationFailed(format!("{table} v{version_num}: {e}")))?;
                conn.execute(
                    "INSERT INTO _migrations (target, version, applied_at) VALUES (?1, ?2, ?3)",
                    params![table, version_num, chrono::Utc::now().to_rfc3339()],
                )
                .map_err(Error::from)?;
                tracing::info!(table = %table, version = version_num, "applied migration");
            }
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
