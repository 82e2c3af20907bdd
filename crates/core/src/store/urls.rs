//! Verdict row operations.
//!
//! Provides point reads, grouped upserts, and the full-table clear used
//! before a reseed.

use super::UrlRecord;
use super::connection::VerdictDb;
use crate::Error;
use crate::canon::UrlKey;
use chrono::{DateTime, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, types::Type};

impl VerdictDb {
    /// Get a verdict row by exact canonical key.
    ///
    /// Returns None if the key doesn't exist. A row whose `updated` column
    /// cannot be parsed is reported as a conversion error.
    pub async fn get_record(&self, key: &UrlKey) -> Result<Option<UrlRecord>, Error> {
        let sql = format!("SELECT hostname, rest, safe, updated FROM {} WHERE hostname = ?1 AND rest = ?2", self.table);
        let hostname = key.hostname.clone();
        let rest = key.rest.clone();
        self.conn
            .call(move |conn| -> Result<Option<UrlRecord>, Error> {
                let mut stmt = conn.prepare_cached(&sql)?;

                let result = stmt.query_row(params![hostname, rest], |row| {
                    let updated: String = row.get(3)?;
                    let updated = DateTime::parse_from_rfc3339(&updated)
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
                        .with_timezone(&Utc);
                    Ok(UrlRecord { hostname: row.get(0)?, rest: row.get(1)?, safe: row.get(2)?, updated })
                });

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a batch of verdict rows in one transaction.
    ///
    /// Uses UPSERT semantics keyed on `(hostname, rest)`: the last write for
    /// a key wins. Either every row lands or none does.
    pub async fn put_records(&self, records: &[UrlRecord]) -> Result<(), Error> {
        let sql = format!(
            "INSERT INTO {} (hostname, rest, safe, updated) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(hostname, rest) DO UPDATE SET
                safe = excluded.safe,
                updated = excluded.updated",
            self.table
        );
        let records = records.to_vec();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare_cached(&sql)?;
                    for record in &records {
                        stmt.execute(params![
                            &record.hostname,
                            &record.rest,
                            record.safe,
                            record.updated.to_rfc3339(),
                        ])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every verdict row.
    ///
    /// Returns the number of deleted rows.
    pub async fn clear(&self) -> Result<u64, Error> {
        let sql = format!("DELETE FROM {}", self.table);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute(&sql, [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Count verdict rows.
    pub async fn count(&self) -> Result<u64, Error> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::VerdictStore;

    fn record(hostname: &str, rest: &str, safe: bool) -> UrlRecord {
        UrlRecord::new(UrlKey::new(hostname, rest), safe)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        let rec = record("www.sitea.com", "path?", true);

        db.put_records(std::slice::from_ref(&rec)).await.unwrap();

        let got = db.get_record(&rec.key()).await.unwrap().unwrap();
        assert_eq!(got.hostname, "www.sitea.com");
        assert_eq!(got.rest, "path?");
        assert!(got.safe);
        assert_eq!(got.updated.timestamp(), rec.updated.timestamp());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        let result = db.get_record(&UrlKey::new("nosuch.com", "path?")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        db.put_records(&[record("h.com", "?", true)]).await.unwrap();
        db.put_records(&[record("h.com", "?", false)]).await.unwrap();

        let got = db.get_record(&UrlKey::new("h.com", "?")).await.unwrap().unwrap();
        assert!(!got.safe);
        assert_eq!(db.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_key_is_exact_match() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        db.put_records(&[record("h.com", "path?", true)]).await.unwrap();

        assert!(db.get_record(&UrlKey::new("h.com", "path")).await.unwrap().is_none());
        assert!(db.get_record(&UrlKey::new("H.com", "path?")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        db.put_records(&[record("a.com", "?", true), record("b.com", "x?", false)])
            .await
            .unwrap();
        assert_eq!(db.count().await.unwrap(), 2);

        let deleted = db.clear().await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_batch_is_atomic() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_bad BEFORE INSERT ON urls
                     WHEN NEW.hostname = 'bad.com'
                     BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
                )
            })
            .await
            .unwrap();

        let result = db
            .put_records(&[record("good.com", "?", true), record("bad.com", "?", true)])
            .await;
        assert!(result.is_err());
        assert_eq!(db.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_row_is_error() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        db.conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO urls (hostname, rest, safe, updated) VALUES ('m.com', '?', 1, 'not-a-date')",
                    [],
                )
            })
            .await
            .unwrap();

        let result = db.get_record(&UrlKey::new("m.com", "?")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_tables_are_isolated() {
        let urls = VerdictDb::open_in_memory("urls").await.unwrap();
        let bench = urls.with_table("urls_bench").await.unwrap();
        assert_eq!(bench.table(), "urls_bench");

        urls.put_batch(&[record("a.com", "?", true)]).await.unwrap();
        bench.put_batch(&[record("b.com", "?", false)]).await.unwrap();
        assert!(urls.get(&UrlKey::new("b.com", "?")).await.unwrap().is_none());
        assert!(bench.get(&UrlKey::new("a.com", "?")).await.unwrap().is_none());

        bench.truncate().await.unwrap();
        assert_eq!(bench.count().await.unwrap(), 0);
        assert!(urls.get(&UrlKey::new("a.com", "?")).await.unwrap().is_some());
        assert_eq!(urls.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_with_table_rejects_bad_name() {
        let db = VerdictDb::open_in_memory("urls").await.unwrap();
        assert!(matches!(db.with_table("urls bench").await, Err(Error::InvalidInput(_))));
    }
}
