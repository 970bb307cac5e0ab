//! # lx-db
//!
//! libSQL database operations for the Lifex dataset.
//!
//! Handles all relational state: the UN M49 geography (regions, sub-regions,
//! intermediate regions, countries), years, life expectancy observations and
//! the audit log. Dashboard report queries live in [`repos::report`].
//!
//! Uses the `libsql` crate in local mode; `:memory:` databases back the tests.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod seed;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and a single connection. Migrations run on open.
pub struct LxDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LxDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let lx_db = Self { db, conn };
        lx_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(lx_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"aud-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> LxDb {
        LxDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "Regions",
            "SubRegions",
            "IntermediateRegions",
            "Countries",
            "Years",
            "Observations",
            "AuditLogs",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("aud").await.unwrap();
        assert!(id.starts_with("aud-"), "ID should start with 'aud-': {id}");
        assert_eq!(id.len(), 12, "ID should be 12 chars: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in lx_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn observation_unique_per_country_year() {
        let db = test_db().await;
        db.conn()
            .execute_batch(
                "INSERT INTO Countries (id, name) VALUES (1, 'Peru');
                 INSERT INTO Years (year) VALUES (2019);
                 INSERT INTO Observations (country_id, year, value) VALUES (1, 2019, 76.5);",
            )
            .await
            .unwrap();

        let result = db
            .conn()
            .execute(
                "INSERT INTO Observations (country_id, year, value) VALUES (1, 2019, 77.0)",
                (),
            )
            .await;
        assert!(result.is_err(), "duplicate (country, year) should be rejected");
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO Observations (country_id, year, value) VALUES (99, 2019, 70.0)",
                (),
            )
            .await;
        assert!(result.is_err(), "unknown country/year should be rejected");
    }

    #[tokio::test]
    async fn on_disk_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifex.db");
        let path = path.to_str().unwrap();

        {
            let db = LxDb::open_local(path).await.unwrap();
            db.conn()
                .execute("INSERT INTO Years (year) VALUES (2001)", ())
                .await
                .unwrap();
        }

        let db = LxDb::open_local(path).await.unwrap();
        let mut rows = db.conn().query("SELECT COUNT(*) FROM Years", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
