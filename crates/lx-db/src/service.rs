//! Service layer orchestrating database mutations with the audit log.
//!
//! `LxService` wraps `LxDb` (raw database access). All repo methods are
//! implemented as `impl LxService` blocks under [`crate::repos`].

use chrono::Utc;
use lx_core::entities::AuditEntry;
use lx_core::enums::{AuditAction, EntityType};
use lx_core::ids::PREFIX_AUDIT;
use tokio::sync::{Mutex, MutexGuard};

use crate::LxDb;
use crate::error::DatabaseError;
use crate::helpers::entity_type_to_table;

/// Orchestrates database mutations with audit logging.
///
/// Every mutation method follows this protocol:
/// 1. Take the write lock
/// 2. Begin transaction
/// 3. Execute SQL
/// 4. Append audit entry (inside transaction)
/// 5. Commit, or roll back on any error
///
/// The write lock keeps concurrent requests from interleaving statements on
/// the shared connection while a transaction is open.
///
/// Reads do not take the lock. They run on the same connection, so a read
/// issued while a mutation is in flight observes that mutation's uncommitted
/// rows, which disappear again if it rolls back. Report handlers tolerate
/// this; code that needs a value consistent with a write must read it inside
/// the mutation, as [`LxService::update_observation`] does for the previous
/// value.
pub struct LxService {
    db: LxDb,
    write_lock: Mutex<()>,
}

impl LxService {
    /// Create a new service over a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = LxDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `LxDb`.
    #[must_use]
    pub fn from_db(db: LxDb) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &LxDb {
        &self.db
    }

    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Open a transaction on the shared connection.
    pub(crate) async fn begin(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self.db.conn().transaction().await?)
    }

    /// Build an audit entry with a fresh ID and the current time.
    pub(crate) async fn new_audit_entry(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<AuditEntry, DatabaseError> {
        Ok(AuditEntry {
            id: self.db.generate_id(PREFIX_AUDIT).await?,
            entity_type,
            entity_id: entity_id.into(),
            action,
            detail,
            created_at: Utc::now(),
        })
    }

    /// Number of rows in the table backing `entity`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count(&self, entity: EntityType) -> Result<u64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", entity_type_to_table(&entity));
        let mut rows = self.db.conn().query(&sql, ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|_| DatabaseError::InvalidState(format!("negative count {count}")))
    }
}

/// Commit `tx` if `result` is `Ok`, otherwise roll it back and return the error.
pub(crate) async fn finish<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(%rollback, "rollback failed");
            }
            Err(error)
        }
    }
}
