//! Database error types for lx-db.

use lx_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The addressed row does not exist.
    #[error("{entity} {key} not found")]
    NotFound { entity: String, key: String },

    /// A row with the same natural key already exists.
    #[error("{entity} {key} already exists")]
    AlreadyExists { entity: String, key: String },

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Input rejected before it reached SQL.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: &str, key: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    /// Whether the error is caused by the caller's input rather than the store.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::AlreadyExists { .. } | Self::Core(_)
        )
    }
}
