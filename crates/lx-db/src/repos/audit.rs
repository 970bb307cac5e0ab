//! Audit log repository.
//!
//! Append-only entries recording every mutation, with dynamic filtering.

use lx_core::entities::AuditEntry;
use lx_core::enums::{AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::LxService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

/// Insert `entry` on `conn`. Mutations pass their open transaction here so the
/// audit row commits or rolls back with the change it describes.
pub(crate) async fn insert_audit(
    conn: &libsql::Connection,
    entry: &AuditEntry,
) -> Result<(), DatabaseError> {
    let detail = entry.detail.as_ref().map(std::string::ToString::to_string);
    conn.execute(
        "INSERT INTO AuditLogs (id, entity_type, entity_id, action, detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            entry.id.as_str(),
            entry.entity_type.as_str(),
            entry.entity_id.as_str(),
            entry.action.as_str(),
            detail.as_deref(),
            entry.created_at.to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

impl LxService {
    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, entity_type, entity_id, action, detail, created_at
             FROM AuditLogs {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next().await? {
            entries.push(AuditEntry {
                id: row.get::<String>(0)?,
                entity_type: parse_enum(&row.get::<String>(1)?)?,
                entity_id: row.get::<String>(2)?,
                action: parse_enum(&row.get::<String>(3)?)?,
                detail: parse_optional_json(get_opt_string(&row, 4)?.as_deref())?,
                created_at: parse_datetime(&row.get::<String>(5)?)?,
            });
        }

        Ok(entries)
    }
}
