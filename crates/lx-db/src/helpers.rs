//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed structs. These
//! helpers isolate the parsing logic, including the dual datetime format
//! (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all lx-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable INTEGER column.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_i64(row: &libsql::Row, idx: i32) -> Result<Option<i64>, DatabaseError> {
    Ok(row.get::<Option<i64>>(idx)?)
}

/// Read an INTEGER year column, rejecting values outside `i32`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the stored value does not fit.
pub fn get_year(row: &libsql::Row, idx: i32) -> Result<i32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    i32::try_from(raw).map_err(|_| DatabaseError::InvalidState(format!("year out of range: {raw}")))
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Escape `%`, `_` and `\` so a user keyword matches literally inside `LIKE ... ESCAPE '\'`.
#[must_use]
pub fn like_contains(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Map `EntityType` to the corresponding SQL table name.
///
/// Uses exhaustive match -- adding a new `EntityType` variant forces updating this.
#[must_use]
pub const fn entity_type_to_table(entity: &lx_core::enums::EntityType) -> &'static str {
    use lx_core::enums::EntityType;
    match entity {
        EntityType::Region => "Regions",
        EntityType::SubRegion => "SubRegions",
        EntityType::IntermediateRegion => "IntermediateRegions",
        EntityType::Country => "Countries",
        EntityType::Year => "Years",
        EntityType::Observation => "Observations",
    }
}
