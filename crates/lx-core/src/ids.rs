//! ID prefixes and composite keys.

/// Prefix for audit log IDs (`aud-a3f8b2c1`).
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_AUDIT];

/// Natural key of an observation as stored in `AuditLogs.entity_id`.
#[must_use]
pub fn observation_key(country_id: i64, year: i32) -> String {
    format!("{country_id}:{year}")
}
