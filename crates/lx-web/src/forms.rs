//! Query and form input parsing.
//!
//! Inputs arrive as optional strings so that an empty `<select>` reaches the
//! handler as "missing" instead of failing extraction.

use std::str::FromStr;

use crate::error::AppError;

/// Parse an optional field. Absent or blank input is `Ok(None)`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` when the value is present but does not parse.
pub fn optional<T: FromStr>(raw: Option<&str>, field: &str) -> Result<Option<T>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{field} must be a number, got '{text}'"))),
    }
}

/// Parse a finite floating-point field.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for unparsable, NaN or infinite input.
pub fn optional_finite(raw: Option<&str>, field: &str) -> Result<Option<f64>, AppError> {
    match optional::<f64>(raw, field)? {
        Some(value) if !value.is_finite() => Err(AppError::BadRequest(format!(
            "{field} must be a finite number"
        ))),
        other => Ok(other),
    }
}
