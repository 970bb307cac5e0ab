//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for observation create/update/delete.
///
/// `previous_value` is `None` on create, `new_value` is `None` on delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ObservationDetail {
    pub country_id: i64,
    pub year: i32,
    pub previous_value: Option<f64>,
    pub new_value: Option<f64>,
}
