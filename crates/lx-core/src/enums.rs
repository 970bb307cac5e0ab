//! Entity types, audit actions and trend labels for Lifex.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Kind of row an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Region,
    SubRegion,
    IntermediateRegion,
    Country,
    Year,
    Observation,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::SubRegion => "sub_region",
            Self::IntermediateRegion => "intermediate_region",
            Self::Country => "country",
            Self::Year => "year",
            Self::Observation => "observation",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// Direction of a fitted series.
///
/// The boundary is exact: only a slope of exactly zero is `Flat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Flat,
}

impl Trend {
    /// Classify a slope.
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Self::Improving
        } else if slope < 0.0 {
            Self::Declining
        } else {
            Self::Flat
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Flat => "flat",
        }
    }

    /// Human-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Declining => "Declining",
            Self::Flat => "Flat",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
