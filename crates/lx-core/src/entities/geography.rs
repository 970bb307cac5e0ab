use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Top-level UN M49 region (e.g. "Africa").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Region {
    pub id: i64,
    pub name: String,
}

/// Sub-region within a region (e.g. "Sub-Saharan Africa").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubRegion {
    pub id: i64,
    pub name: String,
    pub region_id: i64,
}

/// Optional third level below a sub-region (e.g. "Eastern Africa").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IntermediateRegion {
    pub id: i64,
    pub name: String,
    pub sub_region_id: i64,
}

/// A country. Aggregates such as "World" have no sub-region.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub alpha3: Option<String>,
    pub sub_region_id: Option<i64>,
    pub intermediate_region_id: Option<i64>,
}
