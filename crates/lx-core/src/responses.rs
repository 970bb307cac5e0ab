//! Report row types returned by the dashboard queries and the predictor.
//!
//! These are the data objects handed to the view layer. Rounding for display
//! happens in the views, never here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::trend::{FitResult, SeriesPoint};

/// One year of a country's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// A country's position within a sub-region for one year, lowest value first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RankedCountry {
    pub rank: u32,
    pub country_name: String,
    pub life_expectancy: f64,
}

/// Mean value of all countries in a sub-region for one year.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SubRegionAverage {
    pub sub_region_name: String,
    pub average_le: f64,
}

/// Most recent observation of a country matched by name search.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CountryLatest {
    pub country_name: String,
    pub year: i32,
    pub value: f64,
}

/// Successful prediction for one country, with the span of history it used.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PredictionReport {
    pub country_name: String,
    pub sample_size: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub fit: FitResult,
}

impl PredictionReport {
    /// Build a report from the series that produced `fit`.
    #[must_use]
    pub fn new(country_name: impl Into<String>, series: &[SeriesPoint], fit: FitResult) -> Self {
        let first_year = series.iter().map(|p| p.year).min().unwrap_or(fit.target_year);
        let last_year = series.iter().map(|p| p.year).max().unwrap_or(fit.target_year);
        Self {
            country_name: country_name.into(),
            sample_size: series.len(),
            first_year,
            last_year,
            fit,
        }
    }
}
