use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::trend::SeriesPoint;

/// Upper bound accepted for a life expectancy value, in years.
pub const MAX_LIFE_EXPECTANCY: f64 = 150.0;

/// Life expectancy at birth for one country in one year.
///
/// At most one observation exists per `(country_id, year)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Observation {
    pub id: i64,
    pub country_id: i64,
    pub year: i32,
    pub value: f64,
}

impl Observation {
    #[must_use]
    pub const fn point(&self) -> SeriesPoint {
        SeriesPoint::new(self.year, self.value)
    }

    /// Check a value before it is written.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for non-finite values or values outside
    /// `0..=MAX_LIFE_EXPECTANCY`.
    pub fn validate_value(value: f64) -> Result<(), CoreError> {
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "life expectancy must be a finite number, got {value}"
            )));
        }
        if !(0.0..=MAX_LIFE_EXPECTANCY).contains(&value) {
            return Err(CoreError::Validation(format!(
                "life expectancy must be between 0 and {MAX_LIFE_EXPECTANCY}, got {value}"
            )));
        }
        Ok(())
    }
}

/// An observation after an update, with the value it replaced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ObservationUpdate {
    pub previous_value: f64,
    pub current: Observation,
}
