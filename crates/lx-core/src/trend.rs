//! Linear trend predictor over a single country's observation series.
//!
//! Fits `value = slope * year + intercept` by ordinary least squares (closed
//! form) and extrapolates to a target year. The fit is a pure function of the
//! input points: the series is copied and sorted by year before summing, so any
//! permutation of the same points produces the same result.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::Trend;

/// One `(year, value)` point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

impl SeriesPoint {
    #[must_use]
    pub const fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

impl From<(i32, f64)> for SeriesPoint {
    fn from((year, value): (i32, f64)) -> Self {
        Self { year, value }
    }
}

/// Result of a successful fit. Values are unrounded; see [`FitResult::display_predicted`]
/// and [`FitResult::display_slope`] for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FitResult {
    pub slope: f64,
    pub intercept: f64,
    pub predicted_value: f64,
    pub target_year: i32,
    pub trend: Trend,
}

impl FitResult {
    /// Predicted value rounded to 2 decimals for display.
    #[must_use]
    pub fn display_predicted(&self) -> String {
        format!("{:.2}", self.predicted_value)
    }

    /// Slope rounded to 4 decimals for display.
    #[must_use]
    pub fn display_slope(&self) -> String {
        format!("{:.4}", self.slope)
    }

    /// Evaluate the fitted line at an arbitrary year.
    #[must_use]
    pub fn value_at(&self, year: i32) -> f64 {
        self.slope.mul_add(f64::from(year), self.intercept)
    }
}

/// Reasons a series cannot be extrapolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PredictError {
    /// The target year (or a later one) has already been observed.
    #[error("Data for {observed_year} already exists, so a prediction for {target_year} is not applicable")]
    FutureDataExists { observed_year: i32, target_year: i32 },

    /// Fewer than two points; no line can be determined.
    #[error("At least 2 years of history are needed to predict a trend (found {found})")]
    InsufficientData { found: usize },

    /// Every point shares the same year, so the slope is undefined.
    #[error("Cannot fit a trend: all observations fall in the same year")]
    DegenerateSeries,
}

impl PredictError {
    /// Short machine-friendly kind, used by views to pick an alert style.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FutureDataExists { .. } => "future_data_exists",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::DegenerateSeries => "degenerate_series",
        }
    }
}

/// Deviation sums about the series mean.
#[derive(Debug, Default, Clone, Copy)]
struct Moments {
    xy: f64,
    xx: f64,
}

impl Moments {
    fn accumulate(self, (dx, dy): (f64, f64)) -> Self {
        Self {
            xy: dx.mul_add(dy, self.xy),
            xx: dx.mul_add(dx, self.xx),
        }
    }
}

/// Offset of `year` from `origin`. Exact for any pair of `i32` years.
fn offset(year: i32, origin: i32) -> f64 {
    f64::from(year) - f64::from(origin)
}

/// Fit a least-squares line through `series` and extrapolate to `target_year`.
///
/// Guards run before any arithmetic, in this order:
/// 1. any point with `year >= target_year` fails with [`PredictError::FutureDataExists`]
///    (the whole series is scanned; it need not be contiguous or sorted),
/// 2. fewer than two points fails with [`PredictError::InsufficientData`].
///
/// A series whose points all share one year fails with [`PredictError::DegenerateSeries`].
///
/// # Errors
///
/// Returns the first guard that rejects the series.
pub fn predict(series: &[SeriesPoint], target_year: i32) -> Result<FitResult, PredictError> {
    if let Some(latest) = series
        .iter()
        .filter(|p| p.year >= target_year)
        .max_by_key(|p| p.year)
    {
        return Err(PredictError::FutureDataExists {
            observed_year: latest.year,
            target_year,
        });
    }

    if series.len() < 2 {
        return Err(PredictError::InsufficientData {
            found: series.len(),
        });
    }

    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.year.cmp(&b.year).then(a.value.total_cmp(&b.value)));

    let (first, last) = (sorted[0].year, sorted[sorted.len() - 1].year);
    if first == last {
        return Err(PredictError::DegenerateSeries);
    }

    // Years are measured from `first` so large years do not cancel in the sums
    #[allow(clippy::cast_precision_loss)]
    let n = sorted.len() as f64;
    let mean_x = sorted.iter().map(|p| offset(p.year, first)).sum::<f64>() / n;
    let mean_y = sorted.iter().map(|p| p.value).sum::<f64>() / n;
    let moments = sorted
        .iter()
        .map(|p| (offset(p.year, first) - mean_x, p.value - mean_y))
        .fold(Moments::default(), Moments::accumulate);

    let slope = moments.xy / moments.xx;
    let origin_value = slope.mul_add(-mean_x, mean_y);
    let intercept = slope.mul_add(-f64::from(first), origin_value);
    let predicted_value = slope.mul_add(offset(target_year, first), origin_value);

    Ok(FitResult {
        slope,
        intercept,
        predicted_value,
        target_year,
        trend: Trend::from_slope(slope),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(raw: &[(i32, f64)]) -> Vec<SeriesPoint> {
        raw.iter().copied().map(SeriesPoint::from).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn three_point_rising_series() {
        let fit = predict(&points(&[(2018, 70.0), (2019, 71.0), (2020, 72.0)]), 2026).unwrap();
        assert!(close(fit.slope, 1.0), "slope {}", fit.slope);
        assert!(close(fit.intercept, -1948.0), "intercept {}", fit.intercept);
        assert!(close(fit.predicted_value, 78.0), "predicted {}", fit.predicted_value);
        assert_eq!(fit.trend, Trend::Improving);
        assert_eq!(fit.target_year, 2026);
    }

    #[test]
    fn descending_input_matches_sorted_input() {
        let unsorted = predict(&points(&[(2020, 80.0), (2019, 82.0)]), 2026).unwrap();
        let sorted = predict(&points(&[(2019, 82.0), (2020, 80.0)]), 2026).unwrap();
        assert_eq!(unsorted, sorted);
        assert!(close(unsorted.slope, -2.0));
        assert!(close(unsorted.predicted_value, 68.0));
        assert_eq!(unsorted.trend, Trend::Declining);
    }

    #[test]
    fn observed_target_year_is_rejected() {
        let err = predict(
            &points(&[(2010, 60.0), (2026, 75.0), (2015, 65.0), (2020, 70.0)]),
            2026,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PredictError::FutureDataExists {
                observed_year: 2026,
                target_year: 2026
            }
        );
    }

    #[test]
    fn future_guard_runs_before_length_guard() {
        let err = predict(&points(&[(2030, 80.0)]), 2026).unwrap_err();
        assert!(matches!(err, PredictError::FutureDataExists { observed_year: 2030, .. }));
    }

    #[test]
    fn empty_and_single_point_are_insufficient() {
        assert_eq!(
            predict(&[], 2026).unwrap_err(),
            PredictError::InsufficientData { found: 0 }
        );
        assert_eq!(
            predict(&points(&[(2020, 70.0)]), 2026).unwrap_err(),
            PredictError::InsufficientData { found: 1 }
        );
    }

    #[test]
    fn identical_years_are_degenerate() {
        let err = predict(&points(&[(2020, 70.0), (2020, 72.0)]), 2026).unwrap_err();
        assert_eq!(err, PredictError::DegenerateSeries);
    }

    #[test]
    fn many_points_in_one_large_year_are_degenerate() {
        for (year, count) in [(123_456_789, 3), (94_906_267, 5), (987_654_321, 7), (2_000_000_001, 3)] {
            let series: Vec<SeriesPoint> = (0..count)
                .map(|i| SeriesPoint::new(year, 70.0 + f64::from(i)))
                .collect();
            assert_eq!(
                predict(&series, year + 1).unwrap_err(),
                PredictError::DegenerateSeries,
                "{count} points in {year}"
            );
        }
    }

    #[test]
    fn two_adjacent_large_years_define_a_line() {
        let fit = predict(&points(&[(100_000_000, 70.0), (100_000_001, 71.0)]), 100_000_005).unwrap();
        assert!(close(fit.slope, 1.0), "slope {}", fit.slope);
        assert!(close(fit.predicted_value, 75.0), "predicted {}", fit.predicted_value);
        assert_eq!(fit.trend, Trend::Improving);
    }

    #[test]
    fn widest_year_span_fits_without_overflow() {
        let fit = predict(&points(&[(i32::MIN, 50.0), (0, 60.0)]), i32::MAX).unwrap();
        assert!(fit.slope > 0.0);
        assert!(close(fit.predicted_value, 70.0), "predicted {}", fit.predicted_value);
    }

    #[test]
    fn flat_series_has_zero_slope() {
        let fit = predict(&points(&[(2000, 65.5), (2005, 65.5), (2010, 65.5)]), 2020).unwrap();
        assert_eq!(fit.trend, Trend::Flat);
        assert!(close(fit.predicted_value, 65.5));
    }

    #[test]
    fn display_rounding_leaves_values_untouched() {
        let fit = predict(&points(&[(2000, 70.123_456), (2001, 70.456_789)]), 2002).unwrap();
        let slope_before = fit.slope;
        assert_eq!(fit.display_slope(), "0.3333");
        assert_eq!(fit.display_predicted(), "70.79");
        assert!(slope_before.to_bits() == fit.slope.to_bits());
    }

    #[test]
    fn error_messages_are_distinct() {
        let future = PredictError::FutureDataExists {
            observed_year: 2027,
            target_year: 2026,
        };
        let short = PredictError::InsufficientData { found: 1 };
        let degenerate = PredictError::DegenerateSeries;
        assert!(future.to_string().contains("already exists"));
        assert!(short.to_string().contains("At least 2 years"));
        assert!(degenerate.to_string().contains("Cannot fit"));
        assert_ne!(future.kind(), short.kind());
        assert_ne!(short.kind(), degenerate.kind());
    }
}
