//! Behavioral properties of the least-squares trend predictor.

use lx_core::enums::Trend;
use lx_core::trend::{FitResult, PredictError, SeriesPoint, predict};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn series(raw: &[(i32, f64)]) -> Vec<SeriesPoint> {
    raw.iter().copied().map(SeriesPoint::from).collect()
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    let tolerance = 1e-9 * actual.abs().max(expected.abs()).max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "{what}: expected {expected}, got {actual}"
    );
}

fn assert_same_fit(a: &FitResult, b: &FitResult) {
    assert_close(a.slope, b.slope, "slope");
    assert_close(a.intercept, b.intercept, "intercept");
    assert_close(a.predicted_value, b.predicted_value, "predicted");
    assert_eq!(a.trend, b.trend);
    assert_eq!(a.target_year, b.target_year);
}

/// Chile-like history with noise, non-contiguous years.
const HISTORY: &[(i32, f64)] = &[
    (1990, 73.6),
    (1995, 75.1),
    (1998, 75.9),
    (2000, 76.8),
    (2003, 77.4),
    (2008, 78.3),
    (2010, 78.9),
    (2015, 79.6),
    (2019, 80.7),
    (2021, 78.9),
];

#[test]
fn fit_satisfies_normal_equations() {
    let points = series(HISTORY);
    let fit = predict(&points, 2030).unwrap();

    #[allow(clippy::cast_precision_loss)]
    let mean_x = points.iter().map(|p| f64::from(p.year)).sum::<f64>() / points.len() as f64;

    let residuals: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.year), p.value - fit.value_at(p.year)))
        .collect();

    let sum_r: f64 = residuals.iter().map(|(_, r)| r).sum();
    let sum_xr: f64 = residuals.iter().map(|(x, r)| (x - mean_x) * r).sum();

    assert!(sum_r.abs() < 1e-6, "sum of residuals should vanish: {sum_r}");
    assert!(sum_xr.abs() < 1e-6, "residuals should be orthogonal to x: {sum_xr}");
}

#[test]
fn perturbing_the_line_increases_squared_error() {
    let points = series(HISTORY);
    let fit = predict(&points, 2030).unwrap();
    let sse = |slope: f64, intercept: f64| -> f64 {
        points
            .iter()
            .map(|p| {
                let r = p.value - slope.mul_add(f64::from(p.year), intercept);
                r * r
            })
            .sum()
    };
    let best = sse(fit.slope, fit.intercept);
    for (ds, di) in [(1e-3, 0.0), (-1e-3, 0.0), (0.0, 0.1), (0.0, -0.1), (1e-3, -2.0)] {
        assert!(sse(fit.slope + ds, fit.intercept + di) > best);
    }
}

#[rstest]
#[case::reversed(&[9, 8, 7, 6, 5, 4, 3, 2, 1, 0])]
#[case::interleaved(&[0, 9, 1, 8, 2, 7, 3, 6, 4, 5])]
#[case::rotated(&[3, 4, 5, 6, 7, 8, 9, 0, 1, 2])]
#[case::swapped_ends(&[9, 1, 2, 3, 4, 5, 6, 7, 8, 0])]
fn permutation_does_not_change_fit(#[case] order: &[usize]) {
    let baseline = predict(&series(HISTORY), 2030).unwrap();
    let permuted: Vec<SeriesPoint> = order.iter().map(|&i| SeriesPoint::from(HISTORY[i])).collect();
    let fit = predict(&permuted, 2030).unwrap();
    assert_same_fit(&fit, &baseline);
}

#[rstest]
#[case((2000, 60.0), (2010, 70.0))]
#[case((1961, 45.25), (2019, 81.5))]
#[case((2020, 80.0), (2019, 82.0))]
#[case((1999, 70.0), (2001, 70.0))]
fn two_points_define_the_line(#[case] a: (i32, f64), #[case] b: (i32, f64)) {
    let fit = predict(&series(&[a, b]), 2040).unwrap();
    let expected_slope = (b.1 - a.1) / f64::from(b.0 - a.0);
    assert_close(fit.slope, expected_slope, "slope");
    assert_close(fit.value_at(a.0), a.1, "line at first point");
    assert_close(fit.value_at(b.0), b.1, "line at second point");
}

#[rstest]
#[case::target_inside_history(2010)]
#[case::target_equals_latest(2021)]
#[case::target_before_history(1980)]
fn observed_years_block_prediction(#[case] target_year: i32) {
    let err = predict(&series(HISTORY), target_year).unwrap_err();
    assert!(
        matches!(err, PredictError::FutureDataExists { target_year: t, .. } if t == target_year),
        "unexpected error {err:?}"
    );
}

#[test]
fn future_point_anywhere_in_long_series_is_detected() {
    let mut raw: Vec<(i32, f64)> = (1960..2020).map(|y| (y, 50.0 + f64::from(y - 1960) * 0.3)).collect();
    raw.insert(17, (2026, 75.0));
    let err = predict(&series(&raw), 2026).unwrap_err();
    assert_eq!(
        err,
        PredictError::FutureDataExists {
            observed_year: 2026,
            target_year: 2026
        }
    );
}

#[rstest]
#[case::empty(&[])]
#[case::single(&[(2015, 71.2)])]
fn short_series_are_insufficient(#[case] raw: &[(i32, f64)]) {
    let err = predict(&series(raw), 2026).unwrap_err();
    assert_eq!(err, PredictError::InsufficientData { found: raw.len() });
}

#[test]
fn worked_examples() {
    let rising = predict(&series(&[(2018, 70.0), (2019, 71.0), (2020, 72.0)]), 2026).unwrap();
    assert_close(rising.slope, 1.0, "slope");
    assert_close(rising.intercept, -1948.0, "intercept");
    assert_close(rising.predicted_value, 78.0, "predicted");
    assert_eq!(rising.trend, Trend::Improving);

    let falling = predict(&series(&[(2020, 80.0), (2019, 82.0)]), 2026).unwrap();
    let sorted = predict(&series(&[(2019, 82.0), (2020, 80.0)]), 2026).unwrap();
    assert_eq!(falling, sorted);
    assert_close(falling.slope, -2.0, "slope");
    assert_close(falling.predicted_value, 68.0, "predicted");
    assert_eq!(falling.trend, Trend::Declining);
}
