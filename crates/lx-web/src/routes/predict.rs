//! Feature 6: trend predictor.

use axum::extract::{Query, State};
use axum::response::Html;
use lx_core::entities::Country;
use lx_core::responses::PredictionReport;
use lx_core::trend::{PredictError, predict};
use lx_db::error::DatabaseError;
use lx_db::service::LxService;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::forms::optional;
use crate::state::AppState;
use crate::views::AlertLevel;

pub const MISSING_COUNTRY: &str = "Please select a Country.";

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    country_id: Option<String>,
    target_year: Option<String>,
}

/// Fetch `country`'s series and run the predictor on it.
///
/// The outer error is a storage failure; the inner one is the predictor
/// declining the series.
///
/// # Errors
///
/// Returns `DatabaseError` if the series cannot be read.
pub async fn prediction_for(
    service: &LxService,
    country: &Country,
    target_year: i32,
) -> Result<Result<PredictionReport, PredictError>, DatabaseError> {
    let series = service.prediction_series(country.id).await?;
    let outcome = predict(&series, target_year)
        .map(|fit| PredictionReport::new(country.name.clone(), &series, fit));
    if let Err(reason) = &outcome {
        tracing::debug!(country = %country.name, target_year, kind = reason.kind(), "prediction declined");
    }
    Ok(outcome)
}

#[derive(Serialize)]
struct PredictionView<'a> {
    country_name: &'a str,
    target_year: i32,
    predicted: String,
    slope: String,
    trend: &'static str,
    trend_label: &'static str,
    sample_size: usize,
    first_year: i32,
    last_year: i32,
}

impl<'a> From<&'a PredictionReport> for PredictionView<'a> {
    fn from(report: &'a PredictionReport) -> Self {
        Self {
            country_name: &report.country_name,
            target_year: report.fit.target_year,
            predicted: report.fit.display_predicted(),
            slope: report.fit.display_slope(),
            trend: report.fit.trend.as_str(),
            trend_label: report.fit.trend.label(),
            sample_size: report.sample_size,
            first_year: report.first_year,
            last_year: report.last_year,
        }
    }
}

pub async fn form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let countries = state.service.list_countries().await?;
    Ok(Html(state.views.render(
        "feature6_form",
        &json!({
            "countries": countries,
            "default_target_year": state.config.predictor.default_target_year,
        }),
    )?))
}

pub async fn result(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> AppResult<Html<String>> {
    let Some(country_id) = optional::<i64>(query.country_id.as_deref(), "country_id")? else {
        return Ok(Html(state.views.alert(AlertLevel::Warning, MISSING_COUNTRY)?));
    };
    let target_year = optional::<i32>(query.target_year.as_deref(), "target_year")?
        .unwrap_or(state.config.predictor.default_target_year);

    let country = match state.service.get_country(country_id).await {
        Ok(country) => country,
        Err(DatabaseError::NotFound { .. }) => {
            return Err(AppError::NotFound(format!("Country {country_id} not found")));
        }
        Err(error) => return Err(error.into()),
    };

    match prediction_for(&state.service, &country, target_year).await? {
        Ok(report) => Ok(Html(
            state
                .views
                .render("feature6_result", &PredictionView::from(&report))?,
        )),
        Err(reason) => Ok(Html(
            state.views.alert(AlertLevel::Info, &reason.to_string())?,
        )),
    }
}
