//! Feature 5: create, update and delete observations.
//!
//! Rejections caused by the input (duplicate year, missing row, value out of
//! range) render as informational alerts with status 200.

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use lx_core::entities::Observation;
use lx_core::enums::AuditAction;
use lx_db::error::DatabaseError;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::forms::{optional, optional_finite};
use crate::state::AppState;
use crate::views::AlertLevel;

pub const MISSING_FIELDS: &str = "Please select a Country and a Year, and enter a value.";
pub const MISSING_KEY: &str = "Please select both a Country and a Year.";

#[derive(Debug, Default, Deserialize)]
pub struct ObservationForm {
    country_id: Option<String>,
    year: Option<String>,
    value: Option<String>,
}

struct ParsedForm {
    country_id: Option<i64>,
    year: Option<i32>,
    value: Option<f64>,
}

impl ObservationForm {
    fn parse(&self) -> Result<ParsedForm, AppError> {
        Ok(ParsedForm {
            country_id: optional(self.country_id.as_deref(), "country_id")?,
            year: optional(self.year.as_deref(), "year")?,
            value: optional_finite(self.value.as_deref(), "value")?,
        })
    }
}

#[derive(Serialize)]
struct MutationView {
    action: AuditAction,
    country_name: String,
    year: i32,
    previous: Option<String>,
    current: Option<String>,
}

pub async fn form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let countries = state.service.list_countries().await?;
    let years = state.service.list_years().await?;
    Ok(Html(state.views.render(
        "feature5_form",
        &json!({
            "actions": ["create", "update", "delete"],
            "countries": countries,
            "years": years,
        }),
    )?))
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ObservationForm>,
) -> AppResult<Html<String>> {
    let parsed = form.parse()?;
    let (Some(country_id), Some(year), Some(value)) = (parsed.country_id, parsed.year, parsed.value)
    else {
        return warn(&state, MISSING_FIELDS);
    };

    let result = state
        .service
        .create_observation(country_id, year, value)
        .await
        .map(|created| (None, created));
    render_mutation(&state, AuditAction::Created, result).await
}

pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<ObservationForm>,
) -> AppResult<Html<String>> {
    let parsed = form.parse()?;
    let (Some(country_id), Some(year), Some(value)) = (parsed.country_id, parsed.year, parsed.value)
    else {
        return warn(&state, MISSING_FIELDS);
    };

    let result = state
        .service
        .update_observation(country_id, year, value)
        .await
        .map(|update| (Some(update.previous_value), update.current));
    render_mutation(&state, AuditAction::Updated, result).await
}

pub async fn delete(
    State(state): State<AppState>,
    Form(form): Form<ObservationForm>,
) -> AppResult<Html<String>> {
    let parsed = form.parse()?;
    let (Some(country_id), Some(year)) = (parsed.country_id, parsed.year) else {
        return warn(&state, MISSING_KEY);
    };

    let result = state
        .service
        .delete_observation(country_id, year)
        .await
        .map(|removed| (Some(removed.value), removed));
    render_mutation(&state, AuditAction::Deleted, result).await
}

fn warn(state: &AppState, message: &str) -> AppResult<Html<String>> {
    Ok(Html(state.views.alert(AlertLevel::Warning, message)?))
}

/// Render the outcome of a mutation. `result` carries the value the row held
/// before the change, if any, alongside the affected observation.
async fn render_mutation(
    state: &AppState,
    action: AuditAction,
    result: Result<(Option<f64>, Observation), DatabaseError>,
) -> AppResult<Html<String>> {
    let (previous, observation) = match result {
        Ok(change) => change,
        Err(error) if error.is_user_error() => {
            tracing::debug!(%error, %action, "observation change rejected");
            return Ok(Html(state.views.alert(AlertLevel::Info, &error.to_string())?));
        }
        Err(error) => return Err(error.into()),
    };

    let country = state.service.get_country(observation.country_id).await?;
    let current = match action {
        AuditAction::Created | AuditAction::Updated => Some(observation.value),
        AuditAction::Deleted => None,
    };

    let view = MutationView {
        action,
        country_name: country.name,
        year: observation.year,
        previous: previous.map(|v| format!("{v:.2}")),
        current: current.map(|v| format!("{v:.2}")),
    };
    Ok(Html(state.views.render("feature5_result", &view)?))
}
