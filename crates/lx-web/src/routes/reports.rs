//! Read-only report features 1 to 4.

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::forms::optional;
use crate::state::AppState;
use crate::views::AlertLevel;

pub const MISSING_SUB_REGION_OR_YEAR: &str = "Please select both a Sub-Region and a Year.";
pub const MISSING_REGION_OR_YEAR: &str = "Please select both a Region and a Year.";
pub const EMPTY_SEARCH: &str = "Type above to begin searching...";

// ---------------------------------------------------------------------------
// Feature 1: country history
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    country_id: Option<String>,
}

pub async fn history_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let countries = state.service.list_countries().await?;
    Ok(Html(
        state
            .views
            .render("feature1_form", &json!({ "countries": countries }))?,
    ))
}

pub async fn history_result(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Html<String>> {
    let Some(country_id) = optional::<i64>(query.country_id.as_deref(), "country_id")? else {
        return Ok(Html(String::new()));
    };
    let observations = state.service.country_history(country_id).await?;
    Ok(Html(state.views.render(
        "feature1_result",
        &json!({ "observations": observations }),
    )?))
}

// ---------------------------------------------------------------------------
// Feature 2: sub-region ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    sub_region_id: Option<String>,
    year: Option<String>,
}

pub async fn ranking_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let sub_regions = state.service.list_sub_regions().await?;
    let years = state.service.list_years().await?;
    Ok(Html(state.views.render(
        "feature2_form",
        &json!({ "sub_regions": sub_regions, "years": years }),
    )?))
}

pub async fn ranking_result(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> AppResult<Html<String>> {
    let sub_region_id = optional::<i64>(query.sub_region_id.as_deref(), "sub_region_id")?;
    let year = optional::<i32>(query.year.as_deref(), "year")?;
    let (Some(sub_region_id), Some(year)) = (sub_region_id, year) else {
        return Ok(Html(
            state
                .views
                .alert(AlertLevel::Warning, MISSING_SUB_REGION_OR_YEAR)?,
        ));
    };

    let data = state.service.sub_region_ranking(sub_region_id, year).await?;
    Ok(Html(state.views.render(
        "feature2_result",
        &json!({ "data": data, "selected_year": year }),
    )?))
}

// ---------------------------------------------------------------------------
// Feature 3: region averages
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AveragesQuery {
    region_id: Option<String>,
    year: Option<String>,
}

pub async fn averages_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let regions = state.service.list_regions().await?;
    let years = state.service.list_years().await?;
    Ok(Html(state.views.render(
        "feature3_form",
        &json!({ "regions": regions, "years": years }),
    )?))
}

pub async fn averages_result(
    State(state): State<AppState>,
    Query(query): Query<AveragesQuery>,
) -> AppResult<Html<String>> {
    let region_id = optional::<i64>(query.region_id.as_deref(), "region_id")?;
    let year = optional::<i32>(query.year.as_deref(), "year")?;
    let (Some(region_id), Some(year)) = (region_id, year) else {
        return Ok(Html(
            state.views.alert(AlertLevel::Warning, MISSING_REGION_OR_YEAR)?,
        ));
    };

    let data = state.service.region_averages(region_id, year).await?;
    Ok(Html(state.views.render(
        "feature3_result",
        &json!({ "data": data, "selected_year": year }),
    )?))
}

// ---------------------------------------------------------------------------
// Feature 4: keyword search
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    keyword: Option<String>,
}

pub async fn search_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(state.views.render("feature4_form", &json!({}))?))
}

pub async fn search_result(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Html<String>> {
    let keyword = query.keyword.as_deref().unwrap_or_default();
    if keyword.is_empty() {
        return Ok(Html(state.views.muted(EMPTY_SEARCH)?));
    }

    let data = state.service.search_latest(keyword).await?;
    Ok(Html(state.views.render(
        "feature4_result",
        &json!({ "data": data, "keyword": keyword }),
    )?))
}
