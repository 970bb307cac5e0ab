use axum::extract::State;
use axum::response::Html;
use lx_core::enums::EntityType;
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Serialize)]
struct FeatureLink {
    number: u8,
    label: &'static str,
}

static FEATURES: [FeatureLink; 7] = [
    FeatureLink { number: 1, label: "Country history" },
    FeatureLink { number: 2, label: "Sub-region ranking" },
    FeatureLink { number: 3, label: "Region averages" },
    FeatureLink { number: 4, label: "Country search" },
    FeatureLink { number: 5, label: "Manage observations" },
    FeatureLink { number: 6, label: "Trend predictor" },
    FeatureLink { number: 7, label: "Audit log" },
];

#[derive(Serialize)]
struct Stats {
    countries: u64,
    years: u64,
    observations: u64,
}

#[derive(Serialize)]
struct IndexView<'a> {
    title: &'a str,
    features: &'a [FeatureLink],
    stats: Stats,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let svc = &state.service;
    let view = IndexView {
        title: &state.config.general.title,
        features: &FEATURES,
        stats: Stats {
            countries: svc.count(EntityType::Country).await?,
            years: svc.count(EntityType::Year).await?,
            observations: svc.count(EntityType::Observation).await?,
        },
    };
    Ok(Html(state.views.render("index", &view)?))
}

pub async fn health() -> &'static str {
    "ok"
}
