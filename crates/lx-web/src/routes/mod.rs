//! Dashboard routes.
//!
//! `/features/N` returns the form partial for feature N and
//! `/api/featureN/...` its result partial.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod audit;
pub mod observations;
pub mod pages;
pub mod predict;
pub mod reports;

/// Assemble the full dashboard router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(pages::health))
        .route("/features/1", get(reports::history_form))
        .route("/api/feature1/result", get(reports::history_result))
        .route("/features/2", get(reports::ranking_form))
        .route("/api/feature2/result", get(reports::ranking_result))
        .route("/features/3", get(reports::averages_form))
        .route("/api/feature3/result", get(reports::averages_result))
        .route("/features/4", get(reports::search_form))
        .route("/api/feature4/result", get(reports::search_result))
        .route("/features/5", get(observations::form))
        .route("/api/feature5/create", post(observations::create))
        .route("/api/feature5/update", post(observations::update))
        .route("/api/feature5/delete", post(observations::delete))
        .route("/features/6", get(predict::form))
        .route("/api/feature6/result", get(predict::result))
        .route("/features/7", get(audit::recent))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
