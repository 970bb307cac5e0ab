//! Feature 7: recent audit log entries.

use axum::extract::State;
use axum::response::Html;
use lx_db::repos::audit::AuditFilter;
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

pub async fn recent(State(state): State<AppState>) -> AppResult<Html<String>> {
    let entries = state
        .service
        .query_audit(&AuditFilter {
            limit: Some(state.config.general.audit_limit),
            ..Default::default()
        })
        .await?;
    Ok(Html(
        state.views.render("feature7", &json!({ "entries": entries }))?,
    ))
}
