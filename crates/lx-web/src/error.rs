//! Request-level errors and their HTML rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use lx_db::error::DatabaseError;
use thiserror::Error;

use crate::views::AlertLevel;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed form or query input.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("failed to render view: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(error) if error.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (level, message) = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            (AlertLevel::Danger, "Something went wrong while processing the request.".to_string())
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
            (AlertLevel::Warning, self.to_string())
        };

        // Rendered without the view registry so render failures still produce markup
        let body = format!(
            "<div class=\"alert alert-{}\">{}</div>",
            level.as_str(),
            handlebars::html_escape(&message)
        );
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
