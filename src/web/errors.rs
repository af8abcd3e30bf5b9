use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Failures a handler cannot turn into a page of its own. API failures never
/// land here; the screens turn them into banners.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("template error: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{self}");
        let status = match self {
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, "internal error").into_response()
    }
}
