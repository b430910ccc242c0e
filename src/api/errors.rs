use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Handler-boundary error for the JSON endpoints. Database errors are caught
/// here and turned into a 500 with the error text in the body; nothing
/// propagates past the handler.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No data found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "No data found".to_owned()),
            AppError::Internal(e) => {
                let message = format!("{e:#}");
                tracing::error!(error = %message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Error for the rendered chart page, which answers in plain text rather
/// than JSON.
#[derive(Debug)]
pub struct ChartError(pub anyhow::Error);

impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.0);
        tracing::error!(error = %message, "chart page failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {message}")).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for ChartError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}
