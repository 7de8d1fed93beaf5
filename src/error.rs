use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request body could not be read as a mood request
    #[error("Unreadable request body: {0}")]
    RequestBody(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    /// The model's text could not be turned into a recommendation set
    #[error("{0}")]
    MalformedResponse(String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),
}

impl AppError {
    /// Short summary used as the `error` field of JSON error bodies
    fn summary(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "Invalid request",
            AppError::HttpClient(_) | AppError::ExternalApi(_) | AppError::Timeout(_) => {
                "Failed to get response from AI"
            }
            AppError::MalformedResponse(_) => "Malformed response from AI",
            AppError::RequestBody(_) => "Failed to read request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::HttpClient(_) | AppError::ExternalApi(_) | AppError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::RequestBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed before streaming");
        }

        let body = Json(json!({
            "error": self.summary(),
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
