use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// An empty favorites list is not represented here: it is a valid input that
/// yields a popularity-only recommendation list.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Transport failure, timeout or non-2xx status from an upstream service
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered, but not with the JSON shape we expect
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a reqwest failure raised while talking to `upstream`
    ///
    /// The request URL is stripped from the message; it may carry credentials
    /// in its query string.
    pub fn upstream(upstream: &str, err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            AppError::MalformedResponse(format!("{}: {}", upstream, err))
        } else {
            AppError::UpstreamUnavailable(format!("{}: {}", upstream, err))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UpstreamUnavailable(_)
            | AppError::MalformedResponse(_)
            | AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
