use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagechunk_core::{ErrorKind, ScrapeError};
use serde_json::json;

/// A failed request, rendered as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    Scrape(ScrapeError),
    /// The query string could not be decoded at all.
    Query(QueryRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Scrape(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::RobotsBlocked => StatusCode::FORBIDDEN,
                ErrorKind::Extraction => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Fetch | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Query(rejection) => rejection.status(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Scrape(ScrapeError::InvalidUrl(_)) => "Invalid URL".to_string(),
            ApiError::Scrape(other) => other.to_string(),
            ApiError::Query(rejection) => rejection.body_text(),
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        ApiError::Scrape(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Query(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(error = %message, "request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
