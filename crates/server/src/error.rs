use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const EXPECTED_JSON: &str = "expected application/json body";
pub const MISSING_URL: &str = "missing or invalid 'url' field";
pub const INVALID_SCHEME: &str = "invalid url scheme, must be http or https";

/// Errors a scrape request can end in.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself is unusable.
    BadRequest(&'static str),
    /// The page could not be retrieved.
    Scraper(String),
    /// The page was retrieved but could not be turned into a record.
    Conversion(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Scraper(_) | ApiError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn conversion(err: impl std::fmt::Display) -> Self {
        ApiError::Conversion(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(message) => json!({ "error": message }),
            ApiError::Scraper(details) => json!({ "error": "scraper failed", "details": details }),
            ApiError::Conversion(details) => json!({ "error": "dcat conversion failed", "details": details }),
        };
        (status, Json(body)).into_response()
    }
}
