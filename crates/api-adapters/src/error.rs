//! Domain-to-HTTP error mapping. Callers get a status code and a single
//! `{"error": "..."}` body; no partial-success shapes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use domains::DomainError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::NotFound(..) => StatusCode::NOT_FOUND,
            DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DomainError::StoreUnavailable(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
