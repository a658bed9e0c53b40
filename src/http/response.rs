//! Mapping results onto HTTP responses.
//!
//! - Success envelopes → 200, whatever status the target returned
//! - Validation failures → 400
//! - Transport failures → 500
//! - Unknown resource ids → 404 `{ "error": "<Kind> not found" }`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::execute::ResponseEnvelope;

impl ResponseEnvelope {
    pub fn http_status(&self) -> StatusCode {
        match self {
            ResponseEnvelope::Success(_) => StatusCode::OK,
            ResponseEnvelope::Failure(f) if f.kind.is_validation() => StatusCode::BAD_REQUEST,
            ResponseEnvelope::Failure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}

/// Errors from the CRUD surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    NotFound(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(kind) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("{kind} not found") })),
            )
                .into_response(),
        }
    }
}
