//! Handlers for execute, health and history.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::execute::envelope::build_validation_error;
use crate::execute::{HttpMethod, OutboundRequestSpec, ResponseEnvelope, ValidationError};
use crate::http::server::AppState;
use crate::store::HistoryEntry;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: "Stormer API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/execute`. Always answers with an envelope; history is recorded on success.
pub async fn execute(
    State(state): State<AppState>,
    payload: Result<Json<OutboundRequestSpec>, JsonRejection>,
) -> ResponseEnvelope {
    let spec = match payload {
        Ok(Json(spec)) => spec,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Unreadable execute payload");
            return build_validation_error(&ValidationError::Malformed(rejection.body_text()));
        }
    };

    let method = spec.method.clone();
    let url = spec.url.clone();
    tracing::info!(method = %method, url = %url, "Execute request received");

    let runtime = state.runtime.load_full();
    let envelope = runtime.service.execute(spec).await;

    if let ResponseEnvelope::Success(success) = &envelope {
        // Parsing already succeeded inside the service for a success envelope.
        if let Ok(method) = method.parse::<HttpMethod>() {
            state
                .stores
                .history
                .record(HistoryEntry::from_envelope(method, url, success))
                .await;
        }
    }

    envelope
}

pub async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.stores.history.list().await)
}

pub async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.stores.history.clear().await;
    tracing::info!("History cleared");
    StatusCode::NO_CONTENT
}
