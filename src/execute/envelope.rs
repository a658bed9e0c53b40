//! Response envelopes.
//!
//! The envelope is the only shape the rendering side depends on: body view,
//! response-headers view and sent-request view are all built from it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::execute::error::{ExecuteError, TransportError, TransportErrorKind, ValidationError};
use crate::execute::executor::TransportResponse;
use crate::execute::normalize::ResolvedRequest;
use crate::execute::spec::KeyValues;

/// Echo of what actually went out. The body is reduced to a type marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub sent_headers: KeyValues,
    pub sent_params: KeyValues,
    pub sent_cookies: KeyValues,
    pub sent_body: Option<String>,
}

impl RequestInfo {
    pub fn from_resolved(resolved: &ResolvedRequest) -> Self {
        Self {
            sent_headers: resolved.headers.clone(),
            sent_params: resolved.params.clone(),
            sent_cookies: resolved.cookies.clone(),
            sent_body: resolved.body.as_ref().map(|b| b.marker().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub status: u16,
    pub status_text: String,
    pub headers: IndexMap<String, String>,
    pub data: Value,
    /// Elapsed milliseconds.
    pub time: u64,
    /// Bytes in the JSON serialization of `data`.
    pub size: usize,
    pub request_info: RequestInfo,
}

/// Which side of the boundary the failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Validation,
    Timeout,
    Connect,
    Redirect,
    Request,
    Body,
    Other,
}

impl FailureKind {
    pub fn is_validation(&self) -> bool {
        matches!(self, FailureKind::Validation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Human-readable description of the failure.
    pub error: String,
    pub details: Option<Value>,
    pub kind: FailureKind,
}

/// Result of one execution: either what the target answered or why nothing came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success(SuccessEnvelope),
    Failure(ErrorEnvelope),
}

impl ResponseEnvelope {
    pub fn is_error(&self) -> bool {
        matches!(self, ResponseEnvelope::Failure(_))
    }

    pub fn as_success(&self) -> Option<&SuccessEnvelope> {
        match self {
            ResponseEnvelope::Success(s) => Some(s),
            ResponseEnvelope::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&ErrorEnvelope> {
        match self {
            ResponseEnvelope::Success(_) => None,
            ResponseEnvelope::Failure(f) => Some(f),
        }
    }
}

/// Package a completed exchange. Any status, including 4xx/5xx, lands here.
pub fn build_success(
    response: TransportResponse,
    resolved: &ResolvedRequest,
    elapsed_ms: u64,
) -> ResponseEnvelope {
    let size = serde_json::to_vec(&response.data)
        .map(|bytes| bytes.len())
        .unwrap_or_default();

    ResponseEnvelope::Success(SuccessEnvelope {
        status: response.status,
        status_text: response.status_text,
        headers: response.headers,
        data: response.data,
        time: elapsed_ms,
        size,
        request_info: RequestInfo::from_resolved(resolved),
    })
}

/// Package a transport failure.
pub fn build_error(error: TransportError) -> ResponseEnvelope {
    let kind = match error.kind {
        TransportErrorKind::Timeout => FailureKind::Timeout,
        TransportErrorKind::Connect => FailureKind::Connect,
        TransportErrorKind::Redirect => FailureKind::Redirect,
        TransportErrorKind::Request => FailureKind::Request,
        TransportErrorKind::Body => FailureKind::Body,
        TransportErrorKind::Other => FailureKind::Other,
    };
    ResponseEnvelope::Failure(ErrorEnvelope {
        error: error.message,
        details: error.details,
        kind,
    })
}

/// Package a request that was rejected before anything was sent.
pub fn build_validation_error(error: &ValidationError) -> ResponseEnvelope {
    ResponseEnvelope::Failure(ErrorEnvelope {
        error: error.to_string(),
        details: None,
        kind: FailureKind::Validation,
    })
}

impl From<ExecuteError> for ResponseEnvelope {
    fn from(err: ExecuteError) -> Self {
        match err {
            ExecuteError::Validation(e) => build_validation_error(&e),
            ExecuteError::Transport(e) => build_error(e),
        }
    }
}
