//! Execution error types.

use serde::Serialize;
use thiserror::Error;

/// The caller described a request that cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported HTTP method: {0:?}")]
    InvalidMethod(String),

    #[error("Invalid header name: {0:?}")]
    InvalidHeaderName(String),

    #[error("Invalid value for header {0:?}")]
    InvalidHeaderValue(String),

    /// The request JSON itself could not be decoded.
    #[error("Malformed request: {0}")]
    Malformed(String),
}

/// Classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Redirect,
    /// The URL or request could not be built.
    Request,
    /// The response head arrived but the body could not be read.
    Body,
    Other,
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Redirect => "redirect",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        }
    }
}

/// The outbound call never produced a complete response.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    /// Whatever the far end sent before the failure, if anything.
    pub details: Option<serde_json::Value>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_builder() {
            TransportErrorKind::Request
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Other
        };
        TransportError::new(kind, error_chain(&err))
    }
}

/// reqwest's top-level message is terse ("error sending request"); append the causes.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Any failure on the execute path.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type ExecuteResult<T> = Result<T, ExecuteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::InvalidMethod("BREW".into());
        assert_eq!(err.to_string(), "Unsupported HTTP method: \"BREW\"");

        let err = TransportError::new(TransportErrorKind::Connect, "connection refused");
        assert_eq!(err.to_string(), "connection refused");

        let err = ExecuteError::from(ValidationError::InvalidHeaderName("a b".into()));
        assert!(err.to_string().contains("a b"));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_value(TransportErrorKind::Timeout).unwrap();
        assert_eq!(json, "timeout");
    }
}
