//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacity > 0, bounded redirects)
//! - Check addresses and origins parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StormerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::StormerConfig;

/// Upper bound on followed redirects.
pub const MAX_REDIRECTS: usize = 50;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("history.capacity must be greater than 0")]
    ZeroHistoryCapacity,

    #[error("executor.max_redirects must be at most {MAX_REDIRECTS}, got {0}")]
    TooManyRedirects(usize),

    #[error("executor.connect_timeout_secs must be greater than 0")]
    ZeroConnectTimeout,

    #[error("listener.max_body_bytes must be greater than 0")]
    ZeroBodyLimit,

    #[error("cors.allowed_origins: invalid origin {0:?}")]
    InvalidOrigin(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &StormerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.history.capacity == 0 {
        errors.push(ValidationError::ZeroHistoryCapacity);
    }
    if config.executor.max_redirects > MAX_REDIRECTS {
        errors.push(ValidationError::TooManyRedirects(config.executor.max_redirects));
    }
    if config.executor.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    for origin in &config.cors.allowed_origins {
        let valid = url::Url::parse(origin)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
