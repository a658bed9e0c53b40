//! Outbound HTTP execution.
//!
//! # Responsibilities
//! - Send a [`ResolvedRequest`] with a pooled reqwest client
//! - Accept every HTTP status as a response (4xx/5xx are not failures)
//! - Time the exchange from dispatch until the body is fully read
//!
//! # Design Decisions
//! - No retries; one attempt per execution
//! - Timeouts and redirect limit come from [`ExecutorConfig`]
//! - Response bodies are decoded as JSON when they parse, text otherwise

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::ExecutorConfig;
use crate::execute::error::{TransportError, TransportErrorKind};
use crate::execute::normalize::{header_map, ResolvedRequest};

/// What the target said, before any envelope shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: IndexMap<String, String>,
    pub data: Value,
}

/// Sends resolved requests. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    /// Build the underlying client from configuration.
    pub fn new(config: &ExecutorConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone());

        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Execute one request. Returns the response and the elapsed wall-clock time.
    pub async fn execute(
        &self,
        resolved: &ResolvedRequest,
    ) -> Result<(TransportResponse, Duration), TransportError> {
        let headers = header_map(&resolved.headers)
            .map_err(|e| TransportError::new(TransportErrorKind::Request, e.to_string()))?;
        let mut request = self
            .client
            .request(resolved.method.into(), &resolved.url)
            .headers(headers);

        if !resolved.params.is_empty() {
            let pairs: Vec<(&str, &str)> = resolved
                .params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            request = request.query(&pairs);
        }
        if let Some(payload) = &resolved.body {
            request = request.body(payload.to_bytes());
        }

        let start = Instant::now();
        let response = request.send().await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = flatten_headers(response.headers());

        let bytes = response.bytes().await.map_err(|e| {
            // The head made it through; hand it back as the failure's details.
            TransportError::from(e).with_details(json!({
                "status": status.as_u16(),
                "statusText": status_text,
                "headers": headers,
            }))
        })?;
        let elapsed = start.elapsed();

        tracing::debug!(
            method = %resolved.method,
            url = %resolved.url,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Outbound request completed"
        );

        Ok((
            TransportResponse {
                status: status.as_u16(),
                status_text,
                headers,
                data: decode_payload(&bytes),
            },
            elapsed,
        ))
    }
}

/// One entry per header name; repeated headers are joined with `", "`.
pub fn flatten_headers(headers: &HeaderMap) -> IndexMap<String, String> {
    let mut flat: IndexMap<String, String> = IndexMap::with_capacity(headers.keys_len());
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    flat
}

/// JSON when the body parses as JSON, a string otherwise.
pub fn decode_payload(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE, SET_COOKIE};

    #[test]
    fn test_decode_json_payload() {
        assert_eq!(decode_payload(br#"{"ok":true}"#), json!({"ok": true}));
        assert_eq!(decode_payload(b"[1,2,3]"), json!([1, 2, 3]));
    }

    #[test]
    fn test_decode_text_payload() {
        assert_eq!(decode_payload(b"<html>hi</html>"), json!("<html>hi</html>"));
        assert_eq!(decode_payload(b""), json!(""));
    }

    #[test]
    fn test_flatten_joins_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let flat = flatten_headers(&headers);
        assert_eq!(flat.get("content-type").unwrap(), "text/plain");
        assert_eq!(flat.get("set-cookie").unwrap(), "a=1, b=2");
        assert_eq!(flat.len(), 2);
    }

    #[test]
    fn test_executor_builds_from_default_config() {
        assert!(HttpExecutor::new(&ExecutorConfig::default()).is_ok());
    }
}
