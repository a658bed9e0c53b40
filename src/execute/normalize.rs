//! Request normalization.
//!
//! Turns an [`OutboundRequestSpec`] into a [`ResolvedRequest`]: method checked
//! against the closed set, scheme defaulted, headers merged in a fixed order,
//! body selected by method.
//!
//! # Header assembly order
//! Header names match case-insensitively; a later step replaces any earlier
//! header with the same name:
//! 1. caller headers
//! 2. `Cookie` built from the cookie mapping
//! 3. `Authorization: Bearer ...`
//! 4. `Authorization: Basic ...`
//! 5. `Content-Type: application/json` when the body is structured and unset

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::execute::error::ValidationError;
use crate::execute::spec::{Auth, HttpMethod, KeyValues, OutboundRequestSpec};

pub const COOKIE: &str = "Cookie";
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Body in the form it goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Object or array, serialized as JSON.
    Json(Value),
    /// Anything else, sent verbatim.
    Text(String),
}

impl Payload {
    /// Interpret a caller-supplied body. Returns `None` for "no body", which
    /// covers `null`, `""`, `false` and `0`.
    ///
    /// Strings are parsed as JSON and kept as text when they are not an
    /// object or array.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(parsed @ (Value::Object(_) | Value::Array(_))) => Some(Payload::Json(parsed)),
                _ => Some(Payload::Text(s.clone())),
            },
            Value::Object(_) | Value::Array(_) => Some(Payload::Json(value.clone())),
            Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Bool(_) | Value::Number(_) => Some(Payload::Text(value.to_string())),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Payload::Json(_))
    }

    /// Marker echoed back instead of the body itself.
    pub fn marker(&self) -> &'static str {
        match self {
            Payload::Json(_) => "[Object]",
            Payload::Text(_) => "[Data]",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Json(value) => value.to_string().into_bytes(),
            Payload::Text(text) => text.clone().into_bytes(),
        }
    }
}

/// A spec with every default applied. Lives for one execution only.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: KeyValues,
    pub params: KeyValues,
    /// Kept separately for the `requestInfo` echo; already folded into `headers`.
    pub cookies: KeyValues,
    pub body: Option<Payload>,
}

/// Resolve a spec into a transport-ready request.
pub fn normalize(spec: OutboundRequestSpec) -> Result<ResolvedRequest, ValidationError> {
    let method: HttpMethod = spec.method.parse()?;
    let url = resolve_url(&spec.url);
    let payload = spec.body.as_ref().and_then(Payload::from_value);

    let mut headers = KeyValues::with_capacity(spec.headers.len());
    for (name, value) in spec.headers {
        set_header(&mut headers, name, value);
    }

    if let Some(cookie) = cookie_header(&spec.cookies) {
        set_header(&mut headers, COOKIE.to_string(), cookie);
    }

    if let Some(authorization) = spec.auth.as_ref().and_then(authorization_header) {
        set_header(&mut headers, AUTHORIZATION.to_string(), authorization);
    }

    if payload.as_ref().is_some_and(Payload::is_structured) && find_header(&headers, CONTENT_TYPE).is_none() {
        headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
    }

    header_map(&headers)?;

    let body = if method.accepts_body() { payload } else { None };

    tracing::debug!(
        method = %method,
        url = %url,
        headers = headers.len(),
        params = spec.params.len(),
        has_body = body.is_some(),
        "Request normalized"
    );

    Ok(ResolvedRequest {
        method,
        url,
        headers,
        params: spec.params,
        cookies: spec.cookies,
        body,
    })
}

/// Prepend `http://` unless the URL already names http or https.
pub fn resolve_url(url: &str) -> String {
    if has_http_scheme(url) {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// `k1=v1; k2=v2` in mapping order, or `None` when there are no cookies.
pub fn cookie_header(cookies: &KeyValues) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let joined = cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");
    Some(joined)
}

/// Credentials are only applied when every required part is present and non-empty.
pub fn authorization_header(auth: &Auth) -> Option<String> {
    match auth {
        Auth::None => None,
        Auth::Bearer { token } => token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {t}")),
        Auth::Basic { username, password } => {
            let username = username.as_deref().filter(|u| !u.is_empty())?;
            let password = password.as_deref().filter(|p| !p.is_empty())?;
            let encoded = STANDARD.encode(format!("{username}:{password}"));
            Some(format!("Basic {encoded}"))
        }
    }
}

/// Value of `name`, compared case-insensitively.
pub fn find_header<'a>(headers: &'a KeyValues, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Replace every header named `name` (any casing) with a single entry.
fn set_header(headers: &mut KeyValues, name: String, value: String) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

/// Typed headers for the wire. Fails on the first invalid name or value.
pub fn header_map(headers: &KeyValues) -> Result<HeaderMap, ValidationError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ValidationError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ValidationError::InvalidHeaderValue(name.clone()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
