//! Editable request drafts.
//!
//! A draft is what the Request Builder holds while the user edits: every
//! header, param, cookie and form field keeps its `enabled` flag so it can be
//! toggled back on later. [`RequestDraft::to_spec`] is the single place where
//! disabled entries are dropped before anything is sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::execute::spec::{Auth, HttpMethod, KeyValues, OutboundRequestSpec};

/// One row in a key/value editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueEntry {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl KeyValueEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// How the body editor is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyMode {
    /// Free text; parsed as JSON when possible.
    #[default]
    Raw,
    /// Key/value fields sent as a JSON object.
    Form,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDraft {
    pub method: HttpMethod,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: Vec<KeyValueEntry>,
    #[serde(default)]
    pub params: Vec<KeyValueEntry>,
    #[serde(default)]
    pub cookies: Vec<KeyValueEntry>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub body_items: Vec<KeyValueEntry>,
    #[serde(default)]
    pub body_mode: BodyMode,
    #[serde(default)]
    pub auth: Auth,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            url: String::new(),
            headers: Vec::new(),
            params: Vec::new(),
            cookies: Vec::new(),
            body: String::new(),
            body_items: Vec::new(),
            body_mode: BodyMode::Raw,
            auth: Auth::None,
        }
    }
}

impl RequestDraft {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    /// A draft with no URL is never sent.
    pub fn is_sendable(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Produce the request body posted to `/api/execute`, keeping only enabled entries.
    pub fn to_spec(&self) -> OutboundRequestSpec {
        let body = match self.body_mode {
            BodyMode::Form => Some(Value::Object(
                enabled(&self.body_items)
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            )),
            BodyMode::Raw if self.body.is_empty() => None,
            BodyMode::Raw => Some(
                serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone())),
            ),
        };

        OutboundRequestSpec {
            method: self.method.as_str().to_string(),
            url: self.url.clone(),
            headers: enabled(&self.headers),
            params: enabled(&self.params),
            cookies: enabled(&self.cookies),
            body,
            auth: match self.auth {
                Auth::None => None,
                ref auth => Some(auth.clone()),
            },
        }
    }
}

/// Enabled rows as a mapping. A later row with the same key wins, as in the editor.
fn enabled(entries: &[KeyValueEntry]) -> KeyValues {
    entries
        .iter()
        .filter(|e| e.enabled)
        .map(|e| (e.key.clone(), e.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_entries_are_dropped() {
        let mut draft = RequestDraft::new(HttpMethod::Get, "api.test/users");
        draft.headers = vec![
            KeyValueEntry::new("Accept", "application/json"),
            KeyValueEntry::new("X-Debug", "1").disabled(),
        ];
        draft.params = vec![
            KeyValueEntry::new("page", "2").disabled(),
            KeyValueEntry::new("limit", "10"),
        ];
        draft.cookies = vec![KeyValueEntry::new("sid", "abc").disabled()];

        let spec = draft.to_spec();
        assert_eq!(spec.headers.len(), 1);
        assert!(spec.headers.contains_key("Accept"));
        assert!(!spec.params.contains_key("page"));
        assert_eq!(spec.params.get("limit").unwrap(), "10");
        assert!(spec.cookies.is_empty());
    }

    #[test]
    fn test_raw_body_parsed_when_json() {
        let mut draft = RequestDraft::new(HttpMethod::Post, "x.test");
        draft.body = r#"{"a":1}"#.into();
        assert_eq!(draft.to_spec().body, Some(json!({"a": 1})));

        draft.body = "not json".into();
        assert_eq!(draft.to_spec().body, Some(json!("not json")));

        draft.body = String::new();
        assert_eq!(draft.to_spec().body, None);
    }

    #[test]
    fn test_form_body_uses_enabled_items() {
        let mut draft = RequestDraft::new(HttpMethod::Post, "x.test");
        draft.body_mode = BodyMode::Form;
        draft.body = "ignored in form mode".into();
        draft.body_items = vec![
            KeyValueEntry::new("name", "stormer"),
            KeyValueEntry::new("secret", "x").disabled(),
        ];
        assert_eq!(draft.to_spec().body, Some(json!({"name": "stormer"})));
    }

    #[test]
    fn test_auth_none_becomes_null() {
        let draft = RequestDraft::new(HttpMethod::Get, "x.test");
        assert!(draft.to_spec().auth.is_none());

        let mut draft = RequestDraft::new(HttpMethod::Get, "x.test");
        draft.auth = Auth::Bearer { token: Some("t".into()) };
        assert_eq!(draft.to_spec().auth, Some(Auth::Bearer { token: Some("t".into()) }));
    }

    #[test]
    fn test_sendable_requires_url() {
        assert!(!RequestDraft::new(HttpMethod::Get, "  ").is_sendable());
        assert!(RequestDraft::new(HttpMethod::Get, "x.test").is_sendable());
    }

    #[test]
    fn test_draft_deserializes_ui_shape() {
        let draft: RequestDraft = serde_json::from_value(json!({
            "method": "PUT",
            "url": "x.test",
            "headers": [{"key": "A", "value": "1", "enabled": false}, {"key": "B", "value": "2"}],
            "bodyMode": "form",
            "bodyItems": [{"key": "k", "value": "v", "enabled": true}],
            "auth": {"type": "basic", "username": "u", "password": "p"}
        }))
        .unwrap();

        assert_eq!(draft.method, HttpMethod::Put);
        assert!(!draft.headers[0].enabled);
        assert!(draft.headers[1].enabled);
        assert_eq!(draft.body_mode, BodyMode::Form);
    }
}
