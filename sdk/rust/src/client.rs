use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/execute`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Value>,
}

impl ExecuteRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }
}

/// The envelope plus the HTTP status the service answered with.
#[derive(Debug, Clone)]
pub struct ExecuteOutcome {
    pub status: StatusCode,
    pub envelope: Value,
}

impl ExecuteOutcome {
    pub fn is_error(&self) -> bool {
        self.envelope.get("error").is_some()
    }
}

pub struct StormerClient {
    client: Client,
    base_url: String,
}

impl StormerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the service to send `req` and return its envelope, success or not.
    pub async fn execute(&self, req: &ExecuteRequest) -> Result<ExecuteOutcome, reqwest::Error> {
        self.post_execute(req).await
    }

    /// Same as [`execute`](Self::execute) for an arbitrary JSON body.
    pub async fn execute_raw(&self, body: &Value) -> Result<ExecuteOutcome, reqwest::Error> {
        self.post_execute(body).await
    }

    async fn post_execute<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<ExecuteOutcome, reqwest::Error> {
        let resp = self
            .client
            .post(format!("{}/api/execute", self.base_url))
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let envelope = resp.json::<Value>().await?;
        Ok(ExecuteOutcome { status, envelope })
    }

    pub async fn history(&self) -> Result<Vec<Value>, reqwest::Error> {
        self.client
            .get(format!("{}/api/history", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn clear_history(&self) -> Result<(), reqwest::Error> {
        self.client
            .delete(format!("{}/api/history", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn health(&self) -> Result<Value, reqwest::Error> {
        self.client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[tokio::test]
    async fn test_serialization_error_is_returned() {
        // Nothing listens on port 1; the request must fail before it is sent.
        let client = StormerClient::new("http://127.0.0.1:1");
        let err = client.post_execute(&Unserializable).await.unwrap_err();
        assert!(err.is_builder());
    }

    #[test]
    fn test_execute_request_omits_unset_fields() {
        let wire = serde_json::to_value(ExecuteRequest::new("GET", "x.test")).unwrap();
        assert_eq!(wire, serde_json::json!({ "method": "GET", "url": "x.test" }));
    }
}
