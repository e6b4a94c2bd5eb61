//! JSON-over-HTTP transport for the WhereToGo backend.

use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};
use serde_json::Value;
use tracing::debug;

use common::{AppError, AppResult, ApiConfig, ClientConfig};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Transport used by every remote store.
///
/// Paths are absolute (`/api/places/3`); implementations prepend the base URL.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, path: &str) -> AppResult<Value>;

    async fn post(&self, path: &str, body: Value) -> AppResult<Value>;

    async fn put(&self, path: &str, body: Value) -> AppResult<Value>;

    async fn delete(&self, path: &str) -> AppResult<Value>;
}

/// `reqwest`-backed transport. Session cookies are kept in the client's
/// cookie store and sent with every request.
pub struct HttpTransport {
    client: Client,
    api: ApiConfig,
}

impl HttpTransport {
    /// Build the HTTP client from configuration.
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api: config.api.clone(),
        })
    }

    /// Shared client, for collaborators that need non-JSON requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> AppResult<Value> {
        let url = self.api.url(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            AppError::network(format!("{} {} failed: {}", method, path, e))
        })?;

        read_json(response).await
    }
}

/// Turn a response into JSON or a mapped error. Empty bodies read as `null`.
async fn read_json(response: Response) -> AppResult<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::network(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        debug!("HTTP {} - {}", status, body);
        return Err(AppError::from_status(status.as_u16(), &body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(AppError::from)
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, path: &str) -> AppResult<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> AppResult<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> AppResult<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> AppResult<Value> {
        self.send(Method::DELETE, path, None).await
    }
}

/// Accept both bare payloads and `{ "data": ... }` envelopes.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(unwrap_envelope(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(
            unwrap_envelope(json!({"id": 7, "name": "Cafes"})),
            json!({"id": 7, "name": "Cafes"})
        );
    }

    #[test]
    fn test_transport_builds_with_defaults() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert_eq!(transport.api().base_url(), ApiConfig::default().base_url());
    }
}
