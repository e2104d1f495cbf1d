//! In-memory implementation of HttpClient for testing and development

use crate::core::query::Params;
use crate::http::{GetOptions, HttpClient, Payload};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A request seen by [`InMemoryHttpClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub uri: String,
    pub params: Params,
    pub body: Option<Value>,
}

/// In-memory transport
///
/// Serves canned payloads keyed by URI (query parameters are ignored for
/// routing) and records every request. Unknown URIs fail like a 404 would.
/// Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryHttpClient {
    routes: Arc<RwLock<HashMap<String, Payload>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl InMemoryHttpClient {
    /// Create a transport with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `uri`
    pub fn route(&self, uri: impl Into<String>, body: Value) -> &Self {
        self.route_payload(uri, Payload::json(body))
    }

    /// Serve a full payload at `uri`
    pub fn route_payload(&self, uri: impl Into<String>, payload: Payload) -> &Self {
        if let Ok(mut routes) = self.routes.write() {
            routes.insert(uri.into(), payload);
        }
        self
    }

    /// Stop serving `uri`
    pub fn remove_route(&self, uri: &str) {
        if let Ok(mut routes) = self.routes.write() {
            routes.remove(uri);
        }
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests received for `uri`
    pub fn hits(&self, uri: &str) -> usize {
        self.requests
            .read()
            .map(|r| r.iter().filter(|req| req.uri == uri).count())
            .unwrap_or_default()
    }

    fn record(&self, request: RecordedRequest) -> Result<()> {
        self.requests
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?
            .push(request);
        Ok(())
    }

    fn lookup(&self, uri: &str) -> Result<Payload> {
        let routes = self
            .routes
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        routes
            .get(uri)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: {}", uri))
    }
}

#[async_trait]
impl HttpClient for InMemoryHttpClient {
    async fn get(&self, uri: &str, params: &Params, options: GetOptions) -> Result<Payload> {
        self.record(RecordedRequest {
            method: "GET",
            uri: uri.to_string(),
            params: params.clone(),
            body: None,
        })?;

        let payload = self.lookup(uri)?;
        if options.raw {
            let text = match payload.raw {
                Some(raw) => raw,
                None => serde_json::to_string(&payload.body)?,
            };
            return Ok(Payload {
                media_type: payload.media_type,
                body: Value::Null,
                raw: Some(text),
            });
        }
        Ok(payload)
    }

    async fn post(&self, uri: &str, body: &Value) -> Result<Payload> {
        self.record(RecordedRequest {
            method: "POST",
            uri: uri.to_string(),
            params: Params::new(),
            body: Some(body.clone()),
        })?;

        // The API echoes created resources
        match self.lookup(uri) {
            Ok(payload) if payload.body.is_object() => Ok(payload),
            _ => Ok(Payload::json(body.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_serves_route_and_records() {
        let http = InMemoryHttpClient::new();
        http.route("https://a/things", json!([{"@id": "https://a/things/1"}]));

        let mut params = Params::new();
        params.insert("include".into(), "all".into());
        let payload = http
            .get("https://a/things", &params, GetOptions::default())
            .await
            .unwrap();

        assert!(payload.body.is_array());
        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].params["include"], "all");
        assert_eq!(http.hits("https://a/things"), 1);
    }

    #[tokio::test]
    async fn test_unknown_uri_fails() {
        let http = InMemoryHttpClient::new();
        let err = http
            .get("https://a/missing", &Params::new(), GetOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_raw_get_returns_text() {
        let http = InMemoryHttpClient::new();
        http.route("https://a/1", json!({"@id": "https://a/1"}));

        let payload = http
            .get("https://a/1", &Params::new(), GetOptions::raw())
            .await
            .unwrap();
        assert_eq!(payload.raw.as_deref(), Some(r#"{"@id":"https://a/1"}"#));
    }

    #[test]
    fn test_removed_route_stops_serving() {
        let http = InMemoryHttpClient::new();
        http.route("https://a/1", json!({"@id": "https://a/1"}));
        http.remove_route("https://a/1");

        let result = tokio_test::block_on(http.get("https://a/1", &Params::new(), GetOptions::default()));
        assert!(result.is_err());
        assert_eq!(http.hits("https://a/1"), 1);
    }

    #[tokio::test]
    async fn test_post_echoes_body() {
        let http = InMemoryHttpClient::new();
        let body = json!({"name": "new"});
        let payload = http.post("https://a/things", &body).await.unwrap();
        assert_eq!(payload.body, body);
        assert_eq!(http.requests()[0].method, "POST");
    }
}
