//! reqwest-backed HttpClient

use crate::config::ClientConfig;
use crate::core::query::Params;
use crate::http::{GetOptions, HttpClient, Payload};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

/// HTTP transport over `reqwest`
///
/// Sends `Authorization: apikey token=<key>` when the configuration carries
/// an API key. Non-success statuses are reported as errors.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    inner: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a transport from client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(apikey) = &config.apikey {
            let value = HeaderValue::from_str(&format!("apikey token={}", apikey))
                .context("API key is not a valid header value")?;
            headers.insert(AUTHORIZATION, value);
        }

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    async fn into_payload(response: reqwest::Response, raw: bool) -> Result<Payload> {
        let status = response.status();
        let url = response.url().to_string();
        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

        let text = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("{} returned {}: {}", url, status, text);
        }

        if raw {
            return Ok(Payload {
                media_type,
                body: Value::Null,
                raw: Some(text),
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).with_context(|| format!("Invalid JSON from {}", url))?
        };

        Ok(Payload {
            media_type,
            body,
            raw: None,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, uri: &str, params: &Params, options: GetOptions) -> Result<Payload> {
        tracing::debug!(uri, ?params, raw = options.raw, "GET");
        let response = self.inner.get(uri).query(params).send().await?;
        Self::into_payload(response, options.raw).await
    }

    async fn post(&self, uri: &str, body: &Value) -> Result<Payload> {
        tracing::debug!(uri, "POST");
        let response = self.inner.post(uri).json(body).send().await?;
        Self::into_payload(response, false).await
    }
}
