//! HTTP transport used by the client
//!
//! The client never talks to the network directly; it goes through an
//! [`HttpClient`]. Retries, timeouts and authentication belong to the
//! implementation, and its errors reach callers unchanged.

pub mod in_memory;
#[cfg(feature = "http")]
pub mod remote;

pub use in_memory::InMemoryHttpClient;
#[cfg(feature = "http")]
pub use remote::ReqwestHttpClient;

use crate::core::query::Params;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Options for a GET request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Return the unparsed body in [`Payload::raw`]
    pub raw: bool,
}

impl GetOptions {
    pub fn raw() -> Self {
        Self { raw: true }
    }
}

/// A response body tagged with its declared media type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// Declared media type (e.g. from the `Content-Type` header)
    pub media_type: Option<String>,

    /// Decoded body; `Null` for raw or empty responses
    pub body: Value,

    /// Verbatim body, present when the request asked for it
    pub raw: Option<String>,
}

impl Payload {
    /// A JSON payload without a declared media type
    pub fn json(body: Value) -> Self {
        Self {
            media_type: None,
            body,
            raw: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// A raw payload carrying only the wire text
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            media_type: None,
            body: Value::Null,
            raw: Some(text.into()),
        }
    }
}

/// Transport trait for the hypermedia API
///
/// Implementations are shared behind an `Arc` by the client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET a URI with query parameters
    async fn get(&self, uri: &str, params: &Params, options: GetOptions) -> Result<Payload>;

    /// POST a JSON body to a URI
    async fn post(&self, uri: &str, body: &Value) -> Result<Payload>;
}
