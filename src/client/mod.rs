//! The client: transport, type registry and the decode pipeline
//!
//! Every fetch runs through the same path: the transport returns a payload,
//! the payload's `@type` (or declared media type) selects a registered type,
//! and the body becomes [`Resource`]s of that type. Unknown types degrade to
//! generic resources.

pub mod builder;
pub mod collection;
pub mod explorer;
pub mod type_registry;

pub use builder::ClientBuilder;
pub use collection::Collection;
pub use explorer::LinkExplorer;
pub use type_registry::TypeRegistry;

use crate::config::ClientConfig;
use crate::core::entity::{Model, Resource};
use crate::core::error::{EntityError, LinkError, Result};
use crate::core::field::FieldValue;
use crate::core::query::Params;
use crate::http::{GetOptions, HttpClient, Payload};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keys whose values are never turned into nested resources
const PLAIN_KEYS: &[&str] = &["links", "@context", "context"];

/// Outcome of a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The body was a single object
    Single(Resource),

    /// The body was an array, or a page wrapping a `collection` array
    Many(Vec<Resource>),

    /// The body was empty or not an object
    Empty,
}

impl Resolved {
    /// The single resource, if that is what was fetched
    pub fn into_single(self) -> Option<Resource> {
        match self {
            Resolved::Single(resource) => Some(resource),
            _ => None,
        }
    }

    /// All fetched resources; a single resource becomes a one-element vector
    pub fn into_vec(self) -> Vec<Resource> {
        match self {
            Resolved::Single(resource) => vec![resource],
            Resolved::Many(resources) => resources,
            Resolved::Empty => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Resolved::Single(_) => false,
            Resolved::Many(resources) => resources.is_empty(),
            Resolved::Empty => true,
        }
    }
}

/// Client for a hypermedia API
///
/// Cheap to clone; clones share the transport, the type registry and the
/// top-level link cache.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Arc<dyn HttpClient>,
    registry: Arc<TypeRegistry>,
    config: Arc<ClientConfig>,
    top_level_links: Mutex<HashMap<String, Arc<Resource>>>,
}

impl Client {
    /// Start building a client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_parts(
        http: Arc<dyn HttpClient>,
        registry: Arc<TypeRegistry>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                registry,
                config,
                top_level_links: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    pub fn http(&self) -> &Arc<dyn HttpClient> {
        &self.inner.http
    }

    // === Collections ===

    /// Collection queries for a registered model
    ///
    /// Models that were never registered are registered on first use.
    pub fn collection<M: Model>(&self) -> Collection<'_> {
        let descriptor = self
            .registry()
            .descriptor(M::NAME)
            .unwrap_or_else(|| self.registry().register(M::descriptor()));
        Collection::new(self, descriptor)
    }

    /// Collection queries for a registered type name
    pub fn collection_for(&self, name: &str) -> Result<Collection<'_>> {
        let descriptor = self
            .registry()
            .descriptor(name)
            .ok_or_else(|| LinkError::UnregisteredType {
                name: name.to_string(),
            })?;
        Ok(Collection::new(self, descriptor))
    }

    // === Fetching ===

    /// GET `uri` and decode the payload
    pub async fn fetch(&self, uri: &str, params: &Params) -> Result<Resolved> {
        self.fetch_as(uri, params, None).await
    }

    /// GET `uri` expecting resources of `media_type`
    ///
    /// Objects without an `@type` of their own are built as the type
    /// registered for `media_type`, when there is one.
    pub async fn fetch_as(
        &self,
        uri: &str,
        params: &Params,
        media_type: Option<&str>,
    ) -> Result<Resolved> {
        tracing::debug!(uri, expected = media_type, "fetching");
        let payload = self.inner.http.get(uri, params, GetOptions::default()).await?;
        Ok(self.decode_as(payload, media_type))
    }

    /// GET the verbatim wire body at `uri`
    pub async fn fetch_raw(&self, uri: &str) -> Result<String> {
        let payload = self.inner.http.get(uri, &Params::new(), GetOptions::raw()).await?;
        match payload.raw {
            Some(raw) => Ok(raw),
            None => serde_json::to_string(&payload.body).map_err(|e| {
                EntityError::Decode {
                    message: e.to_string(),
                }
                .into()
            }),
        }
    }

    /// POST `body` to `uri` and decode the response
    pub async fn post(&self, uri: &str, body: &Value) -> Result<Resolved> {
        tracing::debug!(uri, "posting");
        let payload = self.inner.http.post(uri, body).await?;
        Ok(self.decode(payload))
    }

    /// Root link directory of the API, memoized per type name
    ///
    /// The lock is held across the fetch, so concurrent first calls perform a
    /// single request. Failures are not cached.
    pub async fn top_level_links(&self, type_name: &str) -> Result<Arc<Resource>> {
        let mut cache = self.inner.top_level_links.lock().await;
        if let Some(links) = cache.get(type_name) {
            return Ok(links.clone());
        }

        let root = self
            .fetch(&self.config().rest_url, &Params::new())
            .await?
            .into_single()
            .ok_or_else(|| EntityError::Decode {
                message: format!("{} did not return a link directory", self.config().rest_url),
            })?;

        let root = Arc::new(root);
        cache.insert(type_name.to_string(), root.clone());
        Ok(root)
    }

    // === Decoding ===

    /// Turn a payload into resources
    pub fn decode(&self, payload: Payload) -> Resolved {
        self.decode_as(payload, None)
    }

    /// Turn a payload into resources, preferring `expected` over the
    /// payload's declared media type for objects lacking `@type`
    pub fn decode_as(&self, payload: Payload, expected: Option<&str>) -> Resolved {
        let fallback = expected
            .filter(|t| self.registry().resolve(t).is_some())
            .or(payload.media_type.as_deref());
        match payload.body {
            Value::Array(items) => Resolved::Many(self.decode_items(items, fallback)),
            Value::Object(mut object) if is_page(&object) => {
                match object.remove("collection") {
                    Some(Value::Array(items)) => Resolved::Many(self.decode_items(items, fallback)),
                    _ => Resolved::Many(Vec::new()),
                }
            }
            Value::Object(object) => Resolved::Single(self.decode_object(object, fallback)),
            _ => Resolved::Empty,
        }
    }

    fn decode_items(&self, items: Vec<Value>, fallback: Option<&str>) -> Vec<Resource> {
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(object) => Some(self.decode_object(object, fallback)),
                other => {
                    tracing::debug!(value = %other, "skipping non-object collection member");
                    None
                }
            })
            .collect()
    }

    /// Build a resource from a JSON object, resolving its type
    pub fn decode_object(&self, object: Map<String, Value>, fallback: Option<&str>) -> Resource {
        let declared = object.get("@type").and_then(Value::as_str).map(str::to_string);

        let mut map = IndexMap::with_capacity(object.len());
        for (key, value) in object {
            let value = if PLAIN_KEYS.contains(&key.as_str()) {
                FieldValue::from_json(value)
            } else {
                self.decode_value(value)
            };
            map.insert(key, value);
        }

        let descriptor = declared
            .as_deref()
            .and_then(|t| self.registry().resolve(t))
            .or_else(|| fallback.and_then(|t| self.registry().resolve(t)));

        match descriptor {
            Some(descriptor) => Resource::from_map_as(map, &descriptor),
            None => {
                if let Some(media_type) = declared.as_deref().or(fallback) {
                    tracing::debug!(media_type, "unknown media type, using generic resource");
                }
                let mut resource = Resource::from_map(map);
                resource.set_kind(None);
                resource
            }
        }
    }

    fn decode_value(&self, value: Value) -> FieldValue {
        match value {
            Value::Object(object) if is_resource(&object) => {
                FieldValue::Resource(Box::new(self.decode_object(object, None)))
            }
            Value::Object(object) => FieldValue::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (k, self.decode_value(v)))
                    .collect(),
            ),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(|v| self.decode_value(v)).collect())
            }
            scalar => FieldValue::from_json(scalar),
        }
    }
}

fn is_resource(object: &Map<String, Value>) -> bool {
    object.contains_key("@id") || object.contains_key("@type")
}

fn is_page(object: &Map<String, Value>) -> bool {
    !object.contains_key("@type") && object.get("collection").is_some_and(Value::is_array)
}
