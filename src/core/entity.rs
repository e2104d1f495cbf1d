//! Dynamic resources: open attribute sets with identity and links
//!
//! A [`Resource`] accepts any attribute name. Reads of names that were never
//! set return the [`ABSENT`] sentinel instead of failing; writes of unknown
//! names register the attribute. Attribute sets only ever grow.
//!
//! Wire keys prefixed with the JSON-LD sigil (`@id`, `@type`, ...) are the
//! same logical attribute as their bare form: `get("@id")` and `get("id")`
//! read the same slot.

use crate::client::{Client, Collection, LinkExplorer};
use crate::core::descriptor::TypeDescriptor;
use crate::core::error::{EntityError, Result};
use crate::core::field::{ABSENT, FieldValue};
use crate::core::link::{LinkContext, Links, join_links, split_links};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::ops::{Deref, Index, IndexMut};

/// Prefix used by the wire format to mark meta fields
pub const SIGIL: char = '@';

/// Strip one leading sigil from a wire key
pub fn normalize_key(key: &str) -> &str {
    key.strip_prefix(SIGIL).unwrap_or(key)
}

/// A resource returned by the API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    attributes: IndexMap<String, FieldValue>,
    links: Links,
    context: LinkContext,
    kind: Option<String>,
}

impl Resource {
    /// Create an empty, untyped resource
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resource from a generic mapping
    ///
    /// Every key becomes an attribute (sigils stripped). A `links` entry is
    /// split into links and their `@context`, which is the only source of the
    /// link context. A top-level JSON-LD `@context` stays an ordinary
    /// attribute named `context`.
    pub fn from_map(map: IndexMap<String, FieldValue>) -> Self {
        let mut resource = Self::new();
        resource.populate(map);
        resource
    }

    /// Create a resource of a declared type
    ///
    /// Attributes the type declares as always present are added as null when
    /// the payload lacks them.
    pub fn from_map_as(map: IndexMap<String, FieldValue>, descriptor: &TypeDescriptor) -> Self {
        let mut resource = Self::from_map(map);
        resource.kind = Some(descriptor.name.clone());
        for attribute in &descriptor.always_present {
            let key = normalize_key(attribute);
            if !resource.attributes.contains_key(key) {
                resource.attributes.insert(key.to_string(), FieldValue::Null);
            }
        }
        resource
    }

    /// Create a resource from a JSON object without type resolution
    ///
    /// Nested objects stay plain maps; use [`Client::decode`] for typed,
    /// recursive construction.
    pub fn from_json(value: Value) -> Self {
        match FieldValue::from_json(value) {
            FieldValue::Map(map) => Self::from_map(map),
            _ => Self::new(),
        }
    }

    fn populate(&mut self, map: IndexMap<String, FieldValue>) {
        for (key, value) in map {
            match (normalize_key(&key), value) {
                ("links", FieldValue::Map(links)) => {
                    let (links, context) = split_links(&links);
                    self.links.extend(links);
                    self.context.extend(context);
                }
                (name, value) => self.set(name, value),
            }
        }
    }

    // === Identity ===

    /// The resource URI (`@id`)
    pub fn id(&self) -> Option<&str> {
        self.get("id").as_str()
    }

    /// The resource type URI (`@type`)
    pub fn resource_type(&self) -> Option<&str> {
        self.get("type").as_str()
    }

    /// Name of the registered type this resource was built as
    ///
    /// `None` for generic resources whose media type was unknown.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub(crate) fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    // === Attributes ===

    /// Read an attribute; unknown names yield the absence sentinel
    pub fn get(&self, name: &str) -> &FieldValue {
        self.attributes.get(normalize_key(name)).unwrap_or(&ABSENT)
    }

    /// Write an attribute, registering it on first use
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<FieldValue>) {
        let key = normalize_key(name.as_ref());
        match self.attributes.get_mut(key) {
            Some(slot) => *slot = value.into(),
            None => {
                self.attributes.insert(key.to_string(), value.into());
            }
        }
    }

    /// Whether the attribute was ever set (null values included)
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(normalize_key(name))
    }

    /// Strict read: fails for attributes the resource never received
    pub fn require(&self, name: &str) -> Result<&FieldValue> {
        self.attributes.get(normalize_key(name)).ok_or_else(|| {
            EntityError::UnknownAttribute {
                kind: self.kind.clone().unwrap_or_else(|| "resource".to_string()),
                attribute: normalize_key(name).to_string(),
            }
            .into()
        })
    }

    /// Attribute names in insertion order
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, FieldValue> {
        &self.attributes
    }

    // === Links ===

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn context(&self) -> &LinkContext {
        &self.context
    }

    pub fn links_mut(&mut self) -> &mut Links {
        &mut self.links
    }

    pub fn context_mut(&mut self) -> &mut LinkContext {
        &mut self.context
    }

    // === Export ===

    /// Export attributes as a generic mapping with sigils stripped
    ///
    /// Links are emitted under `links` in wire shape, so
    /// `Resource::from_map(r.to_generic_map()) == r` for untyped resources.
    pub fn to_generic_map(&self) -> IndexMap<String, FieldValue> {
        let mut map = self.attributes.clone();
        if !self.links.is_empty() || !self.context.is_empty() {
            map.insert(
                "links".to_string(),
                FieldValue::Map(join_links(&self.links, &self.context)),
            );
        }
        map
    }

    /// Wire-shaped JSON: identity keys carry the sigil again
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        for (key, value) in &self.attributes {
            let key = match key.as_str() {
                "id" | "type" => format!("{}{}", SIGIL, key),
                _ => key.clone(),
            };
            object.insert(key, value.to_json());
        }
        if !self.links.is_empty() || !self.context.is_empty() {
            object.insert(
                "links".to_string(),
                FieldValue::Map(join_links(&self.links, &self.context)).to_json(),
            );
        }
        Value::Object(object)
    }

    // === Network ===

    /// Fetch the verbatim wire form of this resource from its own URI
    pub async fn to_wire_format(&self, client: &Client) -> Result<String> {
        let id = self.id().ok_or_else(|| EntityError::MissingId {
            kind: self.kind.clone().unwrap_or_else(|| "resource".to_string()),
        })?;
        client.fetch_raw(id).await
    }

    /// Navigate the links advertised by this resource
    pub fn explore<'c>(&self, client: &'c Client) -> LinkExplorer<'c> {
        LinkExplorer::new(client, self.links.clone(), self.context.clone())
    }

    /// Convert into a concrete model if this resource was built as one
    pub fn downcast<M: Model>(self) -> std::result::Result<M, Resource> {
        if self.kind.as_deref() == Some(M::NAME) {
            Ok(M::from(self))
        } else {
            Err(self)
        }
    }
}

impl Index<&str> for Resource {
    type Output = FieldValue;

    fn index(&self, name: &str) -> &FieldValue {
        self.get(name)
    }
}

/// `resource["@color"] = "red".into()` registers `color` on first write
impl IndexMut<&str> for Resource {
    fn index_mut(&mut self, name: &str) -> &mut FieldValue {
        self.attributes
            .entry(normalize_key(name).to_string())
            .or_insert(FieldValue::Null)
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A concrete resource type
///
/// Implemented by newtypes over [`Resource`], usually through
/// [`impl_model!`](crate::impl_model). The type registers itself with a
/// client's type registry through [`Model::descriptor`].
pub trait Model: From<Resource> + Deref<Target = Resource> + Send + Sync + 'static {
    /// Unique type name
    const NAME: &'static str;

    /// Declaration used by the type registry
    fn descriptor() -> TypeDescriptor;

    /// Give back the underlying resource
    fn into_resource(self) -> Resource;

    /// Collection queries for this type
    fn collection(client: &Client) -> Collection<'_> {
        client.collection::<Self>()
    }
}
