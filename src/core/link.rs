//! Hyperlinks advertised by resources
//!
//! A resource's wire form carries a `links` object mapping link names to
//! URIs. Its reserved `@context` entry maps the same names to the media type
//! expected at the far end of each link:
//!
//! ```json
//! "links": {
//!     "ontologies": "https://api.example.org/ontologies",
//!     "@context": { "ontologies": "https://api.example.org/metadata/Ontology" }
//! }
//! ```

use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved key holding the link context inside a `links` object
pub const CONTEXT_KEY: &str = "@context";

/// Link name → link
pub type Links = IndexMap<String, Link>;

/// Link name → media type expected at that link
pub type LinkContext = IndexMap<String, String>;

/// A pointer from one resource to a URI
///
/// Either a bare URI on the wire, or a descriptor object that also names the
/// media type it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireLink", into = "WireLink")]
pub struct Link {
    /// The target URI
    pub href: String,

    /// Media type advertised by the link itself (not by the context)
    pub media_type: Option<String>,
}

impl Link {
    /// Create a bare link
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: None,
        }
    }

    /// Create a link that advertises its own media type
    pub fn typed(href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: Some(media_type.into()),
        }
    }

    /// Read a link from an attribute value; `None` for anything else
    pub fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(href) => Some(Link::new(href.clone())),
            FieldValue::Map(map) => {
                let href = map
                    .get("href")
                    .or_else(|| map.get("@id"))
                    .and_then(FieldValue::as_str)?;
                let media_type = map
                    .get("mediaType")
                    .or_else(|| map.get("media_type"))
                    .and_then(FieldValue::as_str)
                    .map(str::to_string);
                Some(Link {
                    href: href.to_string(),
                    media_type,
                })
            }
            _ => None,
        }
    }

    /// Inverse of [`Link::from_field`]
    pub fn to_field(&self) -> FieldValue {
        match &self.media_type {
            None => FieldValue::String(self.href.clone()),
            Some(media_type) => {
                let mut map = IndexMap::new();
                map.insert("href".to_string(), FieldValue::from(self.href.as_str()));
                map.insert("mediaType".to_string(), FieldValue::from(media_type.as_str()));
                FieldValue::Map(map)
            }
        }
    }

    /// Case-insensitive comparison against the link's own media type
    pub fn serves(&self, media_type: &str) -> bool {
        self.media_type
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(media_type))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireLink {
    Uri(String),
    Descriptor {
        #[serde(alias = "@id")]
        href: String,
        #[serde(
            rename = "mediaType",
            alias = "media_type",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        media_type: Option<String>,
    },
}

impl From<WireLink> for Link {
    fn from(wire: WireLink) -> Self {
        match wire {
            WireLink::Uri(href) => Link::new(href),
            WireLink::Descriptor { href, media_type } => Link { href, media_type },
        }
    }
}

impl From<Link> for WireLink {
    fn from(link: Link) -> Self {
        match link.media_type {
            None => WireLink::Uri(link.href),
            Some(media_type) => WireLink::Descriptor {
                href: link.href,
                media_type: Some(media_type),
            },
        }
    }
}

/// Split a wire `links` mapping into links and their context
pub fn split_links(map: &IndexMap<String, FieldValue>) -> (Links, LinkContext) {
    let mut links = Links::new();
    let mut context = LinkContext::new();

    for (name, value) in map {
        if name == CONTEXT_KEY {
            if let FieldValue::Map(entries) = value {
                for (link_name, media_type) in entries {
                    if let Some(media_type) = media_type.as_str() {
                        context.insert(link_name.clone(), media_type.to_string());
                    }
                }
            }
            continue;
        }
        if let Some(link) = Link::from_field(value) {
            links.insert(name.clone(), link);
        }
    }

    (links, context)
}

/// Inverse of [`split_links`]
pub fn join_links(links: &Links, context: &LinkContext) -> IndexMap<String, FieldValue> {
    let mut map: IndexMap<String, FieldValue> = links
        .iter()
        .map(|(name, link)| (name.clone(), link.to_field()))
        .collect();

    if !context.is_empty() {
        let entries = context
            .iter()
            .map(|(name, media_type)| (name.clone(), FieldValue::from(media_type.as_str())))
            .collect();
        map.insert(CONTEXT_KEY.to_string(), FieldValue::Map(entries));
    }

    map
}

/// Find the link serving `media_type`
///
/// An exact match in the context wins; otherwise the first link whose own
/// advertised media type matches case-insensitively is returned.
pub fn link_for<'a>(links: &'a Links, context: &LinkContext, media_type: &str) -> Option<&'a Link> {
    context
        .iter()
        .filter(|(_, expected)| expected.as_str() == media_type)
        .find_map(|(name, _)| links.get(name))
        .or_else(|| links.values().find(|link| link.serves(media_type)))
}
