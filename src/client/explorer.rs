//! Navigation along the links a resource advertises

use super::{Client, Resolved};
use crate::core::error::Result;
use crate::core::link::{self, Link, LinkContext, Links};
use crate::core::query::{Params, merge_params};

/// Follows links of one resource
///
/// Every call is a fresh request; results go through the same decoding as
/// collection queries, so they come back typed.
pub struct LinkExplorer<'c> {
    client: &'c Client,
    links: Links,
    context: LinkContext,
}

impl<'c> LinkExplorer<'c> {
    pub fn new(client: &'c Client, links: Links, context: LinkContext) -> Self {
        Self {
            client,
            links,
            context,
        }
    }

    /// Names of the available links
    pub fn link_names(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    pub fn has_link(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }

    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    /// Media type expected at a link, from the context or the link itself
    pub fn media_type_of(&self, name: &str) -> Option<&str> {
        self.context
            .get(name)
            .map(String::as_str)
            .or_else(|| self.links.get(name)?.media_type.as_deref())
    }

    /// Follow the link called `name`; `None` if there is no such link
    pub async fn get(&self, name: &str) -> Result<Option<Resolved>> {
        self.get_with(name, &Params::new()).await
    }

    /// Follow the link called `name` with query parameters
    pub async fn get_with(&self, name: &str, params: &Params) -> Result<Option<Resolved>> {
        let Some(link) = self.links.get(name) else {
            tracing::debug!(link = name, "no such link");
            return Ok(None);
        };
        self.client
            .fetch_as(&link.href, params, self.media_type_of(name))
            .await
            .map(Some)
    }

    /// Follow `name` asking for the target type's full attribute set
    pub async fn get_full(&self, name: &str, params: &Params) -> Result<Option<Resolved>> {
        let include = self
            .media_type_of(name)
            .and_then(|media_type| self.client.registry().resolve(media_type))
            .and_then(|descriptor| descriptor.attributes(true).map(str::to_string));

        let mut defaults = Params::new();
        if let Some(include) = include {
            defaults.insert("include".to_string(), include);
        }
        self.get_with(name, &merge_params(&defaults, params)).await
    }

    /// Follow the link serving `media_type`; `None` if no link qualifies
    pub async fn by_media_type(&self, media_type: &str, params: &Params) -> Result<Option<Resolved>> {
        let Some(link) = link::link_for(&self.links, &self.context, media_type) else {
            tracing::debug!(media_type, "no link serves media type");
            return Ok(None);
        };
        self.client
            .fetch_as(&link.href, params, Some(media_type))
            .await
            .map(Some)
    }
}
