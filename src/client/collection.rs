//! Collection queries for a registered type
//!
//! A type's collection URL is never configured: it is discovered from the
//! API's top-level link directory by matching the type's media type against
//! the directory's link context.

use super::Client;
use crate::core::descriptor::TypeDescriptor;
use crate::core::entity::Resource;
use crate::core::error::{EntityError, LinkError, QueryError, Result};
use crate::core::field::FieldValue;
use crate::core::link::{self, Link};
use crate::core::query::{Finder, Params, merge_params};
use indexmap::IndexMap;
use std::sync::Arc;

/// Collection operations bound to one registered type
#[derive(Clone)]
pub struct Collection<'c> {
    client: &'c Client,
    descriptor: Arc<TypeDescriptor>,
}

impl<'c> Collection<'c> {
    pub(crate) fn new(client: &'c Client, descriptor: Arc<TypeDescriptor>) -> Self {
        Self { client, descriptor }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Primary media type of the type
    pub fn media_type(&self) -> Result<String> {
        self.client.registry().primary_media_type(&self.descriptor)
    }

    /// Root link directory of the API (memoized)
    pub async fn top_level_links(&self) -> Result<Arc<Resource>> {
        self.client.top_level_links(&self.descriptor.name).await
    }

    /// Link on `resource` serving `media_type`
    ///
    /// Exact context matches win over links advertising the media type
    /// themselves (compared case-insensitively).
    pub fn link_for<'r>(resource: &'r Resource, media_type: &str) -> Option<&'r Link> {
        link::link_for(resource.links(), resource.context(), media_type)
    }

    /// URI under which instances of this type are listed
    pub async fn collection_path(&self) -> Result<Option<String>> {
        let media_type = self.media_type()?;
        let root = self.top_level_links().await?;
        Ok(Self::link_for(&root, &media_type).map(|l| l.href.clone()))
    }

    async fn require_collection_path(&self) -> Result<String> {
        let media_type = self.media_type()?;
        let root = self.top_level_links().await?;
        Self::link_for(&root, &media_type)
            .map(|l| l.href.clone())
            .ok_or_else(|| LinkError::NoCollection { media_type }.into())
    }

    /// Fetch the collection advertised for `media_type`
    ///
    /// The type's default `include` parameter is merged under `params`.
    pub async fn entry_point(&self, media_type: &str, params: &Params) -> Result<Vec<Resource>> {
        let mut defaults = Params::new();
        let include = self
            .descriptor
            .attributes(false)
            .or(self.client.config().default_include.as_deref());
        if let Some(include) = include {
            defaults.insert("include".to_string(), include.to_string());
        }
        let params = merge_params(&defaults, params);

        let root = self.top_level_links().await?;
        let href = Self::link_for(&root, media_type)
            .map(|l| l.href.clone())
            .ok_or_else(|| LinkError::NoCollection {
                media_type: media_type.to_string(),
            })?;

        Ok(self
            .client
            .fetch_as(&href, &params, Some(media_type))
            .await?
            .into_vec())
    }

    /// Every resource in the type's collection, in service order
    pub async fn all(&self, params: &Params) -> Result<Vec<Resource>> {
        let media_type = self.media_type()?;
        self.entry_point(&media_type, params).await
    }

    /// [`Collection::all`] keyed by `@id`; later duplicates overwrite earlier ones
    ///
    /// Resources without an id are left out.
    pub async fn all_to_map_by_id(&self, params: &Params) -> Result<IndexMap<String, Resource>> {
        let mut by_id = IndexMap::new();
        for resource in self.all(params).await? {
            if let Some(id) = resource.id().map(str::to_string) {
                by_id.insert(id, resource);
            }
        }
        Ok(by_id)
    }

    /// Fetch the collection and keep resources accepted by `predicate`
    ///
    /// A missing predicate is a caller bug and fails before any request.
    pub async fn where_<F>(&self, params: &Params, predicate: Option<F>) -> Result<Vec<Resource>>
    where
        F: Fn(&Resource) -> bool,
    {
        let predicate = predicate.ok_or(QueryError::MissingPredicate)?;
        let all = self.all(params).await?;
        Ok(all.into_iter().filter(|r| predicate(r)).collect())
    }

    /// [`Collection::where_`] with a predicate that is always present
    pub async fn filter<F>(&self, params: &Params, predicate: F) -> Result<Vec<Resource>>
    where
        F: Fn(&Resource) -> bool,
    {
        self.where_(params, Some(predicate)).await
    }

    /// Fetch one resource by id
    ///
    /// Ids that are not already URIs under the collection path are qualified
    /// with it: `get("123")` fetches `<collection path>/123`.
    pub async fn get(&self, id: &str, params: &Params) -> Result<Option<Resource>> {
        let media_type = self.media_type()?;
        let path = self.require_collection_path().await?;
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let uri = if id.starts_with(&prefix) {
            id.to_string()
        } else {
            format!("{}{}", prefix, id.trim_start_matches('/'))
        };
        let params = merge_params(&self.descriptor.finder_params, params);

        Ok(self
            .client
            .fetch_as(&uri, &params, Some(&media_type))
            .await?
            .into_single())
    }

    /// Alias of [`Collection::get`]
    pub async fn find(&self, id: &str, params: &Params) -> Result<Option<Resource>> {
        self.get(id, params).await
    }

    /// Resources matching every condition of `finder`
    pub async fn find_by(&self, finder: &Finder) -> Result<Vec<Resource>> {
        let params = merge_params(&self.descriptor.finder_params, finder.params());
        self.filter(&params, |r| finder.matches(r)).await
    }

    /// Finder from a compound attribute name, e.g. `("name_and_acronym", [..])`
    pub async fn find_by_attrs(
        &self,
        attributes: &str,
        values: Vec<FieldValue>,
        params: Params,
    ) -> Result<Vec<Resource>> {
        let finder = Finder::parse(attributes, values)?.with_params(params);
        self.find_by(&finder).await
    }

    /// Finder from a method name, e.g. `("find_by_acronym", ["BRO"])`
    pub async fn find_by_method(
        &self,
        method: &str,
        values: Vec<FieldValue>,
        params: Params,
    ) -> Result<Vec<Resource>> {
        let finder = Finder::from_method_name(method, values)?.with_params(params);
        self.find_by(&finder).await
    }

    /// POST a new resource to the collection
    pub async fn create(&self, resource: &Resource) -> Result<Resource> {
        let path = self.require_collection_path().await?;
        self.client
            .post(&path, &resource.to_json())
            .await?
            .into_single()
            .ok_or_else(|| {
                EntityError::Decode {
                    message: format!("{} did not return the created resource", path),
                }
                .into()
            })
    }
}
