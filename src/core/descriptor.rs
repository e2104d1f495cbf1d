//! Type descriptors: what a concrete resource type declares about itself

use crate::config::ClientConfig;
use crate::core::error::ConfigError;
use crate::core::query::Params;
use std::fmt;
use std::sync::Arc;

/// Computes a media type from runtime configuration
pub type MediaTypeFn = Arc<dyn Fn(&ClientConfig) -> Result<String, ConfigError> + Send + Sync>;

/// Where a type's primary media type comes from
#[derive(Clone)]
pub enum MediaTypeSource {
    /// A literal media type
    Static(String),

    /// Derived from configuration, e.g. `{id_base_url}/metadata/Ontology`
    Computed(MediaTypeFn),

    /// The type has no primary media type (only aliases, if any)
    None,
}

impl MediaTypeSource {
    /// Build a computed source from a closure
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ClientConfig) -> Result<String, ConfigError> + Send + Sync + 'static,
    {
        MediaTypeSource::Computed(Arc::new(f))
    }

    /// Media type under `ClientConfig::metadata_url`
    pub fn metadata(path: &'static str) -> Self {
        Self::computed(move |config| config.metadata_url(path))
    }

    /// Resolve against a configuration
    pub fn resolve(&self, config: &ClientConfig) -> Result<Option<String>, ConfigError> {
        match self {
            MediaTypeSource::Static(media_type) => Ok(Some(media_type.clone())),
            MediaTypeSource::Computed(f) => f(config).map(Some),
            MediaTypeSource::None => Ok(None),
        }
    }
}

impl fmt::Debug for MediaTypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaTypeSource::Static(media_type) => f.debug_tuple("Static").field(media_type).finish(),
            MediaTypeSource::Computed(_) => f.write_str("Computed(..)"),
            MediaTypeSource::None => f.write_str("None"),
        }
    }
}

/// Declaration of a concrete resource type
///
/// # Example
///
/// ```rust
/// use ldclient::core::descriptor::{MediaTypeSource, TypeDescriptor};
///
/// let descriptor = TypeDescriptor::new("Ontology", MediaTypeSource::metadata("metadata/Ontology"))
///     .acts_as(["application/vnd.ontology+json"])
///     .always_present(["acronym"])
///     .include("all");
///
/// assert_eq!(descriptor.name, "Ontology");
/// ```
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Unique type name (e.g., "Ontology")
    pub name: String,

    /// Primary media type
    pub media_type: MediaTypeSource,

    /// Additional media types this type also answers to
    pub act_as: Vec<String>,

    /// Attributes that exist on every instance, defaulting to null
    pub always_present: Vec<String>,

    /// Default `include` parameter for collection fetches
    pub include_attrs: Option<String>,

    /// `include` parameter used when more attributes are requested
    pub include_attrs_full: Option<String>,

    /// Parameters merged under caller parameters on `get`/`find_by`
    pub finder_params: Params,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, media_type: MediaTypeSource) -> Self {
        Self {
            name: name.into(),
            media_type,
            act_as: Vec::new(),
            always_present: Vec::new(),
            include_attrs: None,
            include_attrs_full: None,
            finder_params: Params::new(),
        }
    }

    /// Shorthand for a type with a literal media type
    pub fn with_static(name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self::new(name, MediaTypeSource::Static(media_type.into()))
    }

    pub fn acts_as<I, S>(mut self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.act_as.extend(media_types.into_iter().map(Into::into));
        self
    }

    pub fn always_present<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.always_present
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn include(mut self, attrs: impl Into<String>) -> Self {
        self.include_attrs = Some(attrs.into());
        self
    }

    pub fn include_full(mut self, attrs: impl Into<String>) -> Self {
        self.include_attrs_full = Some(attrs.into());
        self
    }

    pub fn finder_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.finder_params.insert(key.into(), value.into());
        self
    }

    /// Attributes to request; `full` prefers the extended list when declared
    pub fn attributes(&self, full: bool) -> Option<&str> {
        if full {
            if let Some(all) = self.include_attrs_full.as_deref() {
                return Some(all);
            }
        }
        self.include_attrs.as_deref()
    }

    /// Every media type this type answers to, primary first
    ///
    /// Fails only if the primary media type is computed and the computation
    /// fails.
    pub fn media_types(&self, config: &ClientConfig) -> Result<Vec<String>, ConfigError> {
        let mut all: Vec<String> = self.media_type.resolve(config)?.into_iter().collect();
        all.extend(self.act_as.iter().cloned());
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_media_types_include_aliases() {
        let descriptor = TypeDescriptor::with_static("Thing", "application/thing")
            .acts_as(["application/legacy-thing"]);
        let types = descriptor.media_types(&ClientConfig::default()).unwrap();
        assert_eq!(types, vec!["application/thing", "application/legacy-thing"]);
    }

    #[test]
    fn test_computed_media_type_uses_config() {
        let descriptor =
            TypeDescriptor::new("Ontology", MediaTypeSource::metadata("metadata/Ontology"));
        let config = ClientConfig::new("https://api.example.org/");
        assert_eq!(
            descriptor.media_types(&config).unwrap(),
            vec!["https://api.example.org/metadata/Ontology"]
        );
    }

    #[test]
    fn test_computed_media_type_failure_is_reported() {
        let descriptor = TypeDescriptor::new(
            "Broken",
            MediaTypeSource::computed(|_| {
                Err(ConfigError::MissingField {
                    field: "id_base_url".into(),
                    context: "test".into(),
                })
            }),
        );
        assert!(descriptor.media_types(&ClientConfig::default()).is_err());
    }

    #[test]
    fn test_attributes_full_falls_back() {
        let descriptor = TypeDescriptor::with_static("T", "t").include("name");
        assert_eq!(descriptor.attributes(true), Some("name"));

        let descriptor = descriptor.include_full("all");
        assert_eq!(descriptor.attributes(true), Some("all"));
        assert_eq!(descriptor.attributes(false), Some("name"));
    }
}
