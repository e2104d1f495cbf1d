//! Registry mapping media types to registered resource types
//!
//! Types register explicitly, in order, when the client is built. Lookups go
//! through a media type → type cache that is populated on the first miss and
//! replaced wholesale by [`TypeRegistry::rebuild`].
//!
//! When two types claim the same media type, the one registered first wins,
//! both in the direct scan and in the rebuilt cache.

use crate::config::ClientConfig;
use crate::core::descriptor::TypeDescriptor;
use crate::core::error::{LinkError, Result};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type MediaTypeMap = HashMap<String, Arc<TypeDescriptor>>;

/// Media type → type descriptor registry
///
/// Safe to share between threads: registration and cache population are
/// guarded by `RwLock`s, and a rebuild swaps in a complete table so readers
/// never see a partial one.
pub struct TypeRegistry {
    config: Arc<ClientConfig>,
    types: RwLock<Vec<Arc<TypeDescriptor>>>,
    cache: RwLock<Option<Arc<MediaTypeMap>>>,
}

impl TypeRegistry {
    /// Create an empty registry resolving computed media types against `config`
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self {
            config,
            types: RwLock::new(Vec::new()),
            cache: RwLock::new(None),
        }
    }

    /// Register a type
    ///
    /// Registering a name again replaces its declaration in place (keeping its
    /// position). The cache is left untouched until the next rebuild.
    pub fn register(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = Arc::new(descriptor);
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);

        match types.iter_mut().find(|t| t.name == descriptor.name) {
            Some(slot) => *slot = descriptor.clone(),
            None => types.push(descriptor.clone()),
        }

        tracing::debug!(name = %descriptor.name, "registered resource type");
        descriptor
    }

    /// Find the type answering to `media_type`
    ///
    /// Consults the cache, then scans registered types in registration order,
    /// then rebuilds the cache and looks up once more. `None` means the media
    /// type is unknown; callers fall back to a generic resource.
    pub fn resolve(&self, media_type: &str) -> Option<Arc<TypeDescriptor>> {
        if let Some(hit) = self.cached(media_type) {
            return Some(hit);
        }

        if let Some(hit) = self.scan(media_type) {
            return Some(hit);
        }

        self.rebuild();
        let found = self.cached(media_type);
        if found.is_none() {
            tracing::debug!(media_type, "no registered type for media type");
        }
        found
    }

    /// Recompute the whole media type table
    ///
    /// Types whose media type cannot be computed are skipped with a warning.
    pub fn rebuild(&self) {
        let types = self.types();
        let mut map = MediaTypeMap::new();

        for descriptor in types {
            let media_types = match descriptor.media_types(&self.config) {
                Ok(media_types) => media_types,
                Err(e) => {
                    tracing::warn!(
                        name = %descriptor.name,
                        error = %e,
                        "skipping type whose media type cannot be computed"
                    );
                    continue;
                }
            };

            for media_type in media_types {
                map.entry(media_type).or_insert_with(|| descriptor.clone());
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(Arc::new(map));
    }

    /// Drop the cache; the next miss rebuilds it
    pub fn invalidate(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = None;
    }

    /// Whether the cache has been built
    pub fn is_cached(&self) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Look up a type by name
    pub fn descriptor(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|t| t.name == name)
            .cloned()
    }

    /// Primary media type of a registered type
    pub fn media_type_of(&self, name: &str) -> Result<String> {
        let descriptor = self.descriptor(name).ok_or_else(|| LinkError::UnregisteredType {
            name: name.to_string(),
        })?;
        self.primary_media_type(&descriptor)
    }

    /// Primary media type of a descriptor, resolved against this registry's config
    pub fn primary_media_type(&self, descriptor: &TypeDescriptor) -> Result<String> {
        match descriptor.media_type.resolve(&self.config) {
            Ok(Some(media_type)) => Ok(media_type),
            Ok(None) => Err(LinkError::MediaTypeUnavailable {
                name: descriptor.name.clone(),
            }
            .into()),
            Err(e) => {
                tracing::warn!(name = %descriptor.name, error = %e, "media type unavailable");
                Err(LinkError::MediaTypeUnavailable {
                    name: descriptor.name.clone(),
                }
                .into())
            }
        }
    }

    /// Registered type names in registration order
    pub fn names(&self) -> Vec<String> {
        self.types().iter().map(|t| t.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn types(&self) -> Vec<Arc<TypeDescriptor>> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn cached(&self, media_type: &str) -> Option<Arc<TypeDescriptor>> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.as_ref()?.get(media_type).cloned()
    }

    fn scan(&self, media_type: &str) -> Option<Arc<TypeDescriptor>> {
        self.types().into_iter().find(|descriptor| {
            descriptor
                .media_types(&self.config)
                .is_ok_and(|types| types.iter().any(|t| t == media_type))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::MediaTypeSource;
    use crate::core::error::ConfigError;

    fn registry() -> TypeRegistry {
        TypeRegistry::new(Arc::new(ClientConfig::new("https://api.example.org")))
    }

    #[test]
    fn test_resolve_by_primary_and_alias() {
        let registry = registry();
        registry.register(TypeDescriptor::with_static("T1", "application/a"));
        registry.register(
            TypeDescriptor::with_static("T2", "application/b").acts_as(["application/b-legacy"]),
        );

        assert_eq!(registry.resolve("application/a").unwrap().name, "T1");
        assert_eq!(registry.resolve("application/b-legacy").unwrap().name, "T2");
    }

    #[test]
    fn test_resolution_survives_rebuild() {
        let registry = registry();
        registry.register(TypeDescriptor::with_static("T1", "application/a"));
        registry.register(TypeDescriptor::with_static("T2", "application/b"));

        for _ in 0..3 {
            assert_eq!(registry.resolve("application/a").unwrap().name, "T1");
            registry.rebuild();
            assert!(registry.is_cached());
        }
    }

    #[test]
    fn test_unknown_media_type_builds_cache() {
        let registry = registry();
        registry.register(TypeDescriptor::with_static("T1", "application/a"));

        assert!(!registry.is_cached());
        assert!(registry.resolve("application/unknown").is_none());
        assert!(registry.is_cached());
    }

    #[test]
    fn test_collision_first_registered_wins() {
        let registry = registry();
        registry.register(TypeDescriptor::with_static("First", "application/shared"));
        registry.register(
            TypeDescriptor::with_static("Second", "application/other").acts_as(["application/shared"]),
        );

        assert_eq!(registry.resolve("application/shared").unwrap().name, "First");
        registry.rebuild();
        assert_eq!(registry.resolve("application/shared").unwrap().name, "First");
    }

    #[test]
    fn test_failing_type_is_skipped() {
        let registry = registry();
        registry.register(TypeDescriptor::new(
            "Broken",
            MediaTypeSource::computed(|_| {
                Err(ConfigError::MissingField {
                    field: "x".into(),
                    context: "test".into(),
                })
            }),
        ));
        registry.register(TypeDescriptor::new(
            "Ontology",
            MediaTypeSource::metadata("metadata/Ontology"),
        ));

        registry.rebuild();
        assert_eq!(
            registry
                .resolve("https://api.example.org/metadata/Ontology")
                .unwrap()
                .name,
            "Ontology"
        );
        assert!(registry.media_type_of("Broken").is_err());
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let registry = registry();
        registry.register(TypeDescriptor::with_static("A", "application/a"));
        registry.register(TypeDescriptor::with_static("B", "application/b"));
        registry.register(TypeDescriptor::with_static("A", "application/a2"));

        assert_eq!(registry.names(), vec!["A", "B"]);
        assert_eq!(registry.media_type_of("A").unwrap(), "application/a2");
        assert!(registry.media_type_of("C").is_err());
    }
}
