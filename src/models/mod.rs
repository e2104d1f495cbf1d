//! Built-in resource types of an ontology repository API
//!
//! Their media types are computed from configuration
//! (`{id_base_url}/metadata/<Type>`), so they only resolve once a base URL
//! is configured.

#[macro_use]
pub mod macros;

use crate::core::descriptor::{MediaTypeSource, TypeDescriptor};
use crate::core::entity::Model;

impl_model!(Ontology, MediaTypeSource::metadata("metadata/Ontology"), |d| {
    // Views are hidden by the service unless asked for
    d.include("all").finder_param("include_views", "true")
});

impl_model!(User, MediaTypeSource::metadata("metadata/User"), |d| {
    d.include("all")
});

impl_model!(Group, MediaTypeSource::metadata("metadata/Group"));

impl_model!(Project, MediaTypeSource::metadata("metadata/Project"));

impl_model!(Review, MediaTypeSource::metadata("metadata/Review"));

impl_model!(Note, MediaTypeSource::metadata("metadata/Note"));

impl_model!(Reply, MediaTypeSource::metadata("metadata/Reply"));

impl_model!(Instance, MediaTypeSource::metadata("metadata/Instance"));

impl_model!(Metrics, MediaTypeSource::metadata("metadata/Metrics"));

/// Descriptors of the built-in models, in registration order
pub fn default_descriptors() -> Vec<TypeDescriptor> {
    vec![
        Group::descriptor(),
        Instance::descriptor(),
        Metrics::descriptor(),
        Note::descriptor(),
        Ontology::descriptor(),
        Project::descriptor(),
        Reply::descriptor(),
        Review::descriptor(),
        User::descriptor(),
    ]
}
