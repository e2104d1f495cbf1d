//! # Linked-Data Client
//!
//! A dynamic client-side object model for hypermedia (JSON-LD) REST APIs.
//!
//! ## Features
//!
//! - **Open Resources**: any attribute name can be read or written; unknown
//!   reads return a null sentinel instead of failing
//! - **Media-Type Dispatch**: payloads become typed resources through a
//!   registry keyed by media type, with a generic fallback
//! - **Link Discovery**: collection URLs come from the API's top-level link
//!   directory, never from hard-coded paths
//! - **Finders**: `find_by_<attr>_and_<attr>` style queries as an explicit
//!   builder
//! - **Exploration**: follow any link a resource advertises and get typed
//!   results back
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ldclient::prelude::*;
//! use ldclient::models::Ontology;
//!
//! let client = Client::builder()
//!     .with_config(ClientConfig::from_yaml_file("client.yaml")?)
//!     .with_reqwest()
//!     .with_default_models()
//!     .build()?;
//!
//! let bro = Ontology::collection(&client)
//!     .find_by(&Finder::by("acronym", "BRO"))
//!     .await?;
//!
//! for ontology in &bro {
//!     let submissions = ontology.explore(&client).get("submissions").await?;
//!     println!("{:?}", submissions);
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod http;
pub mod models;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        descriptor::{MediaTypeSource, TypeDescriptor},
        entity::{Model, Resource},
        error::{ClientError, ConfigError, EntityError, LinkError, QueryError},
        field::FieldValue,
        link::{Link, LinkContext, Links},
        query::{Finder, Params},
    };

    // === Client ===
    pub use crate::client::{
        Client, ClientBuilder, Collection, LinkExplorer, Resolved, TypeRegistry,
    };

    // === Transport ===
    pub use crate::http::{GetOptions, HttpClient, InMemoryHttpClient, Payload};
    #[cfg(feature = "http")]
    pub use crate::http::ReqwestHttpClient;

    // === Config ===
    pub use crate::config::ClientConfig;

    // === Macros ===
    pub use crate::impl_model;

    // === External dependencies ===
    pub use async_trait::async_trait;
}
