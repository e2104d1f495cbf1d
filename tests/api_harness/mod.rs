//! Shared test harness for client testing
//!
//! Provides an in-memory API with a top-level link directory, a `Thing`
//! model with a literal media type, and helpers to seed collections.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod api_harness;
//! use api_harness::*;
//! ```

#![allow(dead_code)]

use ldclient::impl_model;
use ldclient::prelude::*;
use serde_json::{Value, json};

pub const REST_URL: &str = "https://api.example.org";
pub const THINGS: &str = "https://api.example.org/things";
pub const ONTOLOGIES: &str = "https://api.example.org/ontologies";
pub const USERS: &str = "https://api.example.org/users";

pub const THING_TYPE: &str = "https://api.example.org/metadata/Thing";
pub const ONTOLOGY_TYPE: &str = "https://api.example.org/metadata/Ontology";
pub const USER_TYPE: &str = "https://api.example.org/metadata/User";
pub const SUBMISSION_TYPE: &str = "https://api.example.org/metadata/OntologySubmission";

impl_model!(Thing, MediaTypeSource::Static(THING_TYPE.to_string()), |d| {
    d.always_present(["tags"])
});

/// Root link directory of the test API
pub fn root_directory() -> Value {
    json!({
        "links": {
            "things": THINGS,
            "ontologies": ONTOLOGIES,
            "users": USERS,
            "@context": {
                "things": THING_TYPE,
                "ontologies": ONTOLOGY_TYPE,
                "users": USER_TYPE
            }
        }
    })
}

/// Transport serving the root directory
pub fn api() -> InMemoryHttpClient {
    let http = InMemoryHttpClient::new();
    http.route(REST_URL, root_directory());
    http
}

/// Client over `http` with the built-in models and `Thing`
pub fn client_with(http: &InMemoryHttpClient) -> Client {
    Client::builder()
        .with_config(ClientConfig::new(REST_URL))
        .with_http_client(http.clone())
        .with_default_models()
        .register::<Thing>()
        .build()
        .expect("client should build")
}

/// A thing as the API would serialize it
pub fn thing(id: &str, acronym: &str) -> Value {
    json!({
        "@id": format!("{}/{}", THINGS, id),
        "@type": THING_TYPE,
        "acronym": acronym
    })
}

/// An ontology as the API would serialize it
pub fn ontology(acronym: &str) -> Value {
    json!({
        "@id": format!("{}/{}", ONTOLOGIES, acronym),
        "@type": ONTOLOGY_TYPE,
        "acronym": acronym,
        "name": format!("{} ontology", acronym),
        "group": ["UMLS"],
        "links": {
            "submissions": format!("{}/{}/submissions", ONTOLOGIES, acronym),
            "latest_submission": format!("{}/{}/latest_submission", ONTOLOGIES, acronym),
            "administrators": format!("{}/{}/administrators", ONTOLOGIES, acronym),
            "@context": {
                "submissions": SUBMISSION_TYPE,
                "latest_submission": SUBMISSION_TYPE,
                "administrators": USER_TYPE
            }
        }
    })
}

/// Acronyms of a list of resources, in order
pub fn acronyms(resources: &[Resource]) -> Vec<String> {
    resources
        .iter()
        .map(|r| r["acronym"].as_str().unwrap_or_default().to_string())
        .collect()
}
