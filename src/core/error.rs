//! Typed error handling for the linked-data client
//!
//! Callers can match on a specific failure instead of dealing with a
//! generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`EntityError`]: strict attribute access on a resource
//! - [`LinkError`]: a collection or link URL could not be resolved
//! - [`QueryError`]: malformed finder invocations (programmer errors)
//! - [`ConfigError`]: configuration parsing and computed media types
//! - [`ClientError::Transport`]: failures raised by the HTTP collaborator,
//!   propagated unchanged
//!
//! Unknown media types and unknown link names are *not* errors: the first
//! degrades to a generic resource, the second yields `None`.
//!
//! # Example
//!
//! ```rust,ignore
//! match Ontology::collection(&client).where_(params, None::<fn(&Resource) -> bool>).await {
//!     Err(ClientError::Query(QueryError::MissingPredicate)) => { /* bug in caller */ }
//!     Err(ClientError::Transport(e)) => eprintln!("network failure: {e}"),
//!     other => { /* ... */ }
//! }
//! ```

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ClientError>;

/// The main error type for the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Resource (entity) errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Link resolution errors
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Finder/query construction errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure reported by the HTTP collaborator
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ClientError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Entity(e) => e.error_code(),
            ClientError::Link(e) => e.error_code(),
            ClientError::Query(e) => e.error_code(),
            ClientError::Config(_) => "CONFIG_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Whether this error came from the HTTP collaborator
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Transport(err.into())
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to resource attribute access
#[derive(Debug, Error)]
pub enum EntityError {
    /// Strict read of an attribute the resource never received
    #[error("attribute '{attribute}' is not present on {kind}")]
    UnknownAttribute { kind: String, attribute: String },

    /// A resource without an `@id` was asked for something that needs one
    #[error("{kind} has no id")]
    MissingId { kind: String },

    /// The payload could not be turned into a resource
    #[error("failed to decode payload: {message}")]
    Decode { message: String },
}

impl EntityError {
    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::UnknownAttribute { .. } => "UNKNOWN_ATTRIBUTE",
            EntityError::MissingId { .. } => "MISSING_ID",
            EntityError::Decode { .. } => "DECODE_ERROR",
        }
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// Errors related to link resolution
#[derive(Debug, Error)]
pub enum LinkError {
    /// The top-level link directory advertises no collection for the type
    #[error("no collection link advertised for media type '{media_type}'")]
    NoCollection { media_type: String },

    /// The type is not registered with the client
    #[error("type '{name}' is not registered")]
    UnregisteredType { name: String },

    /// A registered type whose media type could not be computed
    #[error("media type of '{name}' is unavailable")]
    MediaTypeUnavailable { name: String },
}

impl LinkError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LinkError::NoCollection { .. } => "NO_COLLECTION",
            LinkError::UnregisteredType { .. } => "UNREGISTERED_TYPE",
            LinkError::MediaTypeUnavailable { .. } => "MEDIA_TYPE_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while building or running a finder
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// `where` was called without a predicate
    #[error("a predicate is required to filter items")]
    MissingPredicate,

    /// Fewer positional values than parsed attribute names
    #[error("finder '{finder}' expects {expected} value(s), got {given}")]
    MissingValue {
        finder: String,
        expected: usize,
        given: usize,
    },

    /// The method name does not follow the `find_by_<attr>` pattern
    #[error("'{name}' is not a finder method")]
    NotAFinder { name: String },
}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::MissingPredicate => "MISSING_PREDICATE",
            QueryError::MissingValue { .. } => "MISSING_FINDER_VALUE",
            QueryError::NotAFinder { .. } => "NOT_A_FINDER",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    #[error("missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}
