//! ClientBuilder for fluent construction of clients

use super::{Client, TypeRegistry};
use crate::config::ClientConfig;
use crate::core::descriptor::TypeDescriptor;
use crate::core::entity::Model;
use crate::core::error::{ConfigError, Result};
use crate::http::HttpClient;
use std::sync::Arc;

/// Builder for [`Client`]
///
/// Types are registered in the order given; that order decides which type
/// wins when two claim the same media type.
///
/// # Example
///
/// ```ignore
/// let client = Client::builder()
///     .with_config(ClientConfig::from_yaml_file("client.yaml")?)
///     .with_reqwest()
///     .with_default_models()
///     .register::<MyType>()
///     .build()?;
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    http: Option<Arc<dyn HttpClient>>,
    descriptors: Vec<TypeDescriptor>,
    #[cfg(feature = "http")]
    use_reqwest: bool,
}

impl ClientBuilder {
    /// Create a new ClientBuilder
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            http: None,
            descriptors: Vec::new(),
            #[cfg(feature = "http")]
            use_reqwest: false,
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the HTTP transport
    pub fn with_http_client(mut self, http: impl HttpClient + 'static) -> Self {
        self.http = Some(Arc::new(http));
        self
    }

    /// Set an already shared HTTP transport
    pub fn with_shared_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Use the reqwest transport, configured from the final configuration
    #[cfg(feature = "http")]
    pub fn with_reqwest(mut self) -> Self {
        self.use_reqwest = true;
        self
    }

    /// Register a model type
    pub fn register<M: Model>(mut self) -> Self {
        self.descriptors.push(M::descriptor());
        self
    }

    /// Register a type from its descriptor
    pub fn register_descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Register the built-in models
    pub fn with_default_models(mut self) -> Self {
        self.descriptors.extend(crate::models::default_descriptors());
        self
    }

    /// Build the client
    ///
    /// Fails when no transport was configured.
    pub fn build(self) -> Result<Client> {
        let config = Arc::new(self.config);
        let http = match self.http {
            Some(http) => http,
            #[cfg(feature = "http")]
            None if self.use_reqwest => Arc::new(
                crate::http::ReqwestHttpClient::new(&config)
                    .map_err(crate::core::error::ClientError::from)?,
            ),
            None => {
                return Err(ConfigError::MissingField {
                    field: "http_client".to_string(),
                    context: "ClientBuilder".to_string(),
                }
                .into());
            }
        };

        let registry = Arc::new(TypeRegistry::new(config.clone()));
        for descriptor in self.descriptors {
            registry.register(descriptor);
        }

        tracing::debug!(
            rest_url = %config.rest_url,
            types = registry.len(),
            "client built"
        );

        Ok(Client::from_parts(http, registry, config))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ClientError;
    use crate::http::InMemoryHttpClient;

    #[test]
    fn test_build_requires_transport() {
        let err = ClientBuilder::new().build().err().expect("error");
        assert!(matches!(
            err,
            ClientError::Config(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_registration_order_is_kept() {
        let client = ClientBuilder::new()
            .with_http_client(InMemoryHttpClient::new())
            .register_descriptor(TypeDescriptor::with_static("B", "application/b"))
            .register_descriptor(TypeDescriptor::with_static("A", "application/a"))
            .build()
            .unwrap();

        assert_eq!(client.registry().names(), vec!["B", "A"]);
    }

    #[test]
    fn test_default_models_are_registered() {
        let client = ClientBuilder::new()
            .with_config(ClientConfig::new("https://api.example.org"))
            .with_http_client(InMemoryHttpClient::new())
            .with_default_models()
            .build()
            .unwrap();

        assert!(client.registry().descriptor("Ontology").is_some());
        assert_eq!(
            client.registry().media_type_of("User").unwrap(),
            "https://api.example.org/metadata/User"
        );
    }
}
