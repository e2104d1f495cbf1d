//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Client configuration
///
/// ```yaml
/// rest_url: https://data.example.org
/// apikey: 0000-1111
/// id_base_url: https://data.example.org
/// default_include: prefLabel,synonym
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the REST API; fetching it yields the top-level link directory
    pub rest_url: String,

    /// API key sent by the HTTP transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apikey: Option<String>,

    /// Base for computed media types; defaults to `rest_url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_base_url: Option<String>,

    /// `include` parameter used when a type declares none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_include: Option<String>,
}

impl ClientConfig {
    /// Create a configuration pointing at `rest_url`
    pub fn new(rest_url: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            ..Self::default()
        }
    }

    pub fn with_apikey(mut self, apikey: impl Into<String>) -> Self {
        self.apikey = Some(apikey.into());
        self
    }

    pub fn with_id_base_url(mut self, base: impl Into<String>) -> Self {
        self.id_base_url = Some(base.into());
        self
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path, e),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Build an identifier under the configured id base
    ///
    /// Used by types whose media type is derived from configuration,
    /// e.g. `metadata_url("metadata/Ontology")`.
    pub fn metadata_url(&self, path: &str) -> Result<String, ConfigError> {
        let base = self
            .id_base_url
            .as_deref()
            .filter(|b| !b.is_empty())
            .or(Some(self.rest_url.as_str()).filter(|b| !b.is_empty()))
            .ok_or_else(|| ConfigError::MissingField {
                field: "id_base_url".to_string(),
                context: format!("computing media type for '{}'", path),
            })?;

        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}
