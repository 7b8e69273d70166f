//! REST endpoint manifest.
//!
//! A manifest maps URL paths to HTTP methods to GraphQL operations:
//!
//! ```json
//! {
//!   "endpoints": {
//!     "/book/:id": {
//!       "get": { "operation": "book" },
//!       "post": { "operation": "updateBook", "defaultParams": { "id": "1" } }
//!     }
//!   }
//! }
//! ```
//!
//! The same structure can be written in TOML with `[endpoints."/book/:id".get]`
//! tables.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Configuration of one endpoint/method pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Name of the query or mutation root field to run.
    pub operation: String,

    /// Variables used when the request supplies none of the declared ones.
    #[serde(
        default,
        rename = "defaultParams",
        alias = "default_params",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_params: Option<Map<String, Value>>,
}

impl EndpointConfig {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            default_params: None,
        }
    }

    #[must_use]
    pub fn with_default_params(mut self, params: Map<String, Value>) -> Self {
        self.default_params = Some(params);
        self
    }
}

/// Methods of one path, keyed by method name as written in the manifest.
pub type PathMethods = IndexMap<String, EndpointConfig>;

/// User-declared endpoint manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub endpoints: IndexMap<String, PathMethods>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an endpoint, keeping path and method declaration order.
    #[must_use]
    pub fn with_endpoint(
        mut self,
        path: impl Into<String>,
        method: impl Into<String>,
        endpoint: EndpointConfig,
    ) -> Self {
        self.endpoints
            .entry(path.into())
            .or_default()
            .insert(method.into(), endpoint);
        self
    }

    /// Builds a manifest from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the value is not an object and
    /// [`Error::ManifestParse`] if it does not have the manifest structure.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Configuration(
                "manifest argument must be an object".into(),
            ));
        }
        let manifest: Self =
            serde_json::from_value(value).map_err(|e| Error::ManifestParse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parses a JSON manifest.
    ///
    /// # Errors
    ///
    /// See [`Manifest::from_value`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| Error::ManifestParse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parses a TOML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestParse`] if the text is not a valid manifest.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text).map_err(|e| Error::ManifestParse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads a manifest file; `.toml` files are parsed as TOML, anything
    /// else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise see
    /// [`Manifest::from_json_str`] and [`Manifest::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    /// Checks that every endpoint names an operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the first offending endpoint.
    pub fn validate(&self) -> Result<()> {
        for (path, method, endpoint) in self.iter() {
            if endpoint.operation.trim().is_empty() {
                return Err(Error::Configuration(format!(
                    "endpoint {method} {path} must name an operation"
                )));
            }
        }
        Ok(())
    }

    /// Iterates `(path, method, endpoint)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &EndpointConfig)> {
        self.endpoints.iter().flat_map(|(path, methods)| {
            methods
                .iter()
                .map(move |(method, endpoint)| (path.as_str(), method.as_str(), endpoint))
        })
    }

    /// Number of endpoint/method pairs.
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.values().map(IndexMap::len).sum()
    }
}
