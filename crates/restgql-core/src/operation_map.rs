//! Operation map: every document and variable set a manifest needs.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::expand::extract_args;
use crate::manifest::Manifest;
use crate::scalars::ScalarSet;
use crate::schema::SchemaSource;
use crate::shape::VariableMap;
use crate::synthesize::{classify_operation, synthesize};
use crate::Result;

/// Documents and variable declarations keyed by operation name.
///
/// Built once at startup and shared read-only by every request handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationMap {
    /// Variable declarations per operation (empty for argument-less ones).
    pub args: IndexMap<String, VariableMap>,

    /// Complete GraphQL document per operation.
    pub queries: IndexMap<String, String>,
}

impl OperationMap {
    /// Returns the document of an operation.
    #[must_use]
    pub fn query(&self, operation: &str) -> Option<&str> {
        self.queries.get(operation).map(String::as_str)
    }

    /// Returns the variable declarations of an operation.
    #[must_use]
    pub fn variables(&self, operation: &str) -> Option<&VariableMap> {
        self.args.get(operation)
    }

    /// Number of distinct operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// Synthesizes the document and variable declarations of every operation the
/// manifest references.
///
/// Operations referenced by several endpoints are synthesized once.
///
/// # Errors
///
/// Returns [`crate::Error::Configuration`] if the manifest is malformed, and
/// [`crate::Error::UnknownOperation`] / [`crate::Error::UnknownType`] if it
/// references something the schema does not define.
#[instrument(skip_all, fields(endpoints = manifest.endpoint_count()))]
pub fn build_operation_map<S: SchemaSource + ?Sized>(
    manifest: &Manifest,
    schema: &S,
    scalars: &ScalarSet,
) -> Result<OperationMap> {
    manifest.validate()?;

    let mut map = OperationMap::default();
    for (path, method, endpoint) in manifest.iter() {
        let operation = endpoint.operation.as_str();
        if map.queries.contains_key(operation) {
            continue;
        }

        let (_, field) = classify_operation(schema, operation)?;
        let (_, variables) = extract_args(schema, &field.arguments, scalars)?;
        let query = synthesize(schema, operation, scalars)?;

        debug!(path, method, operation, variables = variables.len(), "Mapped operation");
        map.args.insert(operation.to_string(), variables);
        map.queries.insert(operation.to_string(), query);
    }

    info!(operations = map.len(), "Operation map built");
    Ok(map)
}
