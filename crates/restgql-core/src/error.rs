//! Error types for document synthesis.
//!
//! Every error here is a startup-class failure: it is raised while the
//! operation map is derived from the manifest and schema, never while a
//! request is being served.

use std::path::PathBuf;

/// Errors that can occur while loading inputs or synthesizing documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed manifest, schema, or scalar configuration.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The operation is not a field of the query or mutation root.
    #[error("Operation '{operation}' is not defined in the schema")]
    UnknownOperation {
        /// Name of the operation that was looked up.
        operation: String,
    },

    /// A composite type referenced by a field or argument has no definition.
    #[error("Type '{type_name}' is not defined in the schema")]
    UnknownType {
        /// Bare name of the missing type.
        type_name: String,
    },

    /// SDL text could not be parsed.
    #[error("Failed to parse schema: {0}")]
    SchemaParse(String),

    /// Manifest text could not be parsed.
    #[error("Failed to parse manifest: {0}")]
    ManifestParse(String),

    /// A manifest or schema file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns the error code used in logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::UnknownOperation { .. } | Self::UnknownType { .. } => "SCHEMA_MISMATCH",
            Self::SchemaParse(_) => "SCHEMA_PARSE_ERROR",
            Self::ManifestParse(_) => "MANIFEST_PARSE_ERROR",
            Self::Io { .. } => "IO_ERROR",
        }
    }

    /// Returns whether the manifest and schema disagree with each other.
    #[must_use]
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::UnknownOperation { .. } | Self::UnknownType { .. })
    }
}
