//! Router error types.
//!
//! [`RouterError`] is returned while the router is being built and means the
//! manifest, operation map, or configuration cannot be served.
//! [`RequestError`] is raised while a single request is handled and is turned
//! into an HTTP response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Errors raised while building the router.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The manifest declares no endpoints.
    #[error("manifest declares no endpoints, at least one path and method is required")]
    EmptyManifest,

    /// A manifest endpoint names an operation the operation map has no document for.
    #[error(
        "endpoint {method} {path} names operation '{operation}', which has no synthesized document"
    )]
    OperationMismatch {
        path: String,
        method: String,
        operation: String,
    },

    /// The manifest uses a method other than GET, POST, PUT, PATCH, or DELETE.
    #[error("endpoint {path} uses unsupported HTTP method '{method}'")]
    UnsupportedMethod { path: String, method: String },

    /// The path cannot be registered.
    #[error("invalid endpoint path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The same method is declared twice for one path.
    #[error("endpoint {path} declares method '{method}' more than once")]
    DuplicateMethod { path: String, method: String },

    /// Invalid router configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The manifest failed its own validation.
    #[error(transparent)]
    Manifest(#[from] restgql_core::Error),
}

impl RouterError {
    /// Returns the error code used in logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyManifest => "EMPTY_MANIFEST",
            Self::OperationMismatch { .. } => "OPERATION_MISMATCH",
            Self::UnsupportedMethod { .. } => "UNSUPPORTED_METHOD",
            Self::InvalidPath { .. } => "INVALID_PATH",
            Self::DuplicateMethod { .. } => "DUPLICATE_METHOD",
            Self::Config(_) => "CONFIGURATION_ERROR",
            Self::Manifest(err) => err.error_code(),
        }
    }
}

/// Errors raised while handling one request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The configured context did not resolve to a JSON object.
    #[error("context must resolve to a JSON object, got {0}")]
    ContextResolution(String),

    /// A path segment could not be decoded.
    #[error("invalid path parameters: {0}")]
    InvalidPathParams(String),

    /// The request body is not a JSON object.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The request body could not be read within the configured limit.
    #[error("request body exceeds the limit of {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl RequestError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ContextResolution(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidPathParams(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Returns the error code included in the response body.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ContextResolution(_) => "CONTEXT_ERROR",
            Self::InvalidPathParams(_) => "INVALID_PATH_PARAMS",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::BodyTooLarge { .. } => "BODY_TOO_LARGE",
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        });

        (self.status_code(), Json(body)).into_response()
    }
}
