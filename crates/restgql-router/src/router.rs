//! Router construction.
//!
//! Every path of the manifest becomes one axum route; every method under it
//! becomes a handler that runs the path's operation through the configured
//! [`Executor`].

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{FromRequestParts, RawPathParams},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
};
use restgql_core::{Manifest, OperationMap, VariableMap};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::RouterConfig;
use crate::context::ContextSource;
use crate::error::{RequestError, RouterError};
use crate::execute::{ExecutionRequest, Executor};
use crate::input::{
    body_params, is_json_content, merge_inputs, path_params, query_params, select_variables,
};

/// Schema, context, and executor shared by every handler.
pub struct ExecutionConfig<S: Send + Sync + 'static> {
    pub schema: Arc<S>,
    pub context: ContextSource,
    pub executor: Arc<dyn Executor<S>>,
    pub router: RouterConfig,
}

impl<S: Send + Sync + 'static> ExecutionConfig<S> {
    /// Creates a configuration with an empty static context and default
    /// router settings.
    pub fn new(schema: Arc<S>, executor: impl Executor<S> + 'static) -> Self {
        Self {
            schema,
            context: ContextSource::default(),
            executor: Arc::new(executor),
            router: RouterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: ContextSource) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_router_config(mut self, router: RouterConfig) -> Self {
        self.router = router;
        self
    }
}

/// One manifest endpoint/method pair, resolved against the operation map.
#[derive(Debug)]
struct Endpoint {
    path: String,
    method: String,
    operation: String,
    query: String,
    variables: VariableMap,
    default_params: Option<Map<String, Value>>,
}

/// Builds an axum router serving every endpoint in the manifest.
///
/// # Errors
///
/// Fails if the manifest has no endpoints, names an operation missing from
/// `operations`, uses a method other than GET, POST, PUT, PATCH, or DELETE,
/// declares a method twice for one path, or has a path that cannot be
/// registered.
#[instrument(skip_all, fields(endpoints = manifest.endpoint_count()))]
pub fn build_router<S: Send + Sync + 'static>(
    manifest: &Manifest,
    operations: &OperationMap,
    execution: ExecutionConfig<S>,
) -> Result<Router, RouterError> {
    if manifest.endpoint_count() == 0 {
        return Err(RouterError::EmptyManifest);
    }
    manifest.validate()?;
    execution.router.validate().map_err(RouterError::Config)?;

    let execution = Arc::new(execution);
    let mut router = Router::new();
    let mut registered: Vec<(String, Vec<String>)> = Vec::new();
    let mut count = 0usize;

    for (path, methods) in &manifest.endpoints {
        let route_path = to_route_path(path)?;
        let shape = route_shape(&route_path);
        if let Some((existing, _)) = registered
            .iter()
            .find(|(_, other)| routes_conflict(&shape, other))
        {
            return Err(RouterError::InvalidPath {
                path: path.clone(),
                reason: format!("route '{route_path}' conflicts with registered route '{existing}'"),
            });
        }
        registered.push((route_path.clone(), shape));

        let mut method_router: MethodRouter = MethodRouter::new();
        let mut seen = HashSet::new();

        for (method, endpoint) in methods {
            let filter = method_filter(method).ok_or_else(|| RouterError::UnsupportedMethod {
                path: path.clone(),
                method: method.clone(),
            })?;
            if !seen.insert(method.to_ascii_uppercase()) {
                return Err(RouterError::DuplicateMethod {
                    path: path.clone(),
                    method: method.clone(),
                });
            }

            let operation = endpoint.operation.as_str();
            let query = operations
                .query(operation)
                .ok_or_else(|| RouterError::OperationMismatch {
                    path: path.clone(),
                    method: method.clone(),
                    operation: operation.to_string(),
                })?;

            let resolved = Arc::new(Endpoint {
                path: path.clone(),
                method: method.to_ascii_uppercase(),
                operation: operation.to_string(),
                query: query.to_string(),
                variables: operations.variables(operation).cloned().unwrap_or_default(),
                default_params: endpoint.default_params.clone(),
            });
            let execution = execution.clone();

            method_router = method_router.on(filter, move |request: Request<Body>| {
                let endpoint = resolved.clone();
                let execution = execution.clone();
                async move { handle(&endpoint, &execution, request).await }
            });

            debug!(method = %method, path = %route_path, operation, "Registered endpoint");
            count += 1;
        }

        router = router.route(&route_path, method_router);
    }

    info!(routes = registered.len(), endpoints = count, "REST router built");
    Ok(router)
}

/// Handles one request for an endpoint.
#[instrument(skip_all, fields(method = %endpoint.method, path = %endpoint.path, operation = %endpoint.operation))]
async fn handle<S: Send + Sync + 'static>(
    endpoint: &Endpoint,
    execution: &ExecutionConfig<S>,
    request: Request<Body>,
) -> Result<Response, RequestError> {
    let (mut parts, body) = request.into_parts();

    let query = query_params(&parts.uri);
    let path = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .map(|params| path_params(params.iter()))
        .map_err(|rejection| RequestError::InvalidPathParams(rejection.body_text()))?;
    let body = if is_json_content(&parts.headers) {
        body_params(body, execution.router.body_limit_bytes).await?
    } else {
        Map::new()
    };
    let inputs = merge_inputs([query, path, body]);

    let variables = select_variables(
        &endpoint.variables,
        &inputs,
        endpoint.default_params.as_ref(),
    );
    debug!(
        inputs = inputs.len(),
        variables = variables.as_ref().map_or(0, Map::len),
        "Resolved request variables"
    );

    let context = execution.context.resolve(&parts.headers).await?;

    let result = execution
        .executor
        .execute(ExecutionRequest {
            query: endpoint.query.clone(),
            variables,
            schema: execution.schema.clone(),
            context,
        })
        .await;

    if let Some(message) = result.first_error() {
        warn!(error = %message, errors = result.errors.len(), "GraphQL execution returned errors");
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(format!("Issue Executing Request: {message}")),
        )
            .into_response());
    }

    Ok((StatusCode::OK, Json(result)).into_response())
}

/// Maps a manifest method name (any case) to a method filter.
fn method_filter(method: &str) -> Option<MethodFilter> {
    match method.to_ascii_lowercase().as_str() {
        "get" => Some(MethodFilter::GET),
        "post" => Some(MethodFilter::POST),
        "put" => Some(MethodFilter::PUT),
        "patch" => Some(MethodFilter::PATCH),
        "delete" => Some(MethodFilter::DELETE),
        _ => None,
    }
}

/// Converts a manifest path to axum route syntax.
///
/// - `:param` becomes `{param}`
/// - `*rest` becomes `{*rest}`
/// - Example: `/users/:id/files/*path` -> `/users/{id}/files/{*path}`
///
/// Segments already in `{param}` form are kept.
pub fn to_route_path(path: &str) -> Result<String, RouterError> {
    let invalid = |reason: &str| RouterError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if !path.starts_with('/') {
        return Err(invalid("path must start with '/'"));
    }

    let segments: Vec<&str> = path.split('/').skip(1).collect();
    let mut converted = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        if let Some(name) = segment.strip_prefix(':') {
            if name.is_empty() {
                return Err(invalid("parameter segment ':' has no name"));
            }
            converted.push(format!("{{{name}}}"));
        } else if let Some(name) = segment.strip_prefix('*') {
            if i + 1 != segments.len() {
                return Err(invalid("wildcard must be the last segment"));
            }
            let name = if name.is_empty() { "rest" } else { name };
            converted.push(format!("{{*{name}}}"));
        } else {
            converted.push((*segment).to_string());
        }
    }

    Ok(format!("/{}", converted.join("/")))
}

/// Segments of a route with parameter names erased, so routes that differ
/// only in naming compare equal.
fn route_shape(route_path: &str) -> Vec<String> {
    route_path
        .split('/')
        .map(|segment| {
            if segment.starts_with("{*") && segment.ends_with('}') {
                "{*}".to_string()
            } else if segment.starts_with('{') && segment.ends_with('}') {
                "{}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect()
}

/// Two routes clash when their shapes are equal, or when they first differ
/// at a segment where both capture (a named parameter against a wildcard).
/// Static segments may overlap captures.
fn routes_conflict(a: &[String], b: &[String]) -> bool {
    if a == b {
        return true;
    }
    a.iter()
        .zip(b)
        .find(|(x, y)| x != y)
        .is_some_and(|(x, y)| is_capture(x) && is_capture(y))
}

fn is_capture(segment: &str) -> bool {
    segment == "{}" || segment == "{*}"
}
