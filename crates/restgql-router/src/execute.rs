//! Executor contract.
//!
//! The router does not run GraphQL itself. Every request is handed to an
//! [`Executor`] together with the synthesized document, the selected
//! variables, the schema, and the resolved context.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything an executor needs to run one operation.
#[derive(Debug)]
pub struct ExecutionRequest<S> {
    /// Synthesized GraphQL document.
    pub query: String,

    /// Variables taken from the request, or the endpoint's defaults.
    /// `None` when neither supplied any.
    pub variables: Option<Map<String, Value>>,

    /// Schema the router was built with.
    pub schema: Arc<S>,

    /// Resolved context with a `headers` entry added.
    pub context: Map<String, Value>,
}

/// A single GraphQL error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionError {
    pub message: String,

    /// Locations, path, extensions, and anything else the executor reports.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extra: Map::new(),
        }
    }
}

/// GraphQL execution result, serialized as the response body on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ExecutionError>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExecutionResult {
    /// Successful result carrying `data`.
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Failed result with one error.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![ExecutionError::new(message)],
            ..Self::default()
        }
    }

    /// Message of the first reported error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// Runs a synthesized operation.
///
/// Implemented for any `Fn(ExecutionRequest<S>) -> impl Future<Output = ExecutionResult>`,
/// so a closure is usually enough:
///
/// ```ignore
/// let executor = |request: ExecutionRequest<MySchema>| async move {
///     my_engine.run(&request.query, request.variables).await
/// };
/// ```
#[async_trait]
pub trait Executor<S: Send + Sync + 'static>: Send + Sync {
    async fn execute(&self, request: ExecutionRequest<S>) -> ExecutionResult;
}

#[async_trait]
impl<S, F, Fut> Executor<S> for F
where
    S: Send + Sync + 'static,
    F: Fn(ExecutionRequest<S>) -> Fut + Send + Sync,
    Fut: Future<Output = ExecutionResult> + Send + 'static,
{
    async fn execute(&self, request: ExecutionRequest<S>) -> ExecutionResult {
        (self)(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_serialization_keeps_extra_fields() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "data": {"book": {"id": "1"}},
            "extensions": {"cost": 3}
        }))
        .unwrap();
        assert!(result.errors.is_empty());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"data": {"book": {"id": "1"}}, "extensions": {"cost": 3}})
        );
    }

    #[test]
    fn test_error_extra_fields() {
        let result: ExecutionResult = serde_json::from_value(json!({
            "errors": [{"message": "boom", "path": ["book"]}]
        }))
        .unwrap();
        assert_eq!(result.first_error(), Some("boom"));
        assert_eq!(result.errors[0].extra["path"], json!(["book"]));
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn test_closure_executor() {
        let executor = |request: ExecutionRequest<()>| async move {
            ExecutionResult::from_data(json!({ "query": request.query }))
        };
        let result = executor
            .execute(ExecutionRequest {
                query: "query { a }".into(),
                variables: None,
                schema: Arc::new(()),
                context: Map::new(),
            })
            .await;
        assert_eq!(result.data, Some(json!({"query": "query { a }"})));
    }
}
