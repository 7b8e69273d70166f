//! Per-request execution context.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde_json::{Map, Value};

use crate::error::RequestError;

/// Produces a fresh context value for each request.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn provide(&self) -> Value;
}

#[async_trait]
impl<F, Fut> ContextProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Value> + Send + 'static,
{
    async fn provide(&self) -> Value {
        (self)().await
    }
}

/// Where the execution context comes from.
#[derive(Clone)]
pub enum ContextSource {
    /// The same value for every request.
    Static(Value),

    /// A provider awaited once per request.
    Dynamic(Arc<dyn ContextProvider>),
}

impl ContextSource {
    /// Wraps a provider, typically an async closure.
    pub fn dynamic(provider: impl ContextProvider + 'static) -> Self {
        Self::Dynamic(Arc::new(provider))
    }

    /// Resolves the context and adds the request headers under `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::ContextResolution`] if the value is not a JSON
    /// object.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Map<String, Value>, RequestError> {
        let value = match self {
            Self::Static(value) => value.clone(),
            Self::Dynamic(provider) => provider.provide().await,
        };

        let Value::Object(mut context) = value else {
            return Err(RequestError::ContextResolution(value_kind(&value).into()));
        };
        context.insert("headers".into(), Value::Object(headers_to_json(headers)));
        Ok(context)
    }
}

impl Default for ContextSource {
    fn default() -> Self {
        Self::Static(Value::Object(Map::new()))
    }
}

impl fmt::Debug for ContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Converts request headers to a JSON object.
///
/// Names are lower-case; repeated headers are joined with `", "`. Values that
/// are not visible ASCII are skipped.
pub fn headers_to_json(headers: &HeaderMap) -> Map<String, Value> {
    let mut out = Map::new();
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !values.is_empty() {
            out.insert(name.as_str().to_string(), Value::String(values.join(", ")));
        }
    }
    out
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc"));
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("accept", HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_headers_to_json() {
        let json = headers_to_json(&headers());
        assert_eq!(json["authorization"], json!("Bearer abc"));
        assert_eq!(json["accept"], json!("text/html, application/json"));
    }

    #[tokio::test]
    async fn test_static_context_gets_headers() {
        let source = ContextSource::Static(json!({"user": "ada"}));
        let context = source.resolve(&headers()).await.unwrap();
        assert_eq!(context["user"], json!("ada"));
        assert_eq!(context["headers"]["authorization"], json!("Bearer abc"));
    }

    #[tokio::test]
    async fn test_static_context_headers_overwrite_existing_key() {
        let source = ContextSource::Static(json!({"headers": "stale"}));
        let context = source.resolve(&HeaderMap::new()).await.unwrap();
        assert_eq!(context["headers"], json!({}));
    }

    #[tokio::test]
    async fn test_dynamic_context_runs_per_request() {
        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let calls = counter.clone();
        let source = ContextSource::dynamic(move || {
            let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move { json!({ "request": n }) }
        });

        let first = source.resolve(&HeaderMap::new()).await.unwrap();
        let second = source.resolve(&HeaderMap::new()).await.unwrap();
        assert_eq!(first["request"], json!(0));
        assert_eq!(second["request"], json!(1));
    }

    #[tokio::test]
    async fn test_non_object_context_rejected() {
        let source = ContextSource::dynamic(|| async { Value::Null });
        let err = source.resolve(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "context must resolve to a JSON object, got null");
    }

    #[test]
    fn test_default_is_empty_object() {
        assert!(matches!(
            ContextSource::default(),
            ContextSource::Static(Value::Object(ref m)) if m.is_empty()
        ));
    }
}
