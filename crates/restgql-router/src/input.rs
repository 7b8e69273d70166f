//! Request input extraction and variable selection.
//!
//! Inputs come from three places and are merged with later sources winning:
//! query string, then path parameters, then the JSON body.

use axum::body::Body;
use axum::http::{HeaderMap, Uri, header};
use restgql_core::VariableMap;
use serde_json::{Map, Value};

use crate::error::RequestError;

/// Extracts query parameters from a URI.
///
/// Example: `?status=active&limit=10` -> {status: "active", limit: "10"}.
/// A key repeated in the query string keeps its last value.
pub fn query_params(uri: &Uri) -> Map<String, Value> {
    uri.query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect()
        })
        .unwrap_or_default()
}

/// Converts decoded path parameters to a JSON object.
pub fn path_params<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Map<String, Value> {
    params
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

/// Whether the request declares a JSON body (`application/json` or a
/// `+json` suffix). Bodies of any other content type are not read.
pub fn is_json_content(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Reads the request body as a JSON object.
///
/// Callers only pass bodies that [`is_json_content`] accepts. An empty (or
/// whitespace-only) body yields an empty object.
///
/// # Errors
///
/// Returns [`RequestError::BodyTooLarge`] if the body cannot be read within
/// `limit` bytes and [`RequestError::InvalidBody`] if it is not a JSON object.
pub async fn body_params(body: Body, limit: usize) -> Result<Map<String, Value>, RequestError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| RequestError::BodyTooLarge { limit })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(RequestError::InvalidBody(
            "request body must be a JSON object".into(),
        )),
        Err(e) => Err(RequestError::InvalidBody(format!(
            "failed to parse request body as JSON: {e}"
        ))),
    }
}

/// Merges input sources; keys in later sources overwrite earlier ones.
pub fn merge_inputs(sources: impl IntoIterator<Item = Map<String, Value>>) -> Map<String, Value> {
    let mut merged = Map::new();
    for source in sources {
        merged.extend(source);
    }
    merged
}

/// Picks the variables of an operation out of the merged inputs.
///
/// Returns the declared variables present in `inputs`. When none are
/// present, the endpoint's default parameters are returned instead, and
/// `None` when there are no defaults either.
pub fn select_variables(
    declared: &VariableMap,
    inputs: &Map<String, Value>,
    defaults: Option<&Map<String, Value>>,
) -> Option<Map<String, Value>> {
    let selected: Map<String, Value> = declared
        .names()
        .filter_map(|name| inputs.get(name).map(|v| (name.to_string(), v.clone())))
        .collect();

    if selected.is_empty() {
        defaults.cloned()
    } else {
        Some(selected)
    }
}
