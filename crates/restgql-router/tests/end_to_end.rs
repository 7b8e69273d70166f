//! End-to-end tests: manifest + SDL -> operation map -> router -> HTTP.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use restgql_core::{EndpointConfig, Manifest, ScalarSet, SdlSchema, build_operation_map};
use restgql_router::{
    ContextSource, ExecutionConfig, ExecutionRequest, ExecutionResult, RouterConfig, RouterError,
    build_router,
};
use serde_json::{Map, Value, json};
use tower::ServiceExt;

const SDL: &str = r#"
scalar Date

type Query {
  book(id: ID!): Book
  books(pageSize: Int!, page: Int!): [Book]
}

type Mutation {
  createAuthor(name: String!): Author!
  updateBook(id: ID!, book: BookUpdateInput!): Book!
}

type Book {
  id: ID!
  name: String!
  author: Author!
  createdAt: Date!
}

type Author {
  id: ID!
  name: String!
  books: [Book]
}

input BookUpdateInput {
  name: String
}
"#;

/// What the executor saw for one request.
#[derive(Debug, Clone)]
struct Seen {
    query: String,
    variables: Option<Map<String, Value>>,
    context: Map<String, Value>,
}

type Log = Arc<Mutex<Vec<Seen>>>;

fn manifest() -> Manifest {
    Manifest::from_value(json!({
        "endpoints": {
            "/book/:id": {
                "get": { "operation": "book" },
                "PATCH": { "operation": "updateBook" }
            },
            "/books": {
                "get": {
                    "operation": "books",
                    "defaultParams": { "pageSize": 10, "page": 1 }
                }
            },
            "/authors": {
                "post": { "operation": "createAuthor" }
            }
        }
    }))
    .unwrap()
}

/// Executor that mimics a GraphQL engine: required variables must be present.
fn recording_executor(
    log: Log,
) -> impl Fn(ExecutionRequest<SdlSchema>) -> std::future::Ready<ExecutionResult> + Send + Sync {
    move |request: ExecutionRequest<SdlSchema>| {
        log.lock().unwrap().push(Seen {
            query: request.query.clone(),
            variables: request.variables.clone(),
            context: request.context.clone(),
        });

        let result = match &request.variables {
            None => ExecutionResult::from_error(
                "Variable \"$name\" of required type \"String!\" was not provided.",
            ),
            Some(vars) => ExecutionResult::from_data(json!({ "echo": vars })),
        };
        std::future::ready(result)
    }
}

fn app_with(context: ContextSource, router: RouterConfig) -> (Router, Log) {
    let schema = Arc::new(SdlSchema::parse(SDL).unwrap());
    let scalars = ScalarSet::new(["Date"]).unwrap();
    let manifest = manifest();
    let operations = build_operation_map(&manifest, schema.as_ref(), &scalars).unwrap();

    let log: Log = Arc::default();
    let execution = ExecutionConfig::new(schema, recording_executor(log.clone()))
        .with_context(context)
        .with_router_config(router);
    let app = build_router(&manifest, &operations, execution).unwrap();
    (app, log)
}

fn app() -> (Router, Log) {
    app_with(ContextSource::default(), RouterConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_body(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

// =============================================================================
// Request handling
// =============================================================================

#[tokio::test]
async fn get_with_path_parameter() {
    let (app, log) = app();
    let (status, body) = send(app, get("/book/100")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"echo": {"id": "100"}}}));

    let seen = log.lock().unwrap()[0].clone();
    assert!(seen.query.starts_with("query ( $id: ID!, ) { book ( id:$id, ) {"));
    assert_eq!(seen.variables, Some(json!({"id": "100"}).as_object().unwrap().clone()));
}

#[tokio::test]
async fn empty_body_without_defaults_surfaces_executor_error() {
    let (app, log) = app();
    let (status, body) = send(app, with_body("POST", "/authors", Body::empty())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!("Issue Executing Request: Variable \"$name\" of required type \"String!\" was not provided.")
    );
    assert_eq!(log.lock().unwrap()[0].variables, None);
}

#[tokio::test]
async fn post_body_supplies_variables() {
    let (app, log) = app();
    let (status, _) = send(
        app,
        with_body("POST", "/authors", r#"{"name": "Ursula", "ignored": 1}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let seen = log.lock().unwrap()[0].clone();
    assert_eq!(seen.variables.unwrap(), *json!({"name": "Ursula"}).as_object().unwrap());
    assert!(seen.query.starts_with("mutation ( $name: String!, )"));
}

#[tokio::test]
async fn defaults_apply_only_when_nothing_matches() {
    let (app, log) = app();
    send(app.clone(), get("/books")).await;
    send(app, get("/books?page=3")).await;

    let log = log.lock().unwrap();
    assert_eq!(
        log[0].variables.clone().unwrap(),
        *json!({"pageSize": 10, "page": 1}).as_object().unwrap()
    );
    assert_eq!(
        log[1].variables.clone().unwrap(),
        *json!({"page": "3"}).as_object().unwrap()
    );
}

#[tokio::test]
async fn body_overrides_path_overrides_query() {
    let (app, log) = app();
    let (status, _) = send(
        app.clone(),
        with_body("PATCH", "/book/7?id=query&name=from-query", r#"{"name": "from-body"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    send(app, with_body("PATCH", "/book/7?name=from-query", Body::empty())).await;

    let log = log.lock().unwrap();
    assert_eq!(
        log[0].variables.clone().unwrap(),
        *json!({"id": "7", "name": "from-body"}).as_object().unwrap()
    );
    assert_eq!(log[1].variables.clone().unwrap()["name"], json!("from-query"));
}

#[tokio::test]
async fn method_names_are_case_insensitive() {
    let (app, _) = app();
    let (status, _) = send(app, with_body("PATCH", "/book/1", r#"{"name": "x"}"#)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn undeclared_method_is_not_allowed() {
    let (app, _) = app();
    let (status, _) = send(app, with_body("DELETE", "/book/1", Body::empty())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn non_json_body_is_ignored() {
    let (app, log) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/authors?name=Ann")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("name=Bob"))
        .unwrap();
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        log.lock().unwrap()[0].variables.clone().unwrap(),
        *json!({"name": "Ann"}).as_object().unwrap()
    );
}

#[tokio::test]
async fn undecodable_path_parameter_is_a_bad_request() {
    let (app, log) = app();
    let (status, body) = send(app, get("/book/%FF")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_PATH_PARAMS"));
    assert!(log.lock().unwrap().is_empty());
}

// =============================================================================
// Context
// =============================================================================

#[tokio::test]
async fn static_context_receives_headers() {
    let (app, log) = app_with(
        ContextSource::Static(json!({"tenant": "acme"})),
        RouterConfig::default(),
    );
    let request = Request::builder()
        .uri("/book/1")
        .header("Authorization", "Bearer token")
        .body(Body::empty())
        .unwrap();
    send(app, request).await;

    let context = log.lock().unwrap()[0].context.clone();
    assert_eq!(context["tenant"], json!("acme"));
    assert_eq!(context["headers"]["authorization"], json!("Bearer token"));
}

#[tokio::test]
async fn dynamic_context_is_resolved_per_request() {
    let (app, log) = app_with(
        ContextSource::dynamic(|| async { json!({"source": "provider"}) }),
        RouterConfig::default(),
    );
    send(app, get("/book/1")).await;
    assert_eq!(log.lock().unwrap()[0].context["source"], json!("provider"));
}

#[tokio::test]
async fn non_object_context_is_a_server_error() {
    let (app, log) = app_with(ContextSource::Static(json!([1, 2])), RouterConfig::default());
    let (status, body) = send(app, get("/book/1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], json!("CONTEXT_ERROR"));
    assert!(log.lock().unwrap().is_empty());
}

// =============================================================================
// Body errors
// =============================================================================

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, log) = app();
    let (status, body) = send(app, with_body("POST", "/authors", "{\"name\":")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_BODY"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (app, _) = app_with(
        ContextSource::default(),
        RouterConfig { body_limit_bytes: 8 },
    );
    let (status, body) = send(
        app,
        with_body("POST", "/authors", r#"{"name": "a long author name"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], json!("BODY_TOO_LARGE"));
}

// =============================================================================
// Build-time errors
// =============================================================================

fn build(manifest: &Manifest) -> Result<Router, RouterError> {
    let schema = Arc::new(SdlSchema::parse(SDL).unwrap());
    let operations = build_operation_map(
        &manifest_for_map(),
        schema.as_ref(),
        &ScalarSet::new(["Date"]).unwrap(),
    )
    .unwrap();
    let execution = ExecutionConfig::new(schema, |_: ExecutionRequest<SdlSchema>| async {
        ExecutionResult::default()
    });
    build_router(manifest, &operations, execution)
}

fn manifest_for_map() -> Manifest {
    Manifest::new().with_endpoint("/book/:id", "get", EndpointConfig::new("book"))
}

#[test]
fn empty_manifest_is_rejected() {
    let err = build(&Manifest::new()).unwrap_err();
    assert!(matches!(err, RouterError::EmptyManifest));
}

#[test]
fn operation_without_document_is_rejected() {
    let manifest = manifest_for_map().with_endpoint(
        "/authors",
        "post",
        EndpointConfig::new("createAuthor"),
    );
    let err = build(&manifest).unwrap_err();
    assert!(
        matches!(err, RouterError::OperationMismatch { ref operation, .. } if operation == "createAuthor")
    );
}

#[test]
fn unsupported_method_is_rejected() {
    let manifest =
        Manifest::new().with_endpoint("/book/:id", "options", EndpointConfig::new("book"));
    let err = build(&manifest).unwrap_err();
    assert!(matches!(err, RouterError::UnsupportedMethod { ref method, .. } if method == "options"));
}

#[test]
fn duplicate_method_is_rejected() {
    let manifest = manifest_for_map().with_endpoint("/book/:id", "GET", EndpointConfig::new("book"));
    let err = build(&manifest).unwrap_err();
    assert!(matches!(err, RouterError::DuplicateMethod { .. }));
}

#[test]
fn relative_path_is_rejected() {
    let manifest = Manifest::new().with_endpoint("book/:id", "get", EndpointConfig::new("book"));
    let err = build(&manifest).unwrap_err();
    assert!(matches!(err, RouterError::InvalidPath { .. }));
}

#[test]
fn equivalent_paths_are_rejected() {
    let manifest = manifest_for_map().with_endpoint("/book/{id}", "post", EndpointConfig::new("book"));
    let err = build(&manifest).unwrap_err();
    assert!(matches!(err, RouterError::InvalidPath { .. }));
}

#[test]
fn paths_differing_only_in_parameter_names_are_rejected() {
    let manifest =
        manifest_for_map().with_endpoint("/book/:bookId", "post", EndpointConfig::new("book"));
    let err = build(&manifest).unwrap_err();
    assert!(matches!(err, RouterError::InvalidPath { ref path, .. } if path == "/book/:bookId"));
}

#[test]
fn static_segment_beside_parameter_is_accepted() {
    let manifest =
        manifest_for_map().with_endpoint("/book/latest", "get", EndpointConfig::new("book"));
    assert!(build(&manifest).is_ok());
}

#[test]
fn invalid_router_config_is_rejected() {
    let schema = Arc::new(SdlSchema::parse(SDL).unwrap());
    let manifest = manifest_for_map();
    let operations =
        build_operation_map(&manifest, schema.as_ref(), &ScalarSet::new(["Date"]).unwrap()).unwrap();
    let execution = ExecutionConfig::new(schema, |_: ExecutionRequest<SdlSchema>| async {
        ExecutionResult::default()
    })
    .with_router_config(RouterConfig { body_limit_bytes: 0 });
    let err = build_router(&manifest, &operations, execution).unwrap_err();
    assert!(matches!(err, RouterError::Config(_)));
}
