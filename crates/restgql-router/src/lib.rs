//! # restgql-router
//!
//! axum router that exposes GraphQL operations as REST endpoints.
//!
//! The router is built from a [`restgql_core::Manifest`] and the
//! [`restgql_core::OperationMap`] synthesized for it. Each request's query
//! string, path parameters, and JSON body are merged; the variables the
//! operation declares are picked out of them and handed, with the document
//! and a per-request context, to a user-supplied [`Executor`].
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use restgql_router::{ExecutionConfig, ExecutionRequest, ExecutionResult, build_router};
//!
//! let execution = ExecutionConfig::new(schema.clone(), |request: ExecutionRequest<MySchema>| async move {
//!     engine.execute(request.query, request.variables).await
//! });
//! let app = build_router(&manifest, &operations, execution)?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Modules
//!
//! - [`router`] - Route registration and request handling
//! - [`input`] - Query, path, and body extraction; variable selection
//! - [`context`] - Static or per-request execution context
//! - [`execute`] - Executor contract and execution result
//! - [`config`] - Router configuration
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod error;
pub mod execute;
pub mod input;
pub mod router;

// Re-export main types
pub use config::RouterConfig;
pub use context::{ContextProvider, ContextSource};
pub use error::{RequestError, RouterError};
pub use execute::{ExecutionError, ExecutionRequest, ExecutionResult, Executor};
pub use router::{ExecutionConfig, build_router};
