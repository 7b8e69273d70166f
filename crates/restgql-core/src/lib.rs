//! # restgql-core
//!
//! Schema-driven synthesis of GraphQL documents for REST endpoint manifests.
//!
//! Given a [`Manifest`] that maps HTTP paths and methods to GraphQL operation
//! names, and a schema exposed through [`SchemaSource`], this crate derives for
//! every referenced operation:
//!
//! - a fully expanded document that selects every scalar field reachable from
//!   the operation's return type, with self-referencing types expanded one
//!   level deep
//! - the variable declarations the document needs, keyed `$name`
//!
//! ## Example
//!
//! ```ignore
//! use restgql_core::{Manifest, ScalarSet, SdlSchema, build_operation_map};
//!
//! let schema = SdlSchema::parse(include_str!("schema.graphql"))?;
//! let manifest = Manifest::load("manifest.json")?;
//! let scalars = ScalarSet::new(["Date"])?;
//! let map = build_operation_map(&manifest, &schema, &scalars)?;
//! println!("{}", map.query("book").unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Schema lookup contract and the SDL-backed implementation
//! - [`scalars`] - Scalar set and type-reference normalization
//! - [`shape`] - Selection shapes, variable maps, recursion guard
//! - [`expand`] - Field expansion and argument extraction
//! - [`render`] - Shape-to-text rendering
//! - [`synthesize`] - Single-operation document synthesis
//! - [`manifest`] - Endpoint manifest model and loading
//! - [`operation_map`] - Manifest-wide operation map
//! - [`error`] - Error types

pub mod error;
pub mod expand;
pub mod manifest;
pub mod operation_map;
pub mod render;
pub mod scalars;
pub mod schema;
pub mod shape;
pub mod synthesize;

// Re-export main types
pub use error::Error;
pub use manifest::{EndpointConfig, Manifest};
pub use operation_map::{OperationMap, build_operation_map};
pub use scalars::{BUILTIN_SCALARS, ScalarSet, is_scalar, normalize};
pub use schema::{ArgumentDef, FieldDef, FieldSet, SchemaSource, SdlSchema, TypeRef};
pub use shape::{FieldNode, FieldShape, RecursionGuard, VariableMap};
pub use synthesize::{OperationKind, classify_operation, synthesize};

/// Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, Error>;
