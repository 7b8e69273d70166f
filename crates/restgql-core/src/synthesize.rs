//! Operation document synthesis.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::expand::{expand, extract_args};
use crate::render::{bind_arguments, build_string, build_variable_decl};
use crate::scalars::{ScalarSet, is_scalar};
use crate::schema::{FieldDef, SchemaSource};
use crate::shape::{FieldShape, RecursionGuard};
use crate::{Error, Result};

/// Root an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    /// Keyword used at the start of a document.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Finds an operation among the root fields.
///
/// The query root is checked first and the mutation root second, so a name
/// present in both resolves to the mutation.
///
/// # Errors
///
/// Returns [`Error::UnknownOperation`] if neither root declares the field.
pub fn classify_operation<'s, S: SchemaSource + ?Sized>(
    schema: &'s S,
    operation: &str,
) -> Result<(OperationKind, &'s FieldDef)> {
    let mut found = None;
    if let Some(field) = schema.query_fields().and_then(|f| f.get(operation)) {
        found = Some((OperationKind::Query, field));
    }
    if let Some(field) = schema.mutation_fields().and_then(|f| f.get(operation)) {
        found = Some((OperationKind::Mutation, field));
    }
    found.ok_or_else(|| Error::UnknownOperation {
        operation: operation.to_string(),
    })
}

/// Builds the fully expanded document for one operation.
///
/// The document has the form
/// `<kind> ( <vars> ) { <operation> ( <args> ) { <fields> } }`, where the
/// parenthesised parts are omitted for operations without arguments. A
/// scalar-returning operation selects the bare scalar name.
///
/// # Errors
///
/// Returns [`Error::UnknownOperation`] for an operation neither root declares
/// and [`Error::UnknownType`] if a type it references is missing.
pub fn synthesize<S: SchemaSource + ?Sized>(
    schema: &S,
    operation: &str,
    scalars: &ScalarSet,
) -> Result<String> {
    let (kind, field) = classify_operation(schema, operation)?;

    let return_type = field.ty.base_name();
    let selection = if is_scalar(&return_type, scalars) || schema.is_enum(&return_type) {
        let mut shape = FieldShape::new();
        shape.insert_leaf(return_type);
        shape
    } else {
        expand(schema, &return_type, &mut RecursionGuard::new(), scalars)?
    };
    let fields = build_string(&selection);

    let (vars, args) = if field.arguments.is_empty() {
        (String::new(), String::new())
    } else {
        let (arg_shape, variables) = extract_args(schema, &field.arguments, scalars)?;
        (
            format!("( {} )", build_variable_decl(&variables)),
            format!("( {} )", bind_arguments(&arg_shape)),
        )
    };

    debug!(operation, kind = %kind, "Synthesized operation document");

    Ok(format!(
        "{kind} {vars} {{ {operation} {args} {{ {fields} }} }}"
    ))
}
