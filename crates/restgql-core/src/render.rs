//! Text rendering of shapes into GraphQL document fragments.
//!
//! These functions are pure: they take shapes and return strings, with no
//! schema access. The exact spacing they produce is part of the generated
//! document format and is covered by tests.

use crate::shape::{FieldNode, FieldShape, VariableMap};

/// Renders a shape as space-separated field names with `{ ... }` blocks for
/// nested shapes, e.g. `id name author { id name }`.
#[must_use]
pub fn build_string(shape: &FieldShape) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(shape.len());
    for (name, node) in shape.iter() {
        tokens.push(name.to_string());
        if let FieldNode::Nested(nested) = node {
            tokens.push("{".to_string());
            tokens.push(build_string(nested));
            tokens.push("}".to_string());
        }
    }
    tokens.join(" ")
}

/// Turns a rendered argument shape into `name:$name,` bindings by token
/// position.
///
/// Without a `{` every token is bound. With one, the tokens strictly inside
/// the outermost block (all but the last token) are bound, `:` is spliced in
/// before the `{`, and the first token is bound only when more than one token
/// precedes the block. Other tokens pass through unchanged.
///
/// The positional rule is exact for a single scalar, several scalars, and one
/// scalar followed by one input object with scalar fields. For arbitrary
/// shapes use [`bind_arguments`].
#[must_use]
pub fn format_args(built: &str) -> String {
    let mut tokens: Vec<String> = built.split(' ').map(str::to_string).collect();
    match tokens.iter().position(|t| t == "{") {
        Some(open) if open > 0 => {
            let last = (tokens.len() - 1).max(open + 1);
            for token in &mut tokens[open + 1..last] {
                *token = binding(token);
            }
            if open > 1 {
                tokens[0] = binding(&tokens[0]);
            }
            tokens.insert(open, ":".to_string());
        }
        _ => {
            for token in &mut tokens {
                *token = binding(token);
            }
        }
    }
    tokens.join(" ")
}

/// Renders argument bindings from the argument shape.
///
/// Scalar arguments and input fields render as `name:$name,`; input objects
/// render as `name : { ... }` around their own bindings, recursively. For
/// every shape [`format_args`] handles exactly, the output is identical to
/// `format_args(&build_string(shape))`.
#[must_use]
pub fn bind_arguments(shape: &FieldShape) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(shape.len());
    for (name, node) in shape.iter() {
        match node {
            FieldNode::Leaf => tokens.push(binding(name)),
            FieldNode::Nested(nested) => {
                tokens.push(name.to_string());
                tokens.push(":".to_string());
                tokens.push("{".to_string());
                tokens.push(bind_arguments(nested));
                tokens.push("}".to_string());
            }
        }
    }
    tokens.join(" ")
}

/// Renders variable declarations as `$name: Type,` in declaration order.
#[must_use]
pub fn build_variable_decl(variables: &VariableMap) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(variables.len() * 2);
    for (name, ty) in variables.iter() {
        tokens.push(format!("{name}:"));
        tokens.push(format!("{ty},"));
    }
    tokens.join(" ")
}

fn binding(name: &str) -> String {
    format!("{name}:${name},")
}
