//! Field expansion and argument extraction.
//!
//! Expansion walks a composite type's field set and produces the full
//! selection for it: every scalar field becomes a leaf and every composite
//! field is expanded recursively, bounded by a [`RecursionGuard`].

use tracing::trace;

use crate::scalars::{ScalarSet, is_scalar};
use crate::schema::{ArgumentDef, FieldSet, SchemaSource};
use crate::shape::{FieldShape, RecursionGuard, VariableMap};
use crate::{Error, Result};

/// Expands the named composite type into a [`FieldShape`].
///
/// `guard` is shared by the whole recursion tree of one top-level call. The
/// type passed here is not itself recorded, only the composite types reached
/// through its fields.
///
/// # Errors
///
/// Returns [`Error::UnknownType`] if `type_name` or any composite type
/// reached from it is not defined by the schema.
pub fn expand<S: SchemaSource + ?Sized>(
    schema: &S,
    type_name: &str,
    guard: &mut RecursionGuard,
    scalars: &ScalarSet,
) -> Result<FieldShape> {
    let fields = lookup_fields(schema, type_name)?;
    expand_fields(schema, fields, guard, scalars)
}

/// Expands an already resolved field set. See [`expand`].
///
/// # Errors
///
/// Returns [`Error::UnknownType`] if a composite type reached from the field
/// set is not defined by the schema.
pub fn expand_fields<S: SchemaSource + ?Sized>(
    schema: &S,
    fields: &FieldSet,
    guard: &mut RecursionGuard,
    scalars: &ScalarSet,
) -> Result<FieldShape> {
    let mut shape = FieldShape::new();
    for (name, field) in fields {
        let bare = field.ty.base_name();
        if is_leaf_type(schema, &bare, scalars) {
            shape.insert_leaf(name.clone());
            continue;
        }
        if guard.enter(&bare) {
            let nested = expand(schema, &bare, guard, scalars)?;
            shape.insert_nested(name.clone(), nested);
        } else {
            trace!(field = %name, type_name = %bare, "Truncated recursive field");
        }
    }
    Ok(shape)
}

/// Derives the argument shape and variable declarations of an operation.
///
/// Scalar arguments bind to a variable of the same name and keep their
/// declared type text (`ID!`). Input-type arguments expand into a nested
/// shape; every leaf field under it, at any depth, declares a variable named
/// after the field, typed with the field's declared type. Two input fields
/// that share a name therefore share one variable.
///
/// # Errors
///
/// Returns [`Error::UnknownType`] if an input type is not defined.
pub fn extract_args<S: SchemaSource + ?Sized>(
    schema: &S,
    arguments: &[ArgumentDef],
    scalars: &ScalarSet,
) -> Result<(FieldShape, VariableMap)> {
    let mut shape = FieldShape::new();
    let mut variables = VariableMap::new();

    for argument in arguments {
        let bare = argument.ty.base_name();
        if is_leaf_type(schema, &bare, scalars) {
            shape.insert_leaf(argument.name.clone());
            variables.declare(&argument.name, argument.ty.clone());
            continue;
        }

        let input_fields = lookup_fields(schema, &bare)?;
        let nested = expand_fields(schema, input_fields, &mut RecursionGuard::new(), scalars)?;
        declare_input_leaves(schema, input_fields, &nested, &mut variables)?;
        shape.insert_nested(argument.name.clone(), nested);
    }

    Ok((shape, variables))
}

/// Declares a variable for every leaf of an expanded input shape, descending
/// into nested input objects.
fn declare_input_leaves<S: SchemaSource + ?Sized>(
    schema: &S,
    fields: &FieldSet,
    shape: &FieldShape,
    variables: &mut VariableMap,
) -> Result<()> {
    for (name, node) in shape.iter() {
        let Some(field) = fields.get(name) else {
            continue;
        };
        match node.as_nested() {
            None => variables.declare(name, field.ty.clone()),
            Some(nested) => {
                let nested_fields = lookup_fields(schema, &field.ty.base_name())?;
                declare_input_leaves(schema, nested_fields, nested, variables)?;
            }
        }
    }
    Ok(())
}

fn is_leaf_type<S: SchemaSource + ?Sized>(schema: &S, bare: &str, scalars: &ScalarSet) -> bool {
    is_scalar(bare, scalars) || schema.is_enum(bare)
}

fn lookup_fields<'s, S: SchemaSource + ?Sized>(
    schema: &'s S,
    type_name: &str,
) -> Result<&'s FieldSet> {
    schema.type_fields(type_name).ok_or_else(|| Error::UnknownType {
        type_name: type_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SdlSchema;

    fn schema(sdl: &str) -> SdlSchema {
        SdlSchema::parse(sdl).unwrap()
    }

    #[test]
    fn test_expand_scalar_only_type() {
        let schema = schema("input BookCreateInput { name: String! author: ID! }");
        let shape = expand(
            &schema,
            "BookCreateInput",
            &mut RecursionGuard::new(),
            &ScalarSet::default(),
        )
        .unwrap();
        assert_eq!(shape.leaf_paths(), vec!["name", "author"]);
    }

    #[test]
    fn test_direct_self_reference_expands_one_level() {
        let schema = schema("type Person { name: String friend: Person }");
        let shape = expand(
            &schema,
            "Person",
            &mut RecursionGuard::new(),
            &ScalarSet::default(),
        )
        .unwrap();
        assert_eq!(shape.leaf_paths(), vec!["name", "friend.name"]);
        let friend = shape.get("friend").and_then(|n| n.as_nested()).unwrap();
        assert!(friend.get("friend").is_none());
    }

    #[test]
    fn test_mutual_reference_truncates_on_second_visit() {
        let schema = schema(
            r#"
            type Author { id: ID! publishers: [Publisher] }
            type Publisher { id: ID! authors: [Author] }
            type Book { id: ID! author: Author! }
            "#,
        );
        let shape = expand(
            &schema,
            "Book",
            &mut RecursionGuard::new(),
            &ScalarSet::default(),
        )
        .unwrap();
        assert_eq!(
            shape.leaf_paths(),
            vec!["id", "author.id", "author.publishers.id"]
        );
    }

    #[test]
    fn test_guard_is_shared_between_siblings() {
        let schema = schema(
            r#"
            type Tag { label: String }
            type Post { first: Tag second: Tag third: Tag }
            "#,
        );
        let mut guard = RecursionGuard::new();
        let shape = expand(&schema, "Post", &mut guard, &ScalarSet::default()).unwrap();
        assert_eq!(shape.leaf_paths(), vec!["first.label"]);
        assert_eq!(guard.visited(), ["Tag", "Tag", "Tag"]);
    }

    #[test]
    fn test_enum_fields_are_leaves() {
        let schema = schema("enum Genre { A B } type Book { genre: Genre! }");
        let shape = expand(
            &schema,
            "Book",
            &mut RecursionGuard::new(),
            &ScalarSet::default(),
        )
        .unwrap();
        assert!(shape.get("genre").unwrap().is_leaf());
    }

    #[test]
    fn test_unknown_type() {
        let schema = schema("type Book { shelf: Shelf }");
        let err = expand(
            &schema,
            "Book",
            &mut RecursionGuard::new(),
            &ScalarSet::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownType { ref type_name } if type_name == "Shelf"));
    }

    #[test]
    fn test_extract_scalar_args() {
        let schema = schema("type Query { books(pageSize: Int!, page: Int!): [String] }");
        let args = &schema.query_fields().unwrap()["books"].arguments;
        let (shape, vars) = extract_args(&schema, args, &ScalarSet::default()).unwrap();
        assert_eq!(shape.leaf_paths(), vec!["pageSize", "page"]);
        let decls: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (k, v.as_str())).collect();
        assert_eq!(decls, vec![("$pageSize", "Int!"), ("$page", "Int!")]);
    }

    #[test]
    fn test_extract_input_args_flattens_field_variables() {
        let schema = schema(
            r#"
            input BookUpdateInput { name: String year: Int! }
            type Mutation { updateBook(id: ID!, book: BookUpdateInput!): String }
            "#,
        );
        let args = &schema.mutation_fields().unwrap()["updateBook"].arguments;
        let (shape, vars) = extract_args(&schema, args, &ScalarSet::default()).unwrap();
        assert_eq!(shape.leaf_paths(), vec!["id", "book.name", "book.year"]);
        let decls: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (k, v.as_str())).collect();
        assert_eq!(
            decls,
            vec![("$id", "ID!"), ("$name", "String"), ("$year", "Int!")]
        );
    }

    #[test]
    fn test_extract_nested_input_declares_every_bound_leaf() {
        let schema = schema(
            r#"
            input Address { street: String! city: String }
            input AuthorInput { name: String address: Address }
            type Mutation { createAuthor(author: AuthorInput!): String }
            "#,
        );
        let args = &schema.mutation_fields().unwrap()["createAuthor"].arguments;
        let (shape, vars) = extract_args(&schema, args, &ScalarSet::default()).unwrap();
        assert_eq!(
            shape.leaf_paths(),
            vec!["author.name", "author.address.street", "author.address.city"]
        );
        let decls: Vec<(&str, &str)> = vars.iter().map(|(k, v)| (k, v.as_str())).collect();
        assert_eq!(
            decls,
            vec![("$name", "String"), ("$street", "String!"), ("$city", "String")]
        );
    }

    #[test]
    fn test_custom_scalar_argument() {
        let schema = schema("type Query { since(date: Date!): [String] }");
        let args = &schema.query_fields().unwrap()["since"].arguments;
        let scalars = ScalarSet::new(["Date"]).unwrap();
        let (_, vars) = extract_args(&schema, args, &scalars).unwrap();
        assert_eq!(vars.get("$date").unwrap().as_str(), "Date!");
    }
}
