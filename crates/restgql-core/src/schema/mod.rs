//! Read-only view of a GraphQL schema.
//!
//! Synthesis only needs three lookups: the field set of a named type and the
//! field sets of the query and mutation roots. [`SchemaSource`] captures that
//! contract so any schema representation can be plugged in; [`SdlSchema`] is
//! the bundled implementation built from SDL text.

mod sdl;

use std::fmt;

use indexmap::IndexMap;

pub use sdl::SdlSchema;

/// Ordered field set of a type, keyed by field name.
pub type FieldSet = IndexMap<String, FieldDef>;

/// Textual type reference, including list and non-null markers (`[Book!]!`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    /// Creates a type reference from its textual form.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the reference exactly as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the bare type name with wrapper markers removed.
    #[must_use]
    pub fn base_name(&self) -> String {
        crate::scalars::normalize(&self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TypeRef {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A declared argument of a root field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A field of an object, interface, or input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    /// Declared arguments in declaration order. Always empty for input fields.
    pub arguments: Vec<ArgumentDef>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.arguments.push(ArgumentDef::new(name, ty));
        self
    }
}

/// Lookup contract consumed by the synthesizer.
pub trait SchemaSource {
    /// Returns the field set of a composite type, or `None` if the schema has
    /// no object, interface, or input type with that name.
    fn type_fields(&self, type_name: &str) -> Option<&FieldSet>;

    /// Returns the query root field set, if the schema has a query root.
    fn query_fields(&self) -> Option<&FieldSet>;

    /// Returns the mutation root field set, if the schema has a mutation root.
    fn mutation_fields(&self) -> Option<&FieldSet>;

    /// Returns whether the named type is an enum. Enums are selected as leaves.
    fn is_enum(&self, _type_name: &str) -> bool {
        false
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn type_fields(&self, type_name: &str) -> Option<&FieldSet> {
        (**self).type_fields(type_name)
    }

    fn query_fields(&self) -> Option<&FieldSet> {
        (**self).query_fields()
    }

    fn mutation_fields(&self) -> Option<&FieldSet> {
        (**self).mutation_fields()
    }

    fn is_enum(&self, type_name: &str) -> bool {
        (**self).is_enum(type_name)
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for std::sync::Arc<T> {
    fn type_fields(&self, type_name: &str) -> Option<&FieldSet> {
        (**self).type_fields(type_name)
    }

    fn query_fields(&self) -> Option<&FieldSet> {
        (**self).query_fields()
    }

    fn mutation_fields(&self) -> Option<&FieldSet> {
        (**self).mutation_fields()
    }

    fn is_enum(&self, type_name: &str) -> bool {
        (**self).is_enum(type_name)
    }
}
