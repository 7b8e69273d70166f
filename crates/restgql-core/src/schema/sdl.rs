//! Schema source backed by GraphQL SDL text.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    FieldDefinition, InputValueDefinition, TypeDefinition, TypeKind, TypeSystemDefinition,
};
use tracing::debug;

use super::{ArgumentDef, FieldDef, FieldSet, SchemaSource, TypeRef};
use crate::{Error, Result};

const DEFAULT_QUERY_ROOT: &str = "Query";
const DEFAULT_MUTATION_ROOT: &str = "Mutation";

/// A schema parsed from SDL.
///
/// Object, interface, and input object types are indexed by name with their
/// fields in declaration order. `extend` definitions append to the type they
/// extend. Unions have no field set and are not indexed.
#[derive(Debug, Clone, Default)]
pub struct SdlSchema {
    types: HashMap<String, FieldSet>,
    enums: HashSet<String>,
    scalars: Vec<String>,
    query_root: Option<String>,
    mutation_root: Option<String>,
}

impl SdlSchema {
    /// Parses SDL text into a schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaParse`] if the text is not valid SDL.
    pub fn parse(sdl: &str) -> Result<Self> {
        let document =
            async_graphql_parser::parse_schema(sdl).map_err(|e| Error::SchemaParse(e.to_string()))?;

        let mut schema = Self::default();
        let mut explicit_query = None;
        let mut explicit_mutation = None;

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(def) => {
                    let def = def.node;
                    if let Some(query) = def.query {
                        explicit_query = Some(query.node.to_string());
                    }
                    if let Some(mutation) = def.mutation {
                        explicit_mutation = Some(mutation.node.to_string());
                    }
                }
                TypeSystemDefinition::Type(def) => schema.add_type(def.node),
                TypeSystemDefinition::Directive(_) => {}
            }
        }

        schema.query_root = explicit_query.or_else(|| {
            schema
                .types
                .contains_key(DEFAULT_QUERY_ROOT)
                .then(|| DEFAULT_QUERY_ROOT.to_string())
        });
        schema.mutation_root = explicit_mutation.or_else(|| {
            schema
                .types
                .contains_key(DEFAULT_MUTATION_ROOT)
                .then(|| DEFAULT_MUTATION_ROOT.to_string())
        });

        debug!(
            types = schema.types.len(),
            enums = schema.enums.len(),
            scalars = schema.scalars.len(),
            "Parsed SDL schema"
        );

        Ok(schema)
    }

    /// Reads and parses an SDL file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::SchemaParse`] if it is not valid SDL.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let sdl = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&sdl)
    }

    /// Custom scalars declared with `scalar X` in the SDL, in declaration order.
    #[must_use]
    pub fn declared_scalars(&self) -> &[String] {
        &self.scalars
    }

    /// Name of the query root type, if any.
    #[must_use]
    pub fn query_root(&self) -> Option<&str> {
        self.query_root.as_deref()
    }

    /// Name of the mutation root type, if any.
    #[must_use]
    pub fn mutation_root(&self) -> Option<&str> {
        self.mutation_root.as_deref()
    }

    fn add_type(&mut self, def: TypeDefinition) {
        let name = def.name.node.to_string();
        match def.kind {
            TypeKind::Scalar => {
                if !self.scalars.contains(&name) {
                    self.scalars.push(name);
                }
            }
            TypeKind::Enum(_) => {
                self.enums.insert(name);
            }
            TypeKind::Object(object) => self.extend_fields(name, output_fields(object.fields)),
            TypeKind::Interface(interface) => {
                self.extend_fields(name, output_fields(interface.fields))
            }
            TypeKind::InputObject(input) => self.extend_fields(name, input_fields(input.fields)),
            TypeKind::Union(_) => {}
        }
    }

    fn extend_fields(&mut self, name: String, fields: impl Iterator<Item = FieldDef>) {
        let set = self.types.entry(name).or_default();
        for field in fields {
            set.insert(field.name.clone(), field);
        }
    }
}

fn output_fields(
    fields: Vec<Positioned<FieldDefinition>>,
) -> impl Iterator<Item = FieldDef> {
    fields.into_iter().map(|field| {
        let field = field.node;
        FieldDef {
            name: field.name.node.to_string(),
            ty: TypeRef::new(field.ty.node.to_string()),
            arguments: field
                .arguments
                .into_iter()
                .map(|arg| ArgumentDef {
                    name: arg.node.name.node.to_string(),
                    ty: TypeRef::new(arg.node.ty.node.to_string()),
                })
                .collect(),
        }
    })
}

fn input_fields(
    fields: Vec<Positioned<InputValueDefinition>>,
) -> impl Iterator<Item = FieldDef> {
    fields.into_iter().map(|field| {
        let field = field.node;
        FieldDef::new(field.name.node.to_string(), field.ty.node.to_string())
    })
}

impl SchemaSource for SdlSchema {
    fn type_fields(&self, type_name: &str) -> Option<&FieldSet> {
        self.types.get(type_name)
    }

    fn query_fields(&self) -> Option<&FieldSet> {
        self.query_root.as_deref().and_then(|root| self.types.get(root))
    }

    fn mutation_fields(&self) -> Option<&FieldSet> {
        self.mutation_root
            .as_deref()
            .and_then(|root| self.types.get(root))
    }

    fn is_enum(&self, type_name: &str) -> bool {
        self.enums.contains(type_name)
    }
}
