//! Selection and argument shapes.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::schema::TypeRef;

/// A node in a [`FieldShape`]: a scalar leaf or a nested selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNode {
    Leaf,
    Nested(FieldShape),
}

impl FieldNode {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    #[must_use]
    pub fn as_nested(&self) -> Option<&FieldShape> {
        match self {
            Self::Leaf => None,
            Self::Nested(shape) => Some(shape),
        }
    }
}

/// Leaves serialize as `""` and nested shapes as objects, the form used in
/// snapshots and CLI output.
impl Serialize for FieldNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf => serializer.serialize_str(""),
            Self::Nested(shape) => shape.serialize(serializer),
        }
    }
}

/// Ordered mapping of field name to [`FieldNode`].
///
/// Used both for the selection set of an operation and for the argument
/// shape of its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldShape(IndexMap<String, FieldNode>);

impl FieldShape {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_leaf(&mut self, name: impl Into<String>) {
        self.0.insert(name.into(), FieldNode::Leaf);
    }

    pub fn insert_nested(&mut self, name: impl Into<String>, shape: FieldShape) {
        self.0.insert(name.into(), FieldNode::Nested(shape));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldNode> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldNode)> {
        self.0.iter().map(|(name, node)| (name.as_str(), node))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the leaves directly under this shape, in order.
    pub fn leaf_names(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(name, _)| name)
    }

    /// Every leaf reachable from this shape, as dotted paths.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_leaf_paths("", &mut paths);
        paths
    }

    fn collect_leaf_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        for (name, node) in self.iter() {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            };
            match node {
                FieldNode::Leaf => paths.push(path),
                FieldNode::Nested(shape) => shape.collect_leaf_paths(&path, paths),
            }
        }
    }
}

/// Ordered mapping of `$`-prefixed variable names to declared types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableMap(IndexMap<String, TypeRef>);

impl VariableMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `$name`; a later declaration of the same name replaces the
    /// earlier type but keeps its position.
    pub fn declare(&mut self, name: &str, ty: TypeRef) {
        self.0.insert(format!("${name}"), ty);
    }

    /// Looks up a declaration by its `$`-prefixed key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypeRef> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeRef)> {
        self.0.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Variable names without the `$` prefix.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|key| key.trim_start_matches('$'))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Composite type names visited during one top-level expansion.
///
/// A type may be entered while it occurs fewer than [`RecursionGuard::LIMIT`]
/// times in the visit sequence. The sequence is never reset between sibling
/// fields, so cycles through shared ancestors are bounded as well as direct
/// self-references.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    visited: Vec<String>,
}

impl RecursionGuard {
    pub const LIMIT: usize = 2;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a visit to `type_name` and returns whether expansion may
    /// descend into it.
    pub fn enter(&mut self, type_name: &str) -> bool {
        self.visited.push(type_name.to_string());
        self.occurrences(type_name) < Self::LIMIT
    }

    #[must_use]
    pub fn occurrences(&self, type_name: &str) -> usize {
        self.visited.iter().filter(|v| *v == type_name).count()
    }

    /// The visit sequence so far.
    #[must_use]
    pub fn visited(&self) -> &[String] {
        &self.visited
    }
}
