//! Scalar classification and type-reference normalization.

use serde::{Deserialize, Serialize};

use crate::schema::SdlSchema;
use crate::{Error, Result};

/// Scalars every GraphQL schema provides.
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "ID", "Boolean", "Float"];

/// The set of type names selected as leaves: the built-in scalars plus any
/// custom scalars the caller declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ScalarSet {
    names: Vec<String>,
}

impl ScalarSet {
    /// Creates a scalar set from custom scalar names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a custom scalar name is blank.
    pub fn new<I, S>(custom: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in custom {
            set.insert(name.into())?;
        }
        Ok(set)
    }

    /// Adds the `scalar` declarations found in an SDL schema.
    #[must_use]
    pub fn with_schema_scalars(mut self, schema: &SdlSchema) -> Self {
        for name in schema.declared_scalars() {
            if !self.contains(name) {
                self.names.push(name.clone());
            }
        }
        self
    }

    /// Returns whether the bare type name is a scalar.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.names.iter().any(|name| name == type_name)
    }

    /// All scalar names, built-ins first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    fn insert(&mut self, name: String) -> Result<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::Configuration(
                "custom scalar names must not be blank".into(),
            ));
        }
        if !self.contains(trimmed) {
            self.names.push(trimmed.to_string());
        }
        Ok(())
    }
}

impl Default for ScalarSet {
    fn default() -> Self {
        Self {
            names: BUILTIN_SCALARS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for ScalarSet {
    type Error = Error;

    fn try_from(custom: Vec<String>) -> Result<Self> {
        Self::new(custom)
    }
}

impl From<ScalarSet> for Vec<String> {
    fn from(set: ScalarSet) -> Self {
        set.names
    }
}

/// Returns whether `type_name` is a member of `scalars`.
#[must_use]
pub fn is_scalar(type_name: &str, scalars: &ScalarSet) -> bool {
    scalars.contains(type_name)
}

/// Strips list and non-null markers (`[`, `]`, `!`) from a type reference.
#[must_use]
pub fn normalize(type_ref: &str) -> String {
    type_ref
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '!'))
        .collect()
}
