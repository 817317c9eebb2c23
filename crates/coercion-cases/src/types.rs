use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};

/// The built-in GraphQL scalars a case can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ScalarKind {
    Float,
    Int,
    String,
    Boolean,
    #[serde(rename = "ID")]
    Id,
}

impl ScalarKind {
    pub fn graphql_name(self) -> &'static str {
        match self {
            ScalarKind::Float => "Float",
            ScalarKind::Int => "Int",
            ScalarKind::String => "String",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Id => "ID",
        }
    }

    /// Key of the type in the `graphql_types` table of the generated Lua suite.
    pub fn lua_key(self) -> &'static str {
        match self {
            ScalarKind::Float => "float",
            ScalarKind::Int => "int",
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Id => "id",
        }
    }

    /// A representative literal of this scalar.
    pub fn sample(self) -> Value {
        match self {
            ScalarKind::Float => json!(1.11111),
            ScalarKind::Int => json!(1_073_741_824),
            ScalarKind::String => json!("Test string"),
            ScalarKind::Boolean => json!(true),
            ScalarKind::Id => json!("00000000-0000-0000-0000-000000000000"),
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.graphql_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    Nullable,
    NonNull,
}

impl Nullability {
    pub const ALL: [Nullability; 2] = [Nullability::Nullable, Nullability::NonNull];

    pub fn is_nullable(self) -> bool {
        matches!(self, Nullability::Nullable)
    }

    /// The type modifier appended to a type name.
    pub fn marker(self) -> &'static str {
        match self {
            Nullability::Nullable => "",
            Nullability::NonNull => "!",
        }
    }

    /// Name of the matching constant in the generated Lua suite.
    pub fn lua_name(self) -> &'static str {
        match self {
            Nullability::Nullable => "Nullable",
            Nullability::NonNull => "NonNullable",
        }
    }
}

/// Shape of an argument or variable type: a scalar, or a list of a scalar, each
/// level carrying its own nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub scalar: ScalarKind,
    pub nullability: Nullability,
    /// Nullability of the list elements. `None` for plain scalars.
    pub inner: Option<Nullability>,
}

impl TypeDescriptor {
    pub fn scalar(scalar: ScalarKind, nullability: Nullability) -> Self {
        TypeDescriptor {
            scalar,
            nullability,
            inner: None,
        }
    }

    pub fn list(scalar: ScalarKind, nullability: Nullability, inner: Nullability) -> Self {
        TypeDescriptor {
            scalar,
            nullability,
            inner: Some(inner),
        }
    }

    pub fn is_list(&self) -> bool {
        self.inner.is_some()
    }

    /// The element type of a list, `None` for plain scalars.
    pub fn inner_type(&self) -> Option<ScalarKind> {
        self.inner.map(|_| self.scalar)
    }

    pub fn lua_key(&self) -> &'static str {
        if self.is_list() {
            "list"
        } else {
            self.scalar.lua_key()
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(inner) => write!(f, "[{}{}]{}", self.scalar, inner.marker(), self.nullability.marker()),
            None => write!(f, "{}{}", self.scalar, self.nullability.marker()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_rendering() {
        assert_eq!(
            TypeDescriptor::scalar(ScalarKind::Float, Nullability::Nullable).to_string(),
            "Float"
        );
        assert_eq!(
            TypeDescriptor::scalar(ScalarKind::Float, Nullability::NonNull).to_string(),
            "Float!"
        );
        assert_eq!(TypeDescriptor::scalar(ScalarKind::Id, Nullability::NonNull).to_string(), "ID!");
    }

    #[test]
    fn list_rendering() {
        use Nullability::*;

        let render = |outer, inner| TypeDescriptor::list(ScalarKind::Float, outer, inner).to_string();

        assert_eq!(render(Nullable, Nullable), "[Float]");
        assert_eq!(render(NonNull, Nullable), "[Float]!");
        assert_eq!(render(Nullable, NonNull), "[Float!]");
        assert_eq!(render(NonNull, NonNull), "[Float!]!");
    }

    #[test]
    fn lua_keys() {
        let list = TypeDescriptor::list(ScalarKind::Int, Nullability::Nullable, Nullability::Nullable);

        assert_eq!(list.lua_key(), "list");
        assert_eq!(list.inner_type(), Some(ScalarKind::Int));

        let scalar = TypeDescriptor::scalar(ScalarKind::Int, Nullability::Nullable);

        assert_eq!(scalar.lua_key(), "int");
        assert_eq!(scalar.inner_type(), None);
    }

    #[test]
    fn deserialize_names() {
        #[derive(Deserialize)]
        struct Shape {
            scalar: ScalarKind,
            nullability: Nullability,
        }

        let shape: Shape = serde_json::from_str(r#"{"scalar": "ID", "nullability": "non_null"}"#).unwrap();

        assert_eq!(shape.scalar, ScalarKind::Id);
        assert_eq!(shape.nullability, Nullability::NonNull);
    }
}
