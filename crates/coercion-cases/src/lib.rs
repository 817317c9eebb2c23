//! Enumeration of GraphQL nullability and coercion cases.
//!
//! A [`SuiteDefinition`] names the dimensions to combine: the nullability of an
//! argument, the nullability of list elements, the values passed either inline
//! or through a variable, and the variable defaults. [`SuiteDefinition::cases`]
//! walks their cartesian product and every [`Case`] renders the schema, the
//! query and the variables needed to execute it against an engine.

mod case;
mod suite;
mod types;
mod value;

pub use case::{
    Case, CaseInput, VariableCase, ARGUMENT_NAME, FIELD_NAME, OPERATION_NAME, RESULT_TYPE_NAME, VARIABLE_NAME,
};
pub use suite::{SuiteDefinition, SuiteError, VariableDimensions};
pub use types::{Nullability, ScalarKind, TypeDescriptor};
pub use value::{ParseValueError, ProbeValue};
