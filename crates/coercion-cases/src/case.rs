use indoc::formatdoc;
use serde_json::{Map, Value};

use crate::{ProbeValue, TypeDescriptor};

pub const OPERATION_NAME: &str = "MyQuery";
pub const FIELD_NAME: &str = "test";
pub const ARGUMENT_NAME: &str = "arg1";
pub const VARIABLE_NAME: &str = "var1";
pub const RESULT_TYPE_NAME: &str = "result";

/// One concrete scenario: a single `test(arg1: T)` field fed either with an
/// inline literal or with a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub argument: TypeDescriptor,
    pub input: CaseInput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseInput {
    Literal(ProbeValue),
    Variable(VariableCase),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableCase {
    pub ty: TypeDescriptor,
    pub value: ProbeValue,
    pub default: ProbeValue,
}

impl Case {
    pub fn literal(argument: TypeDescriptor, value: ProbeValue) -> Self {
        Case {
            argument,
            input: CaseInput::Literal(value),
        }
    }

    pub fn variable(argument: TypeDescriptor, variable: VariableCase) -> Self {
        Case {
            argument,
            input: CaseInput::Variable(variable),
        }
    }

    pub fn argument_value(&self) -> Option<&ProbeValue> {
        match &self.input {
            CaseInput::Literal(value) => Some(value),
            CaseInput::Variable(_) => None,
        }
    }

    pub fn variable_case(&self) -> Option<&VariableCase> {
        match &self.input {
            CaseInput::Literal(_) => None,
            CaseInput::Variable(variable) => Some(variable),
        }
    }

    /// The schema declaring the argument, echoed back through the `result` type.
    pub fn schema_sdl(&self) -> String {
        let ty = self.argument;

        formatdoc! {r#"
            type {RESULT_TYPE_NAME} {{
              {ARGUMENT_NAME}: {ty}
            }}

            type Query {{
              {FIELD_NAME}({ARGUMENT_NAME}: {ty}): {RESULT_TYPE_NAME}!
            }}
        "#}
    }

    pub fn query(&self) -> String {
        match &self.input {
            CaseInput::Literal(value) => match value.to_graphql() {
                Some(value) => {
                    format!("query {OPERATION_NAME} {{ {FIELD_NAME}({ARGUMENT_NAME}: {value}) {{ {ARGUMENT_NAME} }} }}")
                }
                // `test(arg1)` is not valid syntax, an absent argument is left out
                None => format!("query {OPERATION_NAME} {{ {FIELD_NAME} {{ {ARGUMENT_NAME} }} }}"),
            },
            CaseInput::Variable(variable) => {
                let ty = variable.ty;
                let default = variable
                    .default
                    .to_graphql()
                    .map(|default| format!(" = {default}"))
                    .unwrap_or_default();

                format!(
                    "query {OPERATION_NAME}(${VARIABLE_NAME}: {ty}{default}) {{ {FIELD_NAME}({ARGUMENT_NAME}: ${VARIABLE_NAME}) {{ {ARGUMENT_NAME} }} }}"
                )
            }
        }
    }

    /// The variables object sent with the query. Empty for literal cases and for
    /// absent variable values.
    pub fn variables(&self) -> Map<String, Value> {
        let mut variables = Map::new();

        if let Some(value) = self.variable_case().and_then(|variable| variable.value.to_json()) {
            variables.insert(VARIABLE_NAME.to_owned(), value);
        }

        variables
    }
}
