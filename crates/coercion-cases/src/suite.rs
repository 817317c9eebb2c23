use itertools::{iproduct, Either};
use serde::Deserialize;
use serde_json::json;

use crate::{Case, Nullability, ProbeValue, ScalarKind, TypeDescriptor, VariableCase};

/// The dimensions of one generated suite.
///
/// Without a `variable` section every case passes one of `argument_values`
/// inline. With it, the argument always receives `$var1` and the values come
/// from the variable dimensions instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteDefinition {
    pub name: String,
    pub scalar: ScalarKind,
    #[serde(default)]
    pub list: bool,
    pub argument_nullabilities: Vec<Nullability>,
    #[serde(default)]
    pub argument_inner_nullabilities: Vec<Nullability>,
    #[serde(default)]
    pub argument_values: Vec<ProbeValue>,
    #[serde(default)]
    pub variable: Option<VariableDimensions>,
}

/// Variables share the scalar and the list shape of the argument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableDimensions {
    pub nullabilities: Vec<Nullability>,
    #[serde(default)]
    pub inner_nullabilities: Vec<Nullability>,
    pub values: Vec<ProbeValue>,
    pub defaults: Vec<ProbeValue>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SuiteError {
    #[error("suite `{0}` declares a list argument without inner nullabilities")]
    MissingInnerNullabilities(String),
    #[error("suite `{0}` declares inner nullabilities for a non-list argument")]
    UnexpectedInnerNullabilities(String),
    #[error("suite `{0}` passes values inline and through a variable")]
    AmbiguousValues(String),
    #[error("suite `{0}` produces no cases")]
    Empty(String),
}

impl SuiteDefinition {
    /// Walks the cartesian product of the dimensions. The outermost dimension
    /// varies slowest: argument nullability, argument inner nullability, then
    /// either the argument value or the variable nullability, variable inner
    /// nullability, variable value and variable default.
    pub fn cases(&self) -> impl Iterator<Item = Case> + '_ {
        let arguments = self.type_shapes(&self.argument_nullabilities, &self.argument_inner_nullabilities);

        match &self.variable {
            None => Either::Left(
                iproduct!(arguments, &self.argument_values).map(|(argument, value)| Case::literal(argument, value.clone())),
            ),
            Some(variable) => Either::Right(
                iproduct!(
                    arguments,
                    self.type_shapes(&variable.nullabilities, &variable.inner_nullabilities),
                    &variable.values,
                    &variable.defaults
                )
                .map(|(argument, ty, value, default)| {
                    Case::variable(
                        argument,
                        VariableCase {
                            ty,
                            value: value.clone(),
                            default: default.clone(),
                        },
                    )
                }),
            ),
        }
    }

    /// Checks the dimensions are consistent with the argument shape.
    pub fn validate(&self) -> Result<(), SuiteError> {
        let inner_nullabilities = std::iter::once(&self.argument_inner_nullabilities)
            .chain(self.variable.as_ref().map(|variable| &variable.inner_nullabilities));

        for inner in inner_nullabilities {
            match (self.list, inner.is_empty()) {
                (true, true) => return Err(SuiteError::MissingInnerNullabilities(self.name.clone())),
                (false, false) => return Err(SuiteError::UnexpectedInnerNullabilities(self.name.clone())),
                _ => (),
            }
        }

        if self.variable.is_some() && !self.argument_values.is_empty() {
            return Err(SuiteError::AmbiguousValues(self.name.clone()));
        }

        if self.cases().next().is_none() {
            return Err(SuiteError::Empty(self.name.clone()));
        }

        Ok(())
    }

    fn type_shapes(&self, nullabilities: &[Nullability], inner_nullabilities: &[Nullability]) -> Vec<TypeDescriptor> {
        if self.list {
            iproduct!(nullabilities, inner_nullabilities)
                .map(|(&nullability, &inner)| TypeDescriptor::list(self.scalar, nullability, inner))
                .collect()
        } else {
            nullabilities
                .iter()
                .map(|&nullability| TypeDescriptor::scalar(self.scalar, nullability))
                .collect()
        }
    }

    /// The suites generated when no configuration file is given.
    pub fn builtin() -> Vec<SuiteDefinition> {
        let value = ProbeValue::Literal(ScalarKind::Float.sample());
        let default = ProbeValue::Literal(json!(0));

        vec![
            // `test(arg1)` is not valid syntax, so an absent argument drops
            // `arg1` from the field altogether.
            SuiteDefinition {
                name: "nonlist_argument_nullability".to_owned(),
                scalar: ScalarKind::Float,
                list: false,
                argument_nullabilities: Nullability::ALL.to_vec(),
                argument_inner_nullabilities: Vec::new(),
                argument_values: vec![ProbeValue::Absent, ProbeValue::Null, value.clone()],
                variable: None,
            },
            SuiteDefinition {
                name: "list_argument_nullability".to_owned(),
                scalar: ScalarKind::Float,
                list: true,
                argument_nullabilities: Nullability::ALL.to_vec(),
                argument_inner_nullabilities: Nullability::ALL.to_vec(),
                argument_values: vec![
                    ProbeValue::Absent,
                    ProbeValue::Null,
                    ProbeValue::list([ProbeValue::Absent]),
                    ProbeValue::list([ProbeValue::Null]),
                    ProbeValue::list([value.clone()]),
                ],
                variable: None,
            },
            SuiteDefinition {
                name: "nonlist_argument_with_variables_nullability".to_owned(),
                scalar: ScalarKind::Float,
                list: false,
                argument_nullabilities: Nullability::ALL.to_vec(),
                argument_inner_nullabilities: Vec::new(),
                argument_values: Vec::new(),
                variable: Some(VariableDimensions {
                    nullabilities: Nullability::ALL.to_vec(),
                    inner_nullabilities: Vec::new(),
                    values: vec![ProbeValue::Absent, ProbeValue::Null, value.clone()],
                    defaults: vec![ProbeValue::Absent, ProbeValue::Null, default.clone()],
                }),
            },
            SuiteDefinition {
                name: "list_argument_with_variables_nullability".to_owned(),
                scalar: ScalarKind::Float,
                list: true,
                argument_nullabilities: Nullability::ALL.to_vec(),
                argument_inner_nullabilities: Nullability::ALL.to_vec(),
                argument_values: Vec::new(),
                variable: Some(VariableDimensions {
                    nullabilities: Nullability::ALL.to_vec(),
                    inner_nullabilities: Nullability::ALL.to_vec(),
                    values: vec![
                        ProbeValue::Absent,
                        ProbeValue::Null,
                        ProbeValue::list([ProbeValue::Null]),
                        ProbeValue::list([value]),
                    ],
                    defaults: vec![ProbeValue::Absent, ProbeValue::list([default])],
                }),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn nonlist_suite() -> SuiteDefinition {
        SuiteDefinition {
            name: "nonlist".to_owned(),
            scalar: ScalarKind::Float,
            list: false,
            argument_nullabilities: Nullability::ALL.to_vec(),
            argument_inner_nullabilities: Vec::new(),
            argument_values: vec![ProbeValue::Absent, ProbeValue::Null, ProbeValue::Literal(json!(1.5))],
            variable: None,
        }
    }

    #[test]
    fn two_by_three_dimensions_give_six_distinct_cases() {
        let suite = nonlist_suite();
        let cases = suite.cases().collect::<Vec<_>>();

        assert_eq!(cases.len(), 6);

        let distinct = cases
            .iter()
            .map(|case| (case.argument.nullability, case.argument_value().cloned().unwrap().to_string()))
            .collect::<HashSet<_>>();

        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn outer_dimension_varies_slowest() {
        let suite = nonlist_suite();
        let order = suite
            .cases()
            .map(|case| format!("{} {}", case.argument, case.argument_value().unwrap()))
            .collect::<Vec<_>>();

        assert_eq!(
            order,
            [
                "Float absent",
                "Float null",
                "Float 1.5",
                "Float! absent",
                "Float! null",
                "Float! 1.5"
            ]
        );
    }

    #[test]
    fn builtin_suite_sizes() {
        let sizes = SuiteDefinition::builtin()
            .iter()
            .map(|suite| (suite.name.clone(), suite.cases().count()))
            .collect::<Vec<_>>();

        assert_eq!(
            sizes,
            [
                ("nonlist_argument_nullability".to_owned(), 6),
                ("list_argument_nullability".to_owned(), 20),
                ("nonlist_argument_with_variables_nullability".to_owned(), 36),
                ("list_argument_with_variables_nullability".to_owned(), 128),
            ]
        );
    }

    #[test]
    fn builtin_suites_are_valid() {
        for suite in SuiteDefinition::builtin() {
            assert_eq!(suite.validate(), Ok(()), "{}", suite.name);
        }
    }

    #[test]
    fn list_cases_carry_inner_nullability() {
        let suite = &SuiteDefinition::builtin()[1];
        let types = suite
            .cases()
            .map(|case| case.argument.to_string())
            .collect::<Vec<_>>()
            .chunks(5)
            .map(|chunk| chunk[0].clone())
            .collect::<Vec<_>>();

        assert_eq!(types, ["[Float]", "[Float!]", "[Float]!", "[Float!]!"]);
    }

    #[test]
    fn variable_cases_take_values_from_the_variable() {
        let suite = &SuiteDefinition::builtin()[2];
        let first = suite.cases().next().unwrap();

        assert_eq!(first.argument_value(), None);
        assert_eq!(first.query(), "query MyQuery($var1: Float) { test(arg1: $var1) { arg1 } }");

        let last = suite.cases().last().unwrap();

        assert_eq!(last.argument.to_string(), "Float!");
        assert_eq!(
            last.query(),
            "query MyQuery($var1: Float! = 0) { test(arg1: $var1) { arg1 } }"
        );
    }

    #[test]
    fn validation_errors() {
        let mut suite = nonlist_suite();
        suite.argument_inner_nullabilities = vec![Nullability::Nullable];

        assert_eq!(
            suite.validate(),
            Err(SuiteError::UnexpectedInnerNullabilities("nonlist".to_owned()))
        );

        suite.list = true;
        suite.argument_inner_nullabilities.clear();

        assert_eq!(
            suite.validate(),
            Err(SuiteError::MissingInnerNullabilities("nonlist".to_owned()))
        );

        let mut suite = nonlist_suite();
        suite.argument_values.clear();

        assert_eq!(suite.validate(), Err(SuiteError::Empty("nonlist".to_owned())));
    }
}
