//! Where a variable may be used. async-graphql substitutes variables before it
//! validates arguments and never compares the declared types, so a nullable
//! variable in a non-null position is only caught here.

use async_graphql_parser::{
    types::{BaseType, ExecutableDocument, Field, Selection, Type, VariableDefinition},
    Positioned,
};
use async_graphql_value::{ConstValue, Value};

use super::SchemaDocument;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(r#"Variable "${variable}" of type "{variable_type}" used in position expecting type "{location_type}"."#)]
pub(super) struct PositionMismatch {
    variable: String,
    variable_type: Type,
    location_type: Type,
}

/// First variable of the document used in a root field argument its type is
/// not allowed in.
pub(super) fn check_positions(schema: &SchemaDocument, document: &ExecutableDocument) -> Option<PositionMismatch> {
    document.operations.iter().find_map(|(_, operation)| {
        let operation = &operation.node;

        operation
            .selection_set
            .node
            .items
            .iter()
            .find_map(|selection| match &selection.node {
                Selection::Field(field) => check_field(schema, &operation.variable_definitions, &field.node),
                Selection::FragmentSpread(_) | Selection::InlineFragment(_) => None,
            })
    })
}

fn check_field(
    schema: &SchemaDocument,
    definitions: &[Positioned<VariableDefinition>],
    field: &Field,
) -> Option<PositionMismatch> {
    field.arguments.iter().find_map(|(name, value)| {
        let argument = schema.root_argument(&field.name.node, &name.node)?;
        check_value(
            definitions,
            &value.node,
            &argument.ty.node,
            argument.default_value.is_some(),
        )
    })
}

fn check_value(
    definitions: &[Positioned<VariableDefinition>],
    value: &Value,
    location: &Type,
    location_has_default: bool,
) -> Option<PositionMismatch> {
    match value {
        Value::Variable(name) => {
            let definition = definitions
                .iter()
                .map(|definition| &definition.node)
                .find(|definition| definition.name.node == *name)?;

            (!is_allowed(definition, location, location_has_default)).then(|| PositionMismatch {
                variable: name.to_string(),
                variable_type: definition.var_type.node.clone(),
                location_type: location.clone(),
            })
        }
        Value::List(items) => {
            let BaseType::List(inner) = &location.base else {
                return None;
            };

            items
                .iter()
                .find_map(|item| check_value(definitions, item, inner, false))
        }
        _ => None,
    }
}

// A nullable variable fits a non-null location when a non-null default stands
// in for the missing value.
fn is_allowed(definition: &VariableDefinition, location: &Type, location_has_default: bool) -> bool {
    let variable = &definition.var_type.node;

    if !location.nullable && variable.nullable {
        let has_non_null_default = definition
            .default_value
            .as_ref()
            .is_some_and(|default| default.node != ConstValue::Null);

        return (has_non_null_default || location_has_default) && is_base_compatible(&variable.base, &location.base);
    }

    is_compatible(variable, location)
}

fn is_compatible(variable: &Type, location: &Type) -> bool {
    (location.nullable || !variable.nullable) && is_base_compatible(&variable.base, &location.base)
}

fn is_base_compatible(variable: &BaseType, location: &BaseType) -> bool {
    match (variable, location) {
        (BaseType::Named(variable), BaseType::Named(location)) => variable == location,
        (BaseType::List(variable), BaseType::List(location)) => is_compatible(variable, location),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const SCHEMA: &str = r#"
        type Query {
          test(arg1: Float!, arg2: [Float!], arg3: Float! = 1.5, arg4: [Float]!): Float
        }
    "#;

    fn check(query: &str) -> Option<String> {
        let schema = SchemaDocument::parse(SCHEMA).unwrap();
        let document = async_graphql_parser::parse_query(query).unwrap();

        check_positions(&schema, &document).map(|mismatch| mismatch.to_string())
    }

    #[rstest]
    #[case::same_type("query($var1: Float!) { test(arg1: $var1) }")]
    #[case::non_null_default("query($var1: Float = 2.5) { test(arg1: $var1) }")]
    #[case::argument_default("query($var1: Float) { test(arg3: $var1) }")]
    #[case::non_null_into_nullable("query($var1: [Float!]!) { test(arg2: $var1) }")]
    #[case::nullable_items("query($var1: [Float]!) { test(arg4: $var1) }")]
    #[case::list_element("query($var1: Float!) { test(arg2: [$var1]) }")]
    #[case::undeclared("query { test(arg1: $var1) }")]
    fn allowed_positions(#[case] query: &str) {
        assert_eq!(check(query), None);
    }

    #[test]
    fn nullable_variable_in_non_null_position() {
        insta::assert_snapshot!(
            check("query($var1: Float) { test(arg1: $var1) }").unwrap(),
            @r###"Variable "$var1" of type "Float" used in position expecting type "Float!"."###
        );
    }

    #[test]
    fn null_default_does_not_count() {
        assert!(check("query($var1: Float = null) { test(arg1: $var1) }").is_some());
    }

    #[test]
    fn list_items_are_compared() {
        insta::assert_snapshot!(
            check("query($var1: [Float]) { test(arg2: $var1) }").unwrap(),
            @r###"Variable "$var1" of type "[Float]" used in position expecting type "[Float!]"."###
        );
        insta::assert_snapshot!(
            check("query($var1: Float) { test(arg2: [$var1]) }").unwrap(),
            @r###"Variable "$var1" of type "Float" used in position expecting type "Float!"."###
        );
    }

    #[test]
    fn mismatched_types() {
        assert!(check("query($var1: Int!) { test(arg1: $var1) }").is_some());
        assert!(check("query($var1: [Float]) { test(arg4: $var1) }").is_some());
        assert!(check("query($var1: Float!) { test(arg4: $var1) }").is_some());
    }
}
