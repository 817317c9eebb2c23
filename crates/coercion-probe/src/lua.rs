//! Rendering of executed cases as a `luatest` suite for the Tarantool
//! `graphql` module.

use coercion_cases::{Case, Nullability, ProbeValue, TypeDescriptor, ARGUMENT_NAME, VARIABLE_NAME};
use error_translation::{Input, Translation, TranslationContext, Translator};
use indoc::formatdoc;
use serde_json::Value;

use crate::runner::ExecutedCase;

/// Requires, constants and the `build_schema` helper shared by every test.
pub(crate) const HEADER: &str = include_str!("lua/header.lua");

const NIL: &str = "nil";

pub(crate) fn render_test(suite: &str, executed: &ExecutedCase, translator: &Translator) -> String {
    let ExecutedCase { index, case, outcome } = executed;

    let name = format!("test_{suite}_{}_{index}", case.argument.lua_key());
    let (argument_type, argument_nullability, argument_inner_type, argument_inner_nullability) =
        type_locals(Some(&case.argument));
    let argument_value = case.argument_value().map(lua_value).unwrap_or_else(|| NIL.to_owned());

    let variable = case.variable_case();
    let (variable_type, variable_nullability, variable_inner_type, variable_inner_nullability) =
        type_locals(variable.map(|variable| &variable.ty));
    let variable_value = variable
        .map(|variable| lua_value(&variable.value))
        .unwrap_or_else(|| NIL.to_owned());
    let variable_default = variable
        .map(|variable| lua_value(&variable.default))
        .unwrap_or_else(|| NIL.to_owned());

    let query = string_literal(&case.query());

    let expected_data = outcome
        .data
        .as_ref()
        .map(|data| string_literal(&data.to_string()))
        .unwrap_or_else(|| NIL.to_owned());

    let expected_error = match outcome.first_error() {
        Some(message) => {
            let translation = translator.translate_with(message, &translation_context(case));

            if let Translation::Unchanged(message) = &translation {
                tracing::warn!(suite, index, error = %message, "no translation rule matched the error");
            }

            string_literal(translation.message())
        }
        None => NIL.to_owned(),
    };

    formatdoc! {r#"
        g.{name} = function(g) -- luacheck: no unused
            local argument_type = {argument_type}
            local argument_nullability = {argument_nullability}
            local argument_inner_type = {argument_inner_type}
            local argument_inner_nullability = {argument_inner_nullability}
            local argument_value = {argument_value}
            local variable_type = {variable_type}
            local variable_nullability = {variable_nullability}
            local variable_inner_type = {variable_inner_type}
            local variable_inner_nullability = {variable_inner_nullability}
            local variable_default = {variable_default}
            local variable_value = {variable_value}

            local query_schema = build_schema(argument_type, argument_nullability,
                                              argument_inner_type, argument_inner_nullability)
            local query = {query}

            local ok, res = pcall(helpers.check_request, query, query_schema, nil, nil, {{variables = {{var1 = variable_value}}}})

            local result, err
            if ok then
                result = json.encode(res)
            else
                err = res
            end

            local expected_data_json = {expected_data}
            local expected_error_json = {expected_error}

            t.assert_equals(result, expected_data_json)
            t.assert_equals(err, expected_error_json)
        end
    "#}
}

/// Type key, nullability, inner type key and inner nullability as Lua
/// expressions.
fn type_locals(ty: Option<&TypeDescriptor>) -> (String, String, String, String) {
    let nullability = |nullability: Option<Nullability>| {
        nullability
            .map(Nullability::lua_name)
            .unwrap_or(NIL)
            .to_owned()
    };

    let Some(ty) = ty else {
        return (NIL.to_owned(), NIL.to_owned(), NIL.to_owned(), NIL.to_owned());
    };

    (
        format!("'{}'", ty.lua_key()),
        nullability(Some(ty.nullability)),
        ty.inner_type()
            .map(|scalar| format!("'{}'", scalar.lua_key()))
            .unwrap_or_else(|| NIL.to_owned()),
        nullability(ty.inner),
    )
}

/// `nil` stands for an absent value and `box.NULL` for an explicit null.
fn lua_value(value: &ProbeValue) -> String {
    match value {
        ProbeValue::Absent => NIL.to_owned(),
        ProbeValue::Null => "box.NULL".to_owned(),
        ProbeValue::Literal(literal) => json_to_lua(literal),
        ProbeValue::List(elements) => {
            let elements = elements
                .iter()
                .filter(|element| !element.is_absent())
                .map(lua_value)
                .collect::<Vec<_>>();

            format!("{{{}}}", elements.join(", "))
        }
    }
}

fn json_to_lua(value: &Value) -> String {
    match value {
        Value::Null => "box.NULL".to_owned(),
        Value::Bool(value) => value.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(string) => string_literal(string),
        Value::Array(values) => {
            let values = values.iter().map(json_to_lua).collect::<Vec<_>>();
            format!("{{{}}}", values.join(", "))
        }
        Value::Object(fields) => {
            let fields = fields
                .iter()
                .map(|(key, value)| format!("[{}] = {}", string_literal(key), json_to_lua(value)))
                .collect::<Vec<_>>();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

/// The declared types and the values a case sent, for the rules that need
/// more than the message.
pub(crate) fn translation_context(case: &Case) -> TranslationContext {
    let variable = case.variable_case();

    let argument_value = match variable {
        Some(variable) => variable.value.to_json().or_else(|| variable.default.to_json()),
        None => case.argument_value().and_then(ProbeValue::to_json),
    };

    TranslationContext {
        argument: Some(Input {
            name: ARGUMENT_NAME.to_owned(),
            ty: case.argument.to_string(),
            value: argument_value,
        }),
        variable: variable.map(|variable| Input {
            name: VARIABLE_NAME.to_owned(),
            ty: variable.ty.to_string(),
            value: variable.value.to_json(),
        }),
        variable_default: variable.and_then(|variable| variable.default.to_json()),
    }
}

/// A double-quoted Lua string.
fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');

    for character in text.chars() {
        match character {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            character if character.is_ascii_control() => {
                literal.push_str(&format!("\\{:03}", character as u32));
            }
            character => literal.push(character),
        }
    }

    literal.push('"');
    literal
}
