//! Rule sets per source engine. Every set targets the wording of the Lua
//! `graphql` module.

pub(crate) mod async_graphql;
pub(crate) mod graphql_js;

use regex::Captures;

use crate::{wrapper_notation, TranslationContext, TranslationRule};

fn rule(
    name: &'static str,
    pattern: &str,
    rewrite: impl Fn(&Captures<'_>, &TranslationContext) -> Option<String> + Send + Sync + 'static,
) -> TranslationRule {
    TranslationRule::new(name, pattern, rewrite).expect("must be valid")
}

fn non_null_violation(ty: &str) -> String {
    format!(r#"Expected non-null for "{}", got null"#, wrapper_notation(ty))
}

fn non_null_variable(variable: &str) -> String {
    format!(r#"Variable "{variable}" expected to be non-null"#)
}

fn variable_type_mismatch(variable: &str, variable_type: &str, argument_type: &str) -> String {
    format!(
        r#"Variable "{variable}" type mismatch: the variable type "{}" is not compatible with the argument type "{}""#,
        wrapper_notation(variable_type),
        wrapper_notation(argument_type),
    )
}
