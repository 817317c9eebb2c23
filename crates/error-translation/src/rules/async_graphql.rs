use super::{non_null_variable, non_null_violation, rule, variable_type_mismatch};
use crate::TranslationRule;

// async-graphql names the type without its `!` and gives no hint the value was
// a null, so these rules only fire when the context confirms a null reached a
// non-null position. Paths are the input name followed by list indices
// (`arg1.0`).
pub(crate) fn rules() -> Vec<TranslationRule> {
    vec![
        // A variable substituted before validation reports as the argument.
        rule(
            "null_non_null_variable",
            r#"^Invalid value for (?:argument|variable) "\$?[^"]+", expected type "[^"]+"$"#,
            |_, context| context.null_non_null_variable().map(non_null_variable),
        ),
        rule(
            "missing_required_variable",
            r#"^Variable "?\$?(?P<variable>\w+)"? is not defined\.$"#,
            |captures, context| {
                context
                    .missing_non_null_variable()
                    .filter(|name| *name == &captures["variable"])
                    .map(non_null_variable)
            },
        ),
        rule(
            "default_non_null",
            r#"^Invalid default value for (?:argument|variable):? "\$?(?P<path>[^"]+)", expected type "[^"]+"$"#,
            |captures, context| context.null_variable_default(&captures["path"]).map(non_null_violation),
        ),
        rule(
            "argument_non_null",
            r#"^Invalid value for argument "(?P<path>[^"]+)", expected type "[^"]+"$"#,
            |captures, context| context.null_argument(&captures["path"]).map(non_null_violation),
        ),
        rule(
            "variable_type_mismatch",
            r#"^Variable "\$?(?P<variable>\w+)" of type "(?P<variable_type>[^"]+)" used in position expecting type "(?P<argument_type>[^"]+)"\.?$"#,
            |captures, _| {
                Some(variable_type_mismatch(
                    &captures["variable"],
                    &captures["variable_type"],
                    &captures["argument_type"],
                ))
            },
        ),
    ]
}
