use super::{non_null_variable, non_null_violation, rule, variable_type_mismatch};
use crate::TranslationRule;

pub(crate) fn rules() -> Vec<TranslationRule> {
    vec![
        rule(
            "scalar_non_null",
            r#"^Expected value of type "(?P<type>\w+!)", found null\.$"#,
            |captures, _| Some(non_null_violation(&captures["type"])),
        ),
        rule(
            "list_non_null",
            r#"^Expected value of type "(?P<type>\[\w+\]!)", found null\.$"#,
            |captures, _| Some(non_null_violation(&captures["type"])),
        ),
        rule(
            "list_of_non_null",
            r#"^Expected value of type "(?P<type>\[\w+!\])", found null\.$"#,
            |captures, _| Some(non_null_violation(&captures["type"])),
        ),
        rule(
            "non_null_list_of_non_null",
            r#"^Expected value of type "(?P<type>\[\w+!\]!)", found null\.$"#,
            |captures, _| Some(non_null_violation(&captures["type"])),
        ),
        rule(
            "missing_required_variable",
            r#"^Variable "\$(?P<variable>\w+)" of required type "[^"]+" was not provided\.$"#,
            |captures, _| Some(non_null_variable(&captures["variable"])),
        ),
        rule(
            "null_non_null_variable",
            r#"^Variable "\$(?P<variable>\w+)" of non-null type "[^"]+" must not be null\.$"#,
            |captures, _| Some(non_null_variable(&captures["variable"])),
        ),
        rule(
            "variable_type_mismatch",
            r#"^Variable "\$(?P<variable>\w+)" of type "(?P<variable_type>[^"]+)" used in position expecting type "(?P<argument_type>[^"]+)"\.$"#,
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
