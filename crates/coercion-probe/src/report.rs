//! Plain text output of the `list` and `probe` commands.

use coercion_cases::Case;
use indoc::formatdoc;
use serde_json::Value;

use crate::engine::{EngineRequest, ExecutionOutcome};

pub(crate) fn render_case(suite: &str, index: usize, case: &Case) -> String {
    let argument = case.argument;
    let query = case.query();
    let variables = Value::Object(case.variables());
    let schema = indent(&case.schema_sdl());

    formatdoc! {"
        # {suite} {index}
        argument: {argument}
        query: {query}
        variables: {variables}
        schema:
        {schema}
    "}
}

pub(crate) fn render_response(
    index: usize,
    request: &EngineRequest,
    outcome: &ExecutionOutcome,
) -> Result<String, serde_json::Error> {
    let query = &request.query;
    let variables = Value::Object(request.variables.clone());
    let data = match &outcome.data {
        Some(data) => serde_json::to_string_pretty(data)?,
        None => "(none)".to_owned(),
    };
    let errors = serde_json::to_string_pretty(&outcome.errors)?;

    Ok(formatdoc! {"
        # request {index}
        query: {query}
        variables: {variables}
        data: {data}
        errors: {errors}
    "})
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("    {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}
