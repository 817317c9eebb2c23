use std::{fmt, str::FromStr};

use itertools::Itertools;
use serde_json::Value;
use serde_with::DeserializeFromStr;

/// A value placed in an argument, a variable or a variable default.
///
/// `Absent` and `Null` are distinct everywhere: an absent argument is left out
/// of the query, an absent variable is left out of the variables object, and an
/// absent list element is dropped, while `Null` always renders as `null`.
///
/// In configuration files values are written as text: `absent`, `null`, a JSON
/// scalar such as `1.5` or `"text"`, or a bracketed list of those.
#[derive(Debug, Clone, PartialEq, DeserializeFromStr)]
pub enum ProbeValue {
    Absent,
    Null,
    Literal(Value),
    List(Vec<ProbeValue>),
}

impl ProbeValue {
    pub fn list(items: impl IntoIterator<Item = ProbeValue>) -> Self {
        ProbeValue::List(items.into_iter().collect())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ProbeValue::Absent)
    }

    /// Renders the value as a GraphQL input literal, `None` when the literal
    /// must be omitted.
    pub fn to_graphql(&self) -> Option<String> {
        match self {
            ProbeValue::Absent => None,
            ProbeValue::Null => Some("null".to_owned()),
            ProbeValue::Literal(value) => Some(graphql_literal(value)),
            ProbeValue::List(items) => Some(format!("[{}]", items.iter().filter_map(Self::to_graphql).join(", "))),
        }
    }

    /// Converts the value to JSON for a variables object, `None` when the
    /// variable must not be sent at all.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            ProbeValue::Absent => None,
            ProbeValue::Null => Some(Value::Null),
            ProbeValue::Literal(value) => Some(value.clone()),
            ProbeValue::List(items) => Some(Value::Array(items.iter().filter_map(Self::to_json).collect())),
        }
    }
}

fn graphql_literal(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("[{}]", items.iter().map(graphql_literal).join(", ")),
        Value::Object(fields) => format!(
            "{{{}}}",
            fields
                .iter()
                .map(|(name, value)| format!("{name}: {}", graphql_literal(value)))
                .join(", ")
        ),
        // JSON scalars and GraphQL scalars share their notation
        scalar => scalar.to_string(),
    }
}

impl fmt::Display for ProbeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeValue::Absent => f.write_str("absent"),
            ProbeValue::Null => f.write_str("null"),
            ProbeValue::Literal(value) => write!(f, "{value}"),
            ProbeValue::List(items) => write!(f, "[{}]", items.iter().join(", ")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseValueError {
    #[error("unclosed list in `{0}`")]
    UnclosedList(String),
    #[error("empty list element in `{0}`")]
    EmptyElement(String),
    #[error("only scalar literals are supported, got `{0}`")]
    UnsupportedLiteral(String),
    #[error("invalid literal `{text}`: {source}")]
    InvalidLiteral {
        text: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FromStr for ProbeValue {
    type Err = ParseValueError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();

        match text {
            "absent" => return Ok(ProbeValue::Absent),
            "null" => return Ok(ProbeValue::Null),
            _ => (),
        }

        if let Some(rest) = text.strip_prefix('[') {
            let inner = rest
                .strip_suffix(']')
                .ok_or_else(|| ParseValueError::UnclosedList(text.to_owned()))?;

            return split_list_elements(inner, text)?
                .into_iter()
                .map(str::parse::<ProbeValue>)
                .collect::<Result<Vec<_>, _>>()
                .map(ProbeValue::List);
        }

        match serde_json::from_str::<Value>(text) {
            Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => Ok(ProbeValue::Literal(value)),
            Ok(_) => Err(ParseValueError::UnsupportedLiteral(text.to_owned())),
            Err(source) => Err(ParseValueError::InvalidLiteral {
                text: text.to_owned(),
                source,
            }),
        }
    }
}

/// Splits the inside of a list on the commas that are neither nested in another
/// list nor part of a string.
fn split_list_elements<'a>(inner: &'a str, whole: &str) -> Result<Vec<&'a str>, ParseValueError> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (position, character) in inner.char_indices() {
        if in_string {
            match character {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => (),
            }
            continue;
        }

        match character {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                elements.push(&inner[start..position]);
                start = position + 1;
            }
            _ => (),
        }
    }

    if depth != 0 {
        return Err(ParseValueError::UnclosedList(whole.to_owned()));
    }

    elements.push(&inner[start..]);

    if elements.iter().any(|element| element.trim().is_empty()) {
        return Err(ParseValueError::EmptyElement(whole.to_owned()));
    }

    Ok(elements)
}
