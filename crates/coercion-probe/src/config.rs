use std::{collections::HashSet, fs, path::Path};

use coercion_cases::{SuiteDefinition, SuiteError};
use serde_json::{Map, Value};
use serde_with::json::JsonString;

use crate::engine::EngineRequest;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Suite(#[from] SuiteError),
    #[error("suite `{0}` is defined more than once")]
    DuplicateSuite(String),
    #[error("no suite named `{0}`")]
    UnknownSuite(String),
    #[error("the probe file declares no requests")]
    NoRequests,
}

/// A set of suite definitions, one `[[suite]]` table each.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SuitesConfig {
    #[serde(default, rename = "suite")]
    pub suites: Vec<SuiteDefinition>,
}

impl SuitesConfig {
    pub(crate) fn builtin() -> Self {
        SuitesConfig {
            suites: SuiteDefinition::builtin(),
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub(crate) fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<SuitesConfig>(input)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();

        for suite in &self.suites {
            if !names.insert(suite.name.as_str()) {
                return Err(ConfigError::DuplicateSuite(suite.name.clone()));
            }

            suite.validate()?;
        }

        Ok(())
    }

    /// The suites with the given names, in definition order. No names means
    /// every suite.
    pub(crate) fn select(self, names: &[String]) -> Result<Vec<SuiteDefinition>, ConfigError> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.suites.iter().any(|suite| &suite.name == *name))
        {
            return Err(ConfigError::UnknownSuite(unknown.clone()));
        }

        Ok(self
            .suites
            .into_iter()
            .filter(|suite| names.is_empty() || names.contains(&suite.name))
            .collect())
    }
}

/// A schema and hand-written requests to execute against it.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProbeFile {
    pub schema: String,
    #[serde(default, rename = "request")]
    pub requests: Vec<ProbeRequest>,
}

#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProbeRequest {
    pub query: String,
    /// A JSON object, written as a string.
    #[serde_as(as = "Option<JsonString>")]
    pub variables: Option<Map<String, Value>>,
}

impl ProbeFile {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub(crate) fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let file = toml::from_str::<ProbeFile>(input)?;

        if file.requests.is_empty() {
            return Err(ConfigError::NoRequests);
        }

        Ok(file)
    }

    pub(crate) fn into_requests(self) -> Vec<EngineRequest> {
        let ProbeFile { schema, requests } = self;

        requests
            .into_iter()
            .map(|request| EngineRequest {
                schema_sdl: schema.clone(),
                query: request.query,
                variables: request.variables.unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use coercion_cases::{Nullability, ProbeValue, ScalarKind};
    use indoc::indoc;
    use serde_json::json;

    use super::*;

    #[test]
    fn suites() {
        let input = indoc! {r#"
            [[suite]]
            name = "int_literals"
            scalar = "Int"
            argument_nullabilities = ["nullable", "non_null"]
            argument_values = ["absent", "null", "2", "\"text\""]

            [[suite]]
            name = "id_list_variables"
            scalar = "ID"
            list = true
            argument_nullabilities = ["non_null"]
            argument_inner_nullabilities = ["nullable"]

            [suite.variable]
            nullabilities = ["nullable"]
            inner_nullabilities = ["non_null"]
            values = ["[null]", "[\"a\", \"b\"]"]
            defaults = ["absent"]
        "#};

        let config = SuitesConfig::from_toml(input).unwrap();

        assert_eq!(config.suites.len(), 2);

        let literals = &config.suites[0];
        assert_eq!(literals.scalar, ScalarKind::Int);
        assert_eq!(literals.argument_nullabilities, Nullability::ALL);
        assert_eq!(
            literals.argument_values,
            [
                ProbeValue::Absent,
                ProbeValue::Null,
                ProbeValue::Literal(json!(2)),
                ProbeValue::Literal(json!("text")),
            ]
        );
        assert_eq!(literals.cases().count(), 8);

        let variables = &config.suites[1];
        assert_eq!(variables.cases().count(), 2);
        assert_eq!(
            variables.cases().last().unwrap().query(),
            r#"query MyQuery($var1: [ID!]) { test(arg1: $var1) { arg1 } }"#
        );
    }

    #[test]
    fn unknown_field() {
        let input = indoc! {r#"
            [[suite]]
            name = "typo"
            scalar = "Float"
            argument_nullability = ["nullable"]
        "#};

        assert!(matches!(SuitesConfig::from_toml(input), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_suite() {
        let input = indoc! {r#"
            [[suite]]
            name = "list_without_inner"
            scalar = "Float"
            list = true
            argument_nullabilities = ["nullable"]
            argument_values = ["null"]
        "#};

        let error = SuitesConfig::from_toml(input).unwrap_err();

        insta::assert_snapshot!(error.to_string(), @"suite `list_without_inner` declares a list argument without inner nullabilities");
    }

    #[test]
    fn duplicate_suite() {
        let input = indoc! {r#"
            [[suite]]
            name = "twice"
            scalar = "Float"
            argument_nullabilities = ["nullable"]
            argument_values = ["null"]

            [[suite]]
            name = "twice"
            scalar = "Int"
            argument_nullabilities = ["nullable"]
            argument_values = ["null"]
        "#};

        assert!(matches!(
            SuitesConfig::from_toml(input),
            Err(ConfigError::DuplicateSuite(name)) if name == "twice"
        ));
    }

    #[test]
    fn selection() {
        let names = |suites: Vec<SuiteDefinition>| suites.into_iter().map(|suite| suite.name).collect::<Vec<_>>();

        let all = SuitesConfig::builtin().select(&[]).unwrap();
        assert_eq!(all.len(), 4);

        let selected = SuitesConfig::builtin()
            .select(&[
                "nonlist_argument_with_variables_nullability".to_owned(),
                "nonlist_argument_nullability".to_owned(),
            ])
            .unwrap();

        assert_eq!(
            names(selected),
            [
                "nonlist_argument_nullability",
                "nonlist_argument_with_variables_nullability"
            ]
        );

        assert!(matches!(
            SuitesConfig::builtin().select(&["missing".to_owned()]),
            Err(ConfigError::UnknownSuite(name)) if name == "missing"
        ));
    }

    #[test]
    fn probe_file() {
        let input = indoc! {r#"
            schema = """
            type result { arg1: Float }
            type Query { test(arg1: Float): result! }
            """

            [[request]]
            query = "query MyQuery { test(arg1: null) { arg1 } }"

            [[request]]
            query = "query MyQuery($var1: Float) { test(arg1: $var1) { arg1 } }"
            variables = '{"var1": 1.5}'
        "#};

        let requests = ProbeFile::from_toml(input).unwrap().into_requests();

        assert_eq!(requests.len(), 2);
        assert!(requests[0].variables.is_empty());
        assert_eq!(Value::Object(requests[1].variables.clone()), json!({"var1": 1.5}));
        assert!(requests[1].schema_sdl.contains("test(arg1: Float): result!"));
    }

    #[test]
    fn probe_file_without_requests() {
        let input = indoc! {r#"
            schema = "type Query { test: Int }"
        "#};

        assert!(matches!(ProbeFile::from_toml(input), Err(ConfigError::NoRequests)));
    }
}
