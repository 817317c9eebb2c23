use std::sync::OnceLock;

use serde::Deserialize;

use crate::{rules, TranslationContext, TranslationRule};

/// The engine whose wording a translator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// The reference JavaScript implementation.
    GraphqlJs,
    /// The Rust engine the probe executes against.
    AsyncGraphql,
}

impl Dialect {
    pub fn translator(self) -> &'static Translator {
        static GRAPHQL_JS: OnceLock<Translator> = OnceLock::new();
        static ASYNC_GRAPHQL: OnceLock<Translator> = OnceLock::new();

        match self {
            Dialect::GraphqlJs => GRAPHQL_JS.get_or_init(|| Translator::new(rules::graphql_js::rules())),
            Dialect::AsyncGraphql => ASYNC_GRAPHQL.get_or_init(|| Translator::new(rules::async_graphql::rules())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Rewritten { rule: &'static str, message: String },
    Unchanged(String),
}

impl Translation {
    pub fn message(&self) -> &str {
        match self {
            Translation::Rewritten { message, .. } | Translation::Unchanged(message) => message,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Translation::Rewritten { message, .. } | Translation::Unchanged(message) => message,
        }
    }

    /// Name of the rule that produced the message.
    pub fn rule(&self) -> Option<&'static str> {
        match self {
            Translation::Rewritten { rule, .. } => Some(*rule),
            Translation::Unchanged(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct Translator {
    rules: Vec<TranslationRule>,
}

impl Translator {
    pub fn new(rules: Vec<TranslationRule>) -> Self {
        Translator { rules }
    }

    pub fn rules(&self) -> impl Iterator<Item = &TranslationRule> {
        self.rules.iter()
    }

    /// Applies the rules in order without knowing the request, the first
    /// match wins.
    pub fn translate(&self, message: &str) -> Translation {
        self.translate_with(message, &TranslationContext::default())
    }

    /// Applies the rules in order, the first rule that matches and accepts the
    /// context wins.
    pub fn translate_with(&self, message: &str, context: &TranslationContext) -> Translation {
        self.rules
            .iter()
            .find_map(|rule| {
                rule.apply(message, context).map(|message| Translation::Rewritten {
                    rule: rule.name(),
                    message,
                })
            })
            .unwrap_or_else(|| Translation::Unchanged(message.to_owned()))
    }

    /// Translates a message that went through JSON serialization, quotes and
    /// escapes included, and serializes the result the same way. Text that is
    /// not a JSON string is translated as is.
    pub fn translate_serialized(&self, text: &str) -> String {
        match serde_json::from_str::<String>(text) {
            Ok(message) => serde_json::Value::String(self.translate(&message).into_message()).to_string(),
            Err(_) => self.translate(text).into_message(),
        }
    }
}
