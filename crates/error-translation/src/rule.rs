use std::fmt;

use regex::{Captures, Regex};

use crate::TranslationContext;

/// Builds the target message, or declines with `None` when the context shows
/// the match is about another condition.
pub type Rewrite = Box<dyn Fn(&Captures<'_>, &TranslationContext) -> Option<String> + Send + Sync>;

/// A pattern over the source message and the function building the target
/// message from its captures.
pub struct TranslationRule {
    name: &'static str,
    pattern: Regex,
    rewrite: Rewrite,
}

impl TranslationRule {
    pub fn new(
        name: &'static str,
        pattern: &str,
        rewrite: impl Fn(&Captures<'_>, &TranslationContext) -> Option<String> + Send + Sync + 'static,
    ) -> Result<Self, regex::Error> {
        Ok(TranslationRule {
            name,
            pattern: Regex::new(pattern)?,
            rewrite: Box::new(rewrite),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The rewritten message, `None` if the pattern does not match or the
    /// rewrite declines.
    pub fn apply(&self, message: &str, context: &TranslationContext) -> Option<String> {
        let captures = self.pattern.captures(message)?;
        (self.rewrite)(&captures, context)
    }
}

impl fmt::Debug for TranslationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}
