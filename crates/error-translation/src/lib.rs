//! Rewrites the error messages of one GraphQL engine into the wording another
//! engine uses for the same condition.
//!
//! A [`Translator`] holds an ordered list of [`TranslationRule`]s. The first
//! rule whose pattern matches the message produces the rewritten text; a
//! message no rule matches is passed through unchanged. A
//! [`TranslationContext`] describing the request lets rules recover what a
//! terse message leaves out.

mod context;
mod notation;
mod rule;
mod rules;
mod translator;

pub use context::{Input, TranslationContext};
pub use notation::wrapper_notation;
pub use rule::{Rewrite, TranslationRule};
pub use translator::{Dialect, Translation, Translator};
