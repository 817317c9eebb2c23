use serde_json::Value;

/// An input of the request a message was produced for: its name, its declared
/// type and the value it received, `None` when it received nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub name: String,
    pub ty: String,
    pub value: Option<Value>,
}

/// What the engine was asked. Some engines leave the declared type or the
/// offending value out of their messages, rules fill the gaps from here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationContext {
    /// The argument, with the value it ends up with once variables and
    /// defaults are applied.
    pub argument: Option<Input>,
    /// The variable, with the value sent in the variables object.
    pub variable: Option<Input>,
    pub variable_default: Option<Value>,
}

impl TranslationContext {
    /// Declared type of the argument position at `path` (`arg1`, `arg1.0`)
    /// when that position holds a null it does not accept.
    pub(crate) fn null_argument(&self, path: &str) -> Option<&str> {
        let argument = self.argument.as_ref()?;
        null_in_non_null(&argument.ty, argument.value.as_ref(), path)
    }

    /// Same as [`Self::null_argument`] for the default of the variable.
    pub(crate) fn null_variable_default(&self, path: &str) -> Option<&str> {
        let variable = self.variable.as_ref()?;
        null_in_non_null(&variable.ty, self.variable_default.as_ref(), path)
    }

    /// Name of a non-null variable that was sent an explicit null.
    pub(crate) fn null_non_null_variable(&self) -> Option<&str> {
        self.variable
            .as_ref()
            .filter(|variable| is_non_null(&variable.ty) && variable.value == Some(Value::Null))
            .map(|variable| variable.name.as_str())
    }

    /// Name of a non-null variable that received neither a value nor a default.
    pub(crate) fn missing_non_null_variable(&self) -> Option<&str> {
        self.variable
            .as_ref()
            .filter(|variable| is_non_null(&variable.ty) && variable.value.is_none() && self.variable_default.is_none())
            .map(|variable| variable.name.as_str())
    }
}

fn is_non_null(ty: &str) -> bool {
    ty.ends_with('!')
}

fn null_in_non_null<'a>(ty: &'a str, value: Option<&Value>, path: &str) -> Option<&'a str> {
    let (ty, value) = path.split('.').skip(1).try_fold((ty, value), |(ty, value), segment| {
        let index = segment.parse::<usize>().ok()?;
        let inner = ty.strip_suffix('!').unwrap_or(ty).strip_prefix('[')?.strip_suffix(']')?;

        Some((inner, value.and_then(|value| value.get(index))))
    })?;

    (is_non_null(ty) && value == Some(&Value::Null)).then_some(ty)
}
