use std::fmt;

use clap::ValueEnum;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogLevel {
    /// Completely disables logging
    Off,
    /// Only errors from the probe
    Error,
    /// Warnings and errors from the probe
    Warn,
    /// Progress, warning and error messages from the probe
    #[default]
    Info,
    /// Per-case details from the probe
    Debug,
    /// Everything, dependencies included
    Trace,
}

impl LogLevel {
    pub(crate) fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "coercion_probe=error,off",
            LogLevel::Warn => "coercion_probe=warn,off",
            LogLevel::Info => "coercion_probe=info,off",
            LogLevel::Debug => "coercion_probe=debug,off",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value_name(self, f)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogStyle {
    /// Standard text
    #[default]
    Text,
    /// JSON objects
    Json,
}

impl fmt::Display for LogStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value_name(self, f)
    }
}

/// Writes the name clap accepts on the command line for the value.
fn write_value_name(value: &impl ValueEnum, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.to_possible_value() {
        Some(possible) => f.write_str(possible.get_name()),
        None => Ok(()),
    }
}
