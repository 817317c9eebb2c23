use std::{io::IsTerminal, num::NonZeroUsize, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use error_translation::Dialect;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

mod log;

pub(crate) use log::LogLevel;

use self::log::LogStyle;

#[derive(Debug, Parser)]
#[command(name = "coercion-probe", version)]
#[command(arg_required_else_help = true)]
/// Probes GraphQL argument coercion and generates Lua test suites from the results
pub(crate) struct Args {
    /// Set the logging level
    #[arg(long = "log", env = "COERCION_PROBE_LOG", default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,
    /// Set the style of log output
    #[arg(long, env = "COERCION_PROBE_LOG_STYLE", default_value_t = LogStyle::Text, global = true)]
    log_style: LogStyle,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Execute the suites and print a luatest suite mirroring the results
    Generate(GenerateCommand),
    /// Print the enumerated cases without executing them
    List(ListCommand),
    /// Execute the requests of a probe file and print the raw responses
    Probe(ProbeCommand),
}

#[derive(Debug, clap::Args)]
pub(crate) struct SuiteSelection {
    /// Path to a TOML file with suite definitions. The built-in suites are used when omitted.
    #[arg(long, env = "COERCION_PROBE_SUITES")]
    pub suites: Option<PathBuf>,
    /// Only take the suite with this name. Can be repeated.
    #[arg(long = "suite", value_name = "NAME")]
    pub names: Vec<String>,
}

#[derive(Debug, clap::Args)]
pub(crate) struct GenerateCommand {
    #[command(flatten)]
    pub selection: SuiteSelection,
    /// Maximum number of cases executed at the same time
    #[arg(long, default_value = "8")]
    pub concurrency: NonZeroUsize,
    /// Write the suite to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Wording of the error messages to translate
    #[arg(long, value_enum, default_value_t = DialectArg::AsyncGraphql)]
    pub dialect: DialectArg,
}

#[derive(Debug, clap::Args)]
pub(crate) struct ListCommand {
    #[command(flatten)]
    pub selection: SuiteSelection,
}

#[derive(Debug, clap::Args)]
pub(crate) struct ProbeCommand {
    /// Path to the TOML probe file
    pub path: PathBuf,
    /// Maximum number of requests executed at the same time
    #[arg(long, default_value = "8")]
    pub concurrency: NonZeroUsize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub(crate) enum DialectArg {
    /// graphql-js messages
    GraphqlJs,
    /// async-graphql messages
    AsyncGraphql,
}

impl From<DialectArg> for Dialect {
    fn from(dialect: DialectArg) -> Self {
        match dialect {
            DialectArg::GraphqlJs => Dialect::GraphqlJs,
            DialectArg::AsyncGraphql => Dialect::AsyncGraphql,
        }
    }
}

impl Args {
    /// Installs the global subscriber. Logs go to stderr, stdout is reserved for
    /// the generated output.
    pub(crate) fn init_logging(&self) {
        let filter = EnvFilter::new(self.log_level.as_filter_str());
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match self.log_style {
            LogStyle::Text => layer.with_ansi(std::io::stderr().is_terminal()).boxed(),
            LogStyle::Json => layer.json().boxed(),
        };

        tracing_subscriber::registry().with(layer).with(filter).init();
    }
}

pub(crate) fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_command() {
        Args::command().debug_assert();
    }

    #[test]
    fn generate_defaults() {
        let args = Args::try_parse_from(["coercion-probe", "generate"]).unwrap();

        assert_eq!(args.log_level, LogLevel::Info);

        let Command::Generate(command) = args.command else {
            unreachable!("expected the generate command");
        };

        assert_eq!(command.concurrency.get(), 8);
        assert_eq!(command.dialect, DialectArg::AsyncGraphql);
        assert!(command.output.is_none());
        assert!(command.selection.names.is_empty());
    }

    #[test]
    fn repeated_suite_filters() {
        let args = Args::try_parse_from([
            "coercion-probe",
            "list",
            "--suite",
            "nonlist_argument_nullability",
            "--suite",
            "list_argument_nullability",
            "--log",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.log_level, LogLevel::Debug);

        let Command::List(command) = args.command else {
            unreachable!("expected the list command");
        };

        assert_eq!(
            command.selection.names,
            ["nonlist_argument_nullability", "list_argument_nullability"]
        );
    }

    #[test]
    fn dialect_names() {
        let args = Args::try_parse_from(["coercion-probe", "generate", "--dialect", "graphql-js"]).unwrap();

        let Command::Generate(command) = args.command else {
            unreachable!("expected the generate command");
        };

        assert_eq!(Dialect::from(command.dialect), Dialect::GraphqlJs);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(Args::try_parse_from(["coercion-probe", "probe", "probe.toml", "--concurrency", "0"]).is_err());
    }
}
