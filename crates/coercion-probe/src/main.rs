#![cfg_attr(test, allow(unused_crate_dependencies))]

use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use anyhow::Context;
use args::{Command, GenerateCommand, ListCommand, ProbeCommand, SuiteSelection};
use clap::crate_version;
use coercion_cases::SuiteDefinition;
use error_translation::Dialect;
use tokio::runtime;

use config::{ProbeFile, SuitesConfig};
use engine::EchoEngine;

mod args;
mod config;
mod engine;
mod lua;
mod report;
mod runner;

const THREAD_NAME: &str = "coercion-probe";

fn main() -> anyhow::Result<()> {
    let args = self::args::parse();
    args.init_logging();

    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name(THREAD_NAME)
        .build()?;

    runtime.block_on(async move {
        let crate_version = crate_version!();
        tracing::info!("Coercion probe {crate_version}");

        let result = match args.command {
            Command::Generate(command) => generate(command).await,
            Command::List(command) => list(command),
            Command::Probe(command) => probe(command).await,
        };

        if let Err(ref error) = result {
            tracing::error!("{error:#}");
        }

        result
    })
}

fn load_suites(selection: &SuiteSelection) -> anyhow::Result<Vec<SuiteDefinition>> {
    let config = match &selection.suites {
        Some(path) => {
            SuitesConfig::load(path).with_context(|| format!("loading suites from {}", path.display()))?
        }
        None => SuitesConfig::builtin(),
    };

    Ok(config.select(&selection.names)?)
}

async fn generate(command: GenerateCommand) -> anyhow::Result<()> {
    let suites = load_suites(&command.selection)?;
    let translator = Dialect::from(command.dialect).translator();
    let engine = EchoEngine;

    let writer: Box<dyn Write> = match &command.output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("creating {}", path.display()))?),
        None => Box::new(io::stdout().lock()),
    };
    let mut output = BufWriter::new(writer);

    output.write_all(lua::HEADER.as_bytes())?;

    for suite in &suites {
        tracing::info!(suite = %suite.name, "executing suite");

        let executed = runner::run_suite(&engine, suite, command.concurrency.get())
            .await
            .with_context(|| format!("executing suite {}", suite.name))?;

        for executed in &executed {
            writeln!(output)?;
            output.write_all(lua::render_test(&suite.name, executed, translator).as_bytes())?;
        }

        tracing::info!(suite = %suite.name, cases = executed.len(), "suite done");
    }

    output.flush()?;

    Ok(())
}

fn list(command: ListCommand) -> anyhow::Result<()> {
    let suites = load_suites(&command.selection)?;
    let mut output = BufWriter::new(io::stdout().lock());

    for suite in &suites {
        for (position, case) in suite.cases().enumerate() {
            writeln!(output, "{}", report::render_case(&suite.name, position + 1, &case))?;
        }
    }

    output.flush()?;

    Ok(())
}

async fn probe(command: ProbeCommand) -> anyhow::Result<()> {
    let requests = ProbeFile::load(&command.path)
        .with_context(|| format!("loading probe file {}", command.path.display()))?
        .into_requests();

    let outcomes = runner::run_requests(&EchoEngine, requests.clone(), command.concurrency.get()).await?;
    let mut output = BufWriter::new(io::stdout().lock());

    for (position, (request, outcome)) in requests.iter().zip(&outcomes).enumerate() {
        writeln!(output, "{}", report::render_response(position + 1, request, outcome)?)?;
    }

    output.flush()?;

    Ok(())
}
