//! Entigen developer CLI: scan a source tree for component declarations and
//! regenerate the accessor and lookup companion files.

mod scan;

use clap::Parser;
use entigen_build::{generate, lookup::LookupTable, plan};
use entigen_schema::{decl::Declaration, prelude::ComponentDescriptor};
use serde::Serialize;
use std::{path::PathBuf, process::ExitCode};
use thiserror::Error as ThisError;
use tracing::{error, info};

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(
    name = "entigen",
    about = "Generate component accessor and lookup code for an ECS runtime",
    version
)]
struct Cli {
    /// Project source root to scan for component declarations.
    source_root: PathBuf,

    /// Output root; generated files land in its `generated/` subdirectory.
    /// Defaults to the source root.
    #[arg(long, env = "ENTIGEN_OUTPUT")]
    output: Option<PathBuf>,

    /// Print extracted descriptors and allocated tables as JSON instead of
    /// writing files.
    #[arg(long)]
    dump_schema: bool,
}

///
/// CliError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
enum CliError {
    #[error(transparent)]
    Build(#[from] entigen_build::BuildError),

    #[error("schema dump failed: {0}")]
    Dump(#[from] serde_json::Error),

    #[error("{0} unit(s) of work failed")]
    Partial(usize),

    #[error(transparent)]
    Scan(#[from] scan::ScanError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let decls = scan::scan_sources(&cli.source_root)?;
    info!(declarations = decls.len(), "scan finished");

    if cli.dump_schema {
        return dump_schema(&decls);
    }

    let output_root = cli.output.clone().unwrap_or_else(|| cli.source_root.clone());
    let report = generate(&decls, &output_root)?;

    for name in &report.written {
        info!("generated {name}.rs");
    }

    finish(report.errors)
}

///
/// SchemaDump
///

#[derive(Serialize)]
struct SchemaDump<'a> {
    descriptors: &'a [ComponentDescriptor],
    tables: &'a [LookupTable],
}

fn dump_schema(decls: &[Declaration]) -> Result<(), CliError> {
    let outcome = plan(decls)?;

    let dump = SchemaDump {
        descriptors: &outcome.descriptors,
        tables: &outcome.tables,
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);

    finish(outcome.errors)
}

fn finish(errors: entigen_schema::error::ErrorTree) -> Result<(), CliError> {
    match errors.result() {
        Ok(()) => Ok(()),
        Err(errs) => {
            error!("{errs}");
            Err(CliError::Partial(errs.len()))
        }
    }
}
