pub mod emit;
pub mod lookup;
pub mod writer;

use crate::{
    emit::GeneratedFile,
    lookup::{LookupTable, allocate_lookups},
};
use entigen_schema::{component::extract_components, decl::Declaration, error::ErrorTree, prelude::ComponentDescriptor};
use std::path::Path;
use thiserror::Error as ThisError;
use tracing::info;

///
/// BuildError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum BuildError {
    #[error("no declarations supplied; refusing to touch the output location")]
    NoDeclarations,

    #[error("output location is unusable: {0}")]
    Output(#[from] std::io::Error),
}

///
/// GenerationPlan
/// The pure outcome of extraction, allocation and emission. Nothing in here
/// has touched the filesystem.
///

#[derive(Debug)]
pub struct GenerationPlan {
    pub descriptors: Vec<ComponentDescriptor>,
    pub tables: Vec<LookupTable>,
    pub files: Vec<GeneratedFile>,
    pub errors: ErrorTree,
}

/// Extract, allocate and emit across all registered emitter strategies.
///
/// Table-level emission runs before component-level emission because the
/// accessor templates reference the constants the lookup stage defines. A
/// failure while emitting one component's code never prevents emission for
/// the others; per-descriptor failures accumulate into the plan.
pub fn plan(decls: &[Declaration]) -> Result<GenerationPlan, BuildError> {
    if decls.is_empty() {
        return Err(BuildError::NoDeclarations);
    }

    let (descriptors, mut errors) = extract_components(decls);
    let tables = allocate_lookups(&descriptors);

    let mut files = Vec::new();

    for table in &tables {
        files.push(emit::lookup::generate(table));
    }
    files.push(emit::pools::generate(&tables));

    for descriptor in descriptors.iter().filter(|d| !d.skip_generation) {
        match emit::accessors::generate(descriptor) {
            Ok(file) => files.push(file),
            Err(e) => errors.add(e),
        }
    }

    Ok(GenerationPlan {
        descriptors,
        tables,
        files,
        errors,
    })
}

///
/// GenerationReport
///

#[derive(Debug)]
pub struct GenerationReport {
    /// File names written to disk, in emission order.
    pub written: Vec<String>,

    /// Accumulated non-fatal problems: skipped descriptors, failed writes.
    pub errors: ErrorTree,
}

/// Full generation run: plan, clean the output location, write every file
/// record. Partial output from a failed run is acceptable; the next run
/// clears the output location first.
pub fn generate(decls: &[Declaration], output_root: &Path) -> Result<GenerationReport, BuildError> {
    let mut outcome = plan(decls)?;

    let dir = writer::clean_dir(output_root)?;
    let (written, write_errors) = writer::write_files(&dir, &outcome.files);
    outcome.errors.merge(write_errors);

    info!(
        components = outcome.descriptors.len(),
        tables = outcome.tables.len(),
        files = written.len(),
        "generation finished"
    );

    Ok(GenerationReport {
        written,
        errors: outcome.errors,
    })
}
