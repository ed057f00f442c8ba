//! Subcommand handlers

use crate::config::{provider_path, Config, Overrides, GOFILE_ENV};
use crate::decls::summarize;
use crate::error::{CliError, CliResult};
use crate::loader::load_module;
use crate::writer::{plan_outputs, write_outputs, OutputFile};
use goast_specializer::Specializer;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments of `goast write impl`
#[derive(Debug, Clone, Default)]
pub struct ImplRequest {
    pub generic: PathBuf,
    pub provider: Option<PathBuf>,
    pub overrides: Overrides,
    pub dry_run: bool,
}

/// Specialize `generic` against the provider file and write (or just plan) the outputs
pub fn write_impl(request: &ImplRequest, config: &Config) -> CliResult<Vec<OutputFile>> {
    let provider = provider_path(request.provider.clone(), std::env::var(GOFILE_ENV).ok())
        .ok_or(CliError::MissingProvider)?;

    info!(
        generic = %request.generic.display(),
        provider = %provider.display(),
        "implementing"
    );

    let template = load_module(&request.generic)?;
    let provider_module = load_module(&provider)?;
    let settings = config.resolve(&request.overrides);

    let outcome = Specializer::new(&template, &provider_module)
        .with_options(settings.options.clone())
        .specialize();
    let outputs = outcome.into_result(
        &request.generic.display().to_string(),
        &provider.display().to_string(),
    )?;

    let directory = match &settings.output_dir {
        Some(directory) => directory.clone(),
        None => provider_directory(&provider),
    };
    let files = plan_outputs(&outputs, &request.generic, &directory, &settings);

    if !request.dry_run {
        write_outputs(&files)?;
    }
    Ok(files)
}

fn provider_directory(provider: &Path) -> PathBuf {
    match provider.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn print_decls(file: &Path) -> CliResult<Vec<String>> {
    let module = load_module(file)?;
    Ok(summarize(&module))
}
