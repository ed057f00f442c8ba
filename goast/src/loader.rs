//! Reads Go source files into modules

use crate::error::{CliError, CliResult};
use goast_parser::{parse_module_with_source, Module};
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn load_module(path: &Path) -> CliResult<Module> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let module = parse_module_with_source(&source, Some(path.display().to_string())).map_err(
        |source| CliError::Parse {
            path: path.to_path_buf(),
            source,
        },
    )?;

    debug!(
        path = %path.display(),
        package = %module.package,
        decls = module.decls.len(),
        "loaded module"
    );
    Ok(module)
}
