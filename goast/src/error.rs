//! Errors reported by the goast command line

use crate::config::ConfigError;
use goast_parser::ParseError;
use goast_specializer::GoastError;
use miette::Diagnostic;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to read {}", .path.display())]
    #[diagnostic(code(goast::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}", .path.display())]
    #[diagnostic(code(goast::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}", .path.display())]
    #[diagnostic(code(goast::parse::file))]
    Parse {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: ParseError,
    },

    #[error("No provider file given")]
    #[diagnostic(
        code(goast::cli::missing_provider),
        help("Pass the provider file as the second argument, or run from a go:generate line so $GOFILE is set")
    )]
    MissingProvider,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Specialize(#[from] GoastError),
}

pub type CliResult<T> = Result<T, CliError>;
