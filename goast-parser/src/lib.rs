// Goast Parser Library
// Pest-based parser and printer for the subset of Go that specialization needs

pub mod ast;
pub mod error;
pub mod parser;
pub mod printer;

pub use ast::*;
pub use error::*;
pub use parser::*;
pub use printer::{print_decl, print_module};

// Re-export parser rule for manual testing
pub use parser::Rule;

pub fn parse_module(input: &str) -> Result<Module, ParseError> {
    parser::GoastParser::parse_module(input)
}

pub fn parse_module_with_source(
    input: &str,
    source_name: Option<String>,
) -> Result<Module, ParseError> {
    parser::GoastParser::parse_module_with_source(input, source_name)
}

pub fn parse_type_expr(input: &str) -> Result<TypeExpr, ParseError> {
    parser::GoastParser::parse_type_expr(input)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests;
