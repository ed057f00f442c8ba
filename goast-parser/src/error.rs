// Goast Parser Error Handling
// Source-highlighted error reporting with miette

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error")]
    #[diagnostic(
        code(goast::parse::pest_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unexpected token")]
    #[diagnostic(
        code(goast::parse::unexpected_token),
        help("Expected one of: {expected}")
    )]
    UnexpectedToken {
        #[source_code]
        src: String,
        #[label("found this")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Invalid import path {found}")]
    #[diagnostic(
        code(goast::parse::invalid_import_path),
        help("Import paths must be non-empty quoted strings")
    )]
    InvalidImportPath {
        #[source_code]
        src: String,
        #[label("invalid import path")]
        span: SourceSpan,
        found: String,
    },

    #[error("Unexpected grammar rule")]
    #[diagnostic(
        code(goast::parse::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule {
        expected: String,
        found: Rule,
        span: crate::ast::Span,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } => {
                let mut message_parts = vec![format!("{}", error)];

                if !positives.is_empty() {
                    let expected: Vec<String> = positives
                        .iter()
                        .map(rule_to_user_friendly_description)
                        .collect();
                    message_parts.push(format!("\nexpected {}", expected.join(" or ")));
                }

                let context = parsing_context(&src, &error.location);
                if !context.is_empty() {
                    message_parts.push(format!("\nwhile parsing {}", context));
                }

                message_parts.join("")
            }
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        ParseError::PestError { src, span, message }
    }

    /// Create an unexpected token error
    pub fn unexpected_token(src: String, span: SourceSpan, expected: String) -> Self {
        ParseError::UnexpectedToken {
            src,
            span,
            expected,
        }
    }

    pub fn invalid_import_path(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidImportPath { src, span, found }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

fn rule_to_user_friendly_description(rule: &Rule) -> String {
    match rule {
        Rule::identifier | Rule::identifier_list => "an identifier (like Pipeline)".to_string(),
        Rule::package_clause => "a package clause (package name)".to_string(),
        Rule::import_decl | Rule::import_spec => "an import (import \"fmt\")".to_string(),
        Rule::import_path => "a quoted import path".to_string(),
        Rule::type_decl | Rule::type_spec => "a type declaration (type Name T)".to_string(),
        Rule::func_decl => "a function declaration (func Name(...) { ... })".to_string(),
        Rule::value_decl => "a var or const declaration".to_string(),
        Rule::type_expr => "a type (like []T, map[K]V or chan T)".to_string(),
        Rule::parameters => "a parameter list (like (a int, b string))".to_string(),
        Rule::parameter_decl | Rule::named_parameter => "a parameter".to_string(),
        Rule::signature => "a function signature".to_string(),
        Rule::field_decl => "a struct field".to_string(),
        Rule::method_spec => "an interface method".to_string(),
        Rule::func_body => "a function body ({ ... })".to_string(),
        Rule::string_lit | Rule::raw_string_lit => "a string literal".to_string(),
        Rule::EOI => "end of input".to_string(),
        other => format!("{:?}", other).replace('_', " "),
    }
}

fn parsing_context(src: &str, location: &pest::error::InputLocation) -> String {
    let pos = match location {
        pest::error::InputLocation::Pos(pos) => *pos,
        pest::error::InputLocation::Span((start, _)) => *start,
    };
    let before = &src[..pos.min(src.len())];

    // Closest enclosing declaration keyword on or before the failing line
    for line in before.lines().rev() {
        let trimmed = line.trim_start();
        for keyword in ["type", "func", "import", "package", "var", "const"] {
            if trimmed.starts_with(keyword) {
                return format!("the declaration `{}`", trimmed.trim_end());
            }
        }
    }
    String::new()
}
