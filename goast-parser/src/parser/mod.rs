// Goast Parser
// Pest-based parser for Go declarations

mod decls;
mod types;

use crate::ast::*;
use crate::error::*;
use miette::SourceSpan;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct GoastParser;

impl GoastParser {
    /// Parse a complete Go source file
    pub fn parse_module(input: &str) -> ParseResult<Module> {
        Self::parse_module_with_source(input, None)
    }

    pub fn parse_module_with_source(
        input: &str,
        source_name: Option<String>,
    ) -> ParseResult<Module> {
        let mut pairs = Self::parse(Rule::source_file, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;

        let source_file = pairs.next().ok_or_else(|| {
            ParseError::unexpected_token(
                input.to_string(),
                SourceSpan::new(0.into(), 0),
                "a package clause".to_string(),
            )
        })?;

        let mut module = Self::parse_source_file(source_file)?;
        module.source_name = source_name;
        Ok(module)
    }

    /// Parse a standalone type expression such as `map[string]<-chan T`
    pub fn parse_type_expr(input: &str) -> ParseResult<TypeExpr> {
        let pairs = Self::parse(Rule::type_expr_only, input)
            .map_err(|e| ParseError::from_pest_error(e, input.to_string()))?;

        for pair in pairs.flatten() {
            if pair.as_rule() == Rule::type_expr {
                return Self::parse_type(pair);
            }
        }

        Err(ParseError::unexpected_token(
            input.to_string(),
            SourceSpan::new(0.into(), input.len()),
            "a type".to_string(),
        ))
    }

    pub(crate) fn span_from_pair(pair: &pest::iterators::Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::new(span.start(), span.end())
    }

    pub(crate) fn source_span_from_pair(pair: &pest::iterators::Pair<Rule>) -> SourceSpan {
        let span = pair.as_span();
        SourceSpan::new(span.start().into(), span.end() - span.start())
    }

    pub(crate) fn unexpected_token_from_pair(
        pair: &pest::iterators::Pair<Rule>,
        expected: &str,
    ) -> ParseError {
        ParseError::unexpected_token(
            pair.get_input().to_string(),
            Self::source_span_from_pair(pair),
            expected.to_string(),
        )
    }

    pub(crate) fn unexpected_rule(pair: &pest::iterators::Pair<Rule>, expected: &str) -> ParseError {
        ParseError::UnexpectedRule {
            expected: expected.to_string(),
            found: pair.as_rule(),
            span: Self::span_from_pair(pair),
        }
    }

    /// Take the next inner pair or fail with an error pointing at the parent
    pub(crate) fn expect_inner<'i>(
        parent: &pest::iterators::Pair<'i, Rule>,
        inner: &mut pest::iterators::Pairs<'i, Rule>,
        expected: &str,
    ) -> ParseResult<pest::iterators::Pair<'i, Rule>> {
        inner
            .next()
            .ok_or_else(|| Self::unexpected_token_from_pair(parent, expected))
    }
}
