// Declaration parsing
// Package clause, imports, type/func/value declarations and token-stream bodies

use crate::ast::*;
use crate::error::*;
use crate::parser::{GoastParser, Rule};
use pest::iterators::Pair;

impl GoastParser {
    pub(crate) fn parse_source_file(pair: Pair<Rule>) -> ParseResult<Module> {
        let mut module = Module::new(String::new());

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::package_clause => {
                    let mut inner = item.clone().into_inner();
                    let name = Self::expect_inner(&item, &mut inner, "a package name")?;
                    module.package = name.as_str().to_string();
                }
                Rule::import_decl => module.imports.extend(Self::parse_import_decl(item)?),
                Rule::type_decl => module
                    .decls
                    .extend(Self::parse_type_decl(item)?.into_iter().map(Decl::Type)),
                Rule::func_decl => module.decls.push(Decl::Func(Self::parse_func_decl(item)?)),
                Rule::value_decl => module
                    .decls
                    .push(Decl::Value(Self::parse_value_decl(item)?)),
                Rule::EOI => {}
                _ => return Err(Self::unexpected_rule(&item, "top level declaration")),
            }
        }

        Ok(module)
    }

    fn parse_import_decl(pair: Pair<Rule>) -> ParseResult<Vec<ImportSpec>> {
        let mut inner = pair.clone().into_inner();
        let body = Self::expect_inner(&pair, &mut inner, "an import")?;

        match body.as_rule() {
            Rule::import_spec => Ok(vec![Self::parse_import_spec(body)?]),
            Rule::import_group => body.into_inner().map(Self::parse_import_spec).collect(),
            _ => Err(Self::unexpected_rule(&body, "import spec or group")),
        }
    }

    fn parse_import_spec(pair: Pair<Rule>) -> ParseResult<ImportSpec> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut path = None;

        for part in pair.clone().into_inner() {
            match part.as_rule() {
                Rule::import_name => name = Some(part.as_str().to_string()),
                Rule::import_path => path = Some(Self::parse_import_path(&part)?),
                _ => return Err(Self::unexpected_rule(&part, "import name or path")),
            }
        }

        let path = path.ok_or_else(|| Self::unexpected_token_from_pair(&pair, "an import path"))?;
        Ok(ImportSpec { name, path, span })
    }

    fn parse_import_path(pair: &Pair<Rule>) -> ParseResult<String> {
        let quoted = pair.as_str();
        let path = &quoted[1..quoted.len() - 1];
        if path.is_empty() || path.contains(char::is_whitespace) {
            return Err(ParseError::invalid_import_path(
                pair.get_input().to_string(),
                Self::source_span_from_pair(pair),
                quoted.to_string(),
            ));
        }
        Ok(path.to_string())
    }

    fn parse_type_decl(pair: Pair<Rule>) -> ParseResult<Vec<TypeDecl>> {
        let mut inner = pair.clone().into_inner();
        let body = Self::expect_inner(&pair, &mut inner, "a type spec")?;

        match body.as_rule() {
            Rule::type_spec => Ok(vec![Self::parse_type_spec(body)?]),
            Rule::type_group => body.into_inner().map(Self::parse_type_spec).collect(),
            _ => Err(Self::unexpected_rule(&body, "type spec or group")),
        }
    }

    fn parse_type_spec(pair: Pair<Rule>) -> ParseResult<TypeDecl> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut alias = false;
        let mut ty = None;

        for part in pair.clone().into_inner() {
            match part.as_rule() {
                Rule::identifier => name = Some(part.as_str().to_string()),
                Rule::alias_marker => alias = true,
                Rule::type_expr => ty = Some(Self::parse_type(part)?),
                _ => return Err(Self::unexpected_rule(&part, "type spec")),
            }
        }

        let name = name.ok_or_else(|| Self::unexpected_token_from_pair(&pair, "a type name"))?;
        let ty = ty.ok_or_else(|| Self::unexpected_token_from_pair(&pair, "a type"))?;
        Ok(TypeDecl {
            name,
            alias,
            ty,
            span,
        })
    }

    fn parse_func_decl(pair: Pair<Rule>) -> ParseResult<FuncDecl> {
        let span = Self::span_from_pair(&pair);
        let mut receiver = None;
        let mut name = None;
        let mut signature = None;
        let mut body = None;

        for part in pair.clone().into_inner() {
            match part.as_rule() {
                Rule::receiver => {
                    let mut inner = part.clone().into_inner();
                    let params = Self::expect_inner(&part, &mut inner, "a receiver")?;
                    receiver = Some(Self::parse_parameters(params)?);
                }
                Rule::identifier => name = Some(part.as_str().to_string()),
                Rule::signature => signature = Some(Self::parse_signature(part)?),
                Rule::func_body => {
                    let mut tokens = Body::default();
                    Self::collect_group(part, &mut tokens);
                    body = Some(tokens);
                }
                _ => return Err(Self::unexpected_rule(&part, "function declaration")),
            }
        }

        let name = name.ok_or_else(|| Self::unexpected_token_from_pair(&pair, "a function name"))?;
        let (params, results) =
            signature.ok_or_else(|| Self::unexpected_token_from_pair(&pair, "a signature"))?;

        Ok(FuncDecl {
            name,
            receiver,
            params,
            results,
            body,
            span,
        })
    }

    fn parse_value_decl(pair: Pair<Rule>) -> ParseResult<ValueDecl> {
        let span = Self::span_from_pair(&pair);
        let mut keyword = ValueKeyword::Var;
        let mut body = Body::default();

        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::value_keyword => {
                    if part.as_str() == "const" {
                        keyword = ValueKeyword::Const;
                    }
                }
                _ => Self::collect_part(part, &mut body),
            }
        }

        Ok(ValueDecl {
            keyword,
            body,
            span,
        })
    }

    /// Flatten a bracketed group into the body, delimiters included
    fn collect_group(pair: Pair<Rule>, body: &mut Body) {
        let text = pair.as_str();
        let (open, close) = (&text[..1], &text[text.len() - 1..]);

        body.push_text(open);
        for part in pair.into_inner() {
            Self::collect_part(part, body);
        }
        body.push_text(close);
    }

    fn collect_part(pair: Pair<Rule>, body: &mut Body) {
        match pair.as_rule() {
            Rule::body_ident => body.push_ident(pair.as_str()),
            Rule::paren_group | Rule::brace_group | Rule::bracket_group | Rule::func_body => {
                Self::collect_group(pair, body)
            }
            _ => body.push_text(pair.as_str()),
        }
    }
}
