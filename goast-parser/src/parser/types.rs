// Type expression parsing
// Handles every Go type form along with parameter, field and method lists

use crate::ast::*;
use crate::error::*;
use crate::parser::{GoastParser, Rule};
use pest::iterators::Pair;

impl GoastParser {
    /// Parse a `type_expr` pair
    pub(crate) fn parse_type(pair: Pair<Rule>) -> ParseResult<TypeExpr> {
        if pair.as_rule() != Rule::type_expr {
            return Self::parse_type_form(pair);
        }
        let mut inner = pair.clone().into_inner();
        let form = Self::expect_inner(&pair, &mut inner, "a type")?;
        Self::parse_type_form(form)
    }

    fn parse_type_form(pair: Pair<Rule>) -> ParseResult<TypeExpr> {
        let rule = pair.as_rule();
        let mut inner = pair.clone().into_inner();

        match rule {
            Rule::type_name => {
                let ident = Self::expect_inner(&pair, &mut inner, "a type name")?;
                Ok(TypeExpr::Name(ident.as_str().to_string()))
            }
            Rule::qualified_ident => {
                let (package, name) = Self::parse_qualified(pair)?;
                Ok(TypeExpr::Qualified(package, name))
            }
            Rule::pointer_type => {
                let target = Self::expect_inner(&pair, &mut inner, "a pointer target")?;
                Ok(TypeExpr::Pointer(Box::new(Self::parse_type(target)?)))
            }
            Rule::slice_type => {
                let elem = Self::expect_inner(&pair, &mut inner, "a slice element type")?;
                Ok(TypeExpr::Array {
                    len: None,
                    elem: Box::new(Self::parse_type(elem)?),
                })
            }
            Rule::array_type => {
                let len = Self::expect_inner(&pair, &mut inner, "an array length")?;
                let elem = Self::expect_inner(&pair, &mut inner, "an array element type")?;
                Ok(TypeExpr::Array {
                    len: Some(len.as_str().trim().to_string()),
                    elem: Box::new(Self::parse_type(elem)?),
                })
            }
            Rule::map_type => {
                let key = Self::expect_inner(&pair, &mut inner, "a map key type")?;
                let value = Self::expect_inner(&pair, &mut inner, "a map value type")?;
                Ok(TypeExpr::Map {
                    key: Box::new(Self::parse_type(key)?),
                    value: Box::new(Self::parse_type(value)?),
                })
            }
            Rule::recv_chan_type => {
                let value = Self::expect_inner(&pair, &mut inner, "a channel element type")?;
                Ok(TypeExpr::Channel {
                    dir: ChanDir::Recv,
                    value: Box::new(Self::parse_type(value)?),
                })
            }
            Rule::chan_type => {
                let mut dir = ChanDir::Both;
                let mut value = None;
                for part in inner {
                    match part.as_rule() {
                        Rule::send_arrow => dir = ChanDir::Send,
                        Rule::type_expr => value = Some(Self::parse_type(part)?),
                        _ => return Err(Self::unexpected_rule(&part, "channel element type")),
                    }
                }
                let value = value
                    .ok_or_else(|| Self::unexpected_token_from_pair(&pair, "a channel element type"))?;
                Ok(TypeExpr::Channel {
                    dir,
                    value: Box::new(value),
                })
            }
            Rule::func_type => {
                let signature = Self::expect_inner(&pair, &mut inner, "a function signature")?;
                let (params, results) = Self::parse_signature(signature)?;
                Ok(TypeExpr::Function { params, results })
            }
            Rule::struct_type => {
                let mut fields = Vec::new();
                for field in inner {
                    fields.push(Self::parse_field_decl(field)?);
                }
                Ok(TypeExpr::Struct(FieldList::new(fields)))
            }
            Rule::interface_type => {
                let mut methods = Vec::new();
                for method in inner {
                    methods.push(Self::parse_method_spec(method)?);
                }
                Ok(TypeExpr::Interface(FieldList::new(methods)))
            }
            Rule::paren_type => {
                let target = Self::expect_inner(&pair, &mut inner, "a type")?;
                Ok(TypeExpr::Paren(Box::new(Self::parse_type(target)?)))
            }
            Rule::variadic_type => {
                let elem = Self::expect_inner(&pair, &mut inner, "a variadic element type")?;
                Ok(TypeExpr::Variadic(Box::new(Self::parse_type(elem)?)))
            }
            _ => Err(Self::unexpected_token_from_pair(&pair, "a type")),
        }
    }

    fn parse_qualified(pair: Pair<Rule>) -> ParseResult<(String, String)> {
        let mut inner = pair.clone().into_inner();
        let package = Self::expect_inner(&pair, &mut inner, "a package name")?;
        let name = Self::expect_inner(&pair, &mut inner, "a type name")?;
        Ok((package.as_str().to_string(), name.as_str().to_string()))
    }

    /// Parse a `signature` into parameter and result lists
    pub(crate) fn parse_signature(pair: Pair<Rule>) -> ParseResult<(FieldList, FieldList)> {
        let mut inner = pair.clone().into_inner();
        let params = Self::expect_inner(&pair, &mut inner, "a parameter list")?;
        let params = Self::parse_parameters(params)?;

        let results = match inner.next() {
            Some(result) => Self::parse_result(result)?,
            None => FieldList::default(),
        };

        Ok((params, results))
    }

    fn parse_result(pair: Pair<Rule>) -> ParseResult<FieldList> {
        let mut inner = pair.clone().into_inner();
        let result = Self::expect_inner(&pair, &mut inner, "a result type")?;
        match result.as_rule() {
            Rule::parameters => Self::parse_parameters(result),
            Rule::type_expr => Ok(FieldList::new(vec![Field::anonymous(Self::parse_type(
                result,
            )?)])),
            _ => Err(Self::unexpected_rule(&result, "result list or type")),
        }
    }

    /// Parse a parenthesised parameter list
    pub(crate) fn parse_parameters(pair: Pair<Rule>) -> ParseResult<FieldList> {
        let mut fields = Vec::new();

        for decl in pair.into_inner() {
            let mut inner = decl.clone().into_inner();
            let entry = Self::expect_inner(&decl, &mut inner, "a parameter")?;
            match entry.as_rule() {
                Rule::named_parameter => {
                    let mut parts = entry.clone().into_inner();
                    let names = Self::expect_inner(&entry, &mut parts, "parameter names")?;
                    let ty = Self::expect_inner(&entry, &mut parts, "a parameter type")?;
                    fields.push(Field::new(
                        Self::parse_identifier_list(names),
                        Self::parse_param_type(ty)?,
                    ));
                }
                Rule::param_type => fields.push(Field::anonymous(Self::parse_param_type(entry)?)),
                _ => return Err(Self::unexpected_rule(&entry, "parameter")),
            }
        }

        Ok(FieldList::new(fields))
    }

    fn parse_param_type(pair: Pair<Rule>) -> ParseResult<TypeExpr> {
        let mut inner = pair.clone().into_inner();
        let ty = Self::expect_inner(&pair, &mut inner, "a parameter type")?;
        Self::parse_type(ty)
    }

    pub(crate) fn parse_identifier_list(pair: Pair<Rule>) -> Vec<String> {
        pair.into_inner()
            .map(|ident| ident.as_str().to_string())
            .collect()
    }

    fn parse_field_decl(pair: Pair<Rule>) -> ParseResult<Field> {
        let mut inner = pair.clone().into_inner();
        let entry = Self::expect_inner(&pair, &mut inner, "a struct field")?;

        let mut field = match entry.as_rule() {
            Rule::named_field => {
                let mut parts = entry.clone().into_inner();
                let names = Self::expect_inner(&entry, &mut parts, "field names")?;
                let ty = Self::expect_inner(&entry, &mut parts, "a field type")?;
                Field::new(Self::parse_identifier_list(names), Self::parse_type(ty)?)
            }
            Rule::embedded_field => {
                let mut pointer = false;
                let mut ty = None;
                for part in entry.clone().into_inner() {
                    match part.as_rule() {
                        Rule::embedded_pointer => pointer = true,
                        _ => ty = Some(Self::parse_type(part)?),
                    }
                }
                let ty = ty.ok_or_else(|| {
                    Self::unexpected_token_from_pair(&entry, "an embedded type name")
                })?;
                if pointer {
                    Field::anonymous(TypeExpr::Pointer(Box::new(ty)))
                } else {
                    Field::anonymous(ty)
                }
            }
            _ => return Err(Self::unexpected_rule(&entry, "struct field")),
        };

        if let Some(tag) = inner.next() {
            field.tag = Some(tag.as_str().to_string());
        }

        Ok(field)
    }

    fn parse_method_spec(pair: Pair<Rule>) -> ParseResult<Field> {
        let mut inner = pair.clone().into_inner();
        let entry = Self::expect_inner(&pair, &mut inner, "an interface method")?;

        match entry.as_rule() {
            Rule::method_elem => {
                let mut parts = entry.clone().into_inner();
                let name = Self::expect_inner(&entry, &mut parts, "a method name")?;
                let signature = Self::expect_inner(&entry, &mut parts, "a method signature")?;
                let (params, results) = Self::parse_signature(signature)?;
                Ok(Field::named(
                    name.as_str(),
                    TypeExpr::Function { params, results },
                ))
            }
            Rule::embedded_elem => {
                let mut parts = entry.clone().into_inner();
                let ty = Self::expect_inner(&entry, &mut parts, "an embedded interface")?;
                Ok(Field::anonymous(Self::parse_type(ty)?))
            }
            _ => Err(Self::unexpected_rule(&entry, "interface method")),
        }
    }
}
