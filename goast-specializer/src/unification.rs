//! Structural unification of template types against candidate types
//!
//! Dispatch is on the shape of the template expression. Named template types
//! are resolved through the template module; empty interface declarations bind
//! whatever they are matched against. Every successful match grows a
//! [`Substitution`] that must stay consistent for the whole trial.

use crate::context::ModuleContext;
use crate::error::{MatchError, MatchResult};
use crate::substitution::{Binding, Substitution};
use goast_parser::{ChanDir, Field, FieldList, TypeDecl, TypeExpr};
use tracing::trace;

/// Matches template expressions against candidates from a provider module
#[derive(Debug, Clone, Copy)]
pub struct Unifier<'a> {
    template: &'a ModuleContext<'a>,
    provider: Option<&'a ModuleContext<'a>>,
}

impl<'a> Unifier<'a> {
    pub fn new(template: &'a ModuleContext<'a>) -> Self {
        Self {
            template,
            provider: None,
        }
    }

    /// Let structural template types look through named provider types
    pub fn with_provider(mut self, provider: &'a ModuleContext<'a>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Unify `template` with `candidate`, returning the grown substitution.
    /// The input substitution is left untouched.
    pub fn unify(
        &self,
        template: &TypeExpr,
        candidate: &TypeExpr,
        subst: &Substitution,
    ) -> MatchResult<Substitution> {
        let mut result = subst.clone();
        self.unify_expr(template, candidate, &mut result)?;
        Ok(result)
    }

    /// Implement the template declaration `target` with the provider declaration `candidate`
    pub fn unify_decl(
        &self,
        target: &TypeDecl,
        candidate: &TypeDecl,
        subst: &Substitution,
    ) -> MatchResult<Substitution> {
        let mut result = subst.clone();
        let implementation = TypeExpr::Name(candidate.name.clone());

        if target.is_placeholder() {
            result.bind(Binding::Name(target.name.clone()), implementation)?;
            return Ok(result);
        }

        // Bound up front so self references inside the body terminate
        result.bind(Binding::Name(target.name.clone()), implementation)?;
        self.unify_expr(&target.ty, &candidate.ty, &mut result)?;
        Ok(result)
    }

    fn unify_expr(
        &self,
        template: &TypeExpr,
        candidate: &TypeExpr,
        subst: &mut Substitution,
    ) -> MatchResult {
        trace!(template = %template, candidate = %candidate, "unify");

        match template {
            TypeExpr::Name(name) => self.unify_name(name, candidate, subst),
            TypeExpr::Paren(inner) => self.unify_expr(inner, candidate, subst),
            TypeExpr::Interface(methods) if methods.is_empty() => {
                subst.bind(Binding::Universal, candidate.clone())
            }
            TypeExpr::Variadic(elem) => match candidate {
                TypeExpr::Variadic(candidate_elem) => self.unify_expr(elem, candidate_elem, subst),
                _ => self.unify_expr(elem, candidate, subst),
            },
            _ => {
                let candidate = self.resolve_candidate(candidate);
                self.unify_structure(template, candidate, subst)
            }
        }
    }

    fn unify_name(&self, name: &str, candidate: &TypeExpr, subst: &mut Substitution) -> MatchResult {
        if subst.contains_name(name) {
            return subst.bind(Binding::Name(name.to_string()), candidate.clone());
        }

        match self.template.lookup(name) {
            Some(decl) if decl.is_placeholder() => {
                subst.bind(Binding::Name(name.to_string()), candidate.clone())
            }
            Some(decl) => {
                subst.bind(Binding::Name(name.to_string()), candidate.clone())?;
                self.unify_expr(&decl.ty, candidate, subst)
            }
            None => match candidate {
                TypeExpr::Name(found) if found == name => Ok(()),
                _ => Err(MatchError::IdentifierMismatch {
                    expected: name.to_string(),
                    found: candidate.to_string(),
                }),
            },
        }
    }

    /// Strip parentheses and follow named provider types to their definition
    fn resolve_candidate<'c>(&self, candidate: &'c TypeExpr) -> &'c TypeExpr
    where
        'a: 'c,
    {
        let mut current = candidate.unparen();
        let mut seen: Vec<&str> = Vec::new();

        while let (TypeExpr::Name(name), Some(provider)) = (current, self.provider) {
            if seen.contains(&name.as_str()) {
                break;
            }
            match provider.lookup(name) {
                Some(decl) => {
                    seen.push(name);
                    current = decl.ty.unparen();
                }
                None => break,
            }
        }

        current
    }

    fn unify_structure(
        &self,
        template: &TypeExpr,
        candidate: &TypeExpr,
        subst: &mut Substitution,
    ) -> MatchResult {
        match (template, candidate) {
            (TypeExpr::Qualified(package, name), TypeExpr::Qualified(found_package, found)) => {
                self.unify_name(package, &TypeExpr::Name(found_package.clone()), subst)?;
                if name != found {
                    return Err(MatchError::IdentifierMismatch {
                        expected: name.clone(),
                        found: found.clone(),
                    });
                }
                Ok(())
            }
            (TypeExpr::Pointer(inner), TypeExpr::Pointer(found)) => {
                self.unify_expr(inner, found, subst)
            }
            (
                TypeExpr::Array { len, elem },
                TypeExpr::Array {
                    len: found_len,
                    elem: found_elem,
                },
            ) if len == found_len => self.unify_expr(elem, found_elem, subst),
            (
                TypeExpr::Channel { dir, value },
                TypeExpr::Channel {
                    dir: found_dir,
                    value: found_value,
                },
            ) => {
                if *dir != ChanDir::Both && *found_dir != ChanDir::Both && dir != found_dir {
                    return Err(MatchError::DirectionMismatch {
                        expected: *dir,
                        found: *found_dir,
                    });
                }
                self.unify_expr(value, found_value, subst)
            }
            (
                TypeExpr::Function { params, results },
                TypeExpr::Function {
                    params: found_params,
                    results: found_results,
                },
            ) => {
                self.unify_field_lists(params, found_params, subst)?;
                self.unify_field_lists(results, found_results, subst)
            }
            (TypeExpr::Interface(_), _) => Err(MatchError::UnsupportedConstraint {
                interface: template.to_string(),
            }),
            (
                TypeExpr::Map { key, value },
                TypeExpr::Map {
                    key: found_key,
                    value: found_value,
                },
            ) => {
                self.unify_expr(key, found_key, subst)?;
                self.unify_expr(value, found_value, subst)
            }
            (TypeExpr::Struct(fields), TypeExpr::Struct(found_fields)) => {
                self.unify_struct(fields, found_fields, subst)
            }
            _ => Err(MatchError::ShapeMismatch {
                template: template.to_string(),
                candidate: candidate.to_string(),
            }),
        }
    }

    /// Position-wise match; names are not compared
    fn unify_field_lists(
        &self,
        template: &FieldList,
        candidate: &FieldList,
        subst: &mut Substitution,
    ) -> MatchResult {
        let expected = template.entry_types();
        let found = candidate.entry_types();
        if expected.len() != found.len() {
            return Err(MatchError::FieldListArityMismatch {
                expected: expected.len(),
                found: found.len(),
            });
        }

        for (template_ty, candidate_ty) in expected.into_iter().zip(found) {
            self.unify_expr(template_ty, candidate_ty, subst)?;
        }
        Ok(())
    }

    /// Every template field must exist by name in the candidate; extra fields are ignored
    fn unify_struct(
        &self,
        template: &FieldList,
        candidate: &FieldList,
        subst: &mut Substitution,
    ) -> MatchResult {
        let expected = template.num_fields();
        if expected == 0 {
            return Ok(());
        }

        let found = candidate.num_fields();
        if found < expected {
            return Err(MatchError::InsufficientFields { expected, found });
        }

        for field in template {
            for name in field.effective_names() {
                let matching = candidate
                    .field_by_name(name)
                    .ok_or_else(|| MatchError::MissingField {
                        name: name.to_string(),
                    })?;
                self.unify_expr(&field.ty, &matching.ty, subst)?;
            }
        }
        Ok(())
    }
}

/// Structural equality that never binds: parentheses and parameter names are
/// ignored, struct and interface member names are compared
pub fn equivalent(a: &TypeExpr, b: &TypeExpr) -> bool {
    match (a.unparen(), b.unparen()) {
        (TypeExpr::Name(x), TypeExpr::Name(y)) => x == y,
        (TypeExpr::Qualified(p, x), TypeExpr::Qualified(q, y)) => p == q && x == y,
        (TypeExpr::Pointer(x), TypeExpr::Pointer(y))
        | (TypeExpr::Variadic(x), TypeExpr::Variadic(y)) => equivalent(x, y),
        (
            TypeExpr::Array { len: l1, elem: e1 },
            TypeExpr::Array { len: l2, elem: e2 },
        ) => l1 == l2 && equivalent(e1, e2),
        (
            TypeExpr::Channel { dir: d1, value: v1 },
            TypeExpr::Channel { dir: d2, value: v2 },
        ) => d1 == d2 && equivalent(v1, v2),
        (
            TypeExpr::Map { key: k1, value: v1 },
            TypeExpr::Map { key: k2, value: v2 },
        ) => equivalent(k1, k2) && equivalent(v1, v2),
        (
            TypeExpr::Function {
                params: p1,
                results: r1,
            },
            TypeExpr::Function {
                params: p2,
                results: r2,
            },
        ) => positional_equivalent(p1, p2) && positional_equivalent(r1, r2),
        (TypeExpr::Struct(f1), TypeExpr::Struct(f2))
        | (TypeExpr::Interface(f1), TypeExpr::Interface(f2)) => named_equivalent(f1, f2),
        _ => false,
    }
}

fn positional_equivalent(a: &FieldList, b: &FieldList) -> bool {
    let a = a.entry_types();
    let b = b.entry_types();
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| equivalent(x, y))
}

fn named_entries(fields: &FieldList) -> Vec<(Option<&str>, &TypeExpr)> {
    fields
        .iter()
        .flat_map(|field: &Field| -> Vec<(Option<&str>, &TypeExpr)> {
            if field.names.is_empty() {
                vec![(None, &field.ty)]
            } else {
                field
                    .names
                    .iter()
                    .map(|name| (Some(name.as_str()), &field.ty))
                    .collect()
            }
        })
        .collect()
}

fn named_equivalent(a: &FieldList, b: &FieldList) -> bool {
    let a = named_entries(a);
    let b = named_entries(b);
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|((n1, t1), (n2, t2))| n1 == n2 && equivalent(t1, t2))
}
