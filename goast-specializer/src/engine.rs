//! Specialization engine
//!
//! Every provider type is tried independently as the implementation of the most
//! complex template type. A trial then binds the remaining template types from
//! the provider types it has not used yet, names the related types and rewrites
//! a private copy of the template.

use crate::context::ModuleContext;
use crate::error::{GoastError, MatchError, MatchResult};
use crate::naming::{capitalize, DefaultNaming, NamingStrategy};
use crate::rewrite::Rewriter;
use crate::substitution::{Binding, Substitution};
use crate::unification::Unifier;
use goast_parser::{Decl, FieldList, ImportSpec, Module, Span, TypeDecl, TypeExpr};
use rayon::prelude::*;
use std::cmp::Reverse;
use tracing::{debug, info};

/// Knobs for a specialization run
#[derive(Debug, Clone, PartialEq)]
pub struct SpecializeOptions {
    /// Token that marks related type names, e.g. `_` in `_Fan`
    pub marker: String,
    /// Run trials on the rayon pool
    pub parallel: bool,
}

impl Default for SpecializeOptions {
    fn default() -> Self {
        Self {
            marker: "_".to_string(),
            parallel: true,
        }
    }
}

/// One successful trial
#[derive(Debug, Clone, PartialEq)]
pub struct Specialization {
    /// The provider type that implemented the primary template type
    pub name: String,
    pub module: Module,
    pub substitution: Substitution,
}

#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub outputs: Vec<Specialization>,
    /// Per-trial failures, only kept when no trial succeeded
    pub errors: Vec<MatchError>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Convert into a result, attaching every trial error on failure
    pub fn into_result(
        self,
        template: &str,
        provider: &str,
    ) -> Result<Vec<Specialization>, GoastError> {
        if self.is_ok() {
            Ok(self.outputs)
        } else {
            Err(GoastError::Specialize {
                template: template.to_string(),
                provider: provider.to_string(),
                errors: self.errors,
            })
        }
    }
}

pub struct Specializer<'a> {
    template: &'a Module,
    provider: &'a Module,
    options: SpecializeOptions,
    naming: Box<dyn NamingStrategy + 'a>,
}

impl<'a> Specializer<'a> {
    pub fn new(template: &'a Module, provider: &'a Module) -> Self {
        Self {
            template,
            provider,
            options: SpecializeOptions::default(),
            naming: Box::new(DefaultNaming),
        }
    }

    pub fn with_options(mut self, options: SpecializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_naming(mut self, naming: impl NamingStrategy + 'a) -> Self {
        self.naming = Box::new(naming);
        self
    }

    pub fn specialize(&self) -> Outcome {
        let template = ModuleContext::new(self.template);
        let provider = ModuleContext::new(self.provider);

        let (mut targets, related): (Vec<&TypeDecl>, Vec<&TypeDecl>) = template
            .type_decls()
            .partition(|decl| !self.is_related(&decl.name));
        if targets.is_empty() {
            return Outcome {
                outputs: Vec::new(),
                errors: vec![MatchError::NoTemplateTypes],
            };
        }
        targets.sort_by_key(|decl| Reverse(template.decl_complexity(decl)));

        let mut candidates: Vec<&TypeDecl> = provider.type_decls().collect();
        candidates.sort_by_key(|decl| Reverse(provider.decl_complexity(decl)));

        debug!(
            targets = ?targets.iter().map(|decl| &decl.name).collect::<Vec<_>>(),
            candidates = ?candidates.iter().map(|decl| &decl.name).collect::<Vec<_>>(),
            "ordered declarations"
        );

        let unifier = Unifier::new(&template).with_provider(&provider);
        let trial = Trial {
            unifier,
            provider: &provider,
            template: self.template,
            targets: &targets,
            related: &related,
            candidates: &candidates,
            options: &self.options,
            naming: self.naming.as_ref(),
        };

        let results: Vec<MatchResult<Specialization>> = if self.options.parallel {
            candidates
                .par_iter()
                .map(|candidate| trial.run(candidate))
                .collect()
        } else {
            candidates
                .iter()
                .map(|candidate| trial.run(candidate))
                .collect()
        };

        let mut outcome = Outcome::default();
        for result in results {
            match result {
                Ok(specialization) => outcome.outputs.push(specialization),
                Err(err) => outcome.errors.push(err),
            }
        }
        if outcome.is_ok() {
            outcome.errors.clear();
        }
        outcome
    }

    fn is_related(&self, name: &str) -> bool {
        !self.options.marker.is_empty() && name.contains(&self.options.marker)
    }
}

/// Specialize with the default marker, naming and parallelism
pub fn specialize(template: &Module, provider: &Module) -> Outcome {
    Specializer::new(template, provider).specialize()
}

/// Everything one trial reads. Shared between trials, never mutated.
struct Trial<'t> {
    unifier: Unifier<'t>,
    provider: &'t ModuleContext<'t>,
    template: &'t Module,
    targets: &'t [&'t TypeDecl],
    related: &'t [&'t TypeDecl],
    candidates: &'t [&'t TypeDecl],
    options: &'t SpecializeOptions,
    naming: &'t (dyn NamingStrategy + 't),
}

impl Trial<'_> {
    fn run(&self, candidate: &TypeDecl) -> MatchResult<Specialization> {
        let primary = self.targets[0];

        let subst = self
            .bind_all(primary, candidate)
            .map_err(|err| err.in_candidate(&candidate.name, &primary.name));

        match subst {
            Ok(subst) => {
                let specialization = self.emit(candidate, subst)?;
                info!(
                    candidate = %candidate.name,
                    bindings = %specialization.substitution,
                    "specialized"
                );
                Ok(specialization)
            }
            Err(err) => {
                debug!(candidate = %candidate.name, error = %err.root_cause(), "candidate rejected");
                Err(err)
            }
        }
    }

    fn bind_all(&self, primary: &TypeDecl, candidate: &TypeDecl) -> MatchResult<Substitution> {
        let mut subst = self
            .unifier
            .unify_decl(primary, candidate, &Substitution::new())?;
        let mut consumed = vec![candidate.name.as_str()];

        for target in &self.targets[1..] {
            if subst.contains_name(&target.name) {
                continue;
            }

            let found = self
                .candidates
                .iter()
                .filter(|other| !consumed.contains(&other.name.as_str()))
                .find_map(|other| {
                    self.unifier
                        .unify_decl(target, other, &subst)
                        .ok()
                        .map(|grown| (other, grown))
                });

            match found {
                Some((other, grown)) => {
                    subst = grown;
                    consumed.push(other.name.as_str());
                }
                None => {
                    return Err(MatchError::UnsatisfiedPlaceholder {
                        name: target.name.clone(),
                    })
                }
            }
        }

        Ok(subst)
    }

    fn emit(&self, candidate: &TypeDecl, mut subst: Substitution) -> MatchResult<Specialization> {
        let fallback = capitalize(&candidate.name);
        for related in self.related {
            let mut references = Vec::new();
            collect_references(&related.ty, &subst, &mut references);
            let name =
                self.naming
                    .related_name(&related.name, &self.options.marker, &references, &fallback);
            subst
                .bind(Binding::Name(related.name.clone()), TypeExpr::Name(name))
                .map_err(|err| err.in_candidate(&candidate.name, &related.name))?;
        }

        let mut module = self.template.clone();
        module.decls.retain(|decl| match decl {
            Decl::Type(type_decl) => !self
                .targets
                .iter()
                .any(|target| target.name == type_decl.name),
            _ => true,
        });

        let mut module = Rewriter::new(&subst).rewrite_module(&module);
        self.carry_imports(&subst, &mut module);
        module.package = self.provider.package().to_string();

        Ok(Specialization {
            name: candidate.name.clone(),
            module,
            substitution: subst,
        })
    }

    /// Add provider imports for qualifiers that bound expressions introduce
    fn carry_imports(&self, subst: &Substitution, module: &mut Module) {
        let mut qualifiers = Vec::new();
        for expr in subst.values() {
            collect_qualifiers(expr, &mut qualifiers);
        }

        for qualifier in qualifiers {
            if module
                .imports
                .iter()
                .any(|import| import.local_name() == qualifier)
            {
                continue;
            }
            match self.provider.qualifier_of(qualifier) {
                Some(import) => {
                    debug!(path = %import.path, "carrying import");
                    module.imports.push(ImportSpec {
                        name: import.name.clone(),
                        path: import.path.clone(),
                        span: Span::default(),
                    });
                }
                None => debug!(qualifier, "qualifier has no provider import"),
            }
        }
    }
}

/// Bound expressions of the names `expr` references, depth first
fn collect_references(expr: &TypeExpr, subst: &Substitution, out: &mut Vec<TypeExpr>) {
    match expr {
        TypeExpr::Name(name) => {
            if let Some(bound) = subst.get_name(name) {
                out.push(bound.clone());
            }
        }
        TypeExpr::Qualified(..) => {}
        TypeExpr::Pointer(inner)
        | TypeExpr::Paren(inner)
        | TypeExpr::Variadic(inner)
        | TypeExpr::Array { elem: inner, .. }
        | TypeExpr::Channel { value: inner, .. } => collect_references(inner, subst, out),
        TypeExpr::Map { key, value } => {
            collect_references(key, subst, out);
            collect_references(value, subst, out);
        }
        TypeExpr::Function { params, results } => {
            collect_field_references(params, subst, out);
            collect_field_references(results, subst, out);
        }
        TypeExpr::Struct(fields) | TypeExpr::Interface(fields) => {
            collect_field_references(fields, subst, out)
        }
    }
}

fn collect_field_references(fields: &FieldList, subst: &Substitution, out: &mut Vec<TypeExpr>) {
    for field in fields {
        collect_references(&field.ty, subst, out);
    }
}

fn collect_qualifiers<'e>(expr: &'e TypeExpr, out: &mut Vec<&'e str>) {
    match expr {
        TypeExpr::Qualified(package, _) => {
            if !out.contains(&package.as_str()) {
                out.push(package);
            }
        }
        TypeExpr::Name(_) => {}
        TypeExpr::Pointer(inner)
        | TypeExpr::Paren(inner)
        | TypeExpr::Variadic(inner)
        | TypeExpr::Array { elem: inner, .. }
        | TypeExpr::Channel { value: inner, .. } => collect_qualifiers(inner, out),
        TypeExpr::Map { key, value } => {
            collect_qualifiers(key, out);
            collect_qualifiers(value, out);
        }
        TypeExpr::Function { params, results } => {
            for field in params.iter().chain(results.iter()) {
                collect_qualifiers(&field.ty, out);
            }
        }
        TypeExpr::Struct(fields) | TypeExpr::Interface(fields) => {
            for field in fields {
                collect_qualifiers(&field.ty, out);
            }
        }
    }
}
