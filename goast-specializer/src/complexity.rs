//! Structural complexity of type expressions
//!
//! More deeply nested template types are matched first: binding them pins down
//! their substructure and leaves fewer candidates for the shallow ones.

use crate::context::ModuleContext;
use goast_parser::{FieldList, TypeDecl, TypeExpr};

impl<'m> ModuleContext<'m> {
    /// Complexity score of an expression, resolving named types in this module
    pub fn complexity(&self, expr: &TypeExpr) -> usize {
        let mut resolving = Vec::new();
        self.score(expr, &mut resolving)
    }

    pub fn decl_complexity(&self, decl: &TypeDecl) -> usize {
        let mut resolving = vec![decl.name.as_str()];
        self.score(&decl.ty, &mut resolving)
    }

    fn score<'e>(&self, expr: &'e TypeExpr, resolving: &mut Vec<&'e str>) -> usize
    where
        'm: 'e,
    {
        match expr {
            TypeExpr::Name(name) => self.name_score(name, resolving),
            TypeExpr::Qualified(package, _) => self.name_score(package, resolving),
            TypeExpr::Pointer(inner) | TypeExpr::Paren(inner) | TypeExpr::Variadic(inner) => {
                self.score(inner, resolving)
            }
            TypeExpr::Array { elem, .. } => self.score(elem, resolving) + 1,
            TypeExpr::Channel { value, .. } => self.score(value, resolving) + 1,
            TypeExpr::Map { key, value } => {
                self.score(key, resolving).max(self.score(value, resolving)) + 1
            }
            TypeExpr::Function { params, results } => {
                self.fields_score(params, resolving)
                    .max(self.fields_score(results, resolving))
                    + 1
            }
            TypeExpr::Struct(fields) => self.fields_score(fields, resolving) + 1,
            TypeExpr::Interface(_) => 1,
        }
    }

    fn name_score<'e>(&self, name: &'e str, resolving: &mut Vec<&'e str>) -> usize
    where
        'm: 'e,
    {
        // Names on the current path are recursive references
        if resolving.contains(&name) {
            return 1;
        }
        match self.lookup(name) {
            Some(decl) => {
                resolving.push(name);
                let score = self.score(&decl.ty, resolving) + 1;
                resolving.pop();
                score
            }
            None => 1,
        }
    }

    fn fields_score<'e>(&self, fields: &'e FieldList, resolving: &mut Vec<&'e str>) -> usize
    where
        'm: 'e,
    {
        fields
            .iter()
            .map(|field| self.score(&field.ty, resolving))
            .max()
            .unwrap_or(0)
    }
}
