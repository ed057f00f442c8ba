//! Bindings from template types to concrete expressions

use crate::error::{MatchError, MatchResult};
use crate::unification::equivalent;
use goast_parser::TypeExpr;
use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

/// What a substitution entry binds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    /// A named template type
    Name(String),
    /// Every inline empty interface in the template
    Universal,
}

impl Binding {
    pub fn name(name: impl Into<String>) -> Self {
        Binding::Name(name.into())
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Name(name) => write!(f, "{}", name),
            Binding::Universal => write!(f, "interface{{}}"),
        }
    }
}

/// Insertion-ordered bindings for one trial. A binding never changes once made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    bindings: IndexMap<Binding, TypeExpr>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `binding -> expr`. Rebinding to an equivalent expression is a no-op.
    pub fn bind(&mut self, binding: Binding, expr: TypeExpr) -> MatchResult {
        if let Some(bound) = self.bindings.get(&binding) {
            if equivalent(bound, &expr) {
                return Ok(());
            }
            return Err(MatchError::InconsistentBinding {
                name: binding.to_string(),
                bound: bound.to_string(),
                proposed: expr.to_string(),
            });
        }

        debug!(binding = %binding, expr = %expr, "bind");
        self.bindings.insert(binding, expr);
        Ok(())
    }

    pub fn get_name(&self, name: &str) -> Option<&TypeExpr> {
        self.bindings.get(&Binding::Name(name.to_string()))
    }

    pub fn universal(&self) -> Option<&TypeExpr> {
        self.bindings.get(&Binding::Universal)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.get_name(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound expressions in binding order
    pub fn values(&self) -> impl Iterator<Item = &TypeExpr> {
        self.bindings.values()
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .bindings
            .iter()
            .map(|(binding, expr)| format!("{} -> {}", binding, expr))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bind_and_display_in_insertion_order() {
        let mut subst = Substitution::new();
        subst.bind(Binding::name("K"), TypeExpr::name("string")).unwrap();
        subst.bind(Binding::name("V"), TypeExpr::name("int")).unwrap();

        assert_eq!(subst.to_string(), "K -> string, V -> int");
        assert_eq!(subst.len(), 2);
        assert_eq!(subst.get_name("V"), Some(&TypeExpr::name("int")));
    }

    #[test]
    fn test_rebinding_requires_equivalence() {
        let mut subst = Substitution::new();
        subst.bind(Binding::name("K"), TypeExpr::name("string")).unwrap();

        assert!(subst
            .bind(
                Binding::name("K"),
                TypeExpr::Paren(Box::new(TypeExpr::name("string")))
            )
            .is_ok());

        let err = subst
            .bind(Binding::name("K"), TypeExpr::name("int"))
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::InconsistentBinding {
                name: "K".to_string(),
                bound: "string".to_string(),
                proposed: "int".to_string(),
            }
        );
        assert_eq!(subst.get_name("K"), Some(&TypeExpr::name("string")));
    }

    #[test]
    fn test_universal_binding_is_distinct_from_names() {
        let mut subst = Substitution::new();
        subst.bind(Binding::Universal, TypeExpr::name("int")).unwrap();
        subst
            .bind(Binding::name("interface{}"), TypeExpr::name("string"))
            .unwrap();

        assert_eq!(subst.universal(), Some(&TypeExpr::name("int")));
        assert_eq!(subst.len(), 2);
    }
}
