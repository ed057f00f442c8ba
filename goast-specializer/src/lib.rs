//! Goast Specializer
//!
//! Generic programming for Go by specialization. A template module declares its
//! type variables as `interface{}` and uses them in ordinary Go code; a provider
//! module supplies concrete types. Each provider type that structurally
//! implements the template's most complex type yields a rewritten copy of the
//! template.
//!
//! ## Pipeline
//!
//! - **Complexity**: orders template and provider declarations, most structured first
//! - **Unification**: matches template expressions against candidates, growing a substitution
//! - **Naming**: derives readable names for related (`_`-marked) template types
//! - **Rewrite**: applies the substitution to a private copy of the template

#![allow(clippy::uninlined_format_args)]

pub mod complexity;
pub mod context;
pub mod engine;
pub mod error;
pub mod naming;
pub mod rewrite;
pub mod substitution;
pub mod unification;

pub use context::ModuleContext;
pub use engine::{specialize, Outcome, Specialization, SpecializeOptions, Specializer};
pub use error::{GoastError, MatchError, MatchResult};
pub use naming::{capitalize, DefaultNaming, NamingStrategy};
pub use rewrite::Rewriter;
pub use substitution::{Binding, Substitution};
pub use unification::{equivalent, Unifier};

#[cfg(test)]
mod tests;
