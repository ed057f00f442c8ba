//! Error types for the goast specializer
//!
//! Unification failures are recoverable and only abort the trial they occur in.
//! A run fails with [`GoastError`] only when every trial failed.

use goast_parser::ChanDir;
use miette::Diagnostic;
use thiserror::Error;

/// Why a template expression could not be matched against a candidate
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Cannot implement {template} with {candidate}: shapes differ")]
    #[diagnostic(
        code(goast::specialize::shape_mismatch),
        help("The candidate must have the same kind of type as the template")
    )]
    ShapeMismatch { template: String, candidate: String },

    #[error("Cannot implement identifier {expected} with {found}")]
    #[diagnostic(
        code(goast::specialize::identifier_mismatch),
        help("Identifiers that are not template types must match exactly")
    )]
    IdentifierMismatch { expected: String, found: String },

    #[error("Channel directions do not match: expected {expected} or bidirectional, found {found}")]
    #[diagnostic(code(goast::specialize::direction_mismatch))]
    DirectionMismatch { expected: ChanDir, found: ChanDir },

    #[error("Not enough fields to implement struct: template has {expected}, candidate has {found}")]
    #[diagnostic(
        code(goast::specialize::insufficient_fields),
        help("A candidate struct needs at least every field the template declares")
    )]
    InsufficientFields { expected: usize, found: usize },

    #[error("Missing field {name}")]
    #[diagnostic(code(goast::specialize::missing_field))]
    MissingField { name: String },

    #[error("Field lists do not match in length: expected {expected}, found {found}")]
    #[diagnostic(
        code(goast::specialize::field_list_arity),
        help("Function parameters and results are matched by position")
    )]
    FieldListArityMismatch { expected: usize, found: usize },

    #[error("{name} is already bound to {bound}, cannot also bind it to {proposed}")]
    #[diagnostic(
        code(goast::specialize::inconsistent_binding),
        help("Every occurrence of a template type must be implemented by the same type")
    )]
    InconsistentBinding {
        name: String,
        bound: String,
        proposed: String,
    },

    #[error("Non-empty interface types are not supported in templates: {interface}")]
    #[diagnostic(
        code(goast::specialize::unsupported_constraint),
        help("Declare type variables as interface{{}}")
    )]
    UnsupportedConstraint { interface: String },

    #[error("No remaining provider type implements {name}")]
    #[diagnostic(code(goast::specialize::unsatisfied_placeholder))]
    UnsatisfiedPlaceholder { name: String },

    #[error("Template declares no types to specialize")]
    #[diagnostic(
        code(goast::specialize::no_template_types),
        help("A template needs at least one type declaration whose name has no marker")
    )]
    NoTemplateTypes,

    #[error("Cannot implement {target} with {candidate}")]
    #[diagnostic(code(goast::specialize::candidate_failed))]
    Candidate {
        candidate: String,
        target: String,
        #[source]
        source: Box<MatchError>,
    },
}

impl MatchError {
    /// The underlying failure, looking through candidate wrappers
    pub fn root_cause(&self) -> &MatchError {
        match self {
            MatchError::Candidate { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_candidate(self, candidate: &str, target: &str) -> Self {
        MatchError::Candidate {
            candidate: candidate.to_string(),
            target: target.to_string(),
            source: Box::new(self),
        }
    }
}

/// Top level error for a specialization run
#[derive(Error, Diagnostic, Debug)]
pub enum GoastError {
    #[error("No type in {provider} implements template {template}")]
    #[diagnostic(
        code(goast::specialize::failed),
        help("Each related error below explains why one provider type was rejected")
    )]
    Specialize {
        template: String,
        provider: String,
        #[related]
        errors: Vec<MatchError>,
    },
}

/// Result type for unification operations
pub type MatchResult<T = ()> = Result<T, MatchError>;
