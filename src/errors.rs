//! Error types with rich diagnostics using miette

use miette::Diagnostic;
use thiserror::Error;

use crate::coordinates::NamedTerm;
use crate::types::NumericError;

// ============================================================================
// Resolve Errors
// ============================================================================

/// Errors that occur while resolving a node or coordinate reference
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("anchor target no longer exists")]
    #[diagnostic(
        code(plotmark::resolve::target_dropped),
        help("the owning shape was dropped; nodes hold only weak references")
    )]
    TargetDropped,

    #[error("{kind} has no `{term}` anchor")]
    #[diagnostic(code(plotmark::resolve::unsupported_term))]
    UnsupportedTerm {
        kind: &'static str,
        term: NamedTerm,
    },

    #[error("{kind} is not a path")]
    #[diagnostic(
        code(plotmark::resolve::not_a_path),
        help("parametric positions exist only on path-like shapes")
    )]
    NotAPath { kind: &'static str },

    #[error("coordinate reference chain exceeded {max} levels")]
    #[diagnostic(
        code(plotmark::resolve::depth_exceeded),
        help("check for shapes anchored on each other's nodes in a cycle")
    )]
    DepthExceeded { max: u32 },

    #[error("{kind} has no geometry to anchor on")]
    #[diagnostic(code(plotmark::resolve::empty_geometry))]
    EmptyGeometry { kind: &'static str },

    #[error("resolved position is not finite")]
    #[diagnostic(code(plotmark::resolve::non_finite))]
    NonFinite,
}

// ============================================================================
// Validation Errors
// ============================================================================

/// A field value that violates its declared schema constraint
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("invalid value {value} for field `{field}`: {source}")]
#[diagnostic(code(plotmark::schema::invalid_field))]
pub struct ValidateError {
    pub field: &'static str,
    pub value: f64,
    #[source]
    pub source: NumericError,
}

impl ValidateError {
    pub fn new(field: &'static str, value: f64, source: NumericError) -> Self {
        Self {
            field,
            value,
            source,
        }
    }
}
