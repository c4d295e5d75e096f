//! Unified error types for the domain layer
//!
//! Expected business-rule failures (a speaker who lacks the knowledge they
//! are about to share, a move along a missing connection) are *data* - see
//! [`crate::validation::ValidationResult`]. `DomainError` covers the failures
//! that are not part of authoring flow: unknown ids, referential-integrity
//! refusals, and malformed input at the boundary.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Removal refused because another record still points at the target
    #[error("{entity_type} {id} is still referenced by {referenced_by}")]
    StillReferenced {
        entity_type: &'static str,
        id: String,
        referenced_by: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for boundary values such as clock strings)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a still-referenced refusal.
    ///
    /// Use this when a deletion would leave a dangling reference behind:
    /// the mutation is refused and the caller decides what to surface.
    pub fn still_referenced(
        entity_type: &'static str,
        id: impl Into<String>,
        referenced_by: impl Into<String>,
    ) -> Self {
        Self::StillReferenced {
            entity_type,
            id: id.into(),
            referenced_by: referenced_by.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
