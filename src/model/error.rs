//! Error types for model construction and lookup.

use crate::base::ElementId;
use thiserror::Error;

/// Errors raised while building or querying a [`Model`](super::Model).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// No element with this id is available locally, in a referenced
    /// model, or through the external source.
    #[error("Element not found: {0}")]
    NotFound(ElementId),

    /// The element is known only as a proxy and has not been resolved.
    #[error("Element {0} is not yet resolved")]
    NotResolved(ElementId),

    /// A record lacks a required key or has the wrong shape.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A relationship element has missing or unresolvable endpoints.
    #[error("Malformed relationship {id}: {reason}")]
    MalformedRelationship { id: ElementId, reason: String },

    /// The external element source failed to supply data.
    #[error("Element source failed for {id}: {message}")]
    Source { id: ElementId, message: String },

    /// The operation is not supported for this input.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl ModelError {
    /// Create a malformed relationship error.
    pub fn malformed(id: &ElementId, reason: impl Into<String>) -> Self {
        Self::MalformedRelationship {
            id: id.clone(),
            reason: reason.into(),
        }
    }

    /// Returns true for failures that mean "this element cannot be found".
    ///
    /// External source failures count as not-found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Source { .. })
    }
}
